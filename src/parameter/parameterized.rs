use super::list::ParameterList;
use super::parameter::Parameter;
use super::value::ParameterType;
use crate::error::FunctionError;

/// Anything that owns an ordered parameter list.
pub trait Parameterized {
    fn name(&self) -> &str;
    fn variable(&self) -> Option<&str>;
    fn parameters(&self) -> &ParameterList;

    fn find(&self, predicate: &dyn Fn(&Parameter) -> bool) -> Option<&Parameter> {
        self.parameters().find(predicate)
    }

    fn get_parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters().get_parameter(name)
    }

    fn get_parameter_for(&self, name: &str, variable: &str) -> Option<&Parameter> {
        self.parameters().get_parameter_for(name, variable)
    }

    fn get_parameter_type(&self, name: &str) -> Option<ParameterType> {
        self.parameters().get_parameter_type(name)
    }

    fn has_parameter(&self, name: &str) -> bool {
        self.parameters().has_parameter(name)
    }

    fn get_integer(&self, name: &str) -> Result<i32, FunctionError> {
        self.parameters().get_integer(name)
    }

    fn get_double(&self, name: &str) -> Result<f64, FunctionError> {
        self.parameters().get_double(name)
    }
}
