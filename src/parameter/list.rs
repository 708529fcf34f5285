//! Ordered parameter storage and the lookup engine over it.
//!
//! Every lookup returns the first match. Duplicates are accepted by `push`;
//! `try_push` and `validate_unique` reject a second parameter with the same
//! name and variable.
use super::parameter::Parameter;
use super::predicate::*;
use super::value::{ParameterType, Value};
use crate::compute::function::{LazyFunction, ScalarFunction};
use crate::error::FunctionError;
use crate::store::{Matrix, Scalar, ScalarVector};
use std::collections::HashSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ParameterList {
    parameters: Vec<Parameter>,
}

impl ParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, parameter: Parameter) {
        self.parameters.push(parameter);
    }

    pub fn try_push(&mut self, parameter: Parameter) -> Result<(), FunctionError> {
        if self.has_parameter_keyed(parameter.name(), parameter.variable()) {
            return Err(FunctionError::DuplicateParameter {
                name: parameter.name().to_string(),
                variable: parameter.variable().map(str::to_string),
            });
        }
        self.parameters.push(parameter);
        Ok(())
    }

    pub fn validate_unique(&self) -> Result<(), FunctionError> {
        let mut seen = HashSet::new();
        for p in &self.parameters {
            if !seen.insert((p.name(), p.variable())) {
                return Err(FunctionError::DuplicateParameter {
                    name: p.name().to_string(),
                    variable: p.variable().map(str::to_string),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }

    // --- Lookup ---

    pub fn find<P>(&self, predicate: P) -> Option<&Parameter>
    where
        P: Fn(&Parameter) -> bool,
    {
        self.parameters.iter().find(|p| predicate(p))
    }

    pub fn get(&self, index: usize) -> Option<&Parameter> {
        self.parameters.get(index)
    }

    pub fn get_parameter(&self, name: &str) -> Option<&Parameter> {
        self.find(parameter_name(name))
    }

    pub fn get_parameter_for(&self, name: &str, variable: &str) -> Option<&Parameter> {
        self.find(parameter_name_variable(name, variable))
    }

    pub fn get_parameter_from_variable(&self, variable: &str) -> Option<&Parameter> {
        self.find(parameter_variable(variable))
    }

    pub fn get_parameter_type(&self, name: &str) -> Option<ParameterType> {
        self.get_parameter(name).map(Parameter::parameter_type)
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.get_parameter(name).is_some()
    }

    pub fn has_parameter_for(&self, name: &str, variable: &str) -> bool {
        self.get_parameter_for(name, variable).is_some()
    }

    pub fn has_parameter_typed(&self, name: &str, variable: &str, kind: ParameterType) -> bool {
        self.find(parameter_name_variable_type(name, variable, kind)).is_some()
    }

    fn has_parameter_keyed(&self, name: &str, variable: Option<&str>) -> bool {
        self.find(|p| p.name() == name && p.variable() == variable).is_some()
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get_parameter(name).map(Parameter::value)
    }

    pub fn value_for(&self, name: &str, variable: &str) -> Option<&Value> {
        self.get_parameter_for(name, variable).map(Parameter::value)
    }

    pub fn value_from_variable(&self, variable: &str) -> Option<&Value> {
        self.get_parameter_from_variable(variable).map(Parameter::value)
    }

    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.get(index).map(Parameter::value)
    }

    // --- Typed readers: a missing parameter and a wrong kind are both errors ---

    pub fn require(&self, name: &str) -> Result<&Value, FunctionError> {
        self.value(name).ok_or_else(|| FunctionError::missing(name))
    }

    pub fn scalar(&self, name: &str) -> Result<Scalar, FunctionError> {
        self.require(name)?.as_scalar()
    }

    pub fn scalar_vector(&self, name: &str) -> Result<&ScalarVector, FunctionError> {
        self.require(name)?.as_scalar_vector()
    }

    pub fn matrix(&self, name: &str) -> Result<&Matrix, FunctionError> {
        self.require(name)?.as_matrix()
    }

    pub fn scalar_function(&self, name: &str) -> Result<&Arc<ScalarFunction>, FunctionError> {
        self.require(name)?.as_scalar_function()
    }

    /// A generic function parameter downcast to its output type.
    pub fn function<T>(&self, name: &str) -> Result<Arc<LazyFunction<T>>, FunctionError>
    where
        T: Clone + std::fmt::Debug + Send + Sync + 'static,
    {
        self.require(name)?.as_function::<T>()
    }

    pub fn generic<T: 'static>(&self, name: &str) -> Result<&T, FunctionError> {
        self.require(name)?.as_generic::<T>()
    }

    /// Scalars coerce directly; scalar functions are computed first.
    pub fn get_integer(&self, name: &str) -> Result<i32, FunctionError> {
        Ok(self.require(name)?.to_scalar("Integer")?.as_int())
    }

    pub fn get_double(&self, name: &str) -> Result<f64, FunctionError> {
        Ok(self.require(name)?.to_scalar("Double")?.as_double())
    }
}

impl FromIterator<Parameter> for ParameterList {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self { parameters: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a ParameterList {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
