//! Models: parameterized entities whose `solve()` fills a coefficient set.
use super::coefficient::{Coefficient, CoefficientSet};
use super::function::{FunctionType, ScalarFunction};
use crate::error::FunctionError;
use crate::parameter::{ParameterList, Parameterized, Value};
use crate::store::Scalar;

pub trait Model: Parameterized {
    /// Populates the coefficients. Runs once; a second call fails.
    fn solve(&mut self) -> Result<(), FunctionError>;

    fn coefficient_set(&self) -> &CoefficientSet;

    fn coefficients(&self) -> std::slice::Iter<'_, Coefficient> {
        self.coefficient_set().iter()
    }

    fn get_coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficient_set().get(name)
    }

    fn coefficient_value(&self, name: &str) -> Option<&Value> {
        self.get_coefficient(name).map(Coefficient::value)
    }

    fn coefficient_scalar(&self, name: &str) -> Result<Scalar, FunctionError> {
        self.get_coefficient(name)
            .ok_or_else(|| FunctionError::MissingCoefficient { name: name.to_string() })?
            .scalar()
    }
}

/// Shared state behind every model: identity, parameters, coefficients and
/// the solved flag.
#[derive(Debug, Clone)]
pub struct ModelState {
    name: String,
    parameters: ParameterList,
    coefficients: CoefficientSet,
    solved: bool,
}

impl ModelState {
    pub fn new(name: impl Into<String>, parameters: ParameterList) -> Self {
        Self {
            name: name.into(),
            parameters,
            coefficients: CoefficientSet::new(),
            solved: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &ParameterList {
        &self.parameters
    }

    pub fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Claims the single solve for this model.
    pub fn begin_solve(&mut self) -> Result<(), FunctionError> {
        if self.solved {
            return Err(FunctionError::AlreadySolved { model: self.name.clone() });
        }
        self.solved = true;
        Ok(())
    }

    pub fn set_coefficient(&mut self, coefficient: Coefficient) {
        self.coefficients.set(coefficient);
    }

    pub fn set_value(&mut self, function_type: &FunctionType, value: impl Into<Value>) {
        self.coefficients.set(Coefficient::of_type(function_type, value));
    }

    /// Forces the function and stores its scalar under the function's type.
    pub fn set_function(&mut self, function: &ScalarFunction) -> Result<(), FunctionError> {
        let value = function.compute()?;
        self.set_value(function.function_type(), value);
        Ok(())
    }
}
