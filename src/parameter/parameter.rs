use super::value::{ParameterType, Value};
use std::fmt;

/// A named, optionally variable-tagged input to a function or model.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    variable: Option<String>,
    value: Value,
}

impl Parameter {
    pub fn new(name: impl Into<String>, variable: Option<&str>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            variable: variable.map(str::to_string),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn parameter_type(&self) -> ParameterType {
        self.value.parameter_type()
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.variable {
            Some(v) => write!(f, "{}({}) = {}", self.name, v, self.value),
            None => write!(f, "{} = {}", self.name, self.value),
        }
    }
}
