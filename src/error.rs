//! Error types raised while resolving parameters, evaluating functions and
//! solving models.
use crate::parameter::ParameterType;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    #[error("No parameter with name {name} found")]
    MissingParameter { name: String },

    #[error("Invalid parameter cast: cannot return {expected} from a {found}")]
    InvalidCast { expected: String, found: ParameterType },

    #[error("Duplicate parameter '{name}' (variable: {variable:?})")]
    DuplicateParameter { name: String, variable: Option<String> },

    #[error("{function} requires at least {required} values, got {actual}")]
    InsufficientData { function: String, required: usize, actual: usize },

    #[error("Matrix '{matrix}' has no value at row {row}, column {column}")]
    MissingCell { matrix: String, row: usize, column: usize },

    #[error("Matrix '{matrix}' has no column {column}")]
    ColumnNotFound { matrix: String, column: String },

    #[error("Math error: {0}")]
    MathError(String),

    #[error("Cycle detected: {0}")]
    CycleDetected(String),

    #[error("No function provider named '{name}' is registered")]
    ProviderNotFound { name: String },

    #[error("Model '{model}' has already been solved")]
    AlreadySolved { model: String },

    #[error("No coefficient with name {name} found")]
    MissingCoefficient { name: String },
}

impl FunctionError {
    pub fn missing(name: &str) -> Self {
        FunctionError::MissingParameter { name: name.to_string() }
    }

    pub fn cast(expected: &str, found: ParameterType) -> Self {
        FunctionError::InvalidCast { expected: expected.to_string(), found }
    }
}
