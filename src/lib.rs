//! Lazily evaluated, memoized functions over named parameters, composed into
//! models that solve to a set of coefficients.
//!
//! Layers, bottom up:
//! - `store`: scalars, serial dates, vectors and matrices.
//! - `parameter`: the tagged parameter value and the lookup engine.
//! - `compute`: memoized functions, coefficients and the `Model` trait.
//! - `analysis`: the dependency graph between functions.
//! - `provider`: versions, factories and the context that resolves providers.
//! - `functions`: the statistics and financial libraries.
//! - `display`: audit traces.

pub mod analysis;
pub mod compute;
pub mod display;
pub mod error;
pub mod functions;
pub mod parameter;
pub mod provider;
pub mod store;

pub use compute::{Coefficient, CoefficientSet, Function, FunctionNode, FunctionType, LazyFunction, Model, ScalarFunction};
pub use error::FunctionError;
pub use parameter::{Parameter, ParameterList, ParameterType, Parameterized, Value};
pub use provider::{Context, ContextConfig, Version, VersionExpression};
pub use store::{Matrix, Scalar, ScalarVector, SerialTemporal, Vector};
