//! Evaluation core: memo slots, lazy functions, coefficients and models.
pub mod coefficient;
pub mod function;
pub mod memo;
pub mod model;

pub use coefficient::{Coefficient, CoefficientSet, CoefficientSummary};
pub use function::{Function, FunctionNode, FunctionType, LazyFunction, ScalarFunction};
pub use memo::Memo;
pub use model::{Model, ModelState};
