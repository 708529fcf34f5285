//! Text renderings of function graphs and models for auditing.
pub mod trace;

pub use trace::{format_impact, format_model, format_trace};
