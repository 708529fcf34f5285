//! Data containers: scalars, serial calendar values, vectors and matrices.
pub mod matrix;
pub mod scalar;
pub mod temporal;
pub mod vector;

pub use matrix::Matrix;
pub use scalar::{Scalar, ScalarSource};
pub use temporal::{SerialTemporal, TemporalError};
pub use vector::{ScalarVector, Vector};
