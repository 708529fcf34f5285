//! Domain function libraries registered as providers.
pub mod financial;
pub mod statistics;
