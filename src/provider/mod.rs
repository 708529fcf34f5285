//! Provider discovery: versions, the data-factory hub, the explicit context
//! and its configuration.
pub mod config;
pub mod context;
pub mod factory;
pub mod version;

pub use config::{ConfigError, ContextConfig, ProviderRequirement, DEFAULT_MAX_DISTRIBUTION_YEARS};
pub use context::{Context, ContextBuilder, FunctionProvider, Provider};
pub use factory::{CoefficientFactory, Factories, MatrixFactory, ParameterFactory, VectorFactory};
pub use version::{Version, VersionError, VersionExpression, VersionOperator};

/// Version of the built-in providers: the crate version.
pub fn crate_version() -> Version {
    Version::parse(env!("CARGO_PKG_VERSION")).unwrap_or_else(|_| Version::new(0, 0, 0))
}
