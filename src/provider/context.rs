//! Explicit provider context: the factory hub, the registered function
//! providers and the configuration they run under.
use super::config::{ConfigError, ContextConfig, ProviderRequirement};
use super::factory::Factories;
use super::version::{Version, VersionExpression};
use crate::error::FunctionError;
use crate::functions::financial::{FinancialFunctions, FinancialProvider, FINANCIAL_PROVIDER};
use crate::functions::statistics::{StatisticsFunctions, StatisticsProvider, STATISTICS_PROVIDER};
use crate::parameter::{Parameter, ParameterList};
use chrono::{Local, NaiveDate};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A named, versioned component.
pub trait Provider {
    fn provider_name(&self) -> &str;
    fn provider_version(&self) -> Version;
}

/// A domain function library that can be registered on a [`Context`].
pub trait FunctionProvider: Provider + Send + Sync {
    fn as_any(&self) -> &dyn Any;
}

struct ContextInner {
    factories: Factories,
    providers: Vec<Arc<dyn FunctionProvider>>,
    config: ContextConfig,
}

#[derive(Clone)]
pub struct Context {
    inner: Arc<ContextInner>,
}

impl Context {
    /// Both built-in libraries under the default configuration.
    pub fn new() -> Self {
        Self::builder().with_builtin_providers().build()
    }

    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Built-in libraries under `config`. Unmet provider requirements are
    /// reported by [`Context::unmet_requirements`], not raised here.
    pub fn from_config(config: ContextConfig) -> Result<Self, ConfigError> {
        Ok(Self::builder().with_builtin_providers().config(config)?.build())
    }

    pub fn factories(&self) -> &Factories {
        &self.inner.factories
    }

    pub fn config(&self) -> &ContextConfig {
        &self.inner.config
    }

    pub fn providers(&self) -> impl Iterator<Item = &Arc<dyn FunctionProvider>> {
        self.inner.providers.iter()
    }

    pub fn provider(&self, name: &str) -> Result<Arc<dyn FunctionProvider>, FunctionError> {
        self.inner
            .providers
            .iter()
            .find(|p| p.provider_name() == name)
            .cloned()
            .ok_or_else(|| FunctionError::ProviderNotFound { name: name.to_string() })
    }

    /// The provider registered under `name` if its version satisfies
    /// `expression`. Absence is not an error.
    pub fn select(&self, name: &str, expression: &VersionExpression) -> Option<Arc<dyn FunctionProvider>> {
        self.provider(name)
            .ok()
            .filter(|p| expression.matches(&p.provider_version()))
    }

    pub fn unmet_requirements(&self) -> Vec<&ProviderRequirement> {
        self.inner
            .config
            .providers
            .iter()
            .filter(|req| self.select(&req.name, &req.version).is_none())
            .collect()
    }

    pub fn statistics(&self) -> Result<StatisticsFunctions, FunctionError> {
        let provider = self.provider(STATISTICS_PROVIDER)?;
        provider
            .as_any()
            .downcast_ref::<StatisticsProvider>()
            .map(|p| p.functions(self))
            .ok_or_else(|| FunctionError::ProviderNotFound { name: STATISTICS_PROVIDER.to_string() })
    }

    pub fn financial(&self) -> Result<FinancialFunctions, FunctionError> {
        let provider = self.provider(FINANCIAL_PROVIDER)?;
        provider
            .as_any()
            .downcast_ref::<FinancialProvider>()
            .map(|p| p.functions(self))
            .ok_or_else(|| FunctionError::ProviderNotFound { name: FINANCIAL_PROVIDER.to_string() })
    }

    /// The configured date, or the local calendar date.
    pub fn today(&self) -> NaiveDate {
        self.inner.config.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Collects parameters for a function or model, enforcing unique
    /// name/variable keys when the configuration asks for it.
    pub fn bind(&self, parameters: impl IntoIterator<Item = Parameter>) -> Result<ParameterList, FunctionError> {
        let list: ParameterList = parameters.into_iter().collect();
        if self.inner.config.strict_parameters {
            list.validate_unique()?;
        }
        Ok(list)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .inner
            .providers
            .iter()
            .map(|p| format!("{}@{}", p.provider_name(), p.provider_version()))
            .collect();
        f.debug_struct("Context")
            .field("providers", &names)
            .field("config", &self.inner.config)
            .finish()
    }
}

#[derive(Default)]
pub struct ContextBuilder {
    factories: Factories,
    providers: Vec<Arc<dyn FunctionProvider>>,
    config: ContextConfig,
}

impl ContextBuilder {
    /// Adds a provider. A provider whose name is already registered is
    /// ignored: the first registration wins.
    pub fn register(mut self, provider: impl FunctionProvider + 'static) -> Self {
        if !self.providers.iter().any(|p| p.provider_name() == provider.provider_name()) {
            self.providers.push(Arc::new(provider));
        }
        self
    }

    pub fn with_builtin_providers(self) -> Self {
        self.register(StatisticsProvider).register(FinancialProvider)
    }

    /// Replaces the default configuration. The same checks as the JSON
    /// loaders apply.
    pub fn config(mut self, config: ContextConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn build(self) -> Context {
        Context {
            inner: Arc::new(ContextInner {
                factories: self.factories,
                providers: self.providers,
                config: self.config,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Scalar;

    struct FakeStatistics(Version);

    impl Provider for FakeStatistics {
        fn provider_name(&self) -> &str {
            STATISTICS_PROVIDER
        }
        fn provider_version(&self) -> Version {
            self.0.clone()
        }
    }

    impl FunctionProvider for FakeStatistics {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_builtin_providers_are_discoverable() {
        let ctx = Context::new();
        assert_eq!(ctx.providers().count(), 2);
        assert!(ctx.statistics().is_ok());
        assert!(ctx.financial().is_ok());
        assert_eq!(
            ctx.provider("Astrology").err(),
            Some(FunctionError::ProviderNotFound { name: "Astrology".into() })
        );
    }

    #[test]
    fn test_first_registration_wins() {
        let ctx = Context::builder()
            .register(FakeStatistics(Version::new(9, 0, 0)))
            .with_builtin_providers()
            .build();
        assert_eq!(ctx.provider(STATISTICS_PROVIDER).unwrap().provider_version(), Version::new(9, 0, 0));
        // The impostor is found by name but cannot hand out the library.
        assert!(ctx.statistics().is_err());
    }

    #[test]
    fn test_select_by_version_expression() {
        let ctx = Context::builder().register(FakeStatistics(Version::new(1, 4, 0))).build();
        let caret = VersionExpression::parse("^1.2.0").unwrap();
        let next_major = VersionExpression::parse(">=2.0.0").unwrap();
        assert!(ctx.select(STATISTICS_PROVIDER, &caret).is_some());
        assert!(ctx.select(STATISTICS_PROVIDER, &next_major).is_none());
        assert!(ctx.select(FINANCIAL_PROVIDER, &caret).is_none());
        assert!(ctx.financial().is_err());
    }

    #[test]
    fn test_unmet_requirements_are_listed() {
        let config = ContextConfig::from_json(
            r#"{"providers": [
                {"name": "Statistics", "version": ">=0.0.1"},
                {"name": "Financial", "version": ">=99.0.0"},
                {"name": "Geometry", "version": "^1.0.0"}
            ]}"#,
        )
        .unwrap();
        let ctx = Context::from_config(config).unwrap();
        let unmet: Vec<&str> = ctx.unmet_requirements().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(unmet, vec!["Financial", "Geometry"]);
    }

    #[test]
    fn test_today_override_and_strict_binding() {
        let config = ContextConfig {
            today: NaiveDate::from_ymd_opt(2025, 3, 1),
            strict_parameters: true,
            ..ContextConfig::default()
        };
        let ctx = Context::from_config(config).unwrap();
        assert_eq!(ctx.today(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());

        let pf = ctx.factories().parameter_factory();
        let dup = vec![pf.scalar("age", None, 1), pf.scalar("age", None, 2)];
        assert!(matches!(ctx.bind(dup.clone()), Err(FunctionError::DuplicateParameter { .. })));
        assert_eq!(Context::new().bind(dup).unwrap().len(), 2);
        assert_eq!(Context::new().bind(vec![pf.scalar("x", None, Scalar::from(1.0))]).unwrap().len(), 1);
    }

    #[test]
    fn test_config_built_in_code_is_validated() {
        let config = ContextConfig { max_distribution_years: 0, ..ContextConfig::default() };
        assert!(matches!(Context::from_config(config.clone()), Err(ConfigError::InvalidDistributionLimit)));
        assert!(matches!(Context::builder().config(config), Err(ConfigError::InvalidDistributionLimit)));

        let capped = ContextConfig { max_distribution_years: 1, ..ContextConfig::default() };
        assert_eq!(Context::from_config(capped).unwrap().config().max_distribution_years, 1);
    }
}
