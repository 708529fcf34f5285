//! Statistics function library: descriptive statistics, bivariate measures,
//! goodness of fit and the linear regression model built from them.
//!
//! Every factory method returns a memoized [`ScalarFunction`]. Dependencies
//! are bound as parameters named after the dependency's function name and
//! tagged with the role variable (`x` / `y`) where two of the same kind meet.
pub mod bivariate;
pub mod descriptive;
pub mod fit;
pub mod regression;

pub use regression::LinearRegressionModel;

use crate::compute::{FunctionType, LazyFunction, ScalarFunction};
use crate::error::FunctionError;
use crate::parameter::{parameter_variable_and_type, Parameter, ParameterList, ParameterType};
use crate::provider::{crate_version, Context, FunctionProvider, ParameterFactory, Provider, Version};
use crate::store::{Scalar, ScalarVector};
use std::any::Any;
use std::sync::Arc;

pub const STATISTICS_PROVIDER: &str = "Statistics";

// Parameter names.
pub const VECTOR: &str = "vector";
pub const MATRIX: &str = "matrix";
pub const COLUMN: &str = "column";
pub const DF: &str = "df";
pub const COUNT: &str = "count";
pub const MEAN: &str = "mean";
pub const VARIANCE: &str = "variance";
pub const COVARIANCE: &str = "covariance";
pub const SLOPE: &str = "slope";
pub const INTERCEPT: &str = "intercept";

// Role variables.
pub const X: &str = "x";
pub const Y: &str = "y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatisticsFunctionType {
    Sum,
    Mean,
    Median,
    Variance,
    StandardDeviation,
    Covariance,
    Slope,
    Intercept,
    ResidualSumOfSquares,
    TotalSumOfSquares,
    RSquared,
    SlopeStandardError,
    InterceptStandardError,
    MeanSquaredError,
    LinearRegressionModel,
    TSlope,
    TIntercept,
    PSlope,
}

impl StatisticsFunctionType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Variance => "variance",
            Self::StandardDeviation => "standardDeviation",
            Self::Covariance => "covariance",
            Self::Slope => "slope",
            Self::Intercept => "intercept",
            Self::ResidualSumOfSquares => "residualsumOfSquares",
            Self::TotalSumOfSquares => "totalSumOfSquares",
            Self::RSquared => "rSquared",
            Self::SlopeStandardError => "slopeStandardError",
            Self::InterceptStandardError => "interceptStandardError",
            Self::MeanSquaredError => "meanSquaredError",
            Self::LinearRegressionModel => "linearRegressionModel",
            Self::TSlope => "TSlope",
            Self::TIntercept => "TIntercept",
            Self::PSlope => "PSlope",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sum => "SUM",
            Self::Mean => "MEAN",
            Self::Median => "MEDIAN",
            Self::Variance => "VAR",
            Self::StandardDeviation => "STDDEV",
            Self::Covariance => "COV",
            Self::Slope => "B",
            Self::Intercept => "a",
            Self::ResidualSumOfSquares => "SSR",
            Self::TotalSumOfSquares => "SST",
            Self::RSquared => "R-SQUARED",
            Self::SlopeStandardError => "SE Slope",
            Self::InterceptStandardError => "SE Intercept",
            Self::MeanSquaredError => "MSE",
            Self::LinearRegressionModel => "LRM",
            Self::TSlope => "t (slope)",
            Self::TIntercept => "t (intercept)",
            Self::PSlope => "p (slope)",
        }
    }

    pub fn function_type(&self) -> FunctionType {
        FunctionType::new(self.name(), self.label())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsProvider;

impl StatisticsProvider {
    pub fn functions(&self, ctx: &Context) -> StatisticsFunctions {
        StatisticsFunctions { ctx: ctx.clone() }
    }
}

impl Provider for StatisticsProvider {
    fn provider_name(&self) -> &str {
        STATISTICS_PROVIDER
    }

    fn provider_version(&self) -> Version {
        crate_version()
    }
}

impl FunctionProvider for StatisticsProvider {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Factory for statistics functions and models. The methods live next to
/// their kernels in `descriptive`, `bivariate`, `fit` and `regression`.
#[derive(Debug, Clone)]
pub struct StatisticsFunctions {
    ctx: Context,
}

impl StatisticsFunctions {
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    fn parameters(&self) -> &ParameterFactory {
        self.ctx.factories().parameter_factory()
    }

    /// Binds `kind` over `parameters` with the given evaluator.
    fn build<F>(
        &self,
        kind: StatisticsFunctionType,
        variable: Option<&str>,
        parameters: Vec<Parameter>,
        evaluator: F,
    ) -> Arc<ScalarFunction>
    where
        F: Fn(&ParameterList) -> Result<f64, FunctionError> + Send + Sync + 'static,
    {
        Arc::new(LazyFunction::new(
            kind.function_type(),
            variable,
            parameters.into_iter().collect(),
            move |p| evaluator(p).map(Scalar::from),
        ))
    }
}

/// The scalar vector playing role `variable`.
fn vector_for<'a>(p: &'a ParameterList, variable: &str) -> Result<&'a ScalarVector, FunctionError> {
    p.find(parameter_variable_and_type(variable, ParameterType::ScalarVector))
        .ok_or_else(|| FunctionError::missing(variable))?
        .value()
        .as_scalar_vector()
}

/// A scalar (or forced scalar function) bound under `name` for role `variable`.
fn double_for(p: &ParameterList, name: &str, variable: &str) -> Result<f64, FunctionError> {
    p.value_for(name, variable)
        .ok_or_else(|| FunctionError::missing(&format!("{}({})", name, variable)))?
        .to_scalar("Double")
        .map(|s| s.as_double())
}

fn require_len(kind: StatisticsFunctionType, required: usize, actual: usize) -> Result<(), FunctionError> {
    if actual < required {
        return Err(FunctionError::InsufficientData {
            function: kind.name().to_string(),
            required,
            actual,
        });
    }
    Ok(())
}

fn require_paired(x: &ScalarVector, y: &ScalarVector) -> Result<(), FunctionError> {
    if x.len() != y.len() {
        return Err(FunctionError::MathError(format!(
            "paired vectors differ in length: {} and {}",
            x.len(),
            y.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn stats() -> StatisticsFunctions {
        Context::new().statistics().unwrap()
    }

    pub fn xy() -> (ScalarVector, ScalarVector) {
        (
            ScalarVector::from_numbers("x", Some(X), [1, 2, 3, 4, 5]),
            ScalarVector::from_numbers("y", Some(Y), [73, 62, 81, 88, 90]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_and_labels() {
        assert_eq!(StatisticsFunctionType::ResidualSumOfSquares.name(), "residualsumOfSquares");
        assert_eq!(StatisticsFunctionType::Intercept.label(), "a");
        assert_eq!(StatisticsFunctionType::PSlope.function_type(), FunctionType::new("PSlope", "p (slope)"));
    }

    #[test]
    fn test_provider_identity() {
        let p = StatisticsProvider;
        assert_eq!(p.provider_name(), "Statistics");
        assert_eq!(p.provider_version(), crate_version());
    }
}
