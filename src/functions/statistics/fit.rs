//! Goodness of fit for a simple linear regression: sums of squares, R²,
//! standard errors and the t / p statistics.
use super::descriptive::sum_of_squares;
use super::StatisticsFunctionType as Kind;
use super::{
    double_for, require_len, require_paired, vector_for, StatisticsFunctions, COUNT, DF, INTERCEPT, MEAN, SLOPE,
    VECTOR, X, Y,
};
use crate::compute::ScalarFunction;
use crate::error::FunctionError;
use crate::store::{Scalar, ScalarVector};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::sync::Arc;

/// Σ(slope·x + intercept − y)².
pub fn residual_sum_of_squares(x: &[f64], y: &[f64], slope: f64, intercept: f64) -> f64 {
    x.iter().zip(y).map(|(a, b)| (slope * a + intercept - b).powi(2)).sum()
}

/// Two-sided p-value of `t` under Student's t with `df` degrees of freedom.
/// An infinite `t` has p = 0. A NaN `t` is an error.
pub fn two_sided_p_value(t: f64, df: f64) -> Result<f64, FunctionError> {
    if t.is_nan() {
        return Err(FunctionError::MathError("p-value of an undefined t statistic".into()));
    }
    if t.is_infinite() {
        return Ok(0.0);
    }
    let student = StudentsT::new(0.0, 1.0, df).map_err(|e| FunctionError::MathError(e.to_string()))?;
    Ok(2.0 * (1.0 - student.cdf(t.abs())))
}

impl StatisticsFunctions {
    pub fn residual_sum_of_squares(
        &self,
        x: &ScalarVector,
        y: &ScalarVector,
        slope: &Arc<ScalarFunction>,
        intercept: &Arc<ScalarFunction>,
    ) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(x.name(), Some(X), x.with_variable(Some(X))),
            pf.create(y.name(), Some(Y), y.with_variable(Some(Y))),
            pf.create(SLOPE, None, Arc::clone(slope)),
            pf.create(INTERCEPT, None, Arc::clone(intercept)),
        ];
        self.build(Kind::ResidualSumOfSquares, None, params, |p| {
            let (x, y) = (vector_for(p, X)?, vector_for(p, Y)?);
            require_paired(x, y)?;
            Ok(residual_sum_of_squares(
                &x.to_f64_vec(),
                &y.to_f64_vec(),
                p.get_double(SLOPE)?,
                p.get_double(INTERCEPT)?,
            ))
        })
    }

    /// Σ(v − mean)² for one vector. Tagged with the vector's variable.
    pub fn total_sum_of_squares(&self, vector: &ScalarVector, mean: &Arc<ScalarFunction>) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(VECTOR, vector.variable(), vector.clone()),
            pf.create(MEAN, vector.variable(), Arc::clone(mean)),
        ];
        self.build(Kind::TotalSumOfSquares, vector.variable(), params, |p| {
            Ok(sum_of_squares(&p.scalar_vector(VECTOR)?.to_f64_vec(), p.get_double(MEAN)?))
        })
    }

    /// 1 − SSE/SST.
    pub fn r_squared(&self, residual: &Arc<ScalarFunction>, total: &Arc<ScalarFunction>) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(Kind::ResidualSumOfSquares.name(), None, Arc::clone(residual)),
            pf.create(Kind::TotalSumOfSquares.name(), None, Arc::clone(total)),
        ];
        self.build(Kind::RSquared, None, params, |p| {
            let total = p.get_double(Kind::TotalSumOfSquares.name())?;
            if total == 0.0 {
                return Err(FunctionError::MathError("R-squared is undefined when y has no variation".into()));
            }
            Ok(1.0 - p.get_double(Kind::ResidualSumOfSquares.name())? / total)
        })
    }

    /// SSE / (n − 2).
    pub fn mean_squared_error(&self, residual: &Arc<ScalarFunction>, count: usize) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(Kind::ResidualSumOfSquares.name(), None, Arc::clone(residual)),
            pf.scalar(COUNT, None, count),
        ];
        self.build(Kind::MeanSquaredError, None, params, |p| {
            let n = p.get_integer(COUNT)?.max(0) as usize;
            require_len(Kind::MeanSquaredError, 3, n)?;
            Ok(p.get_double(Kind::ResidualSumOfSquares.name())? / (n - 2) as f64)
        })
    }

    /// √MSE / √SSTx.
    pub fn slope_standard_error(
        &self,
        total_x: &Arc<ScalarFunction>,
        mean_squared_error: &Arc<ScalarFunction>,
    ) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(Kind::TotalSumOfSquares.name(), Some(X), Arc::clone(total_x)),
            pf.create(Kind::MeanSquaredError.name(), None, Arc::clone(mean_squared_error)),
        ];
        self.build(Kind::SlopeStandardError, None, params, |p| {
            let total_x = double_for(p, Kind::TotalSumOfSquares.name(), X)?;
            if total_x == 0.0 {
                return Err(FunctionError::MathError("slope standard error is undefined when x has no variation".into()));
            }
            Ok(p.get_double(Kind::MeanSquaredError.name())?.sqrt() / total_x.sqrt())
        })
    }

    /// √(MSE·(1/n + meanX²/SSTx)).
    pub fn intercept_standard_error(
        &self,
        mean_squared_error: &Arc<ScalarFunction>,
        mean_x: &Arc<ScalarFunction>,
        total_x: &Arc<ScalarFunction>,
        count: usize,
    ) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(Kind::MeanSquaredError.name(), None, Arc::clone(mean_squared_error)),
            pf.create(MEAN, Some(X), Arc::clone(mean_x)),
            pf.create(Kind::TotalSumOfSquares.name(), Some(X), Arc::clone(total_x)),
            pf.scalar(COUNT, None, count),
        ];
        self.build(Kind::InterceptStandardError, None, params, |p| {
            let n = p.get_double(COUNT)?;
            let total_x = double_for(p, Kind::TotalSumOfSquares.name(), X)?;
            if n <= 0.0 || total_x == 0.0 {
                return Err(FunctionError::MathError(
                    "intercept standard error needs observations with variation in x".into(),
                ));
            }
            let mean_x = double_for(p, MEAN, X)?;
            Ok((p.get_double(Kind::MeanSquaredError.name())? * (1.0 / n + mean_x.powi(2) / total_x)).sqrt())
        })
    }

    /// slope / SE(slope).
    pub fn slope_t_statistic(&self, slope: &Arc<ScalarFunction>, standard_error: &Arc<ScalarFunction>) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(SLOPE, None, Arc::clone(slope)),
            pf.create(Kind::SlopeStandardError.name(), None, Arc::clone(standard_error)),
        ];
        self.build(Kind::TSlope, None, params, |p| {
            Ok(p.get_double(SLOPE)? / p.get_double(Kind::SlopeStandardError.name())?)
        })
    }

    /// intercept / SE(intercept).
    pub fn intercept_t_statistic(
        &self,
        intercept: &Arc<ScalarFunction>,
        standard_error: &Arc<ScalarFunction>,
    ) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(INTERCEPT, None, Arc::clone(intercept)),
            pf.create(Kind::InterceptStandardError.name(), None, Arc::clone(standard_error)),
        ];
        self.build(Kind::TIntercept, None, params, |p| {
            Ok(p.get_double(INTERCEPT)? / p.get_double(Kind::InterceptStandardError.name())?)
        })
    }

    /// 2·(1 − T_cdf(|t|, df)).
    pub fn slope_p_value(&self, degrees_of_freedom: usize, t_statistic: &Arc<ScalarFunction>) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.scalar(DF, None, Scalar::from(degrees_of_freedom)),
            pf.create(Kind::TSlope.name(), None, Arc::clone(t_statistic)),
        ];
        self.build(Kind::PSlope, None, params, |p| {
            two_sided_p_value(p.get_double(Kind::TSlope.name())?, p.get_double(DF)?)
        })
    }
}
