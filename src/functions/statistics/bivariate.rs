//! Paired-vector measures: covariance, regression slope and intercept.
use super::StatisticsFunctionType as Kind;
use super::{
    double_for, require_len, require_paired, vector_for, StatisticsFunctions, COVARIANCE, MEAN, SLOPE, VARIANCE, X, Y,
};
use crate::compute::ScalarFunction;
use crate::error::FunctionError;
use crate::store::ScalarVector;
use std::sync::Arc;

/// Sample covariance (n − 1 denominator) around known means.
pub fn covariance(x: &[f64], y: &[f64], mean_x: f64, mean_y: f64) -> f64 {
    let cross: f64 = x.iter().zip(y).map(|(a, b)| (a - mean_x) * (b - mean_y)).sum();
    cross / (x.len() - 1) as f64
}

impl StatisticsFunctions {
    /// Covariance of two vectors; builds the two mean functions.
    pub fn covariance(&self, x: &ScalarVector, y: &ScalarVector) -> Arc<ScalarFunction> {
        let x = x.with_variable(Some(X));
        let y = y.with_variable(Some(Y));
        let mean_x = self.mean(&x, Some(X));
        let mean_y = self.mean(&y, Some(Y));
        self.covariance_with_means(&x, &y, &mean_x, &mean_y)
    }

    /// Covariance reading both means from shared functions.
    pub fn covariance_with_means(
        &self,
        x: &ScalarVector,
        y: &ScalarVector,
        mean_x: &Arc<ScalarFunction>,
        mean_y: &Arc<ScalarFunction>,
    ) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(x.name(), Some(X), x.with_variable(Some(X))),
            pf.create(y.name(), Some(Y), y.with_variable(Some(Y))),
            pf.create(MEAN, Some(X), Arc::clone(mean_x)),
            pf.create(MEAN, Some(Y), Arc::clone(mean_y)),
        ];
        self.build(Kind::Covariance, None, params, |p| {
            let (x, y) = (vector_for(p, X)?, vector_for(p, Y)?);
            require_paired(x, y)?;
            require_len(Kind::Covariance, 2, x.len())?;
            Ok(covariance(
                &x.to_f64_vec(),
                &y.to_f64_vec(),
                double_for(p, MEAN, X)?,
                double_for(p, MEAN, Y)?,
            ))
        })
    }

    /// cov(x, y) / var(x).
    pub fn slope(&self, variance_x: &Arc<ScalarFunction>, covariance: &Arc<ScalarFunction>) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(VARIANCE, Some(X), Arc::clone(variance_x)),
            pf.create(COVARIANCE, None, Arc::clone(covariance)),
        ];
        self.build(Kind::Slope, None, params, |p| {
            let variance_x = double_for(p, VARIANCE, X)?;
            if variance_x == 0.0 {
                return Err(FunctionError::MathError("slope is undefined when x has zero variance".into()));
            }
            Ok(p.get_double(COVARIANCE)? / variance_x)
        })
    }

    /// mean(y) − slope·mean(x).
    pub fn intercept(
        &self,
        mean_x: &Arc<ScalarFunction>,
        mean_y: &Arc<ScalarFunction>,
        slope: &Arc<ScalarFunction>,
    ) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(MEAN, Some(X), Arc::clone(mean_x)),
            pf.create(MEAN, Some(Y), Arc::clone(mean_y)),
            pf.create(SLOPE, None, Arc::clone(slope)),
        ];
        self.build(Kind::Intercept, None, params, |p| {
            Ok(double_for(p, MEAN, Y)? - p.get_double(SLOPE)? * double_for(p, MEAN, X)?)
        })
    }
}
