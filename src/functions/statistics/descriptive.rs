//! Single-vector statistics: sum, mean, median, variance, standard deviation.
use super::StatisticsFunctionType as Kind;
use super::{require_len, StatisticsFunctions, MEAN, VARIANCE, VECTOR};
use crate::compute::ScalarFunction;
use crate::store::ScalarVector;
use std::sync::Arc;

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

pub fn mean(values: &[f64]) -> f64 {
    sum(values) / values.len() as f64
}

/// Middle value; the average of the two middle values for even lengths.
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Σ(v − mean)².
pub fn sum_of_squares(values: &[f64], mean: f64) -> f64 {
    values.iter().map(|v| (v - mean).powi(2)).sum()
}

/// Sample variance (n − 1 denominator) around a known mean.
pub fn variance(values: &[f64], mean: f64) -> f64 {
    sum_of_squares(values, mean) / (values.len() - 1) as f64
}

impl StatisticsFunctions {
    pub fn sum(&self, vector: &ScalarVector, variable: Option<&str>) -> Arc<ScalarFunction> {
        let params = vec![self.parameters().create(VECTOR, vector.variable(), vector.clone())];
        self.build(Kind::Sum, variable.or(vector.variable()), params, |p| {
            Ok(sum(&p.scalar_vector(VECTOR)?.to_f64_vec()))
        })
    }

    pub fn mean(&self, vector: &ScalarVector, variable: Option<&str>) -> Arc<ScalarFunction> {
        let params = vec![self.parameters().create(VECTOR, vector.variable(), vector.clone())];
        self.build(Kind::Mean, variable.or(vector.variable()), params, |p| {
            let values = p.scalar_vector(VECTOR)?.to_f64_vec();
            require_len(Kind::Mean, 1, values.len())?;
            Ok(mean(&values))
        })
    }

    pub fn median(&self, vector: &ScalarVector, variable: Option<&str>) -> Arc<ScalarFunction> {
        let params = vec![self.parameters().create(VECTOR, vector.variable(), vector.clone())];
        self.build(Kind::Median, variable.or(vector.variable()), params, |p| {
            let values = p.scalar_vector(VECTOR)?.to_f64_vec();
            require_len(Kind::Median, 1, values.len())?;
            Ok(median(&values))
        })
    }

    /// Sample variance; builds its own mean function.
    pub fn variance(&self, vector: &ScalarVector, variable: Option<&str>) -> Arc<ScalarFunction> {
        let mean = self.mean(vector, variable);
        self.variance_with_mean(vector, &mean, variable)
    }

    /// Sample variance reading the mean from a shared function.
    pub fn variance_with_mean(
        &self,
        vector: &ScalarVector,
        mean_function: &Arc<ScalarFunction>,
        variable: Option<&str>,
    ) -> Arc<ScalarFunction> {
        let pf = self.parameters();
        let params = vec![
            pf.create(VECTOR, vector.variable(), vector.clone()),
            pf.create(MEAN, vector.variable(), Arc::clone(mean_function)),
        ];
        self.build(Kind::Variance, variable.or(vector.variable()), params, |p| {
            let values = p.scalar_vector(VECTOR)?.to_f64_vec();
            require_len(Kind::Variance, 2, values.len())?;
            Ok(variance(&values, p.get_double(MEAN)?))
        })
    }

    pub fn standard_deviation(&self, variance_function: &Arc<ScalarFunction>, variable: Option<&str>) -> Arc<ScalarFunction> {
        let params = vec![self.parameters().create(VARIANCE, variable, Arc::clone(variance_function))];
        self.build(Kind::StandardDeviation, variable, params, |p| Ok(p.get_double(VARIANCE)?.sqrt()))
    }

    pub fn standard_deviation_of(&self, vector: &ScalarVector, variable: Option<&str>) -> Arc<ScalarFunction> {
        let variance = self.variance(vector, variable);
        self.standard_deviation(&variance, variable.or(vector.variable()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::stats;
    use super::*;
    use crate::error::FunctionError;
    use crate::parameter::Parameterized;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn one_to_five() -> ScalarVector {
        ScalarVector::from_numbers("data", None, [1, 2, 3, 4, 5])
    }

    #[test]
    fn test_mean_variance_stddev() {
        let s = stats();
        let v = one_to_five();
        assert_relative_eq!(s.mean(&v, None).compute().unwrap().as_double(), 3.0);
        assert_relative_eq!(s.variance(&v, None).compute().unwrap().as_double(), 2.5);
        assert_relative_eq!(
            s.standard_deviation_of(&v, None).compute().unwrap().as_double(),
            1.5811,
            epsilon = 1e-3
        );
        assert_relative_eq!(s.sum(&v, None).compute().unwrap().as_double(), 15.0);
    }

    #[rstest]
    #[case(&[3.0, 1.0, 2.0], 2.0)]
    #[case(&[4.0, 1.0, 3.0, 2.0], 2.5)]
    #[case(&[7.0], 7.0)]
    fn test_median(#[case] values: &[f64], #[case] expected: f64) {
        assert_relative_eq!(median(values), expected);
        let v = ScalarVector::from_numbers("m", None, values.iter().copied());
        assert_relative_eq!(stats().median(&v, None).compute().unwrap().as_double(), expected);
    }

    #[test]
    fn test_shared_mean_is_forced_once() {
        let s = stats();
        let v = one_to_five();
        let mean = s.mean(&v, Some("x"));
        let var = s.variance_with_mean(&v, &mean, Some("x"));
        let sd = s.standard_deviation(&var, Some("x"));

        assert!(!mean.is_evaluated());
        assert_relative_eq!(sd.compute().unwrap().as_double(), 2.5f64.sqrt());
        assert!(mean.is_evaluated() && var.is_evaluated());
        assert_eq!(var.variable(), Some("x"));
    }

    #[test]
    fn test_insufficient_data() {
        let s = stats();
        let single = ScalarVector::from_numbers("one", None, [4.0]);
        let empty = ScalarVector::from_numbers("none", None, Vec::<f64>::new());

        assert_eq!(
            s.variance(&single, None).compute(),
            Err(FunctionError::InsufficientData { function: "variance".into(), required: 2, actual: 1 })
        );
        assert!(matches!(s.mean(&empty, None).compute(), Err(FunctionError::InsufficientData { .. })));
        assert_relative_eq!(s.sum(&empty, None).compute().unwrap().as_double(), 0.0);
    }
}
