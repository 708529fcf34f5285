//! Simple linear regression as a model over the statistics functions.
use super::StatisticsFunctionType as Kind;
use super::{require_len, require_paired, StatisticsFunctions, COLUMN, MATRIX, X, Y};
use crate::analysis::FunctionGraph;
use crate::compute::{CoefficientSet, FunctionNode, Model, ModelState, ScalarFunction};
use crate::error::FunctionError;
use crate::parameter::{parameter_variable_and_type, ParameterList, ParameterType, Parameterized};
use crate::store::{Matrix, Scalar, ScalarVector};
use std::sync::Arc;

pub struct LinearRegressionModel {
    state: ModelState,
    functions: StatisticsFunctions,
    graph: Option<FunctionGraph>,
}

impl LinearRegressionModel {
    fn new(functions: StatisticsFunctions, parameters: ParameterList) -> Self {
        Self {
            state: ModelState::new(Kind::LinearRegressionModel.name(), parameters),
            functions,
            graph: None,
        }
    }

    /// The evaluated function graph, once solved.
    pub fn graph(&self) -> Option<&FunctionGraph> {
        self.graph.as_ref()
    }

    fn coefficient(&self, kind: Kind) -> Option<Scalar> {
        self.coefficient_scalar(kind.name()).ok()
    }

    pub fn slope(&self) -> Option<Scalar> {
        self.coefficient(Kind::Slope)
    }

    pub fn intercept(&self) -> Option<Scalar> {
        self.coefficient(Kind::Intercept)
    }

    pub fn r_squared(&self) -> Option<Scalar> {
        self.coefficient(Kind::RSquared)
    }

    pub fn slope_standard_error(&self) -> Option<Scalar> {
        self.coefficient(Kind::SlopeStandardError)
    }

    pub fn intercept_standard_error(&self) -> Option<Scalar> {
        self.coefficient(Kind::InterceptStandardError)
    }

    pub fn slope_t_statistic(&self) -> Option<Scalar> {
        self.coefficient(Kind::TSlope)
    }

    pub fn intercept_t_statistic(&self) -> Option<Scalar> {
        self.coefficient(Kind::TIntercept)
    }

    pub fn slope_p_value(&self) -> Option<Scalar> {
        self.coefficient(Kind::PSlope)
    }

    /// slope·x + intercept. Fails before `solve`.
    pub fn predict(&self, x: f64) -> Result<f64, FunctionError> {
        let slope = self.coefficient_scalar(Kind::Slope.name())?.as_double();
        let intercept = self.coefficient_scalar(Kind::Intercept.name())?.as_double();
        Ok(slope * x + intercept)
    }

    /// Paired observations: tagged vectors if present, otherwise two columns
    /// of the matrix parameter (0 and 1 unless `column` x / y say otherwise).
    fn observations(&self) -> Result<(ScalarVector, ScalarVector), FunctionError> {
        let p = self.parameters();
        let tagged = |variable: &str| {
            p.find(parameter_variable_and_type(variable, ParameterType::ScalarVector))
                .map(|param| param.value().as_scalar_vector().cloned())
        };
        if let (Some(x), Some(y)) = (tagged(X), tagged(Y)) {
            return Ok((x?, y?));
        }

        let matrix: &Matrix = p.matrix(MATRIX)?;
        let column = |variable: &str, default: i32| -> Result<usize, FunctionError> {
            let index = match p.value_for(COLUMN, variable) {
                Some(value) => value.to_scalar("Integer")?.as_int(),
                None => default,
            };
            usize::try_from(index).map_err(|_| FunctionError::ColumnNotFound {
                matrix: matrix.name().to_string(),
                column: index.to_string(),
            })
        };
        let x = matrix.scalar_column(column(X, 0)?, Some(X))?;
        let y = matrix.scalar_column(column(Y, 1)?, Some(Y))?;
        Ok((x, y))
    }
}

impl Parameterized for LinearRegressionModel {
    fn name(&self) -> &str {
        self.state.name()
    }

    fn variable(&self) -> Option<&str> {
        None
    }

    fn parameters(&self) -> &ParameterList {
        self.state.parameters()
    }
}

impl Model for LinearRegressionModel {
    fn solve(&mut self) -> Result<(), FunctionError> {
        self.state.begin_solve()?;
        let (x, y) = self.observations()?;
        require_paired(&x, &y)?;
        let n = x.len();
        require_len(Kind::LinearRegressionModel, 3, n)?;

        let s = &self.functions;
        let mean_x = s.mean(&x, Some(X));
        let mean_y = s.mean(&y, Some(Y));
        let variance_x = s.variance_with_mean(&x, &mean_x, Some(X));
        let covariance = s.covariance_with_means(&x, &y, &mean_x, &mean_y);
        let slope = s.slope(&variance_x, &covariance);
        let intercept = s.intercept(&mean_x, &mean_y, &slope);
        let residual = s.residual_sum_of_squares(&x, &y, &slope, &intercept);
        let total_y = s.total_sum_of_squares(&y, &mean_y);
        let total_x = s.total_sum_of_squares(&x, &mean_x);
        let r_squared = s.r_squared(&residual, &total_y);
        let mse = s.mean_squared_error(&residual, n);
        let slope_se = s.slope_standard_error(&total_x, &mse);
        let intercept_se = s.intercept_standard_error(&mse, &mean_x, &total_x, n);
        let t_slope = s.slope_t_statistic(&slope, &slope_se);
        let t_intercept = s.intercept_t_statistic(&intercept, &intercept_se);
        let p_slope = s.slope_p_value(n - 2, &t_slope);

        let roots: Vec<Arc<dyn FunctionNode>> = vec![r_squared.clone(), p_slope.clone(), t_intercept.clone()];
        let graph = FunctionGraph::from_roots(&roots);
        graph.evaluate()?;

        let results: [&Arc<ScalarFunction>; 8] =
            [&slope, &intercept, &r_squared, &slope_se, &intercept_se, &t_slope, &t_intercept, &p_slope];
        for function in results {
            self.state.set_function(function)?;
        }
        self.graph = Some(graph);
        Ok(())
    }

    fn coefficient_set(&self) -> &CoefficientSet {
        self.state.coefficients()
    }
}

impl StatisticsFunctions {
    /// Regression of `y` on `x`.
    pub fn linear_regression(&self, x: &ScalarVector, y: &ScalarVector) -> LinearRegressionModel {
        let pf = self.parameters();
        let params = vec![
            pf.create(x.name(), Some(X), x.with_variable(Some(X))),
            pf.create(y.name(), Some(Y), y.with_variable(Some(Y))),
        ];
        LinearRegressionModel::new(self.clone(), params.into_iter().collect())
    }

    /// Regression of column 1 on column 0.
    pub fn linear_regression_matrix(&self, matrix: &Matrix) -> LinearRegressionModel {
        let params = vec![self.parameters().create(MATRIX, None, matrix.clone())];
        LinearRegressionModel::new(self.clone(), params.into_iter().collect())
    }

    /// Regression of column `y` on column `x`.
    pub fn linear_regression_columns(&self, matrix: &Matrix, x: usize, y: usize) -> LinearRegressionModel {
        let pf = self.parameters();
        let params = vec![
            pf.create(MATRIX, None, matrix.clone()),
            pf.scalar(COLUMN, Some(X), x),
            pf.scalar(COLUMN, Some(Y), y),
        ];
        LinearRegressionModel::new(self.clone(), params.into_iter().collect())
    }

    /// Regression over caller-assembled parameters, checked against the
    /// context's duplicate policy.
    pub fn linear_regression_from(
        &self,
        parameters: impl IntoIterator<Item = crate::parameter::Parameter>,
    ) -> Result<LinearRegressionModel, FunctionError> {
        let list = self.context().bind(parameters)?;
        Ok(LinearRegressionModel::new(self.clone(), list))
    }
}
