//! The data-factory hub: constructors for vectors, matrices, parameters and
//! coefficients. Every domain factory builds its inputs through it.
use super::version::Version;
use super::Provider;
use crate::compute::{Coefficient, LazyFunction, ScalarFunction};
use crate::parameter::{Parameter, Parameterized, Value};
use crate::store::{Matrix, Scalar, ScalarVector, Vector};
use std::fmt;
use std::sync::Arc;

pub const MODEL_PROVIDER_NAME: &str = "ModelProvider";

#[derive(Debug, Clone, Copy, Default)]
pub struct VectorFactory;

impl VectorFactory {
    pub fn create_vector<T>(&self, name: &str, variable: Option<&str>, values: impl IntoIterator<Item = T>) -> Vector<T> {
        Vector::new(name, variable, values)
    }

    pub fn create_scalar_vector<N: Into<Scalar>>(
        &self,
        name: &str,
        variable: Option<&str>,
        numbers: impl IntoIterator<Item = N>,
    ) -> ScalarVector {
        ScalarVector::from_numbers(name, variable, numbers)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatrixFactory;

impl MatrixFactory {
    pub fn from_rows(&self, rows: impl IntoIterator<Item = ScalarVector>, headers: &[&str]) -> Matrix {
        Matrix::from_rows(rows, headers)
    }

    pub fn from_columns(&self, columns: &[ScalarVector]) -> Matrix {
        Matrix::from_columns(columns)
    }

    pub fn from_array(&self, data: &[Vec<Option<f64>>], headers: &[&str]) -> Matrix {
        Matrix::from_array(data, headers)
    }
}

/// Wraps values into parameters. The `of_*` forms take the name and variable
/// from the wrapped value itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterFactory;

impl ParameterFactory {
    pub fn create(&self, name: &str, variable: Option<&str>, value: impl Into<Value>) -> Parameter {
        Parameter::new(name, variable, value)
    }

    pub fn scalar(&self, name: &str, variable: Option<&str>, value: impl Into<Scalar>) -> Parameter {
        Parameter::new(name, variable, value.into())
    }

    pub fn generic<T: std::any::Any + Send + Sync>(&self, name: &str, variable: Option<&str>, value: T) -> Parameter {
        Parameter::new(name, variable, Value::generic(value))
    }

    pub fn vector<T: std::any::Any + Send + Sync>(&self, name: &str, variable: Option<&str>, vector: Vector<T>) -> Parameter {
        Parameter::new(name, variable, Value::vector(vector))
    }

    pub fn function<T>(&self, name: &str, variable: Option<&str>, function: Arc<LazyFunction<T>>) -> Parameter
    where
        T: Clone + fmt::Debug + Send + Sync + 'static,
    {
        Parameter::new(name, variable, Value::function(function))
    }

    pub fn of_scalar_vector(&self, vector: &ScalarVector) -> Parameter {
        Parameter::new(vector.name(), vector.variable(), vector.clone())
    }

    pub fn of_vector<T: Clone + std::any::Any + Send + Sync>(&self, vector: &Vector<T>) -> Parameter {
        Parameter::new(vector.name(), vector.variable(), Value::vector(vector.clone()))
    }

    pub fn of_function(&self, function: &Arc<ScalarFunction>) -> Parameter {
        Parameter::new(function.function_type().name.clone(), function.variable(), Arc::clone(function))
    }

    pub fn of_matrix(&self, matrix: &Matrix) -> Parameter {
        Parameter::new(matrix.name(), None, matrix.clone())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CoefficientFactory;

impl CoefficientFactory {
    pub fn create(&self, name: &str, label: Option<&str>, value: impl Into<Value>) -> Coefficient {
        Coefficient::new(name, label, value)
    }
}

/// Hub over the four data factories.
#[derive(Debug, Clone, Default)]
pub struct Factories {
    vectors: VectorFactory,
    matrices: MatrixFactory,
    parameters: ParameterFactory,
    coefficients: CoefficientFactory,
}

impl Factories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vector_factory(&self) -> &VectorFactory {
        &self.vectors
    }

    pub fn matrix_factory(&self) -> &MatrixFactory {
        &self.matrices
    }

    pub fn parameter_factory(&self) -> &ParameterFactory {
        &self.parameters
    }

    pub fn coefficient_factory(&self) -> &CoefficientFactory {
        &self.coefficients
    }
}

impl Provider for Factories {
    fn provider_name(&self) -> &str {
        MODEL_PROVIDER_NAME
    }

    fn provider_version(&self) -> Version {
        super::crate_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::FunctionType;
    use crate::parameter::{ParameterList, ParameterType};

    #[test]
    fn test_vector_factory_names_and_tags() {
        let f = Factories::new();
        let v = f.vector_factory().create_scalar_vector("ages", Some("x"), [30, 40, 50]);
        assert_eq!(v.name(), "ages");
        assert_eq!(v.variable(), Some("x"));
        assert_eq!(v.len(), 3);

        let words = f.vector_factory().create_vector("words", None, ["a", "b"]);
        assert_eq!(words.get(1), Some(&"b"));
    }

    #[test]
    fn test_parameter_factory_kinds() {
        let f = Factories::new();
        let pf = f.parameter_factory();
        let v = f.vector_factory().create_scalar_vector("data", Some("y"), [1.0, 2.0]);

        let from_vector = pf.of_scalar_vector(&v);
        assert_eq!((from_vector.name(), from_vector.variable()), ("data", Some("y")));
        assert_eq!(from_vector.parameter_type(), ParameterType::ScalarVector);

        assert_eq!(pf.scalar("age", None, 32).parameter_type(), ParameterType::Scalar);
        assert_eq!(pf.generic("label", None, "text".to_string()).parameter_type(), ParameterType::Generic);
        assert_eq!(
            pf.vector("words", None, Vector::new("words", None, ["a"])).parameter_type(),
            ParameterType::Vector
        );

        let function = Arc::new(LazyFunction::new(
            FunctionType::new("mean", "MEAN"),
            Some("x"),
            ParameterList::new(),
            |_| Ok(Scalar::from(1.0)),
        ));
        let p = pf.of_function(&function);
        assert_eq!((p.name(), p.variable()), ("mean", Some("x")));
        assert_eq!(p.parameter_type(), ParameterType::ScalarFunction);
    }

    #[test]
    fn test_matrix_factory_from_columns() {
        let f = Factories::new();
        let x = f.vector_factory().create_scalar_vector("x", None, [1, 2, 3]);
        let y = f.vector_factory().create_scalar_vector("y", None, [4, 5]);
        let m = f.matrix_factory().from_columns(&[x, y]);
        assert_eq!(m.column_count(), 2);
        assert_eq!(m.row_count(), 3);
        assert!(m.get(2, 1).is_none());
        assert_eq!(f.parameter_factory().of_matrix(&m).parameter_type(), ParameterType::Matrix);
    }

    #[test]
    fn test_hub_identity() {
        let f = Factories::new();
        assert_eq!(f.provider_name(), "ModelProvider");
        assert_eq!(f.provider_version().to_string(), env!("CARGO_PKG_VERSION"));
        let c = f.coefficient_factory().create("count", Some("N"), Scalar::from(3));
        assert_eq!(c.to_string(), "N: 3.000");
    }
}
