//! The tagged value carried by parameters and coefficients.
use crate::compute::function::{FunctionNode, LazyFunction, ScalarFunction};
use crate::error::FunctionError;
use crate::store::{Matrix, Scalar, ScalarVector, Vector};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterType {
    Generic,
    Scalar,
    Vector,
    ScalarVector,
    Function,
    ScalarFunction,
    Matrix,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ParameterType::Generic => "GENERIC",
            ParameterType::Scalar => "SCALAR",
            ParameterType::Vector => "VECTOR",
            ParameterType::ScalarVector => "SCALAR_VECTOR",
            ParameterType::Function => "FUNCTION",
            ParameterType::ScalarFunction => "SCALAR_FUNCTION",
            ParameterType::Matrix => "MATRIX",
        };
        f.write_str(tag)
    }
}

/// One of the seven parameter kinds.
///
/// `Generic` and non-scalar `Vector` payloads are type-erased; their typed
/// readers downcast and fail with [`FunctionError::InvalidCast`].
#[derive(Clone)]
pub enum Value {
    Generic(Arc<dyn Any + Send + Sync>),
    Scalar(Scalar),
    Vector(Arc<dyn Any + Send + Sync>),
    ScalarVector(ScalarVector),
    Function(Arc<dyn FunctionNode>),
    ScalarFunction(Arc<ScalarFunction>),
    Matrix(Matrix),
}

impl Value {
    pub fn generic<T: Any + Send + Sync>(value: T) -> Self {
        Value::Generic(Arc::new(value))
    }

    pub fn vector<T: Any + Send + Sync>(vector: Vector<T>) -> Self {
        Value::Vector(Arc::new(vector))
    }

    pub fn function<T>(function: Arc<LazyFunction<T>>) -> Self
    where
        T: Clone + fmt::Debug + Send + Sync + 'static,
    {
        Value::Function(function)
    }

    pub fn parameter_type(&self) -> ParameterType {
        match self {
            Value::Generic(_) => ParameterType::Generic,
            Value::Scalar(_) => ParameterType::Scalar,
            Value::Vector(_) => ParameterType::Vector,
            Value::ScalarVector(_) => ParameterType::ScalarVector,
            Value::Function(_) => ParameterType::Function,
            Value::ScalarFunction(_) => ParameterType::ScalarFunction,
            Value::Matrix(_) => ParameterType::Matrix,
        }
    }

    pub fn as_scalar(&self) -> Result<Scalar, FunctionError> {
        match self {
            Value::Scalar(s) => Ok(*s),
            other => Err(FunctionError::cast("Scalar", other.parameter_type())),
        }
    }

    pub fn as_scalar_vector(&self) -> Result<&ScalarVector, FunctionError> {
        match self {
            Value::ScalarVector(v) => Ok(v),
            other => Err(FunctionError::cast("ScalarVector", other.parameter_type())),
        }
    }

    /// Works for both vector kinds as long as the element type matches.
    pub fn as_vector<T: 'static>(&self) -> Result<&Vector<T>, FunctionError> {
        let found = match self {
            Value::Vector(v) => v.downcast_ref::<Vector<T>>(),
            Value::ScalarVector(v) => (v as &dyn Any).downcast_ref::<Vector<T>>(),
            _ => None,
        };
        found.ok_or_else(|| FunctionError::cast(std::any::type_name::<Vector<T>>(), self.parameter_type()))
    }

    pub fn as_matrix(&self) -> Result<&Matrix, FunctionError> {
        match self {
            Value::Matrix(m) => Ok(m),
            other => Err(FunctionError::cast("Matrix", other.parameter_type())),
        }
    }

    pub fn as_scalar_function(&self) -> Result<&Arc<ScalarFunction>, FunctionError> {
        match self {
            Value::ScalarFunction(f) => Ok(f),
            other => Err(FunctionError::cast("ScalarFunction", other.parameter_type())),
        }
    }

    /// Any function-valued payload, scalar or not.
    pub fn as_function_node(&self) -> Option<Arc<dyn FunctionNode>> {
        match self {
            Value::Function(f) => Some(Arc::clone(f)),
            Value::ScalarFunction(f) => Some(Arc::clone(f) as Arc<dyn FunctionNode>),
            _ => None,
        }
    }

    /// Downcasts a generic function back to its typed form.
    pub fn as_function<T>(&self) -> Result<Arc<LazyFunction<T>>, FunctionError>
    where
        T: Clone + fmt::Debug + Send + Sync + 'static,
    {
        let expected = std::any::type_name::<LazyFunction<T>>();
        match self {
            Value::Function(f) => Arc::clone(f)
                .into_any()
                .downcast::<LazyFunction<T>>()
                .map_err(|_| FunctionError::cast(expected, ParameterType::Function)),
            other => Err(FunctionError::cast(expected, other.parameter_type())),
        }
    }

    pub fn as_generic<T: 'static>(&self) -> Result<&T, FunctionError> {
        match self {
            Value::Generic(g) => g
                .downcast_ref::<T>()
                .ok_or_else(|| FunctionError::cast(std::any::type_name::<T>(), ParameterType::Generic)),
            other => Err(FunctionError::cast(std::any::type_name::<T>(), other.parameter_type())),
        }
    }

    /// Numeric view: scalars directly, scalar functions after forcing them.
    pub fn to_scalar(&self, expected: &str) -> Result<Scalar, FunctionError> {
        match self {
            Value::Scalar(s) => Ok(*s),
            Value::ScalarFunction(f) => f.compute(),
            other => Err(FunctionError::cast(expected, other.parameter_type())),
        }
    }

    /// Short human-readable form for traces and coefficient displays.
    pub fn render(&self) -> String {
        match self {
            Value::Scalar(s) => s.to_string(),
            Value::ScalarVector(v) => format!("{}[len={}]", v.name(), v.len()),
            Value::Matrix(m) => format!("{}[{}x{}]", m.name(), m.row_count(), m.column_count()),
            Value::ScalarFunction(f) => match f.cached() {
                Some(Ok(s)) => s.to_string(),
                Some(Err(e)) => format!("<error: {}>", e),
                None => format!("<{}: unevaluated>", f.function_type().name),
            },
            Value::Function(f) => f
                .rendered_value()
                .unwrap_or_else(|| format!("<{}: unevaluated>", f.function_type().name)),
            Value::Vector(_) => "<vector>".to_string(),
            Value::Generic(_) => "<generic>".to_string(),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(s) => f.debug_tuple("Scalar").field(s).finish(),
            Value::ScalarVector(v) => f.debug_tuple("ScalarVector").field(v).finish(),
            Value::Matrix(m) => f.debug_tuple("Matrix").field(m).finish(),
            other => write!(f, "{}({})", other.parameter_type(), other.render()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<Scalar> for Value {
    fn from(value: Scalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<ScalarVector> for Value {
    fn from(value: ScalarVector) -> Self {
        Value::ScalarVector(value)
    }
}

impl From<Matrix> for Value {
    fn from(value: Matrix) -> Self {
        Value::Matrix(value)
    }
}

impl From<Arc<ScalarFunction>> for Value {
    fn from(value: Arc<ScalarFunction>) -> Self {
        Value::ScalarFunction(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_cast_names_found_type() {
        let v = Value::from(ScalarVector::from_numbers("v", None, [1, 2]));
        let err = v.as_scalar().unwrap_err();
        assert_eq!(err.to_string(), "Invalid parameter cast: cannot return Scalar from a SCALAR_VECTOR");
    }

    #[test]
    fn test_vector_downcast_covers_both_kinds() {
        let names = Value::vector(Vector::new("names", None, ["a".to_string()]));
        assert_eq!(names.as_vector::<String>().unwrap().len(), 1);
        assert!(names.as_vector::<i32>().is_err());

        let scalars = Value::from(ScalarVector::from_numbers("s", None, [1.0]));
        assert_eq!(scalars.as_vector::<Scalar>().unwrap().len(), 1);
    }

    #[test]
    fn test_generic_roundtrip() {
        let v = Value::generic(42_u8);
        assert_eq!(*v.as_generic::<u8>().unwrap(), 42);
        assert!(matches!(v.as_generic::<u16>(), Err(FunctionError::InvalidCast { .. })));
        assert_eq!(v.parameter_type(), ParameterType::Generic);
    }
}
