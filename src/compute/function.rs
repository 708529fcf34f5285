//! Lazily evaluated, memoized functions over a bound parameter list.
//!
//! A function is fully specified at construction: its parameters are bound
//! eagerly, but nothing is evaluated until the first `compute()`. Nested
//! functions held as parameters are only forced when the owner's evaluator
//! reads them, which is how dependency chains (slope <- covariance, variance)
//! come together without any global scheduling.
use super::memo::Memo;
use crate::error::FunctionError;
use crate::parameter::{ParameterList, Parameterized};
use crate::store::Scalar;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Lookup key plus display caption of a function or coefficient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionType {
    pub name: String,
    pub label: String,
}

impl FunctionType {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self { name: name.into(), label: label.into() }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.label)
    }
}

/// Typed evaluation surface.
pub trait Function: Parameterized {
    type Output;

    fn function_type(&self) -> &FunctionType;
    fn compute(&self) -> Result<Self::Output, FunctionError>;
}

/// Object-safe view of any function, used for generic function parameters,
/// the dependency graph and audit traces.
pub trait FunctionNode: Parameterized + Send + Sync {
    fn function_type(&self) -> &FunctionType;
    /// Evaluates (once) and discards the typed result.
    fn force(&self) -> Result<(), FunctionError>;
    fn is_evaluated(&self) -> bool;
    /// Rendered result, if evaluated.
    fn rendered_value(&self) -> Option<String>;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

type Evaluator<T> = Box<dyn Fn(&ParameterList) -> Result<T, FunctionError> + Send + Sync>;

pub struct LazyFunction<T> {
    function_type: FunctionType,
    variable: Option<String>,
    parameters: ParameterList,
    evaluator: Evaluator<T>,
    memo: Memo<T>,
}

pub type ScalarFunction = LazyFunction<Scalar>;

impl<T: Clone> LazyFunction<T> {
    pub fn new<F>(
        function_type: FunctionType,
        variable: Option<&str>,
        parameters: ParameterList,
        evaluator: F,
    ) -> Self
    where
        F: Fn(&ParameterList) -> Result<T, FunctionError> + Send + Sync + 'static,
    {
        Self {
            function_type,
            variable: variable.map(str::to_string),
            parameters,
            evaluator: Box::new(evaluator),
            memo: Memo::new(),
        }
    }

    pub fn function_type(&self) -> &FunctionType {
        &self.function_type
    }

    /// First call evaluates; every later call returns the memoized outcome.
    pub fn compute(&self) -> Result<T, FunctionError> {
        self.memo.get_or_compute(|| (self.evaluator)(&self.parameters))
    }

    pub fn is_evaluated(&self) -> bool {
        self.memo.is_set()
    }

    pub fn cached(&self) -> Option<&Result<T, FunctionError>> {
        self.memo.get()
    }
}

impl<T> Parameterized for LazyFunction<T> {
    fn name(&self) -> &str {
        &self.function_type.name
    }

    fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    fn parameters(&self) -> &ParameterList {
        &self.parameters
    }
}

impl<T: Clone> Function for LazyFunction<T> {
    type Output = T;

    fn function_type(&self) -> &FunctionType {
        &self.function_type
    }

    fn compute(&self) -> Result<T, FunctionError> {
        LazyFunction::compute(self)
    }
}

impl<T> FunctionNode for LazyFunction<T>
where
    T: Clone + fmt::Debug + Send + Sync + 'static,
{
    fn function_type(&self) -> &FunctionType {
        &self.function_type
    }

    fn force(&self) -> Result<(), FunctionError> {
        LazyFunction::compute(self).map(|_| ())
    }

    fn is_evaluated(&self) -> bool {
        self.memo.is_set()
    }

    fn rendered_value(&self) -> Option<String> {
        self.memo.get().map(|outcome| match outcome {
            Ok(value) => match (value as &dyn Any).downcast_ref::<Scalar>() {
                Some(scalar) => scalar.to_string(),
                None => format!("{:?}", value),
            },
            Err(e) => format!("<error: {}>", e),
        })
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyFunction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyFunction")
            .field("function_type", &self.function_type)
            .field("variable", &self.variable)
            .field("parameters", &self.parameters.len())
            .field("memo", &self.memo)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{Parameter, Value};
    use crate::store::ScalarVector;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn summing(calls: Arc<AtomicUsize>) -> ScalarFunction {
        let params: ParameterList =
            vec![Parameter::new("vector", None, ScalarVector::from_numbers("v", None, [1, 2, 3]))]
                .into_iter()
                .collect();
        LazyFunction::new(FunctionType::new("sum", "SUM"), None, params, move |p| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Scalar::from(p.scalar_vector("vector")?.sum()))
        })
    }

    #[test]
    fn test_compute_is_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let f = summing(Arc::clone(&calls));
        assert!(!f.is_evaluated());
        assert_eq!(f.compute().unwrap(), Scalar::from(6.0));
        assert_eq!(f.compute().unwrap(), Scalar::from(6.0));
        assert!(f.is_evaluated());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_memo_is_shared_between_handles() {
        let calls = Arc::new(AtomicUsize::new(0));
        let first = Arc::new(summing(Arc::clone(&calls)));
        let second = Arc::clone(&first);
        let node: Arc<dyn FunctionNode> = Arc::clone(&first) as Arc<dyn FunctionNode>;
        assert_eq!(node.rendered_value(), None);

        assert_eq!(second.compute().unwrap(), Scalar::from(6.0));
        assert!(first.is_evaluated());
        assert_eq!(node.rendered_value(), Some(Scalar::from(6.0).to_string()));
        assert_eq!(first.compute().unwrap(), Scalar::from(6.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nested_function_is_forced_lazily() {
        let calls = Arc::new(AtomicUsize::new(0));
        let inner = Arc::new(summing(Arc::clone(&calls)));
        let params: ParameterList = vec![Parameter::new("sum", None, Arc::clone(&inner))].into_iter().collect();
        let outer = LazyFunction::new(FunctionType::new("twice", "2X"), None, params, |p| {
            Ok(Scalar::from(p.get_double("sum")? * 2.0))
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(outer.compute().unwrap().as_double(), 12.0);
        assert!(inner.is_evaluated());
        assert_eq!(inner.compute().unwrap().as_double(), 6.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_generic_function_parameter_downcasts() {
        let words = Arc::new(LazyFunction::new(
            FunctionType::new("words", "W"),
            None,
            ParameterList::new(),
            |_| Ok(vec!["a".to_string(), "b".to_string()]),
        ));
        let value = Value::function(words);
        let typed = value.as_function::<Vec<String>>().unwrap();
        assert_eq!(typed.compute().unwrap().len(), 2);
        assert!(value.as_function::<Scalar>().is_err());

        let node = value.as_function_node().unwrap();
        assert_eq!(node.rendered_value(), Some("[\"a\", \"b\"]".to_string()));
    }
}
