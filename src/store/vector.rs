use super::scalar::Scalar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A named, optionally variable-tagged, fixed-length sequence.
///
/// Storage is shared, so clones and views are cheap and the contents never
/// change after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector<T> {
    name: String,
    variable: Option<String>,
    values: Arc<[T]>,
}

pub type ScalarVector = Vector<Scalar>;

impl<T> Vector<T> {
    pub fn new(name: impl Into<String>, variable: Option<&str>, values: impl IntoIterator<Item = T>) -> Self {
        Self {
            name: name.into(),
            variable: variable.map(str::to_string),
            values: values.into_iter().collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variable(&self) -> Option<&str> {
        self.variable.as_deref()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.values.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.values.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.values.last()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.values.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.values
    }

    /// Same name and values under a different role tag.
    pub fn with_variable(&self, variable: Option<&str>) -> Self {
        Self {
            name: self.name.clone(),
            variable: variable.map(str::to_string),
            values: Arc::clone(&self.values),
        }
    }
}

impl<T: Clone> Vector<T> {
    pub fn to_vec(&self) -> Vec<T> {
        self.values.to_vec()
    }

    pub fn sorted_by<F>(&self, compare: F) -> Self
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        let mut values = self.values.to_vec();
        values.sort_by(compare);
        self.derive(values)
    }

    /// Elements from `start` to the end. Out-of-range starts yield an empty vector.
    pub fn splice(&self, start: usize) -> Self {
        let start = start.min(self.len());
        self.derive(self.values[start..].to_vec())
    }

    /// At most `length` elements from `start`.
    pub fn splice_len(&self, start: usize, length: usize) -> Self {
        let start = start.min(self.len());
        let end = start.saturating_add(length).min(self.len());
        self.derive(self.values[start..end].to_vec())
    }

    fn derive(&self, values: Vec<T>) -> Self {
        Self {
            name: self.name.clone(),
            variable: self.variable.clone(),
            values: values.into(),
        }
    }
}

impl<T: Clone + Ord> Vector<T> {
    pub fn sorted(&self) -> Self {
        self.sorted_by(|a, b| a.cmp(b))
    }
}

impl Vector<Scalar> {
    pub fn from_numbers<N: Into<Scalar>>(
        name: impl Into<String>,
        variable: Option<&str>,
        numbers: impl IntoIterator<Item = N>,
    ) -> Self {
        Vector::new(name, variable, numbers.into_iter().map(Into::into))
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.iter().map(Scalar::as_double).collect()
    }

    pub fn to_scalar_vec(&self) -> Vec<Scalar> {
        self.to_vec()
    }

    /// Ascending by double value; NaN sorts last.
    pub fn sorted_scalars(&self) -> Self {
        self.sorted_by(|a, b| a.as_double().total_cmp(&b.as_double()))
    }

    pub fn sum(&self) -> f64 {
        self.iter().map(Scalar::as_double).sum()
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers() -> ScalarVector {
        ScalarVector::from_numbers("v", Some("x"), [3, 1, 2, 5, 4])
    }

    #[test]
    fn test_positional_access() {
        let v = numbers();
        assert_eq!(v.len(), 5);
        assert_eq!(v.first().map(Scalar::as_int), Some(3));
        assert_eq!(v.last().map(Scalar::as_int), Some(4));
        assert_eq!(v.get(2).map(Scalar::as_int), Some(2));
        assert!(v.get(5).is_none());
        assert_eq!(v.variable(), Some("x"));
    }

    #[test]
    fn test_sorted_leaves_original_untouched() {
        let v = numbers();
        let sorted = v.sorted_scalars();
        assert_eq!(sorted.to_f64_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(v.to_f64_vec(), vec![3.0, 1.0, 2.0, 5.0, 4.0]);
        assert_eq!(sorted.name(), "v");
    }

    #[test]
    fn test_splice_is_clamped() {
        let v = numbers();
        assert_eq!(v.splice(3).to_f64_vec(), vec![5.0, 4.0]);
        assert_eq!(v.splice_len(1, 2).to_f64_vec(), vec![1.0, 2.0]);
        assert!(v.splice(10).is_empty());
        assert_eq!(v.splice_len(4, 100).len(), 1);
    }

    #[test]
    fn test_generic_vector_sorted() {
        let names = Vector::new("names", None, ["b".to_string(), "a".to_string()]);
        assert_eq!(names.sorted().to_vec(), vec!["a".to_string(), "b".to_string()]);
    }
}
