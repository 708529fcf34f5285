use super::function::FunctionType;
use crate::error::FunctionError;
use crate::parameter::Value;
use crate::store::Scalar;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Named result produced by a model. The label is a caption only; lookups go
/// through the name.
#[derive(Debug, Clone)]
pub struct Coefficient {
    name: String,
    label: Option<String>,
    value: Value,
}

impl Coefficient {
    pub fn new(name: impl Into<String>, label: Option<&str>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            label: label.map(str::to_string),
            value: value.into(),
        }
    }

    pub fn of_type(function_type: &FunctionType, value: impl Into<Value>) -> Self {
        Self::new(function_type.name.clone(), Some(&function_type.label), value)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn scalar(&self) -> Result<Scalar, FunctionError> {
        self.value.as_scalar()
    }

    pub fn summary(&self) -> CoefficientSummary {
        CoefficientSummary {
            name: self.name.clone(),
            label: self.label.clone(),
            value: self.value.as_scalar().ok().map(|s| s.as_double()),
            display: self.value.render(),
        }
    }
}

impl fmt::Display for Coefficient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label.as_deref().unwrap_or(&self.name), self.value)
    }
}

/// Serializable projection of a coefficient for callers that publish results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoefficientSummary {
    pub name: String,
    pub label: Option<String>,
    pub value: Option<f64>,
    pub display: String,
}

/// Insertion-ordered coefficients keyed by name. Entries are replaced, never
/// removed.
#[derive(Debug, Clone, Default)]
pub struct CoefficientSet {
    entries: Vec<Coefficient>,
    index: HashMap<String, usize>,
}

impl CoefficientSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, coefficient: Coefficient) {
        match self.index.get(coefficient.name()) {
            Some(&i) => self.entries[i] = coefficient,
            None => {
                self.index.insert(coefficient.name().to_string(), self.entries.len());
                self.entries.push(coefficient);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Coefficient> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coefficient> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summaries(&self) -> Vec<CoefficientSummary> {
        self.entries.iter().map(Coefficient::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefers_label() {
        let c = Coefficient::of_type(&FunctionType::new("slope", "B"), Scalar::from(2.5));
        assert_eq!(c.to_string(), "B: 2.500");
        let unlabeled = Coefficient::new("count", None, Scalar::from(3));
        assert_eq!(unlabeled.to_string(), "count: 3.000");
    }

    #[test]
    fn test_set_replaces_in_place() {
        let mut set = CoefficientSet::new();
        set.set(Coefficient::new("a", None, Scalar::from(1)));
        set.set(Coefficient::new("b", None, Scalar::from(2)));
        set.set(Coefficient::new("a", None, Scalar::from(3)));

        assert_eq!(set.len(), 2);
        let names: Vec<_> = set.iter().map(Coefficient::name).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(set.get("a").unwrap().scalar().unwrap().as_int(), 3);
    }

    #[test]
    fn test_summary_serializes() {
        let c = Coefficient::of_type(&FunctionType::new("rSquared", "R-SQUARED"), Scalar::from(0.5));
        let json = serde_json::to_value(c.summary()).unwrap();
        assert_eq!(json["name"], "rSquared");
        assert_eq!(json["value"], 0.5);
    }
}
