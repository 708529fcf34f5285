//! Uniform numeric wrapper for numbers, booleans and calendar values.
use super::temporal::SerialTemporal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The value a [`Scalar`] was built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScalarSource {
    Integer(i64),
    Float(f64),
    /// Encoded as `0` for true and `1` for false.
    Boolean(bool),
    Temporal(SerialTemporal),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Scalar {
    source: ScalarSource,
}

impl Scalar {
    pub fn new(source: ScalarSource) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &ScalarSource {
        &self.source
    }

    pub fn as_double(&self) -> f64 {
        match self.source {
            ScalarSource::Integer(i) => i as f64,
            ScalarSource::Float(f) => f,
            ScalarSource::Boolean(b) => boolean_code(b) as f64,
            ScalarSource::Temporal(t) => t.epoch_seconds() as f64,
        }
    }

    pub fn as_long(&self) -> i64 {
        match self.source {
            ScalarSource::Integer(i) => i,
            ScalarSource::Float(f) => f as i64,
            ScalarSource::Boolean(b) => boolean_code(b),
            ScalarSource::Temporal(t) => t.epoch_seconds(),
        }
    }

    pub fn as_int(&self) -> i32 {
        self.as_long() as i32
    }

    pub fn as_boolean(&self) -> bool {
        self.as_int() == 0
    }

    pub fn as_temporal(&self) -> Option<SerialTemporal> {
        match self.source {
            ScalarSource::Temporal(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_integral(&self) -> bool {
        !matches!(self.source, ScalarSource::Float(_))
    }
}

fn boolean_code(value: bool) -> i64 {
    if value {
        0
    } else {
        1
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.as_double() == other.as_double()
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_double().partial_cmp(&other.as_double())
    }
}

impl fmt::Display for Scalar {
    /// At least three decimals, at most fourteen.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.as_double();
        if !value.is_finite() {
            return write!(f, "{}", value);
        }
        let mut text = format!("{:.14}", value);
        let min_len = text.find('.').map(|dot| dot + 4).unwrap_or(text.len());
        while text.len() > min_len && text.ends_with('0') {
            text.pop();
        }
        f.write_str(&text)
    }
}

macro_rules! scalar_from_integer {
    ($($t:ty),*) => {
        $(impl From<$t> for Scalar {
            fn from(value: $t) -> Self {
                Scalar::new(ScalarSource::Integer(value as i64))
            }
        })*
    };
}

scalar_from_integer!(i32, i64, u32, usize);

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::new(ScalarSource::Float(value))
    }
}

impl From<f32> for Scalar {
    fn from(value: f32) -> Self {
        Scalar::new(ScalarSource::Float(value as f64))
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::new(ScalarSource::Boolean(value))
    }
}

impl From<SerialTemporal> for Scalar {
    fn from(value: SerialTemporal) -> Self {
        Scalar::new(ScalarSource::Temporal(value))
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        SerialTemporal::Date(value).into()
    }
}

impl From<NaiveDateTime> for Scalar {
    fn from(value: NaiveDateTime) -> Self {
        SerialTemporal::DateTime(value).into()
    }
}
