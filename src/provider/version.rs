//! Semantic versions and operator-qualified version expressions used to pick
//! a compatible provider.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version: {0}")]
    InvalidVersion(String),
    #[error("Invalid Operator Symbol: {0}")]
    InvalidOperator(String),
    #[error("Expected a version expression: `<operator><version>`, e.g., '~1.2.3' but got {0}")]
    InvalidExpression(String),
}

/// `major[.minor[.patch]][-pre-release][+build]`; absent components are 0.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<String>,
    pub build: Option<String>,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch, pre_release: None, build: None }
    }

    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let invalid = || VersionError::InvalidVersion(text.to_string());

        let (rest, build) = match text.split_once('+') {
            Some((rest, build)) => (rest, Some(checked_identifiers(build).ok_or_else(invalid)?)),
            None => (text, None),
        };
        let (core, pre_release) = match rest.split_once('-') {
            Some((core, pre)) => (core, Some(checked_identifiers(pre).ok_or_else(invalid)?)),
            None => (rest, None),
        };

        let mut parts = [0u64; 3];
        let mut count = 0;
        for piece in core.split('.') {
            if count == 3 || piece.is_empty() || !piece.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            parts[count] = piece.parse().map_err(|_| invalid())?;
            count += 1;
        }

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            pre_release,
            build,
        })
    }

    /// Caret rule: same left-most non-zero component and not older than `self`.
    pub fn is_compatible_with(&self, candidate: &Version) -> bool {
        VersionExpression::new(VersionOperator::Compatible, self.clone()).matches(candidate)
    }

    fn same_core(&self, other: &Version) -> bool {
        (self.major, self.minor, self.patch) == (other.major, other.minor, other.patch)
    }
}

fn checked_identifiers(text: &str) -> Option<String> {
    let valid = !text.is_empty()
        && text
            .split('.')
            .all(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-'));
    valid.then(|| text.to_string())
}

fn compare_pre_release(a: &str, b: &str) -> Ordering {
    let mut left = a.split('.');
    let mut right = b.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => {
                let ord = match (l.parse::<u64>(), r.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => l.cmp(r),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

/// Precedence ignores build metadata.
impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre_release, &other.pre_release) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => compare_pre_release(a, b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre_release {
            write!(f, "-{}", pre)?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{}", build)?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = VersionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Version {
    type Error = VersionError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Version> for String {
    fn from(value: Version) -> Self {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionOperator {
    Compatible,
    CloseTo,
    EqualTo,
    GreaterThan,
    LessThan,
    GreaterThanEqualTo,
    LessThanEqualTo,
}

impl VersionOperator {
    pub const ALL: [VersionOperator; 7] = [
        VersionOperator::Compatible,
        VersionOperator::CloseTo,
        VersionOperator::EqualTo,
        VersionOperator::GreaterThan,
        VersionOperator::LessThan,
        VersionOperator::GreaterThanEqualTo,
        VersionOperator::LessThanEqualTo,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            VersionOperator::Compatible => "^",
            VersionOperator::CloseTo => "~",
            VersionOperator::EqualTo => "=",
            VersionOperator::GreaterThan => ">",
            VersionOperator::LessThan => "<",
            VersionOperator::GreaterThanEqualTo => ">=",
            VersionOperator::LessThanEqualTo => "<=",
        }
    }

    /// Comparison operators can bound one side of a range.
    pub fn is_compound_range_enabled(&self) -> bool {
        !matches!(
            self,
            VersionOperator::Compatible | VersionOperator::CloseTo | VersionOperator::EqualTo
        )
    }

    pub fn from_symbol(symbol: &str) -> Result<Self, VersionError> {
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == symbol)
            .ok_or_else(|| VersionError::InvalidOperator(symbol.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionExpression {
    pub operator: VersionOperator,
    pub version: Version,
}

impl VersionExpression {
    pub fn new(operator: VersionOperator, version: Version) -> Self {
        Self { operator, version }
    }

    pub fn parse(text: &str) -> Result<Self, VersionError> {
        let split = text
            .find(|c: char| !matches!(c, '^' | '~' | '=' | '>' | '<'))
            .unwrap_or(text.len());
        let (symbol, version) = text.split_at(split);
        if symbol.is_empty() || symbol.len() > 2 {
            return Err(VersionError::InvalidExpression(text.to_string()));
        }
        let operator = VersionOperator::from_symbol(symbol)?;
        let version =
            Version::parse(version).map_err(|_| VersionError::InvalidExpression(text.to_string()))?;
        Ok(Self { operator, version })
    }

    pub fn matches(&self, candidate: &Version) -> bool {
        let base = &self.version;
        match self.operator {
            VersionOperator::EqualTo => candidate == base,
            VersionOperator::GreaterThan => candidate > base,
            VersionOperator::LessThan => candidate < base,
            VersionOperator::GreaterThanEqualTo => candidate >= base,
            VersionOperator::LessThanEqualTo => candidate <= base,
            VersionOperator::Compatible => {
                let same_series = if base.major > 0 {
                    candidate.major == base.major
                } else if base.minor > 0 {
                    candidate.major == 0 && candidate.minor == base.minor
                } else {
                    candidate.major == 0 && candidate.minor == 0 && candidate.patch == base.patch
                };
                same_series && candidate >= base && Self::pre_release_allowed(base, candidate)
            }
            VersionOperator::CloseTo => {
                candidate.major == base.major
                    && candidate.minor == base.minor
                    && candidate >= base
                    && Self::pre_release_allowed(base, candidate)
            }
        }
    }

    // Pre-releases only satisfy a range anchored on the same core version.
    fn pre_release_allowed(base: &Version, candidate: &Version) -> bool {
        candidate.pre_release.is_none() || (base.pre_release.is_some() && base.same_core(candidate))
    }
}

impl fmt::Display for VersionExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator.symbol(), self.version)
    }
}

impl FromStr for VersionExpression {
    type Err = VersionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionExpression {
    type Error = VersionError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VersionExpression> for String {
    fn from(value: VersionExpression) -> Self {
        value.to_string()
    }
}
