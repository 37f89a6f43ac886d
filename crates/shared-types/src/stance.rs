//! # Stance
//!
//! The value participants agree or disagree about.
//!
//! Stances form a closed set of variants so that equality, hashing and the
//! per-key merges used by synthesis and middle-ground computation are total
//! functions matched exhaustively.

use crate::errors::StanceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A participant's stance.
///
/// Numeric equality is by normalized bit pattern: `-0.0 == 0.0` and every
/// NaN equals every other NaN, so `Eq` and `Hash` agree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Stance {
    /// A quantity (score, threshold, line length).
    Numeric(f64),
    /// A yes/no verdict.
    Flag(bool),
    /// A label from an open vocabulary (`"strict"`, `"refactor"`).
    Categorical(String),
    /// A structured recommendation with named fields.
    Record(BTreeMap<String, Stance>),
}

impl Stance {
    /// Build a categorical stance.
    pub fn categorical(label: impl Into<String>) -> Self {
        Self::Categorical(label.into())
    }

    /// Build a record stance from `(field, value)` pairs.
    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Stance)>,
    {
        Self::Record(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Numeric value, if this is a numeric stance.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            Self::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    /// Fields, if this is a record stance.
    pub fn as_record(&self) -> Option<&BTreeMap<String, Stance>> {
        match self {
            Self::Record(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Short variant name used in explanations and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Numeric(_) => "numeric",
            Self::Flag(_) => "flag",
            Self::Categorical(_) => "categorical",
            Self::Record(_) => "record",
        }
    }

    /// Convert back into JSON for collaborators that speak it.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Numeric(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Flag(b) => serde_json::Value::Bool(*b),
            Self::Categorical(s) => serde_json::Value::String(s.clone()),
            Self::Record(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value.is_nan() {
        f64::NAN.to_bits()
    } else if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

impl PartialEq for Stance {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Numeric(a), Self::Numeric(b)) => canonical_bits(*a) == canonical_bits(*b),
            (Self::Flag(a), Self::Flag(b)) => a == b,
            (Self::Categorical(a), Self::Categorical(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Stance {}

impl Hash for Stance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Numeric(v) => canonical_bits(*v).hash(state),
            Self::Flag(b) => b.hash(state),
            Self::Categorical(s) => s.hash(state),
            Self::Record(fields) => {
                for (k, v) in fields {
                    k.hash(state);
                    v.hash(state);
                }
            }
        }
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "{v}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Categorical(s) => write!(f, "{s}"),
            Self::Record(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<f64> for Stance {
    fn from(value: f64) -> Self {
        Self::Numeric(value)
    }
}

impl From<i32> for Stance {
    fn from(value: i32) -> Self {
        Self::Numeric(f64::from(value))
    }
}

impl From<i64> for Stance {
    fn from(value: i64) -> Self {
        Self::Numeric(value as f64)
    }
}

impl From<bool> for Stance {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for Stance {
    fn from(value: &str) -> Self {
        Self::Categorical(value.to_string())
    }
}

impl From<String> for Stance {
    fn from(value: String) -> Self {
        Self::Categorical(value)
    }
}

impl TryFrom<serde_json::Value> for Stance {
    type Error = StanceError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value;

        match value {
            Value::Null => Err(StanceError::Null),
            Value::Bool(b) => Ok(Self::Flag(b)),
            Value::Number(n) => n
                .as_f64()
                .map(Self::Numeric)
                .ok_or_else(|| StanceError::UnsupportedShape(n.to_string())),
            Value::String(s) => Ok(Self::Categorical(s)),
            Value::Array(_) => Err(StanceError::UnsupportedShape("array".to_string())),
            Value::Object(map) => {
                let mut fields = BTreeMap::new();
                for (k, v) in map {
                    fields.insert(k, Stance::try_from(v)?);
                }
                Ok(Self::Record(fields))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_numeric_zero_and_nan_equality() {
        assert_eq!(Stance::Numeric(0.0), Stance::Numeric(-0.0));
        assert_eq!(Stance::Numeric(f64::NAN), Stance::Numeric(f64::NAN));
        assert_ne!(Stance::Numeric(80.0), Stance::Numeric(120.0));
    }

    #[test]
    fn test_hash_agrees_with_eq() {
        let mut set = HashSet::new();
        set.insert(Stance::Numeric(0.0));
        set.insert(Stance::Numeric(-0.0));
        set.insert(Stance::record([("lint", Stance::from("strict"))]));
        set.insert(Stance::record([("lint", Stance::from("strict"))]));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_variants_never_equal_across_kinds() {
        assert_ne!(Stance::Numeric(1.0), Stance::Flag(true));
        assert_ne!(Stance::from("1"), Stance::Numeric(1.0));
    }

    #[test]
    fn test_from_json_object() {
        let json = serde_json::json!({"lint": "strict", "max": 80, "fix": true});
        let stance = Stance::try_from(json).unwrap();
        let fields = stance.as_record().unwrap();
        assert_eq!(fields["lint"], Stance::from("strict"));
        assert_eq!(fields["max"], Stance::Numeric(80.0));
        assert_eq!(fields["fix"], Stance::Flag(true));
    }

    #[test]
    fn test_from_json_rejects_null_and_arrays() {
        assert_eq!(
            Stance::try_from(serde_json::Value::Null),
            Err(StanceError::Null)
        );
        assert!(matches!(
            Stance::try_from(serde_json::json!([1, 2])),
            Err(StanceError::UnsupportedShape(_))
        ));
    }

    #[test]
    fn test_display_record() {
        let stance = Stance::record([("a", Stance::Numeric(1.0)), ("b", Stance::from("x"))]);
        assert_eq!(stance.to_string(), "{a: 1, b: x}");
    }
}
