use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Integral number
    Integer(i64),
    /// Any other number
    Float(f64),
    /// String value
    Text(String),
}

impl Scalar {
    /// Borrow the value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view of the value. Integers are widened to `f64`.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean view of the value.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Value found in loosely-typed metadata blobs.
///
/// Only one level of nesting is modelled: a scalar, a list of scalars or a map
/// of scalars. Anything deeper fails to decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    /// Plain scalar
    Scalar(Scalar),
    /// List of scalars
    List(Vec<Scalar>),
    /// String-keyed map of scalars
    Map(BTreeMap<String, Scalar>),
}

impl MetaValue {
    /// The scalar behind this value, if it is one.
    pub const fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Shortcut for `as_scalar().and_then(Scalar::as_str)`.
    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// The list behind this value, if it is one.
    pub fn as_list(&self) -> Option<&[Scalar]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The map behind this value, if it is one.
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Scalar>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::Text(value.to_owned()))
    }
}
