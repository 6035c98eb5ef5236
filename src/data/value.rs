//! Scalar and attribute values read from a container.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Attribute map of a group or dataset. Ordered so serialized output is stable.
pub type Attributes = BTreeMap<String, AttrValue>;

/// A single element value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// Boolean element.
    Bool(bool),
    /// Integer element (signed, or unsigned that fits in `i64`).
    Int(i64),
    /// Floating point element.
    Float(f64),
    /// String element.
    Text(String),
}

impl Scalar {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            Scalar::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            Scalar::Text(_) => None,
        }
    }

    /// String view of the value, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Text(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v.into())
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        match i64::try_from(v) {
            Ok(v) => Scalar::Int(v),
            Err(_) => Scalar::Float(v as f64),
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::Float(v.into())
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

/// Attribute value: either a single scalar or a one-dimensional array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    /// Scalar attribute.
    Scalar(Scalar),
    /// Array attribute, flattened in storage order.
    Array(Vec<Scalar>),
}

impl AttrValue {
    /// Array elements, or `None` for a scalar attribute.
    pub fn as_array(&self) -> Option<&[Scalar]> {
        match self {
            AttrValue::Array(values) => Some(values),
            AttrValue::Scalar(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Scalar(v) => write!(f, "{}", v),
            AttrValue::Array(values) => {
                let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<Scalar> for AttrValue {
    fn from(v: Scalar) -> Self {
        AttrValue::Scalar(v)
    }
}

macro_rules! attr_from_scalar {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for AttrValue {
                fn from(v: $ty) -> Self {
                    AttrValue::Scalar(v.into())
                }
            }
        )*
    };
}

attr_from_scalar!(bool, i32, i64, u64, f32, f64, &str, String);

impl<T: Into<Scalar>> FromIterator<T> for AttrValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        AttrValue::Array(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn large_unsigned_widens_to_float() {
        assert_eq!(Scalar::from(7u64), Scalar::Int(7));
        assert_eq!(Scalar::from(u64::MAX), Scalar::Float(u64::MAX as f64));
    }

    #[test]
    fn array_attribute_display_is_bracketed() {
        let value: AttrValue = ["x", "y"].into_iter().collect();
        assert_eq!(value.to_string(), "[x, y]");
        assert_eq!(value.as_array().map(<[Scalar]>::len), Some(2));
        assert_eq!(AttrValue::from("ft").as_array(), None);
        assert_eq!(AttrValue::from(2.5).to_string(), "2.5");
    }

    #[test]
    fn json_numbers_keep_their_kind() {
        let parsed: Vec<Scalar> = serde_json::from_str("[1, 1.5, true, \"ft\"]").unwrap();
        assert_eq!(
            parsed,
            vec![
                Scalar::Int(1),
                Scalar::Float(1.5),
                Scalar::Bool(true),
                Scalar::Text("ft".into())
            ]
        );
    }
}
