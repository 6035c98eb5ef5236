//! Element type tags for datasets.

use crate::error::RasscopeError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Element type of a dataset, as reported by the container backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Boolean.
    Bool,
    /// Signed integer of the given byte width.
    Int {
        /// Element width in bytes.
        bytes: usize,
    },
    /// Unsigned integer of the given byte width.
    UInt {
        /// Element width in bytes.
        bytes: usize,
    },
    /// IEEE float of the given byte width.
    Float {
        /// Element width in bytes.
        bytes: usize,
    },
    /// Fixed-length byte string.
    FixedString {
        /// Element width in bytes.
        bytes: usize,
    },
    /// Variable-length string, stored as a pointer.
    VarString,
    /// Compound (record) type.
    Compound {
        /// Record width in bytes.
        bytes: usize,
    },
    /// Anything else the backend cannot describe further.
    Opaque {
        /// Element width in bytes.
        bytes: usize,
    },
}

impl DataType {
    /// Element width in bytes.
    pub fn size(&self) -> usize {
        match *self {
            DataType::Bool => 1,
            DataType::VarString => 8,
            DataType::Int { bytes }
            | DataType::UInt { bytes }
            | DataType::Float { bytes }
            | DataType::FixedString { bytes }
            | DataType::Compound { bytes }
            | DataType::Opaque { bytes } => bytes,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            DataType::Bool => f.write_str("bool"),
            DataType::Int { bytes } => write!(f, "int{}", bytes * 8),
            DataType::UInt { bytes } => write!(f, "uint{}", bytes * 8),
            DataType::Float { bytes } => write!(f, "float{}", bytes * 8),
            DataType::FixedString { bytes } => write!(f, "|S{}", bytes),
            DataType::VarString => f.write_str("object"),
            DataType::Compound { bytes } => write!(f, "compound[{}]", bytes),
            DataType::Opaque { bytes } => write!(f, "opaque[{}]", bytes),
        }
    }
}

impl FromStr for DataType {
    type Err = RasscopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        let invalid = || RasscopeError::Read(format!("Unknown dtype tag: {}", s));

        let bits = |digits: &str| -> Result<usize, RasscopeError> {
            match digits.parse::<usize>() {
                Ok(n) if n % 8 == 0 && n > 0 => Ok(n / 8),
                _ => Err(invalid()),
            }
        };
        let bracketed = |rest: &str| -> Result<usize, RasscopeError> {
            rest.strip_prefix('[')
                .and_then(|r| r.strip_suffix(']'))
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(invalid)
        };

        match tag.as_str() {
            "bool" => return Ok(DataType::Bool),
            "object" | "str" | "string" => return Ok(DataType::VarString),
            _ => {}
        }

        if let Some(rest) = tag.strip_prefix("uint") {
            return Ok(DataType::UInt { bytes: bits(rest)? });
        }
        if let Some(rest) = tag.strip_prefix("int") {
            return Ok(DataType::Int { bytes: bits(rest)? });
        }
        if let Some(rest) = tag.strip_prefix("float") {
            return Ok(DataType::Float { bytes: bits(rest)? });
        }
        if let Some(rest) = tag.strip_prefix("compound") {
            return Ok(DataType::Compound {
                bytes: bracketed(rest)?,
            });
        }
        if let Some(rest) = tag.strip_prefix("opaque") {
            return Ok(DataType::Opaque {
                bytes: bracketed(rest)?,
            });
        }
        if let Some(rest) = tag.strip_prefix("|s").or_else(|| tag.strip_prefix('s')) {
            let bytes = rest.parse::<usize>().map_err(|_| invalid())?;
            return Ok(DataType::FixedString { bytes });
        }

        Err(invalid())
    }
}

impl Serialize for DataType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
