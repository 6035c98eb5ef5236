//! Capability trait over hierarchical container files.
//!
//! Every operation addresses nodes by their absolute, slash-delimited path.
//! The root group is always `/`.

use super::{Attributes, DataType, Scalar};
use crate::error::{RasscopeError, Result};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Kind of a node in the container hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Directory-like node holding children.
    Group,
    /// Typed N-dimensional array.
    Dataset,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Group => f.write_str("group"),
            NodeKind::Dataset => f.write_str("dataset"),
        }
    }
}

/// Portion of a dataset to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// The whole array.
    All,
    /// A contiguous range of leading-axis indices, all trailing axes in full.
    Rows(Range<usize>),
    /// Individual leading-axis indices, in the given order.
    Points(Vec<usize>),
}

/// Read-only access to a container file.
///
/// Implementations must report `/` as a group. Children are listed in the
/// backend's iteration order, which must be stable for an unmodified file.
pub trait Container {
    /// Kind of the node at `path`, or `NotFound`.
    fn kind(&self, path: &str) -> Result<NodeKind>;

    /// Whether any node exists at `path`.
    fn exists(&self, path: &str) -> bool;

    /// Names of the direct children of the group at `path`.
    fn children(&self, path: &str) -> Result<Vec<String>>;

    /// Attributes attached to the node at `path`.
    fn attributes(&self, path: &str) -> Result<Attributes>;

    /// Shape of the dataset at `path`.
    fn shape(&self, path: &str) -> Result<Vec<usize>>;

    /// Element type of the dataset at `path`.
    fn dtype(&self, path: &str) -> Result<DataType>;

    /// Read a selection of the dataset at `path`.
    fn read(&self, path: &str, selection: &Selection) -> Result<ArrayD<Scalar>>;
}

/// Join a child name onto a parent path.
pub fn join_path(parent: &str, name: &str) -> String {
    if parent == "/" || parent.is_empty() {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent.trim_end_matches('/'), name)
    }
}

/// Last segment of a path (`/` for the root).
pub fn path_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Normalize a user supplied path to the absolute form used by containers.
pub fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    format!("/{}", segments.join("/"))
}

/// Number of elements for a shape; 1 for scalars.
///
/// Fails with a read error when the product overflows `usize`.
pub fn element_count(shape: &[usize]) -> Result<usize> {
    shape
        .iter()
        .try_fold(1usize, |count, &dim| count.checked_mul(dim))
        .ok_or_else(|| RasscopeError::read(format!("Shape {:?} has too many elements", shape)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_from_root_and_nested() {
        assert_eq!(join_path("/", "Geometry"), "/Geometry");
        assert_eq!(join_path("/Geometry", "2D Flow Areas"), "/Geometry/2D Flow Areas");
    }

    #[test]
    fn name_of_paths() {
        assert_eq!(path_name("/"), "/");
        assert_eq!(path_name("/Results/2D/MaxWSE"), "MaxWSE");
    }

    #[test]
    fn normalize_strips_redundant_slashes() {
        assert_eq!(normalize_path("Results//2D/"), "/Results/2D");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn scalar_shape_has_one_element() {
        assert_eq!(element_count(&[]).unwrap(), 1);
        assert_eq!(element_count(&[4, 0, 3]).unwrap(), 0);
    }

    #[test]
    fn overflowing_shape_is_a_read_error() {
        let err = element_count(&[usize::MAX, 2]).unwrap_err();
        assert!(matches!(err, RasscopeError::Read(_)));
        assert_eq!(element_count(&[usize::MAX, 0]).unwrap(), 0);
    }
}
