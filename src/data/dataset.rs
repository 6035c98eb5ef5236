//! Flat dataset descriptors.

use super::container::{element_count, path_name};
use super::{AttrValue, Attributes, Container, DataType, NodeKind};
use crate::error::{RasscopeError, Result};
use serde::Serialize;
use tracing::warn;

/// Attribute key recorded when a node's attributes cannot be read.
pub const UNREADABLE_ATTRIBUTES: &str = "<unreadable>";

/// Flat description of one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetDescriptor {
    /// Full path.
    pub path: String,
    /// Last path segment.
    pub name: String,
    /// Dimension sizes.
    pub shape: Vec<usize>,
    /// Element type tag.
    pub dtype: DataType,
    /// Product of `shape`.
    pub element_count: usize,
    /// `element_count` times the element width.
    pub byte_size: u64,
    /// `byte_size` in mebibytes.
    pub size_mb: f64,
    /// Dataset attributes.
    pub attributes: Attributes,
}

impl DatasetDescriptor {
    /// Build a descriptor for an explicit shape and type.
    ///
    /// Fails when the shape is too large to size.
    pub fn new(
        path: &str,
        shape: Vec<usize>,
        dtype: DataType,
        attributes: Attributes,
    ) -> Result<Self> {
        let count = element_count(&shape)?;
        let byte_size = (count as u64)
            .checked_mul(dtype.size() as u64)
            .ok_or_else(|| RasscopeError::read(format!("{} is too large to size", path)))?;
        Ok(Self {
            path: path.to_string(),
            name: path_name(path).to_string(),
            shape,
            dtype,
            element_count: count,
            byte_size,
            size_mb: byte_size as f64 / (1024.0 * 1024.0),
            attributes,
        })
    }

    /// Read the descriptor of the dataset at `path`.
    pub fn read<C: Container + ?Sized>(container: &C, path: &str) -> Result<Self> {
        if container.kind(path)? != NodeKind::Dataset {
            return Err(RasscopeError::type_mismatch(path, NodeKind::Dataset));
        }
        let shape = container.shape(path)?;
        let dtype = container.dtype(path)?;
        Self::new(path, shape, dtype, read_attributes(container, path))
    }
}

/// Read attributes, degrading a failure to a single marker entry.
pub fn read_attributes<C: Container + ?Sized>(container: &C, path: &str) -> Attributes {
    match container.attributes(path) {
        Ok(attributes) => attributes,
        Err(e) => {
            warn!("Failed to read attributes of {}: {}", path, e);
            let mut attributes = Attributes::new();
            attributes.insert(
                UNREADABLE_ATTRIBUTES.to_string(),
                AttrValue::from(e.to_string()),
            );
            attributes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryContainer;

    #[test]
    fn byte_size_uses_element_width() {
        let float32 = DataType::Float { bytes: 4 };
        let d =
            DatasetDescriptor::new("/Results/Depth", vec![1024, 256], float32, Attributes::new())
                .unwrap();
        assert_eq!(d.name, "Depth");
        assert_eq!(d.element_count, 262_144);
        assert_eq!(d.byte_size, 1_048_576);
        assert!((d.size_mb - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn group_is_rejected() {
        let mut c = MemoryContainer::new();
        c.insert_group("/Results").unwrap();
        let err = DatasetDescriptor::read(&c, "/Results").unwrap_err();
        assert!(matches!(err, RasscopeError::TypeMismatch { expected: NodeKind::Dataset, .. }));
    }

    #[test]
    fn oversized_shape_is_rejected() {
        let shape = vec![usize::MAX / 2, 1];
        let float64 = DataType::Float { bytes: 8 };
        let err = DatasetDescriptor::new("/Huge", shape, float64, Attributes::new()).unwrap_err();
        assert!(matches!(err, RasscopeError::Read(_)));
    }
}
