//! In-memory container.
//!
//! Backs tests and offline captures. A container can be built node by node or
//! loaded from a JSON snapshot:
//!
//! ```json
//! { "kind": "group", "attributes": { "File Type": "HEC-RAS Results" },
//!   "children": [
//!     { "kind": "dataset", "name": "MaxWSE", "dtype": "float32",
//!       "shape": [3], "data": [10.5, 11.2, 9.8] } ] }
//! ```
//!
//! A dataset snapshot without `data` is filled with zero values of its type,
//! which keeps large-shape fixtures small.

use super::container::{element_count, join_path, normalize_path, path_name};
use super::{AttrValue, Attributes, Container, DataType, NodeKind, Scalar, Selection};
use crate::error::{RasscopeError, Result};
use ndarray::{ArrayD, Axis, IxDyn, Slice};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Largest data-less snapshot dataset that is filled with zeros.
const MAX_FILL_ELEMENTS: usize = 1 << 24;

#[derive(Debug, Clone)]
enum Entry {
    Group {
        children: Vec<String>,
        attributes: Attributes,
        unreadable: bool,
    },
    Dataset {
        dtype: DataType,
        data: ArrayD<Scalar>,
        attributes: Attributes,
        unreadable: bool,
    },
}

impl Entry {
    fn kind(&self) -> NodeKind {
        match self {
            Entry::Group { .. } => NodeKind::Group,
            Entry::Dataset { .. } => NodeKind::Dataset,
        }
    }

    fn attributes_mut(&mut self) -> &mut Attributes {
        match self {
            Entry::Group { attributes, .. } | Entry::Dataset { attributes, .. } => attributes,
        }
    }
}

/// Container held entirely in memory. Children keep insertion order.
#[derive(Debug, Clone)]
pub struct MemoryContainer {
    entries: HashMap<String, Entry>,
}

impl Default for MemoryContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryContainer {
    /// Create a container holding only the root group.
    pub fn new() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "/".to_string(),
            Entry::Group {
                children: Vec::new(),
                attributes: Attributes::new(),
                unreadable: false,
            },
        );
        Self { entries }
    }

    /// Insert a group, creating missing parent groups.
    pub fn insert_group(&mut self, path: &str) -> Result<&mut Self> {
        let path = normalize_path(path);
        self.ensure_group(&path)?;
        Ok(self)
    }

    /// Insert (or replace) a dataset, creating missing parent groups.
    pub fn insert_dataset(
        &mut self,
        path: &str,
        dtype: DataType,
        data: ArrayD<Scalar>,
    ) -> Result<&mut Self> {
        let path = normalize_path(path);
        if path == "/" {
            return Err(RasscopeError::type_mismatch(path, NodeKind::Group));
        }

        match self.entries.get(&path) {
            Some(Entry::Group { .. }) => {
                return Err(RasscopeError::type_mismatch(path, NodeKind::Group));
            }
            Some(Entry::Dataset { .. }) => {}
            None => {
                let parent = parent_path(&path);
                self.ensure_group(&parent)?;
                self.link_child(&parent, path_name(&path))?;
            }
        }

        let attributes = match self.entries.remove(&path) {
            Some(Entry::Dataset { attributes, .. }) => attributes,
            _ => Attributes::new(),
        };
        self.entries.insert(
            path,
            Entry::Dataset {
                dtype,
                data,
                attributes,
                unreadable: false,
            },
        );
        Ok(self)
    }

    /// Insert a dataset from flat values in storage order.
    pub fn insert_array<T: Into<Scalar>>(
        &mut self,
        path: &str,
        dtype: DataType,
        shape: &[usize],
        values: Vec<T>,
    ) -> Result<&mut Self> {
        let values: Vec<Scalar> = values.into_iter().map(Into::into).collect();
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)
            .map_err(|e| RasscopeError::read(format!("Invalid shape/data size: {}", e)))?;
        self.insert_dataset(path, dtype, data)
    }

    /// Set an attribute on an existing node.
    pub fn set_attribute(
        &mut self,
        path: &str,
        key: &str,
        value: impl Into<AttrValue>,
    ) -> Result<&mut Self> {
        let path = normalize_path(path);
        let entry = self
            .entries
            .get_mut(&path)
            .ok_or_else(|| RasscopeError::not_found(path.clone()))?;
        entry.attributes_mut().insert(key.to_string(), value.into());
        Ok(self)
    }

    /// Make reads below `path` fail: child listing for groups, data for datasets.
    pub fn mark_unreadable(&mut self, path: &str) -> Result<&mut Self> {
        let path = normalize_path(path);
        match self.entries.get_mut(&path) {
            Some(Entry::Group { unreadable, .. }) | Some(Entry::Dataset { unreadable, .. }) => {
                *unreadable = true;
                Ok(self)
            }
            None => Err(RasscopeError::not_found(path)),
        }
    }

    /// Load a container from a JSON snapshot string.
    pub fn from_snapshot_str(json: &str) -> Result<Self> {
        let root: SnapshotNode = serde_json::from_str(json)?;
        let mut container = Self::new();
        match root {
            SnapshotNode::Group {
                attributes,
                children,
                unreadable,
                ..
            } => {
                for (key, value) in attributes {
                    container.set_attribute("/", &key, value)?;
                }
                for child in children {
                    container.load_snapshot_node("/", child)?;
                }
                if unreadable {
                    container.mark_unreadable("/")?;
                }
            }
            SnapshotNode::Dataset { .. } => {
                return Err(RasscopeError::type_mismatch("/", NodeKind::Group));
            }
        }
        Ok(container)
    }

    /// Load a container from a JSON snapshot file.
    pub fn from_snapshot_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RasscopeError::file_open(path.to_path_buf(), e))?;
        Self::from_snapshot_str(&text)
    }

    fn load_snapshot_node(&mut self, parent: &str, node: SnapshotNode) -> Result<()> {
        match node {
            SnapshotNode::Group {
                name,
                attributes,
                children,
                unreadable,
            } => {
                let path = join_path(parent, &name);
                self.insert_group(&path)?;
                for (key, value) in attributes {
                    self.set_attribute(&path, &key, value)?;
                }
                for child in children {
                    self.load_snapshot_node(&path, child)?;
                }
                if unreadable {
                    self.mark_unreadable(&path)?;
                }
            }
            SnapshotNode::Dataset {
                name,
                dtype,
                shape,
                data,
                attributes,
                unreadable,
            } => {
                let path = join_path(parent, &name);
                let dtype: DataType = dtype.parse()?;
                let data = if data.is_empty() {
                    let count = element_count(&shape)?;
                    if count > MAX_FILL_ELEMENTS {
                        return Err(RasscopeError::read(format!(
                            "{} has {} elements and no data, more than {} to fill",
                            path, count, MAX_FILL_ELEMENTS
                        )));
                    }
                    vec![zero_value(&dtype); count]
                } else {
                    data
                };
                self.insert_array(&path, dtype, &shape, data)?;
                for (key, value) in attributes {
                    self.set_attribute(&path, &key, value)?;
                }
                if unreadable {
                    self.mark_unreadable(&path)?;
                }
            }
        }
        Ok(())
    }

    fn ensure_group(&mut self, path: &str) -> Result<()> {
        match self.entries.get(path) {
            Some(Entry::Group { .. }) => return Ok(()),
            Some(Entry::Dataset { .. }) => {
                return Err(RasscopeError::type_mismatch(path, NodeKind::Group));
            }
            None => {}
        }

        let parent = parent_path(path);
        self.ensure_group(&parent)?;
        self.link_child(&parent, path_name(path))?;
        self.entries.insert(
            path.to_string(),
            Entry::Group {
                children: Vec::new(),
                attributes: Attributes::new(),
                unreadable: false,
            },
        );
        Ok(())
    }

    fn link_child(&mut self, parent: &str, name: &str) -> Result<()> {
        match self.entries.get_mut(parent) {
            Some(Entry::Group { children, .. }) => {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
                Ok(())
            }
            Some(Entry::Dataset { .. }) => {
                Err(RasscopeError::type_mismatch(parent, NodeKind::Group))
            }
            None => Err(RasscopeError::not_found(parent)),
        }
    }

    fn entry(&self, path: &str) -> Result<&Entry> {
        let path = normalize_path(path);
        self.entries
            .get(&path)
            .ok_or(RasscopeError::NotFound { path })
    }

    fn dataset(&self, path: &str) -> Result<(&DataType, &ArrayD<Scalar>, bool)> {
        match self.entry(path)? {
            Entry::Dataset {
                dtype,
                data,
                unreadable,
                ..
            } => Ok((dtype, data, *unreadable)),
            Entry::Group { .. } => Err(RasscopeError::type_mismatch(path, NodeKind::Dataset)),
        }
    }
}

impl Container for MemoryContainer {
    fn kind(&self, path: &str) -> Result<NodeKind> {
        Ok(self.entry(path)?.kind())
    }

    fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(&normalize_path(path))
    }

    fn children(&self, path: &str) -> Result<Vec<String>> {
        match self.entry(path)? {
            Entry::Group {
                unreadable: true, ..
            } => Err(RasscopeError::read(format!("Unable to iterate group {}", path))),
            Entry::Group { children, .. } => Ok(children.clone()),
            Entry::Dataset { .. } => Err(RasscopeError::type_mismatch(path, NodeKind::Group)),
        }
    }

    fn attributes(&self, path: &str) -> Result<Attributes> {
        match self.entry(path)? {
            Entry::Group { attributes, .. } | Entry::Dataset { attributes, .. } => {
                Ok(attributes.clone())
            }
        }
    }

    fn shape(&self, path: &str) -> Result<Vec<usize>> {
        let (_, data, _) = self.dataset(path)?;
        Ok(data.shape().to_vec())
    }

    fn dtype(&self, path: &str) -> Result<DataType> {
        let (dtype, _, _) = self.dataset(path)?;
        Ok(*dtype)
    }

    fn read(&self, path: &str, selection: &Selection) -> Result<ArrayD<Scalar>> {
        let (_, data, unreadable) = self.dataset(path)?;
        if unreadable {
            return Err(RasscopeError::read(format!("Unable to read dataset {}", path)));
        }

        match selection {
            Selection::All => Ok(data.clone()),
            Selection::Rows(range) => {
                let rows = leading_len(data, path)?;
                if range.start > range.end || range.end > rows {
                    return Err(RasscopeError::read(format!(
                        "Row selection {:?} out of bounds for {} rows",
                        range, rows
                    )));
                }
                Ok(data
                    .slice_axis(Axis(0), Slice::from(range.clone()))
                    .to_owned())
            }
            Selection::Points(indices) => {
                let rows = leading_len(data, path)?;
                if let Some(bad) = indices.iter().find(|&&i| i >= rows) {
                    return Err(RasscopeError::read(format!(
                        "Point {} out of bounds for {} rows",
                        bad, rows
                    )));
                }
                Ok(data.select(Axis(0), indices))
            }
        }
    }
}

fn leading_len(data: &ArrayD<Scalar>, path: &str) -> Result<usize> {
    data.shape()
        .first()
        .copied()
        .ok_or_else(|| RasscopeError::read(format!("Cannot slice scalar dataset {}", path)))
}

fn parent_path(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}

fn zero_value(dtype: &DataType) -> Scalar {
    match dtype {
        DataType::Bool => Scalar::Bool(false),
        DataType::Int { .. } | DataType::UInt { .. } => Scalar::Int(0),
        DataType::Float { .. } => Scalar::Float(0.0),
        _ => Scalar::Text(String::new()),
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum SnapshotNode {
    Group {
        #[serde(default)]
        name: String,
        #[serde(default)]
        attributes: Attributes,
        #[serde(default)]
        children: Vec<SnapshotNode>,
        #[serde(default)]
        unreadable: bool,
    },
    Dataset {
        name: String,
        dtype: String,
        #[serde(default)]
        shape: Vec<usize>,
        #[serde(default)]
        data: Vec<Scalar>,
        #[serde(default)]
        attributes: Attributes,
        #[serde(default)]
        unreadable: bool,
    },
}
