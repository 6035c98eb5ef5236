//! Materialized container tree nodes.

use super::container::element_count;
use super::{Attributes, DataType, NodeKind};
use crate::error::Result;
use serde::Serialize;

/// Kind-specific part of a [`ContainerNode`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum NodeDetail {
    /// Group node with its (possibly unexpanded) children.
    Group {
        /// Child nodes, in container order.
        children: Vec<ContainerNode>,
    },
    /// Dataset node with its array metadata.
    Dataset {
        /// Dimension sizes.
        shape: Vec<usize>,
        /// Element type tag.
        dtype: DataType,
        /// Product of `shape`.
        element_count: usize,
    },
}

/// A node in the materialized container hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContainerNode {
    /// Last path segment (`/` for the root).
    pub name: String,
    /// Full slash-delimited path.
    pub path: String,
    /// Attributes attached to this node.
    pub attributes: Attributes,
    /// Group or dataset specifics.
    #[serde(flatten)]
    pub detail: NodeDetail,
}

impl ContainerNode {
    /// Create a group node without children.
    pub fn group(name: impl Into<String>, path: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            attributes,
            detail: NodeDetail::Group {
                children: Vec::new(),
            },
        }
    }

    /// Create a dataset node. Fails when the shape overflows.
    pub fn dataset(
        name: impl Into<String>,
        path: impl Into<String>,
        attributes: Attributes,
        shape: Vec<usize>,
        dtype: DataType,
    ) -> Result<Self> {
        let element_count = element_count(&shape)?;
        Ok(Self {
            name: name.into(),
            path: path.into(),
            attributes,
            detail: NodeDetail::Dataset {
                shape,
                dtype,
                element_count,
            },
        })
    }

    /// Node kind tag.
    pub fn kind(&self) -> NodeKind {
        match self.detail {
            NodeDetail::Group { .. } => NodeKind::Group,
            NodeDetail::Dataset { .. } => NodeKind::Dataset,
        }
    }

    /// Check if this node is a group.
    pub fn is_group(&self) -> bool {
        self.kind() == NodeKind::Group
    }

    /// Check if this node is a dataset.
    pub fn is_dataset(&self) -> bool {
        self.kind() == NodeKind::Dataset
    }

    /// Child nodes; always empty for datasets.
    pub fn children(&self) -> &[ContainerNode] {
        match &self.detail {
            NodeDetail::Group { children } => children,
            NodeDetail::Dataset { .. } => &[],
        }
    }

    /// Dataset shape, if this is a dataset.
    pub fn shape(&self) -> Option<&[usize]> {
        match &self.detail {
            NodeDetail::Dataset { shape, .. } => Some(shape),
            NodeDetail::Group { .. } => None,
        }
    }

    /// Add a child node. Ignored for datasets.
    pub fn add_child(&mut self, child: ContainerNode) {
        if let NodeDetail::Group { children } = &mut self.detail {
            children.push(child);
        }
    }

    /// Count groups and datasets in this subtree, this node included.
    pub fn count_kinds(&self) -> (usize, usize) {
        let (mut groups, mut datasets) = match self.kind() {
            NodeKind::Group => (1, 0),
            NodeKind::Dataset => (0, 1),
        };
        for child in self.children() {
            let (g, d) = child.count_kinds();
            groups += g;
            datasets += d;
        }
        (groups, datasets)
    }

    /// Find a descendant (or this node) by full path.
    pub fn find(&self, path: &str) -> Option<&ContainerNode> {
        if self.path == path {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(path))
    }

    /// One-line label with an icon and array summary.
    pub fn display_name(&self) -> String {
        match &self.detail {
            NodeDetail::Group { children } => {
                format!("📂 {} ({})", self.name, children.len())
            }
            NodeDetail::Dataset { shape, dtype, .. } => {
                let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
                if shape.is_empty() {
                    format!("📊 {} scalar {}", self.name, dtype)
                } else {
                    let rank = shape.len();
                    format!("📊 {} ({}) [{}D] {}", self.name, dims.join(" x "), rank, dtype)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_has_no_children_and_counts_elements() {
        let mut node =
            ContainerNode::dataset("Depth", "/Depth", Attributes::new(), vec![3, 0], DataType::Bool)
                .unwrap();
        node.add_child(ContainerNode::group("x", "/x", Attributes::new()));

        assert!(node.children().is_empty());
        match node.detail {
            NodeDetail::Dataset { element_count, .. } => assert_eq!(element_count, 0),
            NodeDetail::Group { .. } => panic!("expected dataset"),
        }
    }

    #[test]
    fn serializes_with_kind_tag() {
        let mut root = ContainerNode::group("/", "/", Attributes::new());
        let float32 = DataType::Float { bytes: 4 };
        let wse = ContainerNode::dataset("WSE", "/WSE", Attributes::new(), vec![2], float32);
        root.add_child(wse.unwrap());
        let json = serde_json::to_value(&root).unwrap();

        assert_eq!(json["kind"], "group");
        assert_eq!(json["children"][0]["kind"], "dataset");
        assert_eq!(json["children"][0]["dtype"], "float32");
        assert_eq!(json["children"][0]["element_count"], 2);
    }

    #[test]
    fn display_names() {
        let float64 = DataType::Float { bytes: 8 };
        let ds = ContainerNode::dataset("WSE", "/WSE", Attributes::new(), vec![10, 4], float64)
            .unwrap();
        assert_eq!(ds.display_name(), "📊 WSE (10 x 4) [2D] float64");
        assert_eq!(ContainerNode::group("/", "/", Attributes::new()).display_name(), "📂 / (0)");
    }
}
