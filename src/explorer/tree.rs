//! Depth-limited structure tree.

use crate::data::{join_path, path_name, read_attributes, Container, ContainerNode, NodeKind};
use crate::error::{RasscopeError, Result};
use serde::Serialize;
use tracing::{debug, warn};

/// Nested structure of a container plus node totals.
#[derive(Debug, Clone, Serialize)]
pub struct StructureReport {
    /// Root group.
    pub root: ContainerNode,
    /// Groups recorded in `root`, the root itself included.
    pub total_groups: usize,
    /// Datasets recorded in `root`.
    pub total_datasets: usize,
    /// First traversal failure; the tree holds everything recorded before it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build the nested tree of `container`, expanding groups down to `max_depth`.
///
/// The root is depth 0. A group at `max_depth` is recorded with its
/// attributes but its members are not listed. Attribute failures are
/// recorded on the node; any other failure stops the traversal and the
/// partial tree is returned with the error set.
pub fn explore<C: Container + ?Sized>(container: &C, max_depth: usize) -> StructureReport {
    let mut builder = TreeBuilder {
        container,
        max_depth,
        groups: 1,
        datasets: 0,
        error: None,
    };

    let mut root = ContainerNode::group("/", "/", read_attributes(container, "/"));
    builder.expand(&mut root, 0);

    debug!(
        "Explored {} groups and {} datasets (max depth {})",
        builder.groups, builder.datasets, max_depth
    );

    StructureReport {
        root,
        total_groups: builder.groups,
        total_datasets: builder.datasets,
        error: builder.error.map(|e| e.to_string()),
    }
}

struct TreeBuilder<'a, C: ?Sized> {
    container: &'a C,
    max_depth: usize,
    groups: usize,
    datasets: usize,
    error: Option<RasscopeError>,
}

impl<C: Container + ?Sized> TreeBuilder<'_, C> {
    /// List the members of `node`, stopping at the first failure.
    fn expand(&mut self, node: &mut ContainerNode, depth: usize) {
        if depth >= self.max_depth {
            return;
        }

        let names = match self.container.children(&node.path) {
            Ok(names) => names,
            Err(e) => return self.fail(e),
        };

        for name in names {
            let path = join_path(&node.path, &name);
            match self.record(&path, depth + 1) {
                Ok(child) => node.add_child(child),
                Err(e) => return self.fail(e),
            }
            if self.error.is_some() {
                return;
            }
        }
    }

    /// Build the node at `path`. A group comes back partially filled when
    /// its own traversal failed.
    fn record(&mut self, path: &str, depth: usize) -> Result<ContainerNode> {
        let name = path_name(path);
        match self.container.kind(path)? {
            NodeKind::Group => {
                let mut group =
                    ContainerNode::group(name, path, read_attributes(self.container, path));
                self.groups += 1;
                self.expand(&mut group, depth);
                Ok(group)
            }
            NodeKind::Dataset => {
                let shape = self.container.shape(path)?;
                let dtype = self.container.dtype(path)?;
                let node = ContainerNode::dataset(
                    name,
                    path,
                    read_attributes(self.container, path),
                    shape,
                    dtype,
                )?;
                self.datasets += 1;
                Ok(node)
            }
        }
    }

    fn fail(&mut self, error: RasscopeError) {
        warn!("Structure traversal stopped early: {}", error);
        self.error.get_or_insert(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataType, MemoryContainer, UNREADABLE_ATTRIBUTES};

    fn sample() -> MemoryContainer {
        let mut c = MemoryContainer::new();
        c.set_attribute("/", "File Type", "HEC-RAS Results").unwrap();
        c.insert_array(
            "/Geometry/2D Flow Areas/Area1/Cells Center Coordinate",
            DataType::Float { bytes: 8 },
            &[3, 2],
            vec![0.0, 0.0, 1.0, 0.0, 1.0, 1.0],
        )
        .unwrap();
        c.insert_array(
            "/Results/Depth",
            DataType::Float { bytes: 4 },
            &[4],
            vec![0.5f32, 1.0, 1.5, 2.0],
        )
        .unwrap();
        c
    }

    #[test]
    fn totals_match_recorded_nodes() {
        let report = explore(&sample(), 10);
        assert!(report.error.is_none());
        assert_eq!(report.total_groups, 5);
        assert_eq!(report.total_datasets, 2);
        assert_eq!(report.root.count_kinds(), (5, 2));
        assert!(report
            .root
            .find("/Geometry/2D Flow Areas/Area1/Cells Center Coordinate")
            .is_some());
    }

    #[test]
    fn group_at_max_depth_is_not_expanded() {
        let report = explore(&sample(), 1);
        let geometry = report.root.find("/Geometry").unwrap();
        assert!(geometry.is_group());
        assert!(geometry.children().is_empty());
        assert_eq!(report.total_groups, 3);
        assert_eq!(report.total_datasets, 0);
        assert_eq!(report.root.count_kinds(), (3, 0));
    }

    #[test]
    fn depth_zero_records_only_the_root() {
        let report = explore(&sample(), 0);
        assert!(report.root.children().is_empty());
        assert_eq!((report.total_groups, report.total_datasets), (1, 0));
        assert!(report.root.attributes.contains_key("File Type"));
    }

    #[test]
    fn exploring_twice_gives_the_same_tree() {
        let c = sample();
        let first = serde_json::to_value(explore(&c, 10)).unwrap();
        let second = serde_json::to_value(explore(&c, 10)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unreadable_group_keeps_partial_tree() {
        let mut c = sample();
        c.mark_unreadable("/Results").unwrap();

        let report = explore(&c, 10);
        assert!(report.error.is_some());
        assert!(report.root.find("/Geometry/2D Flow Areas/Area1").is_some());
        let results = report.root.find("/Results").unwrap();
        assert!(results.children().is_empty());
        assert_eq!(report.root.count_kinds(), (report.total_groups, report.total_datasets));
    }

    #[test]
    fn unreadable_dataset_values_do_not_stop_the_tree() {
        let mut c = sample();
        c.mark_unreadable("/Results/Depth").unwrap();

        let report = explore(&c, 10);
        assert!(report.error.is_none());
        let depth = report.root.find("/Results/Depth").unwrap();
        assert!(depth.is_dataset());
        assert!(!depth.attributes.contains_key(UNREADABLE_ATTRIBUTES));
    }
}
