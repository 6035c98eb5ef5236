//! Flat dataset listing.

use super::traverse::walk;
use crate::data::{Container, DatasetDescriptor, NodeKind};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Every dataset in a container, largest first.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetInventory {
    /// Descriptors ordered by `byte_size`, descending. Equal sizes keep
    /// traversal order.
    pub datasets: Vec<DatasetDescriptor>,
    /// Datasets left out because their shape or type could not be read,
    /// keyed by path.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub unreadable: BTreeMap<String, String>,
    /// Traversal failure, if the listing stopped early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatasetInventory {
    /// The `n` largest datasets.
    pub fn top(&self, n: usize) -> &[DatasetDescriptor] {
        &self.datasets[..n.min(self.datasets.len())]
    }

    /// Sum of all dataset sizes in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.datasets.iter().map(|d| d.byte_size).sum()
    }
}

/// List every dataset reachable from the root, with no depth limit.
pub fn list_datasets<C: Container + ?Sized>(container: &C) -> DatasetInventory {
    let mut datasets = Vec::new();
    let mut unreadable = BTreeMap::new();
    let outcome = walk(container, &mut |path, kind| {
        if kind == NodeKind::Dataset {
            match DatasetDescriptor::read(container, path) {
                Ok(descriptor) => datasets.push(descriptor),
                Err(e) => {
                    warn!("Skipping dataset {}: {}", path, e);
                    unreadable.insert(path.to_string(), e.to_string());
                }
            }
        }
        Ok(())
    });

    let error = outcome.err().map(|e| {
        warn!("Dataset listing stopped early: {}", e);
        e.to_string()
    });

    // sort_by is stable
    datasets.sort_by(|a, b| b.byte_size.cmp(&a.byte_size));
    debug!("Listed {} datasets", datasets.len());

    DatasetInventory {
        datasets,
        unreadable,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataType, MemoryContainer};

    #[test]
    fn largest_first_and_ties_keep_traversal_order() {
        let mut c = MemoryContainer::new();
        c.insert_array("/small", DataType::Int { bytes: 4 }, &[2], vec![1i64, 2])
            .unwrap();
        c.insert_array("/tie_a", DataType::Float { bytes: 8 }, &[2], vec![1.0, 2.0])
            .unwrap();
        c.insert_array("/G/big", DataType::Float { bytes: 8 }, &[3, 2], vec![0.0; 6])
            .unwrap();
        c.insert_array("/tie_b", DataType::Int { bytes: 8 }, &[2], vec![3i64, 4])
            .unwrap();

        let inventory = list_datasets(&c);
        let paths: Vec<&str> = inventory.datasets.iter().map(|d| d.path.as_str()).collect();

        assert!(inventory.error.is_none());
        assert_eq!(paths, vec!["/G/big", "/tie_a", "/tie_b", "/small"]);
        assert_eq!(inventory.total_bytes(), 48 + 16 + 16 + 8);
        assert_eq!(inventory.top(1)[0].path, "/G/big");
        assert_eq!(inventory.top(10).len(), 4);
    }

    #[test]
    fn no_depth_limit() {
        let mut c = MemoryContainer::new();
        c.insert_array("/a/b/c/d/e/f/g/h/i/j/k/l/deep", DataType::Bool, &[1], vec![true])
            .unwrap();

        let inventory = list_datasets(&c);
        assert_eq!(inventory.datasets.len(), 1);
        assert_eq!(inventory.datasets[0].name, "deep");
    }

    #[test]
    fn failure_keeps_earlier_datasets() {
        let mut c = MemoryContainer::new();
        c.insert_array("/A/x", DataType::Bool, &[1], vec![true]).unwrap();
        c.insert_array("/B/y", DataType::Bool, &[1], vec![true]).unwrap();
        c.mark_unreadable("/B").unwrap();

        let inventory = list_datasets(&c);
        assert!(inventory.error.is_some());
        assert_eq!(inventory.datasets.len(), 1);
        assert_eq!(inventory.datasets[0].path, "/A/x");
    }
}
