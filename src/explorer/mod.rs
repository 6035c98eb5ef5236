//! Structure exploration.
//!
//! This module walks a container to build its nested tree, a flat dataset
//! listing, a file summary, and the combined analysis report.

mod inventory;
mod summary;
mod tree;
mod traverse;

pub use inventory::{list_datasets, DatasetInventory};
pub use summary::{analyze, summarize_file, AnalysisReport, FileSummary};
pub use tree::{explore, StructureReport};
pub use traverse::{count_nodes, walk, NodeCounts};
