//! Domain path patterns.
//!
//! A pattern names a kind of data (`geometry` / `mesh_nodes`) and lists
//! candidate locations for it. Candidates may contain one `*` segment that
//! ranges over the children of a group, such as the flow areas of a HEC-RAS
//! model.

mod hecras;
mod resolver;
mod template;

pub use hecras::{file_metadata, hecras_patterns, FileMetadata};
pub use resolver::{resolve, ExtractionPattern, ExtractionReport, MatchStatus, PatternMatch};
pub use template::{PathTemplate, Segment};
