//! Rasscope - structure, pattern and sample extraction for HEC-RAS HDF5 files.
//!
//! Rasscope answers three questions about a hierarchical container file:
//! what is in it, which datasets look like model geometry or results, and
//! what a bounded preview of one array looks like.
//!
//! # Features
//!
//! - Depth-limited structure trees and flat dataset listings
//! - HEC-RAS path patterns with wildcard flow-area segments
//! - Keyword classification into mesh and result roles
//! - Bounded samples and table previews of large arrays
//! - JSON snapshots as an in-memory container for fixtures
//!
//! # Example
//!
//! ```ignore
//! use rasscope::data::ContainerReader;
//! use rasscope::explorer::explore;
//! use std::path::Path;
//!
//! let container = ContainerReader::open(Path::new("Muncie.p04.hdf"))?;
//! let report = explore(container.as_ref(), 10);
//! println!("{} groups, {} datasets", report.total_groups, report.total_datasets);
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod classify;
pub mod config;
pub mod data;
pub mod error;
pub mod explorer;
pub mod patterns;
pub mod sampling;
pub mod util;

pub use error::{RasscopeError, Result};
