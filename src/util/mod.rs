//! Utility functions.
//!
//! This module provides the plain-text renderers used by the command line.

mod format;

pub use format::{format_bytes, format_number, format_shape, render_dataset_table, render_tree};
