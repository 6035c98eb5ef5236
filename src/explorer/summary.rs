//! File-level summary and the combined analysis report.

use super::inventory::list_datasets;
use super::traverse::count_nodes;
use crate::classify::{classify, Classification};
use crate::config::ScopeConfig;
use crate::data::{Container, ContainerReader, DatasetDescriptor};
use crate::error::{RasscopeError, Result};
use crate::patterns::{file_metadata, hecras_patterns, resolve, ExtractionReport, FileMetadata};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Basic facts about a container file.
#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    /// File name without directories.
    pub name: String,
    /// Path as given.
    pub path: String,
    /// File size in mebibytes.
    pub size_mb: f64,
    /// Last modification time, when the platform reports one.
    pub modified: Option<DateTime<Utc>>,
    /// Whether the file opened as a container and could be walked.
    pub accessible: bool,
    /// Groups in the file, root included.
    pub groups_count: usize,
    /// Datasets in the file.
    pub datasets_count: usize,
    /// Why the file is not accessible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Summarize the file at `path`.
///
/// Fails only when the file itself cannot be stat'ed; open and traversal
/// failures are reported through `accessible` and `error`.
pub fn summarize_file(path: &Path) -> Result<FileSummary> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RasscopeError::not_found(path.display().to_string()),
        _ => RasscopeError::file_open(path.to_path_buf(), e),
    })?;

    let mut summary = FileSummary {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        path: path.display().to_string(),
        size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
        modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        accessible: true,
        groups_count: 0,
        datasets_count: 0,
        error: None,
    };

    let counted = ContainerReader::open(path).and_then(|c| match count_nodes(c.as_ref()) {
        (counts, None) => Ok(counts),
        (_, Some(e)) => Err(e),
    });
    match counted {
        Ok(counts) => {
            summary.groups_count = counts.groups;
            summary.datasets_count = counts.datasets;
        }
        Err(e) => {
            warn!("{} is not accessible: {}", path.display(), e);
            summary.accessible = false;
            summary.error = Some(e.to_string());
        }
    }
    Ok(summary)
}

/// Everything rasscope knows how to say about one container.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Groups in the container, root included. Partial when `error` is set.
    pub total_groups: usize,
    /// Datasets in the container. Partial when `error` is set.
    pub total_datasets: usize,
    /// Sum of all dataset sizes in bytes.
    pub total_bytes: u64,
    /// Root attributes.
    pub metadata: FileMetadata,
    /// Largest datasets, largest first.
    pub top_datasets: Vec<DatasetDescriptor>,
    /// HEC-RAS pattern matches.
    pub extraction: ExtractionReport,
    /// Keyword roles.
    pub classification: Classification,
    /// First traversal failure met while counting or listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run every query against `container` with the HEC-RAS pattern table.
pub fn analyze<C: Container + ?Sized>(
    container: &C,
    config: &ScopeConfig,
) -> Result<AnalysisReport> {
    let (counts, count_error) = count_nodes(container);
    if let Some(ref e) = count_error {
        warn!(
            "Counting stopped early at {} groups, {} datasets: {}",
            counts.groups, counts.datasets, e
        );
    }
    let inventory = list_datasets(container);
    let extraction = resolve(container, &hecras_patterns()?, config.max_samples);
    let classification = classify(container);

    info!(
        "Analysis: {} groups, {} datasets, {} patterns found",
        counts.groups,
        counts.datasets,
        extraction.found_count()
    );

    Ok(AnalysisReport {
        total_groups: counts.groups,
        total_datasets: counts.datasets,
        total_bytes: inventory.total_bytes(),
        metadata: file_metadata(container),
        top_datasets: inventory.top(config.top_datasets).to_vec(),
        extraction,
        classification,
        error: count_error.map(|e| e.to_string()).or(inventory.error),
    })
}
