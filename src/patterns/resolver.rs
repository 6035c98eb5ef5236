//! Matching extraction patterns against a live container.

use super::PathTemplate;
use crate::data::{Container, DatasetDescriptor, NodeKind};
use crate::error::Result;
use crate::sampling::{sample, SampleSet};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, warn};

/// A named set of candidate paths for one kind of domain data.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionPattern {
    /// Top-level grouping, e.g. `geometry`.
    pub category: String,
    /// Data kind within the category, e.g. `mesh_nodes`.
    pub data_type: String,
    /// Candidates tried in order.
    pub candidates: Vec<PathTemplate>,
}

impl ExtractionPattern {
    /// Build a pattern, parsing every candidate template.
    pub fn new(category: &str, data_type: &str, candidates: &[&str]) -> Result<Self> {
        Ok(Self {
            category: category.to_string(),
            data_type: data_type.to_string(),
            candidates: candidates
                .iter()
                .map(|c| PathTemplate::parse(c))
                .collect::<Result<_>>()?,
        })
    }

    fn summary_key(&self) -> String {
        format!("{}_{}", self.category, self.data_type)
    }
}

/// Whether a pattern produced any match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStatus {
    /// At least one candidate matched.
    Found,
    /// No candidate matched.
    NotFound,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Found => write!(f, "Found"),
            MatchStatus::NotFound => write!(f, "Not Found"),
        }
    }
}

/// A dataset found by a pattern, with a bounded sample.
#[derive(Debug, Clone, Serialize)]
pub struct PatternMatch {
    /// Concrete dataset path.
    pub path: String,
    /// Descriptor, absent when it could not be read.
    pub dataset: Option<DatasetDescriptor>,
    /// Sample of the dataset values.
    pub sample: SampleSet,
    /// Read failure for this one match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a resolver pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtractionReport {
    /// Matches keyed `{category}.{key}`.
    pub matches: BTreeMap<String, PatternMatch>,
    /// Status keyed `{category}_{data_type}`.
    pub summary: BTreeMap<String, MatchStatus>,
}

impl ExtractionReport {
    /// Number of patterns with at least one match.
    pub fn found_count(&self) -> usize {
        self.summary
            .values()
            .filter(|s| **s == MatchStatus::Found)
            .count()
    }
}

/// Resolve every pattern against `container`.
///
/// A literal candidate that exists ends the search for its pattern. A
/// wildcard candidate contributes one match per child of its base group for
/// which the substituted path exists, and the search goes on to the next
/// candidate. Failures reading one matched dataset are recorded on that
/// match only.
pub fn resolve<C: Container + ?Sized>(
    container: &C,
    patterns: &[ExtractionPattern],
    max_samples: usize,
) -> ExtractionReport {
    let mut report = ExtractionReport::default();

    for pattern in patterns {
        let mut found = false;
        let record = |key: String, path: &str, report: &mut ExtractionReport| {
            debug!("Pattern {} matched {}", pattern.summary_key(), path);
            report.matches.insert(
                format!("{}.{}", pattern.category, key),
                read_match(container, path, max_samples),
            );
        };

        for template in &pattern.candidates {
            let Some(base) = template.base_path() else {
                let path = template.substitute("");
                if container.exists(&path) {
                    record(pattern.data_type.clone(), &path, &mut report);
                    found = true;
                    break;
                }
                continue;
            };

            if !matches!(container.kind(&base), Ok(NodeKind::Group)) {
                continue;
            }
            let children = match container.children(&base) {
                Ok(children) => children,
                Err(e) => {
                    warn!("Cannot list {} for pattern {}: {}", base, template, e);
                    continue;
                }
            };
            for child in children {
                let path = template.substitute(&child);
                if container.exists(&path) {
                    record(format!("{}_{}", pattern.data_type, child), &path, &mut report);
                    found = true;
                }
            }
        }

        let status = if found {
            MatchStatus::Found
        } else {
            MatchStatus::NotFound
        };
        report.summary.insert(pattern.summary_key(), status);
    }

    info!(
        "Resolved {} of {} patterns ({} matches)",
        report.found_count(),
        patterns.len(),
        report.matches.len()
    );
    report
}

fn read_match<C: Container + ?Sized>(
    container: &C,
    path: &str,
    max_samples: usize,
) -> PatternMatch {
    match DatasetDescriptor::read(container, path) {
        Ok(dataset) => {
            let sample = sample(container, path, max_samples);
            PatternMatch {
                path: path.to_string(),
                error: sample.error.clone(),
                dataset: Some(dataset),
                sample,
            }
        }
        Err(e) => {
            warn!("Matched path {} is not a readable dataset: {}", path, e);
            PatternMatch {
                path: path.to_string(),
                dataset: None,
                sample: SampleSet::failed(e.to_string()),
                error: Some(e.to_string()),
            }
        }
    }
}
