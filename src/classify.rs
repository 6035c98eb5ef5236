//! Keyword classification of datasets into mesh and result roles.

use crate::data::{Container, NodeKind, UNREADABLE_ATTRIBUTES};
use crate::explorer::walk;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Role a dataset plays in a hydraulic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Node or cell coordinates.
    Coordinates,
    /// Element-to-node connectivity.
    Connectivity,
    /// Element identifiers.
    Elements,
    /// Node identifiers.
    Nodes,
    /// Scalar fields (depth, elevation, ...).
    ScalarResults,
    /// Vector fields (velocity, flow, ...).
    VectorResults,
    /// Time-major series.
    TimeSeries,
    /// Aggregates (min, max, mean, ...).
    Statistics,
}

impl Role {
    /// All roles in declaration order.
    pub const ALL: [Role; 8] = [
        Role::Coordinates,
        Role::Connectivity,
        Role::Elements,
        Role::Nodes,
        Role::ScalarResults,
        Role::VectorResults,
        Role::TimeSeries,
        Role::Statistics,
    ];

    /// Snake-case role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Coordinates => "coordinates",
            Role::Connectivity => "connectivity",
            Role::Elements => "elements",
            Role::Nodes => "nodes",
            Role::ScalarResults => "scalar_results",
            Role::VectorResults => "vector_results",
            Role::TimeSeries => "time_series",
            Role::Statistics => "statistics",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type KeywordTable = [(Role, &'static [&'static str])];

// Within a table the first role that matches wins.
const MESH_ROLES: &KeywordTable = &[
    (
        Role::Coordinates,
        &["coordinate", "coord", "x_coord", "y_coord", "z_coord", "node_coord", "vertex", "point"],
    ),
    (
        Role::Connectivity,
        &["connect", "element", "cell", "triangle", "quad", "face_node", "element_node"],
    ),
    (Role::Elements, &["element_id", "cell_id", "face_id"]),
    (Role::Nodes, &["node_id", "vertex_id", "point_id"]),
];

const RESULT_ROLES: &KeywordTable = &[
    (
        Role::ScalarResults,
        &["depth", "elevation", "wse", "pressure", "temperature", "concentration", "scalar"],
    ),
    (Role::VectorResults, &["velocity", "flow", "discharge", "vector", "gradient"]),
    (Role::TimeSeries, &["time", "step", "iteration", "temporal"]),
    (Role::Statistics, &["min", "max", "mean", "std", "average", "statistics"]),
];

/// Dataset paths grouped by role.
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// Every role, each with the matching dataset paths in traversal order.
    pub roles: BTreeMap<Role, Vec<String>>,
    /// Traversal failure, if classification stopped early. A dataset whose
    /// shape cannot be read keeps its keyword roles and does not set this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Classification {
    fn empty() -> Self {
        Self {
            roles: Role::ALL.iter().map(|r| (*r, Vec::new())).collect(),
            error: None,
        }
    }

    /// Paths tagged with `role`.
    pub fn paths(&self, role: Role) -> &[String] {
        self.roles.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Tag every dataset with at most one mesh role and at most one result role.
///
/// Keywords are matched case-insensitively against the full path, then
/// against the attribute values. A dataset with no result keyword but more
/// rows than columns is taken as a time series.
pub fn classify<C: Container + ?Sized>(container: &C) -> Classification {
    let mut classification = Classification::empty();

    let outcome = walk(container, &mut |path, kind| {
        if kind != NodeKind::Dataset {
            return Ok(());
        }
        let texts = [path.to_lowercase(), attribute_text(container, path)];

        if let Some(role) = match_table(MESH_ROLES, &texts) {
            classification.roles.entry(role).or_default().push(path.to_string());
        }

        let result_role = match match_table(RESULT_ROLES, &texts) {
            Some(role) => Some(role),
            None => match container.shape(path) {
                Ok(shape) => (shape.len() >= 2 && shape[0] > shape[1]).then_some(Role::TimeSeries),
                Err(e) => {
                    warn!("No shape for {}, keeping keyword roles only: {}", path, e);
                    None
                }
            },
        };
        if let Some(role) = result_role {
            classification.roles.entry(role).or_default().push(path.to_string());
        }
        Ok(())
    });

    if let Err(e) = outcome {
        warn!("Classification stopped early: {}", e);
        classification.error = Some(e.to_string());
    }
    debug!(
        "Classified datasets: {}",
        classification
            .roles
            .iter()
            .map(|(role, paths)| format!("{}={}", role, paths.len()))
            .collect::<Vec<_>>()
            .join(", ")
    );
    classification
}

fn match_table(table: &KeywordTable, texts: &[String]) -> Option<Role> {
    texts.iter().find_map(|text| {
        table
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
            .map(|(role, _)| *role)
    })
}

/// Lowercased attribute values joined by spaces; empty when unreadable.
fn attribute_text<C: Container + ?Sized>(container: &C, path: &str) -> String {
    match container.attributes(path) {
        Ok(attributes) => attributes
            .iter()
            .filter(|(key, _)| key.as_str() != UNREADABLE_ATTRIBUTES)
            .map(|(_, value)| value.to_string().to_lowercase())
            .collect::<Vec<_>>()
            .join(" "),
        Err(e) => {
            debug!("Skipping attributes of {}: {}", path, e);
            String::new()
        }
    }
}
