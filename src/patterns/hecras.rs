//! Default HEC-RAS pattern table and root metadata.

use super::ExtractionPattern;
use crate::data::{read_attributes, Container};
use crate::error::Result;
use serde::Serialize;

const UNSTEADY_2D: &str =
    "/Results/Unsteady/Output/Output Blocks/Base Output/Unsteady Time Series/2D Flow Areas/*";

/// Extraction patterns for HEC-RAS plan and geometry files.
///
/// Each data type lists the per-flow-area location first and the flat
/// legacy location second.
pub fn hecras_patterns() -> Result<Vec<ExtractionPattern>> {
    let wse = format!("{}/Water Surface", UNSTEADY_2D);
    let velocity = format!("{}/Velocity", UNSTEADY_2D);
    let depth = format!("{}/Depth", UNSTEADY_2D);

    Ok(vec![
        ExtractionPattern::new(
            "geometry",
            "mesh_nodes",
            &["/Geometry/2D Flow Areas/*/Cells Center Coordinate", "/Geometry/2DMesh/Nodes"],
        )?,
        ExtractionPattern::new(
            "geometry",
            "mesh_elements",
            &["/Geometry/2D Flow Areas/*/Cells FacePoint Indexes", "/Geometry/2DMesh/Elements"],
        )?,
        ExtractionPattern::new(
            "geometry",
            "terrain",
            &["/Geometry/2D Flow Areas/*/Terrain", "/Geometry/2DTerrain/Elevation"],
        )?,
        ExtractionPattern::new("results", "max_wse", &[wse.as_str(), "/Results/2D/MaxWSE"])?,
        ExtractionPattern::new(
            "results",
            "max_velocity",
            &[velocity.as_str(), "/Results/2D/MaxVelocity"],
        )?,
        ExtractionPattern::new("results", "max_depth", &[depth.as_str(), "/Results/2D/MaxDepth"])?,
    ])
}

/// Descriptive root attributes of a HEC-RAS file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    /// `File Type` attribute.
    pub file_type: String,
    /// `Version` attribute.
    pub version: String,
    /// `Created` attribute.
    pub created: String,
}

/// Read [`FileMetadata`] from the root attributes, using `Unknown` for
/// anything missing.
pub fn file_metadata<C: Container + ?Sized>(container: &C) -> FileMetadata {
    let attributes = read_attributes(container, "/");
    let get = |key: &str| {
        attributes
            .get(key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "Unknown".to_string())
    };
    FileMetadata {
        file_type: get("File Type"),
        version: get("Version"),
        created: get("Created"),
    }
}
