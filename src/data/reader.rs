//! Container file reader.

use super::{Container, MemoryContainer};
use crate::error::{RasscopeError, Result};
use std::path::Path;
use tracing::debug;

/// Opens container files, choosing a backend by file extension.
#[derive(Debug)]
pub struct ContainerReader;

impl ContainerReader {
    /// Open a container file.
    ///
    /// `.json` files are loaded as in-memory snapshots; everything else goes
    /// to the HDF5 backend.
    pub fn open(path: &Path) -> Result<Box<dyn Container>> {
        if !path.exists() {
            return Err(RasscopeError::not_found(path.display().to_string()));
        }

        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        debug!("Opening {} (extension '{}')", path.display(), extension);

        match extension.as_str() {
            "json" => Ok(Box::new(MemoryContainer::from_snapshot_file(path)?)),
            _ => Self::open_hdf5(path, &extension),
        }
    }

    #[cfg(feature = "hdf5")]
    fn open_hdf5(path: &Path, _extension: &str) -> Result<Box<dyn Container>> {
        Ok(Box::new(super::Hdf5Container::open(path)?))
    }

    #[cfg(not(feature = "hdf5"))]
    fn open_hdf5(_path: &Path, extension: &str) -> Result<Box<dyn Container>> {
        Err(RasscopeError::unsupported_format(format!(
            "{} (built without the `hdf5` feature)",
            if extension.is_empty() { "<none>" } else { extension }
        )))
    }
}
