//! HDF5 file backend.

use super::container::normalize_path;
use super::{AttrValue, Attributes, Container, DataType, NodeKind, Scalar, Selection};
use crate::error::{RasscopeError, Result};
use hdf5::types::{FixedAscii, FixedUnicode, TypeDescriptor, VarLenAscii, VarLenUnicode};
use hdf5::{Attribute, Dataset, File, H5Type, Hyperslab, Location, SliceOrIndex};
use ndarray::{Array2, ArrayD, IxDyn};
use std::path::Path;
use tracing::debug;

/// Fixed-length strings are read into buffers of this many bytes.
const FIXED_TEXT_CAPACITY: usize = 256;

type FixedText = FixedAscii<FIXED_TEXT_CAPACITY>;
type FixedUtf8 = FixedUnicode<FIXED_TEXT_CAPACITY>;

/// Read-only HDF5 file.
#[derive(Debug)]
pub struct Hdf5Container {
    file: File,
}

impl Hdf5Container {
    /// Open an HDF5 file read-only.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| RasscopeError::NotAContainer {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!("Opened HDF5 file {}", path.display());
        Ok(Self { file })
    }

    fn open_dataset(&self, path: &str) -> Result<Dataset> {
        match self.kind(path)? {
            NodeKind::Dataset => Ok(self.file.dataset(path)?),
            NodeKind::Group => Err(RasscopeError::type_mismatch(path, NodeKind::Dataset)),
        }
    }

    fn read_location_attributes(location: &Location) -> Result<Attributes> {
        let mut attributes = Attributes::new();
        for name in location.attr_names()? {
            let value = location
                .attr(&name)
                .map_err(RasscopeError::from)
                .and_then(|attr| read_attribute(&attr));
            let value = value.unwrap_or_else(|e| {
                debug!("Attribute {} unreadable: {}", name, e);
                AttrValue::from("<unreadable>")
            });
            attributes.insert(name, value);
        }
        Ok(attributes)
    }
}

impl Container for Hdf5Container {
    fn kind(&self, path: &str) -> Result<NodeKind> {
        let path = normalize_path(path);
        if path == "/" {
            return Ok(NodeKind::Group);
        }
        if !self.exists(&path) {
            return Err(RasscopeError::not_found(path));
        }
        if self.file.group(&path).is_ok() {
            Ok(NodeKind::Group)
        } else if self.file.dataset(&path).is_ok() {
            Ok(NodeKind::Dataset)
        } else {
            Err(RasscopeError::read(format!(
                "Object at {} is neither a group nor a dataset",
                path
            )))
        }
    }

    fn exists(&self, path: &str) -> bool {
        let path = normalize_path(path);
        if path == "/" {
            return true;
        }
        // H5Lexists needs every intermediate link to exist.
        let mut prefix = String::new();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            prefix.push('/');
            prefix.push_str(segment);
            if !self.file.link_exists(&prefix) {
                return false;
            }
        }
        true
    }

    fn children(&self, path: &str) -> Result<Vec<String>> {
        match self.kind(path)? {
            NodeKind::Group => Ok(self.file.group(path)?.member_names()?),
            NodeKind::Dataset => Err(RasscopeError::type_mismatch(path, NodeKind::Group)),
        }
    }

    fn attributes(&self, path: &str) -> Result<Attributes> {
        match self.kind(path)? {
            NodeKind::Group => Self::read_location_attributes(&self.file.group(path)?),
            NodeKind::Dataset => Self::read_location_attributes(&self.file.dataset(path)?),
        }
    }

    fn shape(&self, path: &str) -> Result<Vec<usize>> {
        Ok(self.open_dataset(path)?.shape())
    }

    fn dtype(&self, path: &str) -> Result<DataType> {
        let dataset = self.open_dataset(path)?;
        let dtype = dataset.dtype()?;
        let bytes = dtype.size();
        Ok(match dtype.to_descriptor() {
            Ok(TypeDescriptor::Integer(_)) => DataType::Int { bytes },
            Ok(TypeDescriptor::Unsigned(_)) => DataType::UInt { bytes },
            Ok(TypeDescriptor::Float(_)) => DataType::Float { bytes },
            Ok(TypeDescriptor::Boolean) => DataType::Bool,
            Ok(TypeDescriptor::FixedAscii(_)) | Ok(TypeDescriptor::FixedUnicode(_)) => {
                DataType::FixedString { bytes }
            }
            Ok(TypeDescriptor::VarLenAscii) | Ok(TypeDescriptor::VarLenUnicode) => {
                DataType::VarString
            }
            Ok(TypeDescriptor::Compound(_)) => DataType::Compound { bytes },
            _ => DataType::Opaque { bytes },
        })
    }

    fn read(&self, path: &str, selection: &Selection) -> Result<ArrayD<Scalar>> {
        let dataset = self.open_dataset(path)?;
        let dtype = self.dtype(path)?;

        match dtype {
            DataType::Float { .. } => {
                Ok(read_as::<f64>(&dataset, selection)?.map(|v| Scalar::Float(*v)))
            }
            DataType::Int { .. } => {
                Ok(read_as::<i64>(&dataset, selection)?.map(|v| Scalar::Int(*v)))
            }
            DataType::UInt { .. } => {
                Ok(read_as::<u64>(&dataset, selection)?.map(|v| Scalar::from(*v)))
            }
            DataType::Bool => Ok(read_as::<bool>(&dataset, selection)?.map(|v| Scalar::Bool(*v))),
            DataType::FixedString { .. } => match read_as::<FixedText>(&dataset, selection) {
                Ok(values) => Ok(values.map(|v| Scalar::Text(v.as_str().to_string()))),
                Err(_) => Ok(read_as::<FixedUtf8>(&dataset, selection)?
                    .map(|v| Scalar::Text(v.as_str().to_string()))),
            },
            DataType::VarString => match read_as::<VarLenUnicode>(&dataset, selection) {
                Ok(values) => Ok(values.map(|v| Scalar::Text(v.as_str().to_string()))),
                Err(_) => Ok(read_as::<VarLenAscii>(&dataset, selection)?
                    .map(|v| Scalar::Text(v.as_str().to_string()))),
            },
            DataType::Compound { .. } | DataType::Opaque { .. } => Err(RasscopeError::read(format!(
                "Element type {} of {} cannot be converted to scalars",
                dtype, path
            ))),
        }
    }
}

fn read_as<T: H5Type>(dataset: &Dataset, selection: &Selection) -> Result<ArrayD<T>> {
    let ndim = dataset.ndim();
    match selection {
        Selection::All => Ok(dataset.read_dyn::<T>()?),
        Selection::Rows(range) => {
            if ndim == 0 {
                return Err(RasscopeError::read("Cannot slice a scalar dataset"));
            }
            let mut slab: Vec<SliceOrIndex> = vec![SliceOrIndex::from(range.clone())];
            slab.extend((1..ndim).map(|_| SliceOrIndex::from(..)));
            let selection = hdf5::Selection::from(Hyperslab::from(slab));
            Ok(dataset.read_slice::<T, _, IxDyn>(selection)?)
        }
        Selection::Points(indices) => {
            if ndim != 1 {
                return Err(RasscopeError::read(format!(
                    "Point selection needs a 1-D dataset, got {}-D",
                    ndim
                )));
            }
            if indices.is_empty() {
                return ArrayD::from_shape_vec(IxDyn(&[0]), Vec::new())
                    .map_err(|e| RasscopeError::read(e.to_string()));
            }
            let coords = Array2::from_shape_vec((indices.len(), 1), indices.clone())
                .map_err(|e| RasscopeError::read(e.to_string()))?;
            Ok(dataset.read_slice::<T, _, IxDyn>(hdf5::Selection::Points(coords))?)
        }
    }
}

fn read_attribute(attr: &Attribute) -> Result<AttrValue> {
    let descriptor = attr.dtype()?.to_descriptor()?;
    let values: Vec<Scalar> = match descriptor {
        TypeDescriptor::Integer(_) => {
            attr.read_raw::<i64>()?.into_iter().map(Scalar::Int).collect()
        }
        TypeDescriptor::Unsigned(_) => {
            attr.read_raw::<u64>()?.into_iter().map(Scalar::from).collect()
        }
        TypeDescriptor::Float(_) => {
            attr.read_raw::<f64>()?.into_iter().map(Scalar::Float).collect()
        }
        TypeDescriptor::Boolean => attr.read_raw::<bool>()?.into_iter().map(Scalar::Bool).collect(),
        TypeDescriptor::FixedAscii(_) => {
            text_values(attr.read_raw::<FixedText>()?, |v| v.as_str())
        }
        TypeDescriptor::FixedUnicode(_) => {
            text_values(attr.read_raw::<FixedUtf8>()?, |v| v.as_str())
        }
        TypeDescriptor::VarLenAscii => text_values(attr.read_raw::<VarLenAscii>()?, |v| v.as_str()),
        TypeDescriptor::VarLenUnicode => {
            text_values(attr.read_raw::<VarLenUnicode>()?, |v| v.as_str())
        }
        other => {
            return Err(RasscopeError::read(format!(
                "Unsupported attribute type {:?}",
                other
            )))
        }
    };

    if attr.ndim() == 0 && values.len() == 1 {
        Ok(values.into_iter().next().map(AttrValue::Scalar).unwrap_or(AttrValue::Array(Vec::new())))
    } else {
        Ok(AttrValue::Array(values))
    }
}

fn text_values<T>(raw: Vec<T>, as_str: impl Fn(&T) -> &str) -> Vec<Scalar> {
    raw.iter()
        .map(|v| Scalar::Text(as_str(v).trim_end_matches('\0').to_string()))
        .collect()
}
