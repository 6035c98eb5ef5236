//! Data reading and representation.
//!
//! This module defines the container capability trait, its backends, and the
//! plain data structures built from a container: tree nodes, dataset
//! descriptors and values.

mod container;
mod dataset;
mod dtype;
#[cfg(feature = "hdf5")]
mod h5file;
mod memory;
mod node;
mod reader;
mod value;

pub use container::{
    element_count, join_path, normalize_path, path_name, Container, NodeKind, Selection,
};
pub use dataset::{read_attributes, DatasetDescriptor, UNREADABLE_ATTRIBUTES};
pub use dtype::DataType;
#[cfg(feature = "hdf5")]
pub use h5file::Hdf5Container;
pub use memory::MemoryContainer;
pub use node::{ContainerNode, NodeDetail};
pub use reader::ContainerReader;
pub use value::{AttrValue, Attributes, Scalar};
