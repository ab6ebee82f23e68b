//! Mesh export formats.

pub mod raw;

pub use raw::{export_raw, RawMeshData};
