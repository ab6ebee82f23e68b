//! Error types for structure decoding and rendering.

use thiserror::Error;

/// Result type alias using StructureError.
pub type Result<T> = std::result::Result<T, StructureError>;

/// Coarse error category exposed across the crate boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing data, empty buffer, unknown format.
    Parse,
    /// Texture atlas or resource pack problems.
    Atlas,
    /// Shape registry payload problems.
    Registry,
    /// Underlying I/O or encoding failure.
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Parse => "PARSE_ERROR",
            ErrorKind::Atlas => "ATLAS_ERROR",
            ErrorKind::Registry => "REGISTRY_ERROR",
            ErrorKind::Io => "IO_ERROR",
        }
    }
}

/// Main error type for structure operations.
#[derive(Error, Debug)]
pub enum StructureError {
    /// Malformed structure data or a missing required field.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The declared format tag is not one of the supported formats.
    #[error("Unknown structure format: {0}")]
    UnknownFormat(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse JSON data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read or process an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Failed to read a ZIP archive.
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Invalid resource pack structure.
    #[error("Invalid resource pack: {0}")]
    InvalidResourcePack(String),

    /// Failed to build texture atlas.
    #[error("Atlas building error: {0}")]
    AtlasBuild(String),

    /// Shape registry payload is inconsistent.
    #[error("Shape registry error: {0}")]
    Registry(String),
}

impl StructureError {
    /// Shorthand for a parse error about a missing required field.
    pub fn missing_field(field: &str) -> Self {
        StructureError::Parse(format!("missing required field '{}'", field))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StructureError::Parse(_) | StructureError::UnknownFormat(_) => ErrorKind::Parse,
            StructureError::Image(_)
            | StructureError::Zip(_)
            | StructureError::InvalidResourcePack(_)
            | StructureError::AtlasBuild(_) => ErrorKind::Atlas,
            StructureError::Registry(_) => ErrorKind::Registry,
            StructureError::Io(_) | StructureError::Json(_) => ErrorKind::Io,
        }
    }
}
