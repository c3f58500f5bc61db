//! Error types for voxport.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`ExportError`].
pub type Result<T> = std::result::Result<T, ExportError>;

/// Errors that can occur while building, writing or reading exported meshes.
#[derive(Error, Debug)]
pub enum ExportError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error saving an export to file.
    #[error("failed to save mesh to {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error loading a mesh or voxel file.
    #[error("failed to load {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// An allocation for the scratch buffer or the record pool failed.
    #[error("out of memory while growing {what} by {requested} elements")]
    OutOfMemory {
        /// Which buffer failed to grow.
        what: &'static str,
        /// Number of elements requested.
        requested: usize,
    },

    /// The quad generator reported more quads than the scratch buffer holds.
    #[error("quad generator reported {quads} quads but the buffer holds {capacity}")]
    MalformedInput {
        /// Number of quads reported by the generator.
        quads: usize,
        /// Number of quads the buffer can hold.
        capacity: usize,
    },

    /// A parsed face references an element that does not exist.
    #[error("face {face} references index {index} but only {count} elements exist")]
    InvalidIndex {
        /// The face index (0-based, in file order).
        face: usize,
        /// The offending 0-based index.
        index: usize,
        /// Number of elements available.
        count: usize,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Export options could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ExportError {
    /// Create an out-of-memory error for the named buffer.
    pub fn out_of_memory(what: &'static str, requested: usize) -> Self {
        ExportError::OutOfMemory { what, requested }
    }

    /// Create a load error for `path` with the given message.
    pub fn load<P: Into<PathBuf>, M: std::fmt::Display>(path: P, message: M) -> Self {
        ExportError::LoadError {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_cause() {
        let err = ExportError::MalformedInput { quads: 10, capacity: 4 };
        assert_eq!(
            err.to_string(),
            "quad generator reported 10 quads but the buffer holds 4"
        );

        let err = ExportError::load("voxels.txt", "line 3: bad color");
        assert_eq!(err.to_string(), "failed to load voxels.txt: line 3: bad color");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ExportError = io.into();
        assert!(matches!(err, ExportError::Io(_)));
    }
}
