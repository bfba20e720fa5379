//! Error types shared across the editor core.

use crate::shapes::{ObjectId, ObjectKind};
use thiserror::Error;

/// Scene mutation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("Object not found: {0}")]
    NotFound(ObjectId),
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
    #[error("Object {id} is not a {expected} object")]
    WrongKind { id: ObjectId, expected: ObjectKind },
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;

/// History snapshot errors.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Image import errors, surfaced to the user as a notice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Could not read file: {0}")]
    Io(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Could not decode image: {0}")]
    Decode(String),
}

/// Raster export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Canvas has no drawable area ({width}x{height})")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Encoding failed: {0}")]
    Encode(String),
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Invalid configuration: {0}")]
    Parse(String),
}

/// Errors returned by editor operations.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Scene(#[from] SceneError),
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;
