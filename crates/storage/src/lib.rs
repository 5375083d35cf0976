//! Artifact Storage
//!
//! Persists a single serialized model as a versioned binary envelope.
//! Writes go to a sibling temporary file that is renamed over the target,
//! so readers never see a half-written artifact.

mod artifact;

pub use artifact::{ArtifactInfo, ArtifactStore, FORMAT_VERSION, MAGIC};

use thiserror::Error;

/// Artifact errors
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {0}")]
    NotFound(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt artifact {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("Artifact {path} has format version {found}, expected {expected}")]
    IncompatibleVersion {
        path: String,
        found: u16,
        expected: u16,
    },

    #[error("Artifact {path} holds a '{found}', expected a '{expected}'")]
    KindMismatch {
        path: String,
        found: String,
        expected: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}
