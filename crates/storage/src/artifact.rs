//! Artifact Envelope

use crate::ArtifactError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Leading bytes of every artifact
pub const MAGIC: [u8; 4] = *b"TSPA";

/// Current envelope format version
pub const FORMAT_VERSION: u16 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope {
    magic: [u8; 4],
    kind: String,
    format_version: u16,
    created_at: DateTime<Utc>,
    payload: Vec<u8>,
}

/// Header of a stored artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactInfo {
    pub kind: String,
    pub format_version: u16,
    pub created_at: DateTime<Utc>,
    pub payload_bytes: usize,
}

/// A single artifact file at a fixed path
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    /// Create a store for `path`; nothing is touched on disk
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Artifact path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }

    fn io_error(&self, source: std::io::Error) -> ArtifactError {
        ArtifactError::Io {
            path: self.display(),
            source,
        }
    }

    /// Whether an artifact file exists
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Serialize `value` under `kind` and atomically replace the artifact
    pub fn save<T: Serialize>(&self, kind: &str, value: &T) -> Result<ArtifactInfo, ArtifactError> {
        let payload =
            postcard::to_allocvec(value).map_err(|e| ArtifactError::Serialization(e.to_string()))?;
        let envelope = Envelope {
            magic: MAGIC,
            kind: kind.to_string(),
            format_version: FORMAT_VERSION,
            created_at: Utc::now(),
            payload,
        };
        let bytes =
            postcard::to_allocvec(&envelope).map_err(|e| ArtifactError::Serialization(e.to_string()))?;

        let parent = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
                parent
            }
            None => Path::new("."),
        };

        // Each save gets its own temp file so concurrent writers never share one.
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| self.io_error(e))?;
        tmp.write_all(&bytes)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;

        info!(path = %self.display(), kind, bytes = bytes.len(), "Saved artifact");
        Ok(ArtifactInfo {
            kind: envelope.kind,
            format_version: envelope.format_version,
            created_at: envelope.created_at,
            payload_bytes: envelope.payload.len(),
        })
    }

    fn read_envelope(&self) -> Result<Envelope, ArtifactError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ArtifactError::NotFound(self.display()))
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if !bytes.starts_with(&MAGIC) {
            return Err(ArtifactError::Corrupt {
                path: self.display(),
                message: "bad magic bytes".to_string(),
            });
        }
        let envelope: Envelope = postcard::from_bytes(&bytes).map_err(|e| ArtifactError::Corrupt {
            path: self.display(),
            message: e.to_string(),
        })?;

        if envelope.format_version != FORMAT_VERSION {
            return Err(ArtifactError::IncompatibleVersion {
                path: self.display(),
                found: envelope.format_version,
                expected: FORMAT_VERSION,
            });
        }
        Ok(envelope)
    }

    /// Read the artifact header without decoding the payload
    pub fn info(&self) -> Result<ArtifactInfo, ArtifactError> {
        let envelope = self.read_envelope()?;
        Ok(ArtifactInfo {
            kind: envelope.kind,
            format_version: envelope.format_version,
            created_at: envelope.created_at,
            payload_bytes: envelope.payload.len(),
        })
    }

    /// Load and decode an artifact stored under `kind`
    pub fn load<T: DeserializeOwned>(&self, kind: &str) -> Result<T, ArtifactError> {
        let envelope = self.read_envelope()?;
        if envelope.kind != kind {
            return Err(ArtifactError::KindMismatch {
                path: self.display(),
                found: envelope.kind,
                expected: kind.to_string(),
            });
        }

        let value = postcard::from_bytes(&envelope.payload).map_err(|e| ArtifactError::Corrupt {
            path: self.display(),
            message: e.to_string(),
        })?;
        debug!(path = %self.display(), kind, created_at = %envelope.created_at, "Loaded artifact");
        Ok(value)
    }
}
