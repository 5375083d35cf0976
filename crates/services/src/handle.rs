//! Shared Model Handle
//!
//! Holds the published pipeline behind an `Arc`. Readers clone the `Arc`
//! and keep using it even if a retrain publishes a replacement meanwhile.

use model_pipeline::{ModelPipeline, PipelineError};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Process-wide, read-only access to the current model
#[derive(Debug)]
pub struct ModelHandle {
    artifact_path: PathBuf,
    current: RwLock<Option<Arc<ModelPipeline>>>,
}

impl ModelHandle {
    /// Create an empty handle backed by the artifact at `artifact_path`
    pub fn new(artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            artifact_path: artifact_path.into(),
            current: RwLock::new(None),
        }
    }

    /// Artifact the handle loads from
    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// The published model, if any
    pub fn current(&self) -> Option<Arc<ModelPipeline>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether a model is published
    pub fn is_loaded(&self) -> bool {
        self.current().is_some()
    }

    /// Replace the published model
    pub fn publish(&self, pipeline: ModelPipeline) -> Arc<ModelPipeline> {
        let pipeline = Arc::new(pipeline);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&pipeline));
        info!("Published new model");
        pipeline
    }

    /// The published model, loading it from the artifact on first use.
    ///
    /// The artifact is decoded without holding the lock. If another caller
    /// published a model meanwhile, that one wins.
    pub fn get_or_load(&self) -> Result<Arc<ModelPipeline>, PipelineError> {
        if let Some(pipeline) = self.current() {
            return Ok(pipeline);
        }

        let loaded = Arc::new(ModelPipeline::load(&self.artifact_path)?);
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(pipeline) = current.as_ref() {
            return Ok(Arc::clone(pipeline));
        }
        info!(path = %self.artifact_path.display(), "Loaded model artifact");
        *current = Some(Arc::clone(&loaded));
        Ok(loaded)
    }
}
