//! Shared Application State

use crate::settings::Settings;
use metrics_exporter_prometheus::PrometheusHandle;
use services::{ModelHandle, PredictionService, TrainingService};
use std::sync::Arc;
use std::time::Instant;

/// State shared by every handler
pub struct AppState {
    pub handle: Arc<ModelHandle>,
    pub training: TrainingService,
    pub prediction: PredictionService,
    /// Absent when no recorder was installed
    pub metrics: Option<PrometheusHandle>,
    pub version: String,
    pub start_time: Instant,
}

impl AppState {
    /// Wire the services around one model handle
    pub fn new(settings: &Settings, metrics: Option<PrometheusHandle>) -> Self {
        let handle = Arc::new(ModelHandle::new(&settings.model_path));
        Self {
            training: TrainingService::new(settings.training(), Arc::clone(&handle)),
            prediction: PredictionService::new(Arc::clone(&handle)),
            handle,
            metrics,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        }
    }
}
