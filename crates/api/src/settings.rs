//! Service Settings
//!
//! Layered configuration: built-in defaults, then an optional
//! `config/titanic.toml`, then process environment variables.

use config::{Config, Environment, File};
use model_pipeline::ClassifierConfig;
use passenger_data::DatasetSource;
use serde::Deserialize;
use services::TrainingSettings;
use thiserror::Error;

/// Settings errors; all of them are fatal at startup
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Required setting {0} is not set")]
    Missing(&'static str),

    #[error("Invalid setting {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Resolved settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Local CSV path, or URL when `dataset_remote` is set
    #[serde(default)]
    pub dataset_path: String,
    pub dataset_remote: bool,
    /// Model artifact path
    #[serde(default)]
    pub model_path: String,
    pub host: String,
    pub port: u16,
    pub test_fraction: f64,
    pub random_seed: u64,
    pub max_iterations: u64,
    pub log_level: String,
    pub log_json: bool,
}

impl Settings {
    /// Load settings from the process environment
    pub fn load() -> Result<Self, SettingsError> {
        Self::from_environment(Environment::default().try_parsing(true))
    }

    fn from_environment(environment: Environment) -> Result<Self, SettingsError> {
        let settings: Settings = Config::builder()
            .set_default("dataset_remote", false)?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8080_i64)?
            .set_default("test_fraction", 0.2)?
            .set_default("random_seed", 42_i64)?
            .set_default("max_iterations", 1000_i64)?
            .set_default("log_level", "info")?
            .set_default("log_json", false)?
            .add_source(File::with_name("config/titanic").required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.dataset_path.trim().is_empty() {
            return Err(SettingsError::Missing("DATASET_PATH"));
        }
        if self.model_path.trim().is_empty() {
            return Err(SettingsError::Missing("MODEL_PATH"));
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(SettingsError::Invalid {
                name: "TEST_FRACTION",
                reason: format!("{} is not in (0, 1)", self.test_fraction),
            });
        }
        if self.max_iterations == 0 {
            return Err(SettingsError::Invalid {
                name: "MAX_ITERATIONS",
                reason: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    /// Where the training data comes from
    pub fn dataset_source(&self) -> DatasetSource {
        DatasetSource::from_location(&self.dataset_path, self.dataset_remote)
    }

    /// Training settings derived from these settings
    pub fn training(&self) -> TrainingSettings {
        TrainingSettings {
            source: self.dataset_source(),
            test_fraction: self.test_fraction,
            seed: self.random_seed,
            classifier: ClassifierConfig {
                max_iterations: self.max_iterations,
                ..ClassifierConfig::default()
            },
        }
    }

    /// Socket address to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
