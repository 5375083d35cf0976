//! Training Service

use crate::error::ServiceError;
use crate::handle::ModelHandle;
use model_pipeline::{ClassificationReport, ClassifierConfig, ModelPipeline, PipelineError};
use passenger_data::{load_dataset, titanic_preprocessor, to_table, train_test_split, DatasetSource};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Where to read data from and how to train
#[derive(Debug, Clone)]
pub struct TrainingSettings {
    pub source: DatasetSource,
    pub test_fraction: f64,
    pub seed: u64,
    pub classifier: ClassifierConfig,
}

impl TrainingSettings {
    /// Default split (80/20, seed 42) and solver settings for `source`
    pub fn new(source: DatasetSource) -> Self {
        Self {
            source,
            test_fraction: 0.2,
            seed: 42,
            classifier: ClassifierConfig::default(),
        }
    }
}

/// Outcome of one training attempt. Exactly one of model and error is set.
#[derive(Debug, Clone)]
pub struct TrainingResult {
    model: Option<Arc<ModelPipeline>>,
    error: Option<String>,
    report: Option<ClassificationReport>,
    train_rows: usize,
    test_rows: usize,
    artifact_path: Option<PathBuf>,
}

impl TrainingResult {
    fn failed(error: String) -> Self {
        Self {
            model: None,
            error: Some(error),
            report: None,
            train_rows: 0,
            test_rows: 0,
            artifact_path: None,
        }
    }

    /// Whether a model was trained and published
    pub fn success(&self) -> bool {
        self.model.is_some()
    }

    /// The trained model
    pub fn model(&self) -> Option<&Arc<ModelPipeline>> {
        self.model.as_ref()
    }

    /// Failure message
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Held-out metrics of the trained model
    pub fn report(&self) -> Option<&ClassificationReport> {
        self.report.as_ref()
    }

    /// Rows used for fitting
    pub fn train_rows(&self) -> usize {
        self.train_rows
    }

    /// Rows held out for evaluation
    pub fn test_rows(&self) -> usize {
        self.test_rows
    }

    /// Where the model was saved
    pub fn artifact_path(&self) -> Option<&PathBuf> {
        self.artifact_path.as_ref()
    }
}

/// Trains, persists and publishes the survival model
pub struct TrainingService {
    settings: TrainingSettings,
    handle: Arc<ModelHandle>,
}

impl TrainingService {
    pub fn new(settings: TrainingSettings, handle: Arc<ModelHandle>) -> Self {
        Self { settings, handle }
    }

    /// Training settings
    pub fn settings(&self) -> &TrainingSettings {
        &self.settings
    }

    /// Run one training attempt. Failures are reported in the result.
    pub fn run(&self) -> TrainingResult {
        let start = Instant::now();
        info!(source = %self.settings.source, "Training started");

        let result = match self.train() {
            Ok(result) => {
                metrics::counter!("titanic_training_runs_total", "status" => "success").increment(1);
                result
            }
            Err(e) => {
                error!(error = %e, "Training failed");
                metrics::counter!("titanic_training_runs_total", "status" => "failure").increment(1);
                TrainingResult::failed(e.to_string())
            }
        };

        let elapsed = start.elapsed();
        metrics::histogram!("titanic_training_duration_seconds").record(elapsed.as_secs_f64());
        info!(
            success = result.success(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Training finished"
        );
        result
    }

    fn train(&self) -> Result<TrainingResult, ServiceError> {
        let dataset = load_dataset(&self.settings.source)?;
        let (train, test) = train_test_split(&dataset, self.settings.test_fraction, self.settings.seed)?;

        let mut pipeline = ModelPipeline::new(
            titanic_preprocessor().map_err(PipelineError::from)?,
            self.settings.classifier,
        );
        let train_table = to_table(train.records()).map_err(PipelineError::from)?;
        pipeline.fit(&train_table, train.labels())?;

        let report = pipeline.evaluate(
            &to_table(test.records()).map_err(PipelineError::from)?,
            test.labels(),
        )?;
        info!(accuracy = report.accuracy, test_rows = test.len(), "Held-out evaluation");

        let path = self.handle.artifact_path().to_path_buf();
        pipeline.save(&path)?;
        let model = self.handle.publish(pipeline);

        Ok(TrainingResult {
            model: Some(model),
            error: None,
            report: Some(report),
            train_rows: train.len(),
            test_rows: test.len(),
            artifact_path: Some(path),
        })
    }

    /// Held-out metrics of the published model on the same split training used
    pub fn evaluate(&self) -> Result<ClassificationReport, ServiceError> {
        let model = self
            .handle
            .get_or_load()
            .map_err(|e| ServiceError::ModelUnavailable(e.to_string()))?;
        let dataset = load_dataset(&self.settings.source)?;
        let (_, test) = train_test_split(&dataset, self.settings.test_fraction, self.settings.seed)?;

        let table = to_table(test.records()).map_err(PipelineError::from)?;
        Ok(model.evaluate(&table, test.labels())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passenger_data::{synthetic_manifest, write_csv, LabeledDataset};
    use std::path::Path;

    fn settings(dir: &Path, dataset: &LabeledDataset) -> TrainingSettings {
        let csv = dir.join("train.csv");
        write_csv(&csv, dataset).unwrap();
        TrainingSettings::new(DatasetSource::Local(csv))
    }

    #[test]
    fn test_run_trains_persists_and_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let handle = Arc::new(ModelHandle::new(dir.path().join("model").join("pipeline.bin")));
        let service = TrainingService::new(settings(dir.path(), &synthetic_manifest(200, 3)), Arc::clone(&handle));

        let result = service.run();
        assert!(result.success(), "{:?}", result.error());
        assert!(result.error().is_none());
        assert_eq!(result.test_rows(), 40);
        assert_eq!(result.train_rows(), 160);
        assert_eq!(result.report().unwrap().support(), 40);
        assert!(result.artifact_path().unwrap().exists());
        assert!(handle.is_loaded());
    }

    #[test]
    fn test_manifest_with_missing_cells_trains() {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("train.csv");
        let mut manifest = String::from("PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked\n");
        manifest.push_str("1,0,3,\"Braund, Mr. Owen Harris\",male,22,1,0,A/5 21171,7.25,,S\n");
        manifest.push_str("2,1,1,\"Cumings, Mrs. John Bradley\",female,38,1,0,PC 17599,71.2833,C85,C\n");
        manifest.push_str("3,1,3,\"Heikkinen, Miss. Laina\",female,26,0,0,STON/O2. 3101282,7.925,,S\n");
        manifest.push_str("4,1,1,\"Futrelle, Mrs. Jacques Heath\",female,35,1,0,113803,53.1,C123,S\n");
        manifest.push_str("5,0,3,\"Allen, Mr. William Henry\",male,35,0,0,373450,8.05,,S\n");
        manifest.push_str("6,0,3,\"Moran, Mr. James\",male,,0,0,330877,8.4583,,Q\n");
        manifest.push_str("7,0,1,\"McCarthy, Mr. Timothy J\",male,54,0,0,17463,51.8625,E46,S\n");
        manifest.push_str("8,0,3,\"Palsson, Master. Gosta Leonard\",male,2,3,1,349909,21.075,,S\n");
        manifest.push_str("9,1,3,\"Johnson, Mrs. Oscar W\",female,27,0,2,347742,11.1333,,S\n");
        manifest.push_str("10,1,2,\"Nasser, Mrs. Nicholas\",female,14,1,0,237736,30.0708,,C\n");
        manifest.push_str("13,0,3,\"Saundercock, Mr. William Henry\",male,22,0,0,A/5. 2151,7.25,,S\n");
        manifest.push_str("62,1,1,\"Icard, Miss. Amelie\",female,38,0,0,113572,80,B28,\n");
        std::fs::write(&csv, manifest).unwrap();

        let handle = Arc::new(ModelHandle::new(dir.path().join("model.bin")));
        let result = TrainingService::new(TrainingSettings::new(DatasetSource::Local(csv)), handle).run();
        assert!(result.success(), "{:?}", result.error());
        assert_eq!(result.test_rows(), 3);
        assert_eq!(result.train_rows(), 9);
    }

    #[test]
    fn test_empty_dataset_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let handle = Arc::new(ModelHandle::new(dir.path().join("model.bin")));
        let service = TrainingService::new(settings(dir.path(), &LabeledDataset::default()), Arc::clone(&handle));

        let result = service.run();
        assert!(!result.success());
        assert!(result.model().is_none());
        assert!(!result.error().unwrap().is_empty());
        assert!(!handle.is_loaded());
    }

    #[test]
    fn test_missing_dataset_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = DatasetSource::Local(dir.path().join("absent.csv"));
        let service = TrainingService::new(
            TrainingSettings::new(source),
            Arc::new(ModelHandle::new(dir.path().join("model.bin"))),
        );
        let result = service.run();
        assert!(!result.success());
        assert!(result.error().unwrap().contains("absent.csv"));
    }

    #[test]
    fn test_retrain_publishes_new_model() {
        let dir = tempfile::tempdir().unwrap();
        let handle = Arc::new(ModelHandle::new(dir.path().join("model.bin")));
        let service = TrainingService::new(settings(dir.path(), &synthetic_manifest(120, 8)), Arc::clone(&handle));

        assert!(service.run().success());
        let first = handle.current().unwrap();
        assert!(service.run().success());
        let second = handle.current().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert!(first.is_trained());
    }

    #[test]
    fn test_evaluate_matches_training_report() {
        let dir = tempfile::tempdir().unwrap();
        let handle = Arc::new(ModelHandle::new(dir.path().join("model.bin")));
        let service = TrainingService::new(settings(dir.path(), &synthetic_manifest(150, 6)), Arc::clone(&handle));

        assert!(matches!(service.evaluate(), Err(ServiceError::ModelUnavailable(_))));

        let result = service.run();
        let report = service.evaluate().unwrap();
        assert_eq!(Some(&report), result.report());
    }
}
