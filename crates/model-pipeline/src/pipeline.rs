//! Model Pipeline
//!
//! A [`ColumnPreprocessor`] followed by a logistic classifier. A pipeline is
//! created untrained, fitted once, and from then on only read: retraining
//! builds a new pipeline.

use crate::classifier::{ClassifierConfig, FittedClassifier};
use crate::report::ClassificationReport;
use crate::PipelineError;
use feature_engine::{ColumnPreprocessor, GroupStatus, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use storage::{ArtifactInfo, ArtifactStore};
use tracing::{debug, info};

/// Artifact kind under which pipelines are stored
pub const ARTIFACT_KIND: &str = "model-pipeline";

#[derive(Debug, Serialize, Deserialize)]
enum PipelineState {
    Untrained,
    Trained(FittedClassifier),
}

/// One learned weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub feature: String,
    pub weight: f64,
}

/// Learned classifier parameters, named by output feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub intercept: f64,
    pub weights: Vec<Coefficient>,
}

/// Fitted state of the whole pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStatus {
    pub trained: bool,
    pub preprocessor: Vec<GroupStatus>,
    pub feature_names: Vec<String>,
    pub classifier: ClassifierConfig,
}

/// Preprocessing plus classification
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelPipeline {
    preprocessor: ColumnPreprocessor,
    config: ClassifierConfig,
    state: PipelineState,
}

impl ModelPipeline {
    /// Create an untrained pipeline
    pub fn new(preprocessor: ColumnPreprocessor, config: ClassifierConfig) -> Self {
        Self {
            preprocessor,
            config,
            state: PipelineState::Untrained,
        }
    }

    /// Fit preprocessing statistics and the classifier on training data.
    ///
    /// On failure the pipeline stays untrained and unchanged.
    pub fn fit(&mut self, features: &Table, labels: &[usize]) -> Result<&mut Self, PipelineError> {
        if self.is_trained() {
            return Err(PipelineError::AlreadyTrained);
        }
        if features.n_rows() == 0 {
            return Err(PipelineError::InvalidTrainingData("no training rows".to_string()));
        }
        if features.n_rows() != labels.len() {
            return Err(PipelineError::InvalidTrainingData(format!(
                "{} rows but {} labels",
                features.n_rows(),
                labels.len()
            )));
        }
        if let Some(label) = labels.iter().find(|l| **l > 1) {
            return Err(PipelineError::InvalidTrainingData(format!(
                "label {label} is not 0 or 1"
            )));
        }

        let mut preprocessor = self.preprocessor.clone();
        let matrix = preprocessor.fit_transform(features)?;
        let classifier = FittedClassifier::fit(&self.config, matrix.values(), labels)?;

        info!(
            rows = matrix.n_rows(),
            features = matrix.n_features(),
            "Pipeline trained"
        );
        self.preprocessor = preprocessor;
        self.state = PipelineState::Trained(classifier);
        Ok(self)
    }

    fn classifier(&self) -> Result<&FittedClassifier, PipelineError> {
        match &self.state {
            PipelineState::Trained(classifier) => Ok(classifier),
            PipelineState::Untrained => Err(PipelineError::NotTrained),
        }
    }

    /// Predicted label per input row
    pub fn predict(&self, features: &Table) -> Result<Vec<usize>, PipelineError> {
        let classifier = self.classifier()?;
        let matrix = self.preprocessor.transform(features)?;
        let labels = classifier.predict(matrix.values())?;
        debug!(rows = labels.len(), "Predicted");
        Ok(labels)
    }

    /// Predict and compare against known labels
    pub fn evaluate(&self, features: &Table, labels: &[usize]) -> Result<ClassificationReport, PipelineError> {
        if features.n_rows() != labels.len() {
            return Err(PipelineError::InvalidInput(format!(
                "{} rows but {} labels",
                features.n_rows(),
                labels.len()
            )));
        }
        let predicted = self.predict(features)?;
        Ok(ClassificationReport::from_labels(labels, &predicted))
    }

    /// Persist the trained pipeline as one artifact
    pub fn save(&self, path: impl AsRef<Path>) -> Result<ArtifactInfo, PipelineError> {
        self.classifier()?;
        Ok(ArtifactStore::new(path.as_ref()).save(ARTIFACT_KIND, self)?)
    }

    /// Load a pipeline previously written by [`ModelPipeline::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let pipeline: Self = ArtifactStore::new(path.as_ref()).load(ARTIFACT_KIND)?;
        pipeline.classifier()?;
        Ok(pipeline)
    }

    /// Whether fit has succeeded
    pub fn is_trained(&self) -> bool {
        matches!(self.state, PipelineState::Trained(_))
    }

    /// The preprocessing stage
    pub fn preprocessor(&self) -> &ColumnPreprocessor {
        &self.preprocessor
    }

    /// Solver settings
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Fitted state of every stage
    pub fn status(&self) -> PipelineStatus {
        PipelineStatus {
            trained: self.is_trained(),
            preprocessor: self.preprocessor.status(),
            feature_names: self
                .preprocessor
                .feature_names_out()
                .map(<[String]>::to_vec)
                .unwrap_or_default(),
            classifier: self.config,
        }
    }

    /// Learned weights keyed by output feature name
    pub fn coefficients(&self) -> Option<Coefficients> {
        let classifier = self.classifier().ok()?;
        let names = self.preprocessor.feature_names_out()?;
        Some(Coefficients {
            intercept: classifier.intercept(),
            weights: names
                .iter()
                .zip(classifier.weights())
                .map(|(feature, weight)| Coefficient {
                    feature: feature.clone(),
                    weight: *weight,
                })
                .collect(),
        })
    }
}

impl fmt::Display for ModelPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pipeline(steps=[('preprocessor', {}), ('classifier', {})])",
            self.preprocessor, self.config
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use passenger_data::{synthetic_manifest, titanic_preprocessor, to_table, Embarked, PassengerRecord, Pclass, Sex};

    fn untrained() -> ModelPipeline {
        ModelPipeline::new(titanic_preprocessor().unwrap(), ClassifierConfig::default())
    }

    fn trained() -> ModelPipeline {
        let data = synthetic_manifest(300, 11);
        let mut pipeline = untrained();
        pipeline.fit(&to_table(data.records()).unwrap(), data.labels()).unwrap();
        pipeline
    }

    fn first_class_woman() -> PassengerRecord {
        PassengerRecord {
            age: Some(29.0),
            fare: 211.5,
            sex: Sex::Female,
            pclass: Pclass::First,
            embarked: Some(Embarked::Southampton),
            sib_sp: 0,
            parch: 0,
        }
    }

    #[test]
    fn test_predict_before_fit() {
        let table = to_table(&[first_class_woman()]).unwrap();
        assert!(matches!(untrained().predict(&table), Err(PipelineError::NotTrained)));
    }

    #[test]
    fn test_fit_and_predict() {
        let pipeline = trained();
        assert!(pipeline.is_trained());

        let table = to_table(&[first_class_woman()]).unwrap();
        assert_eq!(pipeline.predict(&table).unwrap(), vec![1]);
    }

    #[test]
    fn test_refit_rejected() {
        let data = synthetic_manifest(50, 1);
        let mut pipeline = trained();
        let err = pipeline
            .fit(&to_table(data.records()).unwrap(), data.labels())
            .unwrap_err();
        assert!(matches!(err, PipelineError::AlreadyTrained));
    }

    #[test]
    fn test_invalid_training_data() {
        let data = synthetic_manifest(10, 1);
        let table = to_table(data.records()).unwrap();

        assert!(matches!(
            untrained().fit(&table, &data.labels()[..5]),
            Err(PipelineError::InvalidTrainingData(_))
        ));
        assert!(matches!(
            untrained().fit(&to_table(&[]).unwrap(), &[]),
            Err(PipelineError::InvalidTrainingData(_))
        ));
    }

    #[test]
    fn test_failed_fit_leaves_pipeline_untrained() {
        let data = synthetic_manifest(10, 1);
        let table = to_table(data.records()).unwrap().select(&["Age", "Fare"]).unwrap();
        let mut pipeline = untrained();
        assert!(matches!(pipeline.fit(&table, data.labels()), Err(PipelineError::Feature(_))));
        assert!(!pipeline.is_trained());
        assert!(!pipeline.preprocessor().is_fitted());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let pipeline = trained();
        pipeline.save(&path).unwrap();

        let loaded = ModelPipeline::load(&path).unwrap();
        let data = synthetic_manifest(40, 99);
        let table = to_table(data.records()).unwrap();
        assert_eq!(loaded.predict(&table).unwrap(), pipeline.predict(&table).unwrap());
        assert_eq!(loaded.coefficients(), pipeline.coefficients());
    }

    #[test]
    fn test_save_untrained() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            untrained().save(dir.path().join("model.bin")),
            Err(PipelineError::NotTrained)
        ));
    }

    #[test]
    fn test_load_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ModelPipeline::load(dir.path().join("absent.bin")),
            Err(PipelineError::Artifact(storage::ArtifactError::NotFound(_)))
        ));
    }

    #[test]
    fn test_evaluate() {
        let pipeline = trained();
        let holdout = synthetic_manifest(100, 5);
        let report = pipeline
            .evaluate(&to_table(holdout.records()).unwrap(), holdout.labels())
            .unwrap();
        assert_eq!(report.support(), 100);
        assert!(report.accuracy > 0.6);
    }

    #[test]
    fn test_status_and_coefficients() {
        let status = untrained().status();
        assert!(!status.trained);
        assert!(status.preprocessor.iter().all(|g| !g.fitted));
        assert!(untrained().coefficients().is_none());

        let pipeline = trained();
        let status = pipeline.status();
        assert!(status.trained);
        assert!(status.preprocessor.iter().all(|g| g.fitted));

        let coefficients = pipeline.coefficients().unwrap();
        assert_eq!(coefficients.weights.len(), status.feature_names.len());
        assert_eq!(coefficients.weights[0].feature, "Age");
    }

    #[test]
    fn test_display() {
        let text = untrained().to_string();
        assert!(text.starts_with("Pipeline(steps=[('preprocessor', ColumnPreprocessor("));
        assert!(text.contains("('age', impute_scale, [\"Age\"])"));
        assert!(text.contains("LogisticRegression(max_iter=1000"));
    }
}
