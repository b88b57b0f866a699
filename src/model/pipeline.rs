//! End-to-end regime classifier: embed → topology → scale → classify.

use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Classifier, Fittable, ForestConfig, RandomForest, StandardScaler, Transformer};
use crate::embedding::{EmbeddingConfig, PointCloud, TakensEmbedding};
use crate::error::{RegimeError, Result};
use crate::features::{FeatureConfig, TopologicalFeatures};
use crate::parallel::Parallelism;

/// Configuration of every stage of the default pipeline
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub embedding: EmbeddingConfig,
    pub features: FeatureConfig,
    pub forest: ForestConfig,
    /// Worker threads for embedding, persistence and tree training
    pub parallelism: Parallelism,
    /// Reject (W, τ, m) combinations that cannot form a single delay vector
    pub strict_geometry: bool,
}

impl PipelineConfig {
    /// Load from a JSON file; missing fields take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Ordered chain of stages, fitted and applied positionally
#[derive(Debug, Clone)]
pub struct RegimePipeline<
    E = TakensEmbedding,
    F = TopologicalFeatures,
    S = StandardScaler,
    C = RandomForest,
> {
    embedder: E,
    topology: F,
    scaler: S,
    classifier: C,
    fitted: bool,
}

impl RegimePipeline {
    /// Build the standard Takens → entropy → scaler → forest pipeline
    ///
    /// # Errors
    /// Any stage's configuration error; `DegenerateGeometry` when
    /// `strict_geometry` is set and the windows are too short.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let embedder = TakensEmbedding::new(config.embedding)?.with_parallelism(config.parallelism);
        if config.strict_geometry {
            embedder.validate_geometry()?;
        }
        let topology =
            TopologicalFeatures::new(config.features.clone())?.with_parallelism(config.parallelism);
        let classifier =
            RandomForest::new(config.forest.clone())?.with_parallelism(config.parallelism);

        Ok(Self::from_stages(embedder, topology, StandardScaler::new(), classifier))
    }

    /// Per-class probabilities from the forest, shape (windows, classes),
    /// columns ordered as `classifier().classes()`
    pub fn predict_proba(&self, windows: &Array2<f64>) -> Result<Array2<f64>> {
        if !self.fitted {
            return Err(RegimeError::NotFitted("regime pipeline"));
        }
        let scaled = self.scaler.transform(&self.transform_features(windows)?)?;
        self.classifier.predict_proba(&scaled)
    }
}

impl<E, F, S, C> RegimePipeline<E, F, S, C>
where
    E: Fittable<Array2<f64>, Output = Vec<PointCloud>>,
    F: Fittable<[PointCloud], Output = Array2<f64>>,
    S: Fittable<Array2<f64>, Output = Array2<f64>>,
    C: Classifier,
{
    pub fn from_stages(embedder: E, topology: F, scaler: S, classifier: C) -> Self {
        Self {
            embedder,
            topology,
            scaler,
            classifier,
            fitted: false,
        }
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn topology(&self) -> &F {
        &self.topology
    }

    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted
    }

    /// Unscaled topological features, one row per window. Needs no fit.
    pub fn transform_features(&self, windows: &Array2<f64>) -> Result<Array2<f64>> {
        let clouds = self.embedder.transform(windows)?;
        self.topology.transform(&clouds[..])
    }

    /// Fit every stage in order on training windows
    ///
    /// # Errors
    /// `LengthMismatch` if labels and windows differ in count,
    /// `EmptyInput` for an empty training set, or any stage error.
    pub fn fit(&mut self, windows: &Array2<f64>, labels: &[usize]) -> Result<()> {
        if labels.len() != windows.nrows() {
            return Err(RegimeError::LengthMismatch {
                expected: windows.nrows(),
                actual: labels.len(),
            });
        }
        if windows.nrows() == 0 {
            return Err(RegimeError::EmptyInput("no training windows".into()));
        }

        self.fitted = false;
        let clouds = self.embedder.fit_transform(windows, labels)?;
        let features = self.topology.fit_transform(&clouds[..], labels)?;
        debug!(rows = features.nrows(), cols = features.ncols(), "topological features");
        let scaled = self.scaler.fit_transform(&features, labels)?;
        self.classifier.fit(&scaled, labels)?;
        self.fitted = true;

        info!(windows = windows.nrows(), "pipeline fitted");
        Ok(())
    }

    /// Predict one regime label per window, in input order
    ///
    /// # Errors
    /// `NotFitted` before a successful `fit`.
    pub fn predict(&self, windows: &Array2<f64>) -> Result<Vec<usize>> {
        if !self.fitted {
            return Err(RegimeError::NotFitted("regime pipeline"));
        }
        let features = self.transform_features(windows)?;
        let scaled = self.scaler.transform(&features)?;
        self.classifier.predict(&scaled)
    }

    pub fn fit_predict(&mut self, windows: &Array2<f64>, labels: &[usize]) -> Result<Vec<usize>> {
        self.fit(windows, labels)?;
        self.predict(windows)
    }
}
