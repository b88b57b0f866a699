//! Batch orchestration of persistence and entropy.

use ndarray::Array2;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::embedding::PointCloud;
use crate::error::{RegimeError, Result};
use crate::information::{EntropyConfig, persistence_entropy};
use crate::model::{Fittable, Transformer};
use crate::parallel::{Parallelism, WorkerPool};
use crate::topology::{PersistenceDiagram, VietorisRips, compute_persistence};

/// Feature extraction settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Homology dimensions to summarize (0 = components, 1 = loops, 2 = voids)
    pub homology_dimensions: Vec<usize>,
    /// Filtration threshold; `None` runs the full filtration
    pub max_edge_length: Option<f64>,
    pub entropy: EntropyConfig,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            homology_dimensions: vec![0, 1],
            max_edge_length: None,
            entropy: EntropyConfig::default(),
        }
    }
}

/// Persistence-entropy feature extractor
#[derive(Debug, Clone)]
pub struct TopologicalFeatures {
    /// Sorted, de-duplicated
    dimensions: Vec<usize>,
    max_edge_length: f64,
    entropy: EntropyConfig,
    pool: WorkerPool,
}

impl TopologicalFeatures {
    /// # Errors
    /// `InvalidConfig` for an empty dimension set or a non-positive /
    /// NaN edge threshold.
    pub fn new(config: FeatureConfig) -> Result<Self> {
        let mut dimensions = config.homology_dimensions;
        dimensions.sort_unstable();
        dimensions.dedup();
        if dimensions.is_empty() {
            return Err(RegimeError::InvalidConfig(
                "at least one homology dimension is required".into(),
            ));
        }

        let max_edge_length = config.max_edge_length.unwrap_or(f64::INFINITY);
        if max_edge_length.is_nan() || max_edge_length <= 0.0 {
            return Err(RegimeError::InvalidConfig(format!(
                "max edge length must be positive, got {max_edge_length}"
            )));
        }

        Ok(Self {
            dimensions,
            max_edge_length,
            entropy: config.entropy,
            pool: WorkerPool::default(),
        })
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.pool = WorkerPool::new(parallelism);
        self
    }

    pub fn parallelism(&self) -> Parallelism {
        self.pool.parallelism()
    }

    /// Homology dimensions in feature-column order
    pub fn homology_dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    pub fn n_features(&self) -> usize {
        self.dimensions.len()
    }

    /// Persistence diagram of every cloud, restricted to the requested
    /// dimensions. Output order matches input order.
    ///
    /// # Errors
    /// * `ShapeMismatch` if clouds differ in point count or dimension
    /// * `InvalidValue` if a cloud has non-finite coordinates
    pub fn compute_diagrams(&self, clouds: &[PointCloud]) -> Result<Vec<PersistenceDiagram>> {
        let Some(first) = clouds.first() else {
            return Ok(Vec::new());
        };
        let shape = first.dim();
        if let Some((idx, cloud)) = clouds.iter().enumerate().find(|(_, c)| c.dim() != shape) {
            return Err(RegimeError::ShapeMismatch(format!(
                "cloud {idx} has shape {:?}, batch expects {:?}",
                cloud.dim(),
                shape
            )));
        }

        let max_dim = self.dimensions.iter().copied().max().unwrap_or(0);
        let diagrams: Result<Vec<PersistenceDiagram>> = self.pool.install(|| {
            clouds
                .par_iter()
                .map(|cloud| -> Result<PersistenceDiagram> {
                    let vr = VietorisRips::from_points(cloud, self.max_edge_length)?;
                    let mut pd = compute_persistence(&vr, max_dim);
                    pd.retain_dimensions(&self.dimensions);
                    Ok(pd)
                })
                .collect()
        })?;

        debug!(clouds = clouds.len(), points = shape.0, dim = shape.1, "computed diagrams");
        diagrams
    }

    /// One entropy per requested dimension for every diagram
    pub fn diagram_to_entropy(&self, diagrams: &[PersistenceDiagram]) -> Array2<f64> {
        Array2::from_shape_fn((diagrams.len(), self.dimensions.len()), |(i, j)| {
            persistence_entropy(&diagrams[i].lifetimes(self.dimensions[j]), &self.entropy)
        })
    }
}

impl Transformer<[PointCloud]> for TopologicalFeatures {
    type Output = Array2<f64>;

    fn transform(&self, clouds: &[PointCloud]) -> Result<Array2<f64>> {
        let diagrams = self.compute_diagrams(clouds)?;
        Ok(self.diagram_to_entropy(&diagrams))
    }
}

impl Fittable<[PointCloud]> for TopologicalFeatures {
    fn fit(&mut self, _clouds: &[PointCloud], _labels: &[usize]) -> Result<()> {
        Ok(())
    }
}
