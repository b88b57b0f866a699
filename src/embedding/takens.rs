//! Takens time-delay embedding of windows.

use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RegimeError, Result};
use crate::model::{Fittable, Transformer};
use crate::parallel::{Parallelism, WorkerPool};

/// A set of M points in ℝ^m, one per row.
pub type PointCloud = Array2<f64>;

/// Embedding geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Outer window length W
    pub window_size: usize,
    /// Delay τ between coordinates
    pub time_delay: usize,
    /// Reconstruction dimension m
    pub embedding_dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            window_size: 30,
            time_delay: 2,
            embedding_dimension: 3,
        }
    }
}

impl EmbeddingConfig {
    /// Points per cloud, M = W − (m−1)τ, or `None` when M ≤ 0.
    pub fn point_count(&self) -> Option<usize> {
        let span = delay_span(self.time_delay, self.embedding_dimension)?;
        self.window_size.checked_sub(span).filter(|&m| m >= 1)
    }
}

/// Point clouds of a batch plus the number of windows that fell back to
/// the degenerate zero cloud.
#[derive(Debug, Clone)]
pub struct EmbeddingOutput {
    pub clouds: Vec<PointCloud>,
    pub degenerate: usize,
}

/// Samples covered by one delay vector beyond its first, (m−1)τ.
/// `None` when that overflows, which no window can hold.
fn delay_span(delay: usize, dimension: usize) -> Option<usize> {
    dimension.saturating_sub(1).checked_mul(delay)
}

/// Delay-coordinate embedding of a single signal.
///
/// Row i is `[x_i, x_{i+τ}, …, x_{i+(m−1)τ}]`. Returns `None` when the
/// signal is too short to form a single delay vector.
pub fn delay_embed(signal: ArrayView1<f64>, delay: usize, dimension: usize) -> Option<PointCloud> {
    let span = delay_span(delay, dimension)?;
    let n = signal.len();
    if n <= span {
        return None;
    }
    let m = n - span;
    Some(Array2::from_shape_fn((m, dimension), |(i, j)| signal[i + j * delay]))
}

/// Stateless Takens embedder, validated at construction.
#[derive(Debug, Clone)]
pub struct TakensEmbedding {
    config: EmbeddingConfig,
    pool: WorkerPool,
}

impl TakensEmbedding {
    /// Create an embedder.
    ///
    /// # Errors
    /// `InvalidEmbeddingConfig` if W, τ or m is zero.
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        let EmbeddingConfig {
            window_size,
            time_delay,
            embedding_dimension,
        } = config;
        if window_size == 0 {
            return Err(RegimeError::InvalidEmbeddingConfig(
                "window size must be at least 1".into(),
            ));
        }
        if time_delay == 0 {
            return Err(RegimeError::InvalidEmbeddingConfig(
                "time delay must be at least 1".into(),
            ));
        }
        if embedding_dimension == 0 {
            return Err(RegimeError::InvalidEmbeddingConfig(
                "embedding dimension must be at least 1".into(),
            ));
        }
        Ok(Self {
            config,
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

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    /// Points per cloud, `None` for degenerate geometry.
    pub fn point_count(&self) -> Option<usize> {
        self.config.point_count()
    }

    pub fn is_degenerate(&self) -> bool {
        self.point_count().is_none()
    }

    /// Strict check that every window will produce a real cloud.
    pub fn validate_geometry(&self) -> Result<()> {
        if self.is_degenerate() {
            return Err(RegimeError::DegenerateGeometry {
                window: self.config.window_size,
                delay: self.config.time_delay,
                dimension: self.config.embedding_dimension,
            });
        }
        Ok(())
    }

    /// Embed one window. Degenerate windows yield a single zero point.
    pub fn embed_window(&self, window: ArrayView1<f64>) -> PointCloud {
        let m = self.config.embedding_dimension;
        delay_embed(window, self.config.time_delay, m).unwrap_or_else(|| Array2::zeros((1, m)))
    }

    /// Embed a batch of windows (one per row), in parallel.
    ///
    /// # Errors
    /// `ShapeMismatch` if the row length differs from the configured W.
    pub fn embed_batch(&self, windows: &Array2<f64>) -> Result<EmbeddingOutput> {
        if windows.ncols() != self.config.window_size {
            return Err(RegimeError::ShapeMismatch(format!(
                "windows have length {}, embedder expects {}",
                windows.ncols(),
                self.config.window_size
            )));
        }

        let n = windows.nrows();
        let clouds: Vec<PointCloud> = self.pool.install(|| {
            (0..n)
                .into_par_iter()
                .map(|i| self.embed_window(windows.row(i)))
                .collect()
        })?;

        let degenerate = if self.is_degenerate() { n } else { 0 };
        if degenerate > 0 {
            warn!(
                degenerate,
                window = self.config.window_size,
                delay = self.config.time_delay,
                dimension = self.config.embedding_dimension,
                "windows too short to embed, substituted zero clouds"
            );
        }
        debug!(windows = n, points = ?self.point_count(), "embedded batch");

        Ok(EmbeddingOutput { clouds, degenerate })
    }

    /// Embed an entire series as a single trajectory, ignoring W.
    pub fn embed_series(&self, series: &[f64]) -> Option<PointCloud> {
        delay_embed(
            ArrayView1::from(series),
            self.config.time_delay,
            self.config.embedding_dimension,
        )
    }
}

impl Transformer<Array2<f64>> for TakensEmbedding {
    type Output = Vec<PointCloud>;

    fn transform(&self, windows: &Array2<f64>) -> Result<Vec<PointCloud>> {
        Ok(self.embed_batch(windows)?.clouds)
    }
}

impl Fittable<Array2<f64>> for TakensEmbedding {
    fn fit(&mut self, _windows: &Array2<f64>, _labels: &[usize]) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    fn embedder(w: usize, tau: usize, m: usize) -> TakensEmbedding {
        TakensEmbedding::new(EmbeddingConfig {
            window_size: w,
            time_delay: tau,
            embedding_dimension: m,
        })
        .unwrap()
        .with_parallelism(Parallelism::Threads(2))
    }

    #[test]
    fn test_delay_vectors() {
        let window = Array1::from_iter((0..10).map(|i| i as f64 * 1.5));
        let cloud = embedder(10, 2, 3).embed_window(window.view());

        // M = 10 − 2·2 = 6
        assert_eq!(cloud.dim(), (6, 3));
        for i in 0..6 {
            for j in 0..3 {
                assert_eq!(cloud[[i, j]], window[i + 2 * j]);
            }
        }
    }

    #[test]
    fn test_dimension_one_is_identity() {
        let window = array![3.0, 1.0, 4.0, 1.0, 5.0];
        let cloud = embedder(5, 4, 1).embed_window(window.view());
        assert_eq!(cloud, window.insert_axis(ndarray::Axis(1)));
    }

    #[test]
    fn test_degenerate_window_falls_back_to_zero_point() {
        // M = 5 − 2·3 = −1
        let emb = embedder(5, 3, 3);
        assert!(emb.is_degenerate());
        assert_eq!(emb.point_count(), None);

        let cloud = emb.embed_window(array![1.0, 2.0, 3.0, 4.0, 5.0].view());
        assert_eq!(cloud, Array2::<f64>::zeros((1, 3)));

        let batch = Array2::from_elem((4, 5), 1.0);
        let out = emb.embed_batch(&batch).unwrap();
        assert_eq!(out.degenerate, 4);
        assert!(out.clouds.iter().all(|c| *c == Array2::<f64>::zeros((1, 3))));

        assert!(matches!(
            emb.validate_geometry(),
            Err(RegimeError::DegenerateGeometry { window: 5, delay: 3, dimension: 3 })
        ));
    }

    #[test]
    fn test_huge_delay_is_degenerate() {
        let tau = usize::MAX / 2 + 1;
        let emb = embedder(30, tau, 3);
        assert_eq!(emb.point_count(), None);
        assert!(emb.is_degenerate());
        assert!(matches!(
            emb.validate_geometry(),
            Err(RegimeError::DegenerateGeometry { window: 30, .. })
        ));

        let window = Array1::from_iter((0..30).map(f64::from));
        assert_eq!(emb.embed_window(window.view()), Array2::<f64>::zeros((1, 3)));
        assert!(delay_embed(window.view(), tau, 3).is_none());
        assert!(emb.embed_series(&window.to_vec()).is_none());
    }

    #[test]
    fn test_exactly_one_point() {
        // M = 7 − 2·3 = 1
        let emb = embedder(7, 3, 3);
        assert_eq!(emb.point_count(), Some(1));
        assert!(emb.validate_geometry().is_ok());
        let cloud = emb.embed_window(array![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0].view());
        assert_eq!(cloud, array![[0.0, 3.0, 6.0]]);
    }

    #[test]
    fn test_invalid_config() {
        for (w, tau, m) in [(0, 1, 1), (10, 0, 3), (10, 1, 0)] {
            let err = TakensEmbedding::new(EmbeddingConfig {
                window_size: w,
                time_delay: tau,
                embedding_dimension: m,
            })
            .unwrap_err();
            assert!(matches!(err, RegimeError::InvalidEmbeddingConfig(_)));
        }
    }

    #[test]
    fn test_batch_preserves_order() {
        let emb = embedder(8, 1, 2);
        let windows = Array2::from_shape_fn((50, 8), |(i, j)| (i * 100 + j) as f64);
        let out = emb.embed_batch(&windows).unwrap();

        assert_eq!(out.degenerate, 0);
        assert_eq!(out.clouds.len(), 50);

        // The worker pool is built once and reused across batches
        assert!(emb.pool.is_built());
        assert_eq!(emb.embed_batch(&windows).unwrap().clouds, out.clouds);
        for (i, cloud) in out.clouds.iter().enumerate() {
            assert_eq!(cloud.dim(), (7, 2));
            assert_eq!(cloud[[0, 0]], (i * 100) as f64);
            assert_eq!(cloud[[6, 1]], (i * 100 + 7) as f64);
        }
    }

    #[test]
    fn test_batch_rejects_wrong_window_length() {
        let emb = embedder(8, 1, 2);
        let err = emb.embed_batch(&Array2::zeros((3, 9))).unwrap_err();
        assert!(matches!(err, RegimeError::ShapeMismatch(_)));
    }

    #[test]
    fn test_embed_series_trajectory() {
        let series: Vec<f64> = (0..12).map(|i| i as f64).collect();
        let traj = embedder(4, 1, 3).embed_series(&series).unwrap();
        assert_eq!(traj.dim(), (10, 3));
        assert_eq!(traj.row(9).to_vec(), vec![9.0, 10.0, 11.0]);
        assert!(embedder(4, 5, 3).embed_series(&series[..10]).is_none());
    }
}
