//! Random forest classifier: bagged CART trees voting on regime labels.

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Classifier;
use super::tree::{DecisionTree, TreeParams, argmax};
use crate::error::{RegimeError, Result};
use crate::parallel::{Parallelism, WorkerPool};

/// Forest hyper-parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees
    pub n_estimators: usize,
    /// Depth limit, `None` grows until leaves are pure
    pub max_depth: Option<usize>,
    /// Nodes with fewer samples become leaves
    pub min_samples_split: usize,
    /// Features tried per split, `None` for ⌊√n_features⌋
    pub max_features: Option<usize>,
    /// Fit each tree on a bootstrap resample
    pub bootstrap: bool,
    /// Tree t draws from `StdRng::seed_from_u64(seed + t)`
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

/// Ensemble of decision trees
#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    pool: WorkerPool,
    trees: Vec<DecisionTree>,
    /// Distinct training labels, ascending; trees predict indices into it
    classes: Vec<usize>,
    n_features: usize,
}

impl RandomForest {
    /// # Errors
    /// `InvalidConfig` if there are no trees, `min_samples_split < 2`
    /// or `max_features == Some(0)`.
    pub fn new(config: ForestConfig) -> Result<Self> {
        if config.n_estimators == 0 {
            return Err(RegimeError::InvalidConfig("forest needs at least one tree".into()));
        }
        if config.min_samples_split < 2 {
            return Err(RegimeError::InvalidConfig(format!(
                "min_samples_split must be at least 2, got {}",
                config.min_samples_split
            )));
        }
        if config.max_features == Some(0) {
            return Err(RegimeError::InvalidConfig("max_features must be at least 1".into()));
        }
        Ok(Self {
            config,
            pool: WorkerPool::default(),
            trees: Vec::new(),
            classes: Vec::new(),
            n_features: 0,
        })
    }

    pub fn with_parallelism(mut self, parallelism: Parallelism) -> Self {
        self.pool = WorkerPool::new(parallelism);
        self
    }

    pub fn parallelism(&self) -> Parallelism {
        self.pool.parallelism()
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    /// Number of distinct labels seen at fit
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    /// Labels seen at fit, ascending. Column k of `predict_proba` is
    /// `classes()[k]`.
    pub fn classes(&self) -> &[usize] {
        &self.classes
    }

    fn check_predict_input(&self, x: &Array2<f64>) -> Result<()> {
        if self.trees.is_empty() {
            return Err(RegimeError::NotFitted("random forest"));
        }
        if x.ncols() != self.n_features {
            return Err(RegimeError::ShapeMismatch(format!(
                "forest fitted on {} features, got {}",
                self.n_features,
                x.ncols()
            )));
        }
        Ok(())
    }

    /// Mean leaf class distribution over trees, shape (rows, classes),
    /// columns ordered as [`Self::classes`]
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_predict_input(x)?;

        let mut proba = Array2::<f64>::zeros((x.nrows(), self.classes.len()));
        for (i, row) in x.outer_iter().enumerate() {
            for tree in &self.trees {
                let counts = tree.leaf_counts(row);
                let total: usize = counts.iter().sum();
                for (k, &c) in counts.iter().enumerate() {
                    proba[[i, k]] += c as f64 / total as f64;
                }
            }
        }
        proba /= self.trees.len() as f64;
        Ok(proba)
    }
}

impl Classifier for RandomForest {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()> {
        let n = x.nrows();
        if y.len() != n {
            return Err(RegimeError::LengthMismatch {
                expected: n,
                actual: y.len(),
            });
        }
        if n == 0 || x.ncols() == 0 {
            return Err(RegimeError::EmptyInput(format!(
                "cannot fit forest on a {}x{} matrix",
                n,
                x.ncols()
            )));
        }

        let n_features = x.ncols();
        let mut classes = y.to_vec();
        classes.sort_unstable();
        classes.dedup();
        let n_classes = classes.len();
        // Dense class index per sample, so sparse labels cost nothing
        let encoded: Vec<usize> = y
            .iter()
            .map(|label| classes.partition_point(|c| c < label))
            .collect();
        let default_features = ((n_features as f64).sqrt() as usize).max(1);
        let params = TreeParams {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            max_features: self
                .config
                .max_features
                .unwrap_or(default_features)
                .min(n_features),
        };
        let ForestConfig {
            n_estimators,
            bootstrap,
            seed,
            ..
        } = self.config;

        let trees: Vec<DecisionTree> = self.pool.install(|| {
            (0..n_estimators)
                .into_par_iter()
                .map(|t| {
                    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(t as u64));
                    let sample: Vec<usize> = if bootstrap {
                        (0..n).map(|_| rng.random_range(0..n)).collect()
                    } else {
                        (0..n).collect()
                    };
                    DecisionTree::fit(x, &encoded, sample, n_classes, params, &mut rng)
                })
                .collect()
        })?;

        debug!(
            trees = trees.len(),
            samples = n,
            features = n_features,
            classes = n_classes,
            max_depth = trees.iter().map(DecisionTree::depth).max().unwrap_or(0),
            "fitted random forest"
        );

        self.trees = trees;
        self.classes = classes;
        self.n_features = n_features;
        Ok(())
    }

    /// Majority vote of the trees (ties → smaller label)
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>> {
        self.check_predict_input(x)?;

        Ok(x
            .outer_iter()
            .map(|row| {
                let mut votes = vec![0usize; self.classes.len()];
                for tree in &self.trees {
                    votes[tree.predict_row(row)] += 1;
                }
                self.classes[argmax(&votes)]
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn two_blobs() -> (Array2<f64>, Vec<usize>) {
        let x = Array2::from_shape_fn((40, 2), |(i, j)| {
            let base = if i < 20 { 0.0 } else { 5.0 };
            base + ((i * 7 + j * 3) % 10) as f64 * 0.1
        });
        let y = (0..40).map(|i| usize::from(i >= 20)).collect();
        (x, y)
    }

    fn forest(n_estimators: usize) -> RandomForest {
        RandomForest::new(ForestConfig {
            n_estimators,
            ..ForestConfig::default()
        })
        .unwrap()
        .with_parallelism(Parallelism::Threads(2))
    }

    #[test]
    fn test_fits_separable_data() {
        let (x, y) = two_blobs();
        let mut rf = forest(25);
        rf.fit(&x, &y).unwrap();

        assert!(rf.is_fitted());
        assert_eq!(rf.n_classes(), 2);
        assert_eq!(rf.predict(&x).unwrap(), y);
        assert_eq!(rf.predict(&array![[0.2, 0.2], [5.5, 5.5]]).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_predict_proba_rows_sum_to_one() {
        let (x, y) = two_blobs();
        let mut rf = forest(10);
        rf.fit(&x, &y).unwrap();

        let proba = rf.predict_proba(&x).unwrap();
        assert_eq!(proba.dim(), (40, 2));
        for row in proba.outer_iter() {
            assert!((row.sum() - 1.0).abs() < 1e-12);
        }
        assert!(proba[[0, 0]] > 0.5);
        assert!(proba[[39, 1]] > 0.5);
    }

    #[test]
    fn test_seeded_fit_is_reproducible() {
        let (x, y) = two_blobs();
        let queries = array![[2.5, 2.5], [2.4, 2.6], [2.6, 2.4]];

        let mut a = forest(15);
        let mut b = forest(15).with_parallelism(Parallelism::Threads(1));
        a.fit(&x, &y).unwrap();
        b.fit(&x, &y).unwrap();
        assert_eq!(a.predict_proba(&queries).unwrap(), b.predict_proba(&queries).unwrap());
    }

    #[test]
    fn test_sparse_and_huge_labels() {
        let (x, y) = two_blobs();
        for (low, high) in [(0, 5_000_000), (7, usize::MAX)] {
            let labels: Vec<usize> = y.iter().map(|&c| if c == 0 { low } else { high }).collect();
            let mut rf = forest(10);
            rf.fit(&x, &labels).unwrap();

            assert_eq!(rf.n_classes(), 2);
            assert_eq!(rf.classes(), &[low, high]);
            assert_eq!(rf.predict(&x).unwrap(), labels);
            let proba = rf.predict_proba(&array![[0.2, 0.2], [5.5, 5.5]]).unwrap();
            assert_eq!(proba.dim(), (2, 2));
            assert!(proba[[0, 0]] > 0.5 && proba[[1, 1]] > 0.5);
        }
    }

    #[test]
    fn test_errors() {
        let rf = forest(3);
        assert!(matches!(
            rf.predict(&array![[1.0]]),
            Err(RegimeError::NotFitted(_))
        ));

        let mut rf = forest(3);
        assert!(matches!(
            rf.fit(&array![[1.0], [2.0]], &[0]),
            Err(RegimeError::LengthMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            rf.fit(&Array2::zeros((0, 2)), &[]),
            Err(RegimeError::EmptyInput(_))
        ));

        let (x, y) = two_blobs();
        rf.fit(&x, &y).unwrap();
        assert!(matches!(
            rf.predict(&array![[1.0, 2.0, 3.0]]),
            Err(RegimeError::ShapeMismatch(_))
        ));

        for config in [
            ForestConfig { n_estimators: 0, ..ForestConfig::default() },
            ForestConfig { min_samples_split: 1, ..ForestConfig::default() },
            ForestConfig { max_features: Some(0), ..ForestConfig::default() },
        ] {
            assert!(matches!(RandomForest::new(config), Err(RegimeError::InvalidConfig(_))));
        }
    }
}
