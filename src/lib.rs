//! # TDA-Regime
//!
//! Dynamical Regime Classification of Time Series via Takens Embedding
//! and Persistent Homology
//!
//! ## Theoretical Framework
//!
//! A scalar observable of a dynamical system carries, through its delay
//! coordinates, the geometry of the underlying attractor. Different
//! regimes (periodic, noisy, chaotic) leave different *shapes* in that
//! reconstructed phase space, and persistent homology measures shape in a
//! way that is stable under small perturbations.
//!
//! ### Methodology
//!
//! 1. **Windowing**: cut the labelled series into overlapping windows of
//!    length W, one supervised example each
//!
//! 2. **Takens Embedding**: map every window to a point cloud of
//!    M = W − (m−1)τ delay vectors in ℝ^m
//!
//! 3. **Persistent Homology**: Vietoris-Rips filtration of each cloud,
//!    exact boundary-matrix reduction over Z/2 → persistence diagram
//!
//! 4. **Persistence Entropy**: Shannon entropy of the lifetime
//!    distribution per homology dimension (H₀, H₁) → feature vector
//!
//! 5. **Classification**: standard scaling and a seeded random forest
//!
//! ## Key Result
//!
//! A clean periodic window embeds to one dominant loop (low H₁ entropy);
//! a noisy window produces many comparable short-lived features (high H₁
//! entropy). The two regimes separate on these features alone.
//!
//! ## Example
//!
//! ```no_run
//! use tda_regime::{
//!     generate_regime_series, train_test_split, ClassificationReport,
//!     PipelineConfig, RegimePipeline, WindowEnd,
//! };
//!
//! # fn main() -> tda_regime::Result<()> {
//! let mut rng = rand::rng();
//! let series = generate_regime_series(1000, 0.5, &mut rng)?;
//! let data = series.windows(30, WindowEnd::Exclusive)?;
//! let split = train_test_split(&data.windows, &data.labels, 0.2)?;
//!
//! let mut pipeline = RegimePipeline::new(&PipelineConfig::default())?;
//! pipeline.fit(&split.x_train, &split.y_train)?;
//! let predicted = pipeline.predict(&split.x_test)?;
//! println!("{}", ClassificationReport::new(&split.y_test, &predicted)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## References
//!
//! - Takens, "Detecting strange attractors in turbulence" (1981)
//! - Edelsbrunner & Harer, "Computational Topology" (2010)
//! - Atienza et al., "Persistent entropy for separating topological
//!   features from noise" (2016)

pub mod error;
pub mod parallel;
pub mod windowing;
pub mod embedding;
pub mod topology;
pub mod information;
pub mod features;
pub mod model;
pub mod data;
pub mod metrics;

pub use error::{RegimeError, Result};
pub use parallel::Parallelism;

// Re-exports from windowing
pub use windowing::{WindowEnd, WindowExtractor, WindowedDataset, extract_windows};

// Re-exports from embedding
pub use embedding::{EmbeddingConfig, EmbeddingOutput, PointCloud, TakensEmbedding, delay_embed};

// Re-exports from topology
pub use topology::{
    // Complex construction
    Simplex,
    VietorisRips,
    distance_matrix,
    // Exact persistence
    PersistenceDiagram,
    PersistenceInterval,
    compute_persistence,
};

// Re-exports from information
pub use information::{EntropyConfig, LogBase, TopologicalEntropy, persistence_entropy};

// Re-exports from features
pub use features::{FeatureConfig, TopologicalFeatures};

// Re-exports from model
pub use model::{
    // Traits
    Classifier,
    Fittable,
    Transformer,
    // Stages
    StandardScaler,
    RandomForest,
    ForestConfig,
    // Composition
    RegimePipeline,
    PipelineConfig,
};

// Re-exports from data
pub use data::{
    AttractorPoint,
    RegimeGenerator,
    RegimeSeries,
    attractor_points,
    export_attractor,
    generate_regime_series,
};

pub use metrics::{ClassMetrics, ClassificationReport, Split, train_test_split};
