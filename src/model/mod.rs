//! Model Module: Scaling, Classification and Pipeline Composition
//!
//! ```text
//! windows (n × W)
//!   │  TakensEmbedding        → n point clouds (M × m)
//!   │  TopologicalFeatures    → n × |dims| persistence entropies
//!   │  StandardScaler         → z-scored features
//!   ▼  RandomForest           → regime label per window
//! ```
//!
//! Every stage implements the traits in [`traits`]; the pipeline fits them
//! in order on training windows and replays their frozen state at predict
//! time. Stages other than the scaler and forest have no learned state,
//! so their `fit` is a no-op.
//!
//! ## Reproducibility
//!
//! Tree t of the forest draws all randomness (bootstrap rows, feature
//! subsets) from `StdRng::seed_from_u64(seed + t)`. Trees are collected in
//! index order regardless of thread count, so a fixed seed reproduces the
//! same predictions on any machine.

mod forest;
mod pipeline;
mod scaler;
pub mod traits;
mod tree;

pub use forest::{ForestConfig, RandomForest};
pub use pipeline::{PipelineConfig, RegimePipeline};
pub use scaler::StandardScaler;
pub use traits::{Classifier, Fittable, Transformer};
