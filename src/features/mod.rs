//! Features Module: Point Clouds to Topological Feature Vectors
//!
//! Each point cloud goes through
//!
//! 1. Point cloud → persistence diagram (Vietoris-Rips, Euclidean metric)
//! 2. Diagram → one persistence entropy per requested homology dimension
//!
//! Columns of the resulting feature matrix follow the homology dimensions
//! in ascending order (H₀ first, then H₁, …), so downstream models can
//! rely on feature position.

mod extractor;

pub use extractor::{FeatureConfig, TopologicalFeatures};
