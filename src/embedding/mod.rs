//! Embedding Module: Phase-Space Reconstruction by Time Delays
//!
//! Takens' theorem: for a generic scalar observable x(t) of a dynamical
//! system, the delay vectors
//!
//!   v_i = [x_i, x_{i+τ}, x_{i+2τ}, …, x_{i+(m−1)τ}]
//!
//! trace a trajectory diffeomorphic to the original attractor when m is
//! large enough. Each window of length W therefore becomes a point cloud
//! of M = W − (m−1)τ points in ℝ^m.
//!
//! ## Topological Signatures
//!
//! - **Periodic regime**: the cloud samples a closed loop → one long-lived
//!   H₁ feature, low persistence entropy
//! - **Noisy / chaotic regime**: the cloud fills a ball → many short-lived
//!   features of similar lifetime, high persistence entropy
//!
//! Windows too short for the requested (τ, m) cannot be embedded; they
//! become a single zero point and are counted (see [`EmbeddingOutput`]).

mod takens;

pub use takens::{
    EmbeddingConfig,
    EmbeddingOutput,
    PointCloud,
    TakensEmbedding,
    delay_embed,
};
