//! Information Module: Persistence Entropy
//!
//! Given a persistence diagram D = {(bᵢ, dᵢ)} restricted to one homology
//! dimension, the persistent entropy is
//!
//!   H_P = -Σᵢ pᵢ log(pᵢ)
//!
//! where pᵢ = lᵢ / L, lᵢ = dᵢ - bᵢ is the lifetime of generator i,
//! and L = Σⱼ lⱼ is the total lifetime.
//!
//! ## Properties
//!
//! - Zero for a diagram with at most one feature
//! - Invariant under uniform rescaling of lifetimes (pᵢ is a ratio)
//! - Maximal, log(n), when all n lifetimes are equal
//!
//! A clean periodic window is dominated by one long loop (low H_P),
//! while a noisy window produces many comparable short-lived features
//! (high H_P).

mod entropy;

pub use entropy::{EntropyConfig, LogBase, TopologicalEntropy, persistence_entropy};
