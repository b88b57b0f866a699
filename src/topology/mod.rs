//! Topology Module: Persistent Homology of Point Clouds
//!
//! Implements the mathematical structures for topological data analysis:
//! - Euclidean distance matrix
//! - Vietoris-Rips filtration (clique complex of the distance graph)
//! - Exact persistent homology by boundary matrix reduction
//!
//! ## Mathematical Background
//!
//! For a point cloud X reconstructed from one window, we construct a
//! filtration of simplicial complexes VR_ε(X) indexed by the scale
//! parameter ε. Persistent homology tracks the birth and death of
//! topological features (connected components in H₀, loops in H₁, voids
//! in H₂) across this filtration.

mod vietoris_rips;
mod persistence;

pub use vietoris_rips::{Simplex, VietorisRips, distance_matrix};
pub use persistence::{PersistenceDiagram, PersistenceInterval, compute_persistence};
