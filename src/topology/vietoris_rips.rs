//! Vietoris-Rips Complex Construction
//!
//! The Vietoris-Rips complex VR_ε(X) is a simplicial complex where:
//! - 0-simplices are the points in X
//! - A k-simplex [v₀, ..., vₖ] exists iff d(vᵢ, vⱼ) ≤ ε for all i,j
//!
//! The filtration value of a simplex is its diameter (largest pairwise
//! distance among its vertices), so sweeping ε from 0 to the threshold
//! yields a nested family of complexes.

use ndarray::Array2;
use std::cmp::Ordering;

use crate::error::{RegimeError, Result};

/// A simplex with the filtration value at which it enters the complex.
#[derive(Debug, Clone, PartialEq)]
pub struct Simplex {
    /// Vertex indices, ascending
    pub vertices: Vec<usize>,
    /// Diameter of the simplex (0 for vertices)
    pub filtration: f64,
}

impl Simplex {
    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }
}

/// Vietoris-Rips filtration over a Euclidean point cloud
#[derive(Debug, Clone)]
pub struct VietorisRips {
    /// Distance matrix (precomputed)
    distances: Array2<f64>,
    /// Largest edge admitted to the filtration
    max_edge_length: f64,
}

impl VietorisRips {
    /// Create from a precomputed distance matrix
    pub fn new(distances: Array2<f64>, max_edge_length: f64) -> Self {
        Self {
            distances,
            max_edge_length,
        }
    }

    /// Create from point cloud (computes Euclidean distance matrix)
    ///
    /// # Errors
    /// `InvalidValue` if any coordinate is NaN or infinite.
    pub fn from_points(points: &Array2<f64>, max_edge_length: f64) -> Result<Self> {
        if let Some(bad) = points.iter().find(|v| !v.is_finite()) {
            return Err(RegimeError::InvalidValue(format!(
                "point cloud contains non-finite coordinate {bad}"
            )));
        }
        Ok(Self::new(distance_matrix(points), max_edge_length))
    }

    pub fn distances(&self) -> &Array2<f64> {
        &self.distances
    }

    pub fn max_edge_length(&self) -> f64 {
        self.max_edge_length
    }

    /// Number of points
    pub fn n_points(&self) -> usize {
        self.distances.nrows()
    }

    /// All simplices up to `max_dim`, in filtration order.
    ///
    /// Order is (filtration value, dimension, vertex list), which places
    /// every face before its cofaces.
    pub fn simplices(&self, max_dim: usize) -> Vec<Simplex> {
        let n = self.n_points();
        let mut out = Vec::new();
        let mut current = Vec::with_capacity(max_dim + 1);

        for u in 0..n {
            let candidates: Vec<usize> = (u + 1..n)
                .filter(|&w| self.distances[[u, w]] <= self.max_edge_length)
                .collect();
            current.push(u);
            self.expand(&mut current, 0.0, &candidates, max_dim, &mut out);
            current.pop();
        }

        out.sort_by(|a, b| {
            a.filtration
                .total_cmp(&b.filtration)
                .then(a.dimension().cmp(&b.dimension()))
                .then_with(|| a.vertices.cmp(&b.vertices))
        });
        out
    }

    /// Emit `current` and recursively every clique extending it by
    /// vertices from `candidates` (all adjacent to every vertex in `current`).
    fn expand(
        &self,
        current: &mut Vec<usize>,
        filtration: f64,
        candidates: &[usize],
        max_dim: usize,
        out: &mut Vec<Simplex>,
    ) {
        out.push(Simplex {
            vertices: current.clone(),
            filtration,
        });
        if current.len() > max_dim {
            return;
        }

        for (k, &v) in candidates.iter().enumerate() {
            let diameter = current
                .iter()
                .fold(filtration, |acc, &u| acc.max(self.distances[[u, v]]));
            let next: Vec<usize> = candidates[k + 1..]
                .iter()
                .copied()
                .filter(|&w| self.distances[[v, w]] <= self.max_edge_length)
                .collect();
            current.push(v);
            self.expand(current, diameter, &next, max_dim, out);
            current.pop();
        }
    }

    /// Count connected components of VR_ε using Union-Find
    pub fn count_components_at(&self, epsilon: f64) -> usize {
        let n = self.n_points();
        let mut parent: Vec<usize> = (0..n).collect();
        let mut rank = vec![0usize; n];

        fn find(parent: &mut [usize], i: usize) -> usize {
            if parent[i] != i {
                parent[i] = find(parent, parent[i]);
            }
            parent[i]
        }

        fn union(parent: &mut [usize], rank: &mut [usize], x: usize, y: usize) {
            let rx = find(parent, x);
            let ry = find(parent, y);
            if rx != ry {
                match rank[rx].cmp(&rank[ry]) {
                    Ordering::Less => parent[rx] = ry,
                    Ordering::Greater => parent[ry] = rx,
                    Ordering::Equal => {
                        parent[ry] = rx;
                        rank[rx] += 1;
                    }
                }
            }
        }

        let epsilon = epsilon.min(self.max_edge_length);
        for i in 0..n {
            for j in i + 1..n {
                if self.distances[[i, j]] <= epsilon {
                    union(&mut parent, &mut rank, i, j);
                }
            }
        }

        (0..n).filter(|&i| find(&mut parent, i) == i).count()
    }
}

/// Compute Euclidean distance matrix
pub fn distance_matrix(points: &Array2<f64>) -> Array2<f64> {
    let n = points.nrows();
    let dim = points.ncols();

    let mut dm = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in i + 1..n {
            let mut dist_sq = 0.0;
            for d in 0..dim {
                let diff = points[[i, d]] - points[[j, d]];
                dist_sq += diff * diff;
            }
            let dist = dist_sq.sqrt();
            dm[[i, j]] = dist;
            dm[[j, i]] = dist;
        }
    }

    dm
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_distance_matrix() {
        let points = array![[0.0, 0.0], [3.0, 4.0], [0.0, 1.0]];
        let dm = distance_matrix(&points);
        assert_eq!(dm[[0, 1]], 5.0);
        assert_eq!(dm[[1, 0]], 5.0);
        assert_eq!(dm[[0, 2]], 1.0);
        assert_eq!(dm[[2, 2]], 0.0);
    }

    #[test]
    fn test_triangle_components() {
        // Equilateral triangle with side 1
        let points = array![
            [0.0, 0.0],
            [1.0, 0.0],
            [0.5, 0.866]
        ];

        let vr = VietorisRips::from_points(&points, f64::INFINITY).unwrap();

        // At ε < 1, three components
        assert_eq!(vr.count_components_at(0.8), 3);

        // At ε ≥ 1, one component
        assert_eq!(vr.count_components_at(1.2), 1);
    }

    #[test]
    fn test_simplex_enumeration() {
        // Four points: a unit square
        let points = array![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        let vr = VietorisRips::from_points(&points, f64::INFINITY).unwrap();

        let simplices = vr.simplices(2);
        let count = |d: usize| simplices.iter().filter(|s| s.dimension() == d).count();
        assert_eq!(count(0), 4);
        assert_eq!(count(1), 6);
        assert_eq!(count(2), 4);

        // Faces precede cofaces
        for (idx, s) in simplices.iter().enumerate() {
            for (jdx, t) in simplices.iter().enumerate() {
                let is_face = s.dimension() + 1 == t.dimension()
                    && s.vertices.iter().all(|v| t.vertices.contains(v));
                if is_face {
                    assert!(idx < jdx);
                }
            }
        }

        let diagonal_triangle = simplices
            .iter()
            .find(|s| s.vertices == vec![0, 1, 2])
            .unwrap();
        assert!((diagonal_triangle.filtration - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_threshold_limits_edges() {
        let points = array![[0.0], [1.0], [5.0]];
        let vr = VietorisRips::from_points(&points, 2.0).unwrap();
        let edges: Vec<_> = vr
            .simplices(1)
            .into_iter()
            .filter(|s| s.dimension() == 1)
            .collect();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].vertices, vec![0, 1]);
    }

    #[test]
    fn test_rejects_non_finite() {
        let points = array![[0.0, f64::NAN]];
        assert!(matches!(
            VietorisRips::from_points(&points, 1.0),
            Err(RegimeError::InvalidValue(_))
        ));
    }
}
