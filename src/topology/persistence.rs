//! Persistent Homology via the Standard Reduction Algorithm
//!
//! A persistence interval [b, d) represents a topological feature that
//! is "born" at filtration value b and "dies" at value d.
//!
//! ## Algorithm Overview
//!
//! 1. Build the filtered Vietoris-Rips complex up to dimension k+1
//! 2. Sort simplices by (filtration value, dimension, vertices)
//! 3. Reduce the Z/2 boundary matrix by left-to-right column additions
//! 4. Read persistence pairs off the pivots of the reduced matrix
//!
//! ## Interpretation
//!
//! - Long-lived features (large d-b) represent robust topological structure
//! - Short-lived features may be noise or transient phenomena
//!
//! ## Reference
//!
//! Edelsbrunner, Letscher, Zomorodian (2002). "Topological Persistence
//! and Simplification". Discrete & Computational Geometry.

use std::collections::{BTreeSet, HashMap};

use super::VietorisRips;

/// A persistence interval [birth, death)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistenceInterval {
    pub birth: f64,
    pub death: f64,
    pub dimension: usize,
}

impl PersistenceInterval {
    pub fn new(birth: f64, death: f64, dimension: usize) -> Self {
        Self { birth, death, dimension }
    }

    /// Lifetime of the feature
    pub fn persistence(&self) -> f64 {
        self.death - self.birth
    }

    /// Is this an essential feature (infinite persistence)?
    pub fn is_essential(&self) -> bool {
        self.death.is_infinite()
    }
}

/// Persistence diagram: collection of intervals over all dimensions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersistenceDiagram {
    pub intervals: Vec<PersistenceInterval>,
}

impl PersistenceDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, interval: PersistenceInterval) {
        self.intervals.push(interval);
    }

    /// Get all intervals for dimension d
    pub fn dim(&self, d: usize) -> Vec<&PersistenceInterval> {
        self.intervals.iter().filter(|i| i.dimension == d).collect()
    }

    /// Get finite intervals for dimension d
    pub fn finite_intervals(&self, d: usize) -> Vec<&PersistenceInterval> {
        self.intervals
            .iter()
            .filter(|i| i.dimension == d && !i.is_essential())
            .collect()
    }

    /// Lifetimes of the finite intervals in dimension d
    pub fn lifetimes(&self, d: usize) -> Vec<f64> {
        self.finite_intervals(d)
            .into_iter()
            .map(|i| i.persistence())
            .collect()
    }

    /// Total persistence for dimension d
    pub fn total_persistence(&self, d: usize) -> f64 {
        self.lifetimes(d).iter().sum()
    }

    /// Number of finite intervals in dimension d
    pub fn count(&self, d: usize) -> usize {
        self.finite_intervals(d).len()
    }

    /// Highest dimension present, if any
    pub fn max_dimension(&self) -> Option<usize> {
        self.intervals.iter().map(|i| i.dimension).max()
    }

    /// Drop intervals whose dimension is not listed
    pub fn retain_dimensions(&mut self, dims: &[usize]) {
        self.intervals.retain(|i| dims.contains(&i.dimension));
    }
}

/// Sparse column of the boundary matrix over Z/2
#[derive(Debug, Clone, Default)]
struct SparseColumn {
    rows: BTreeSet<usize>,
}

impl SparseColumn {
    fn is_zero(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the lowest (maximum) non-zero index
    fn low(&self) -> Option<usize> {
        self.rows.iter().next_back().copied()
    }

    fn toggle(&mut self, row: usize) {
        if !self.rows.remove(&row) {
            self.rows.insert(row);
        }
    }

    /// Symmetric difference with another column - addition in Z/2
    fn add_assign(&mut self, other: &SparseColumn) {
        for &row in &other.rows {
            self.toggle(row);
        }
    }
}

/// Compute persistent homology of a Vietoris-Rips filtration
///
/// # Arguments
/// * `vr` - Filtration over the point cloud
/// * `max_dim` - Highest homology dimension to report
///
/// # Returns
/// Intervals with death > birth for dimensions 0..=max_dim, plus
/// essential intervals (death = ∞) for classes never killed.
pub fn compute_persistence(vr: &VietorisRips, max_dim: usize) -> PersistenceDiagram {
    // Homology in dimension k needs the (k+1)-simplices that kill it
    let simplices = vr.simplices(max_dim + 1);

    let index: HashMap<&[usize], usize> = simplices
        .iter()
        .enumerate()
        .map(|(idx, s)| (s.vertices.as_slice(), idx))
        .collect();

    let m = simplices.len();
    let mut columns: Vec<SparseColumn> = Vec::with_capacity(m);
    let mut low_to_col: HashMap<usize, usize> = HashMap::new();

    for (col_idx, simplex) in simplices.iter().enumerate() {
        let mut boundary = SparseColumn::default();

        if simplex.dimension() > 0 {
            // ∂[v0, ..., vk] = Σ [v0, ..., v̂i, ..., vk]
            let mut face = Vec::with_capacity(simplex.vertices.len() - 1);
            for skip in 0..simplex.vertices.len() {
                face.clear();
                face.extend(
                    simplex
                        .vertices
                        .iter()
                        .enumerate()
                        .filter(|&(k, _)| k != skip)
                        .map(|(_, &v)| v),
                );
                if let Some(&face_idx) = index.get(face.as_slice()) {
                    boundary.toggle(face_idx);
                }
            }
        }

        while let Some(low_idx) = boundary.low() {
            match low_to_col.get(&low_idx) {
                Some(&pivot_col) => boundary.add_assign(&columns[pivot_col]),
                None => break,
            }
        }

        if let Some(low_idx) = boundary.low() {
            low_to_col.insert(low_idx, col_idx);
        }

        columns.push(boundary);
    }

    let mut diagram = PersistenceDiagram::new();
    let mut paired = vec![false; m];

    for (col_idx, column) in columns.iter().enumerate() {
        if let Some(low_idx) = column.low() {
            // This column kills the class created by simplex low_idx
            paired[low_idx] = true;
            paired[col_idx] = true;

            let birth = &simplices[low_idx];
            let death = &simplices[col_idx];
            if birth.dimension() <= max_dim && death.filtration > birth.filtration {
                diagram.add(PersistenceInterval::new(
                    birth.filtration,
                    death.filtration,
                    birth.dimension(),
                ));
            }
        }
    }

    // Unpaired positive simplices create essential classes
    for (idx, simplex) in simplices.iter().enumerate() {
        if !paired[idx] && columns[idx].is_zero() && simplex.dimension() <= max_dim {
            diagram.add(PersistenceInterval::new(
                simplex.filtration,
                f64::INFINITY,
                simplex.dimension(),
            ));
        }
    }

    diagram
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn diagram_from_distances(dm: ndarray::Array2<f64>, max_dim: usize) -> PersistenceDiagram {
        compute_persistence(&VietorisRips::new(dm, f64::INFINITY), max_dim)
    }

    #[test]
    fn test_two_points() {
        let pd = diagram_from_distances(array![[0.0, 1.0], [1.0, 0.0]], 1);

        // H0: one interval [0, 1) plus the essential component
        let finite_h0 = pd.finite_intervals(0);
        assert_eq!(finite_h0.len(), 1);
        assert!((finite_h0[0].birth - 0.0).abs() < 1e-10);
        assert!((finite_h0[0].death - 1.0).abs() < 1e-10);
        assert_eq!(pd.dim(0).iter().filter(|i| i.is_essential()).count(), 1);
        assert!(pd.dim(1).is_empty());
    }

    #[test]
    fn test_triangle() {
        // Equilateral triangle with side 1
        let pd = diagram_from_distances(
            array![
                [0.0, 1.0, 1.0],
                [1.0, 0.0, 1.0],
                [1.0, 1.0, 0.0]
            ],
            1,
        );

        // 3 components merge to 1
        assert_eq!(pd.count(0), 2);

        // The triangle fills at the same scale its edges appear
        assert!(pd.finite_intervals(1).is_empty());
    }

    #[test]
    fn test_square_cycle() {
        // Unit square: edges of length 1, diagonals √2
        let s2 = 2.0_f64.sqrt();
        let pd = diagram_from_distances(
            array![
                [0.0, 1.0, s2,  1.0],
                [1.0, 0.0, 1.0, s2 ],
                [s2,  1.0, 0.0, 1.0],
                [1.0, s2,  1.0, 0.0]
            ],
            1,
        );

        let h1 = pd.finite_intervals(1);
        assert_eq!(h1.len(), 1, "Square should have one H1 cycle");
        assert!((h1[0].birth - 1.0).abs() < 1e-10, "Cycle born at 1");
        assert!((h1[0].death - s2).abs() < 1e-10, "Cycle dies at sqrt(2)");
        assert_eq!(pd.max_dimension(), Some(1));
    }

    #[test]
    fn test_circle_has_dominant_loop() {
        let n = 16;
        let points = ndarray::Array2::from_shape_fn((n, 2), |(i, j)| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            if j == 0 { theta.cos() } else { theta.sin() }
        });
        let vr = VietorisRips::from_points(&points, f64::INFINITY).unwrap();
        let pd = compute_persistence(&vr, 1);

        let longest = pd.lifetimes(1).into_iter().fold(0.0, f64::max);
        assert!(longest > 1.0, "circle loop should persist, got {longest}");
        // n − 1 merges for a connected cloud
        assert_eq!(pd.count(0), n - 1);
    }

    #[test]
    fn test_finite_threshold_leaves_essential_components() {
        let points = array![[0.0], [1.0], [10.0]];
        let vr = VietorisRips::from_points(&points, 2.0).unwrap();
        let pd = compute_persistence(&vr, 0);

        assert_eq!(pd.count(0), 1);
        let essential = pd.dim(0).iter().filter(|i| i.is_essential()).count();
        assert_eq!(essential, vr.count_components_at(2.0));
    }

    #[test]
    fn test_retain_dimensions() {
        let mut pd = PersistenceDiagram::new();
        pd.add(PersistenceInterval::new(0.0, 1.0, 0));
        pd.add(PersistenceInterval::new(0.5, 0.7, 1));
        pd.add(PersistenceInterval::new(0.6, 0.8, 2));
        pd.retain_dimensions(&[0, 2]);
        assert_eq!(pd.intervals.len(), 2);
        assert!(pd.dim(1).is_empty());
        assert!((pd.total_persistence(2) - 0.2).abs() < 1e-12);
    }
}
