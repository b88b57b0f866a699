//! Standard scaling of feature columns.

use ndarray::{Array1, Array2, Axis};

use super::{Fittable, Transformer};
use crate::error::{RegimeError, Result};

/// Columns below this standard deviation are treated as constant
const MIN_SCALE: f64 = 1e-12;

/// Per-column z-score: (x − mean) / std, statistics learned at fit
#[derive(Debug, Clone, Default)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted column means
    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    /// Fitted column scales (population std, 1 for constant columns)
    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.scale.as_ref()
    }

    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }
}

impl Transformer<Array2<f64>> for StandardScaler {
    type Output = Array2<f64>;

    fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (Some(mean), Some(scale)) = (&self.mean, &self.scale) else {
            return Err(RegimeError::NotFitted("standard scaler"));
        };
        if x.ncols() != mean.len() {
            return Err(RegimeError::ShapeMismatch(format!(
                "scaler fitted on {} columns, got {}",
                mean.len(),
                x.ncols()
            )));
        }
        Ok((x - mean) / scale)
    }
}

impl Fittable<Array2<f64>> for StandardScaler {
    fn fit(&mut self, x: &Array2<f64>, _labels: &[usize]) -> Result<()> {
        let Some(mean) = x.mean_axis(Axis(0)) else {
            return Err(RegimeError::EmptyInput("cannot fit scaler on zero rows".into()));
        };
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < MIN_SCALE { 1.0 } else { s });

        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_zero_mean_unit_variance() {
        let x = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0], [4.0, 40.0]];
        let mut scaler = StandardScaler::new();
        let z = scaler.fit_transform(&x, &[]).unwrap();

        for col in z.axis_iter(Axis(1)) {
            assert_abs_diff_eq!(col.mean().unwrap(), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(col.std(0.0), 1.0, epsilon = 1e-12);
        }
        assert_eq!(scaler.mean().unwrap(), &array![2.5, 25.0]);
    }

    #[test]
    fn test_constant_column_maps_to_zero() {
        let x = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let mut scaler = StandardScaler::new();
        let z = scaler.fit_transform(&x, &[]).unwrap();
        assert_eq!(scaler.scale().unwrap()[0], 1.0);
        assert!(z.column(0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_statistics_frozen_after_fit() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&array![[0.0], [2.0]], &[]).unwrap();
        let z = scaler.transform(&array![[4.0], [1.0]]).unwrap();
        assert_eq!(z, array![[3.0], [0.0]]);
    }

    #[test]
    fn test_errors() {
        let scaler = StandardScaler::new();
        assert!(matches!(
            scaler.transform(&array![[1.0]]),
            Err(RegimeError::NotFitted(_))
        ));

        let mut scaler = StandardScaler::new();
        assert!(matches!(
            scaler.fit(&Array2::zeros((0, 2)), &[]),
            Err(RegimeError::EmptyInput(_))
        ));

        scaler.fit(&array![[1.0, 2.0], [3.0, 4.0]], &[]).unwrap();
        assert!(matches!(
            scaler.transform(&array![[1.0]]),
            Err(RegimeError::ShapeMismatch(_))
        ));
    }
}
