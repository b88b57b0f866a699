//! Stage Traits: Standardized API for Pipeline Composition
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Transformer<I>   transform(&I) -> Output     (stateless use) │
//! │  Fittable<I>      fit(&I, labels)             (learn state)   │
//! │                   fit_transform(&I, labels) -> Output         │
//! │  Classifier       fit(X, y) / predict(X)      (final stage)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use ndarray::Array2;

use crate::error::Result;

/// A stage that maps its input to a new representation
pub trait Transformer<I: ?Sized> {
    type Output;

    /// Apply the stage. Must not mutate learned state.
    fn transform(&self, input: &I) -> Result<Self::Output>;
}

/// A stage with (possibly empty) learned state
pub trait Fittable<I: ?Sized>: Transformer<I> {
    /// Learn the stage's parameters from training data
    fn fit(&mut self, input: &I, labels: &[usize]) -> Result<()>;

    /// Fit, then transform the same data
    fn fit_transform(
        &mut self,
        input: &I,
        labels: &[usize],
    ) -> Result<<Self as Transformer<I>>::Output> {
        self.fit(input, labels)?;
        self.transform(input)
    }
}

/// Supervised classifier over a fixed-width feature matrix
pub trait Classifier {
    fn fit(&mut self, x: &Array2<f64>, y: &[usize]) -> Result<()>;

    /// One label per row of `x`
    fn predict(&self, x: &Array2<f64>) -> Result<Vec<usize>>;

    fn is_fitted(&self) -> bool;
}
