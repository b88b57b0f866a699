//! Data Module: Labelled Series, Synthetic Regimes and Attractor Export
//!
//! - [`RegimeSeries`]: aligned values and regime labels, read from and
//!   written to a `value,regime` CSV
//! - [`RegimeGenerator`]: clean sine followed by a faster noisy sine,
//!   the reference two-regime benchmark
//! - [`attractor_points`]: 3-D delay embedding of the whole series with
//!   per-point labels, exported as `x,y,z,regime` CSV for plotting

mod attractor;
mod series;
mod synthetic;

pub use attractor::{AttractorPoint, attractor_points, export_attractor, write_attractor};
pub use series::{MAX_REGIME_LABEL, RegimeSeries};
pub use synthetic::{RegimeGenerator, generate_regime_series};
