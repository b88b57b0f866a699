//! Windowing Module: Supervised Windows over a Labelled Series
//!
//! A raw series x₀, …, x_{N-1} with per-sample regime labels is cut into
//! overlapping windows of fixed length W by a unit-stride cursor. Each
//! window carries one label, so the output is a ready-to-fit supervised
//! dataset.
//!
//! ## Conventions
//!
//! - `Exclusive` (default): windows start at i ∈ [0, N−W), label is the
//!   regime of the sample *following* the window, `labels[i+W]`.
//! - `Inclusive`: windows start at i ∈ [0, N−W], label is the regime of
//!   the window's own last sample, `labels[i+W−1]`.
//!
//! Window order always equals time order, which the non-shuffled
//! train/test split relies on.

mod sliding;

pub use sliding::{WindowEnd, WindowExtractor, WindowedDataset, extract_windows};
