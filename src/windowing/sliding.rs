//! Sliding-window extraction.

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{RegimeError, Result};

/// Where the cursor is allowed to stop, and therefore which sample
/// supplies the window label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowEnd {
    /// N−W windows labelled by the following sample.
    #[default]
    Exclusive,
    /// N−W+1 windows labelled by their own last sample.
    Inclusive,
}

impl WindowEnd {
    /// Number of windows of length `window` in a series of length `len`,
    /// `None` unless `0 < window <= len`.
    pub fn window_count(self, len: usize, window: usize) -> Option<usize> {
        if window == 0 {
            return None;
        }
        let room = len.checked_sub(window)?;
        match self {
            Self::Exclusive => Some(room),
            Self::Inclusive => Some(room + 1),
        }
    }

    /// Index of the sample whose label belongs to the window starting at `start`.
    fn label_index(self, start: usize, window: usize) -> usize {
        match self {
            Self::Exclusive => start + window,
            Self::Inclusive => start + window - 1,
        }
    }
}

/// Windows (one per row) with their aligned labels.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedDataset {
    /// Shape (count, W).
    pub windows: Array2<f64>,
    /// One regime label per window.
    pub labels: Vec<usize>,
}

impl WindowedDataset {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Window length W.
    pub fn window_size(&self) -> usize {
        self.windows.ncols()
    }
}

/// Configured window extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowExtractor {
    window_size: usize,
    end: WindowEnd,
}

impl WindowExtractor {
    /// Extractor using the exclusive-end convention.
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            end: WindowEnd::Exclusive,
        }
    }

    pub fn with_end(mut self, end: WindowEnd) -> Self {
        self.end = end;
        self
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn end(&self) -> WindowEnd {
        self.end
    }

    /// Slice `series` into windows labelled from `labels`.
    pub fn extract(&self, series: &[f64], labels: &[usize]) -> Result<WindowedDataset> {
        extract_windows(series, labels, self.window_size, self.end)
    }
}

/// Slice a labelled series into overlapping unit-stride windows.
///
/// # Errors
/// * `LengthMismatch` if `series` and `labels` differ in length
/// * `InvalidWindowSize` if `window` is zero or longer than the series
pub fn extract_windows(
    series: &[f64],
    labels: &[usize],
    window: usize,
    end: WindowEnd,
) -> Result<WindowedDataset> {
    let n = series.len();
    if labels.len() != n {
        return Err(RegimeError::LengthMismatch {
            expected: n,
            actual: labels.len(),
        });
    }
    let Some(count) = end.window_count(n, window) else {
        return Err(RegimeError::InvalidWindowSize { window, len: n });
    };
    let windows = Array2::from_shape_fn((count, window), |(i, j)| series[i + j]);
    let labels = (0..count)
        .map(|i| labels[end.label_index(i, window)])
        .collect();

    Ok(WindowedDataset { windows, labels })
}
