//! 3-D delay embedding of a full series, for plotting the attractor.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use super::RegimeSeries;
use crate::embedding::delay_embed;
use crate::error::{RegimeError, Result};

/// One delay vector (x_i, x_{i+τ}, x_{i+2τ}) with the regime of x_{i+2τ}
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttractorPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub regime: usize,
}

/// Embed the whole series in ℝ³ with delay `delay`
///
/// # Errors
/// `InvalidEmbeddingConfig` for a zero delay, `EmptyInput` when the
/// series has fewer than 2τ + 1 samples.
pub fn attractor_points(series: &RegimeSeries, delay: usize) -> Result<Vec<AttractorPoint>> {
    if delay == 0 {
        return Err(RegimeError::InvalidEmbeddingConfig(
            "time delay must be at least 1".into(),
        ));
    }
    let Some(cloud) = delay_embed(series.view(), delay, 3) else {
        return Err(RegimeError::EmptyInput(format!(
            "series of length {} too short for a 3-D embedding with delay {}",
            series.len(),
            delay
        )));
    };

    Ok(cloud
        .outer_iter()
        .enumerate()
        .map(|(i, row)| AttractorPoint {
            x: row[0],
            y: row[1],
            z: row[2],
            regime: series.labels[i + 2 * delay],
        })
        .collect())
}

/// Write points as `x,y,z,regime` CSV
pub fn write_attractor<W: Write>(points: &[AttractorPoint], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for point in points {
        wtr.serialize(point)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Embed `series` and write the attractor CSV to `path`; returns the
/// number of points written.
pub fn export_attractor<P: AsRef<Path>>(
    series: &RegimeSeries,
    delay: usize,
    path: P,
) -> Result<usize> {
    let points = attractor_points(series, delay)?;
    write_attractor(&points, File::create(path)?)?;
    Ok(points.len())
}
