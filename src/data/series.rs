//! Labelled scalar series and its two-column CSV form.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use crate::error::{RegimeError, Result};
use crate::windowing::{WindowEnd, WindowedDataset, extract_windows};

/// Largest regime label accepted from CSV
pub const MAX_REGIME_LABEL: usize = u32::MAX as usize;

#[derive(Debug, Deserialize)]
struct RawRecord {
    value: f64,
    // Other tools write labels as 0.0 / 1.0
    regime: f64,
}

#[derive(Debug, Serialize)]
struct Record {
    value: f64,
    regime: usize,
}

/// Observations with one regime label per sample, in time order
#[derive(Debug, Clone, PartialEq)]
pub struct RegimeSeries {
    pub values: Vec<f64>,
    pub labels: Vec<usize>,
}

impl RegimeSeries {
    /// # Errors
    /// `LengthMismatch` if the two sequences differ in length.
    pub fn new(values: Vec<f64>, labels: Vec<usize>) -> Result<Self> {
        if values.len() != labels.len() {
            return Err(RegimeError::LengthMismatch {
                expected: values.len(),
                actual: labels.len(),
            });
        }
        Ok(Self { values, labels })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        ArrayView1::from(&self.values[..])
    }

    /// Distinct labels, ascending
    pub fn regimes(&self) -> Vec<usize> {
        let mut regimes = self.labels.clone();
        regimes.sort_unstable();
        regimes.dedup();
        regimes
    }

    /// Number of distinct labels
    pub fn n_regimes(&self) -> usize {
        self.regimes().len()
    }

    /// Slide a window of length `window` over the series
    pub fn windows(&self, window: usize, end: WindowEnd) -> Result<WindowedDataset> {
        extract_windows(&self.values, &self.labels, window, end)
    }

    /// Read a `value,regime` CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }

    /// Read `value,regime` records from any reader (header required)
    ///
    /// # Errors
    /// `InvalidValue` for non-finite values, or for labels that are not
    /// whole numbers in `0..=MAX_REGIME_LABEL`; `Csv` for malformed rows.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut values = Vec::new();
        let mut labels = Vec::new();

        for (row, record) in rdr.deserialize::<RawRecord>().enumerate() {
            let RawRecord { value, regime } = record?;
            if !value.is_finite() {
                return Err(RegimeError::InvalidValue(format!(
                    "row {}: value {} is not finite",
                    row + 1,
                    value
                )));
            }
            let integral = regime.is_finite() && regime.fract() == 0.0;
            if !integral || regime < 0.0 || regime > MAX_REGIME_LABEL as f64 {
                return Err(RegimeError::InvalidValue(format!(
                    "row {}: regime {} is not an integer label in 0..={}",
                    row + 1,
                    regime,
                    MAX_REGIME_LABEL
                )));
            }
            values.push(value);
            labels.push(regime as usize);
        }

        Ok(Self { values, labels })
    }

    /// Write a `value,regime` CSV file, replacing any existing file
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_writer(File::create(path)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for (&value, &regime) in self.values.iter().zip(&self.labels) {
            wtr.serialize(Record { value, regime })?;
        }
        wtr.flush()?;
        Ok(())
    }
}
