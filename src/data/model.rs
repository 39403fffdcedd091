use std::collections::BTreeSet;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("dataset has no columns")]
    NoColumns,
    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),
    #[error("column '{column}' has {actual} values but '{first}' has {expected}")]
    UnevenColumns {
        first: String,
        expected: usize,
        column: String,
        actual: usize,
    },
}

/// Domain errors raised while building [`FitData`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitDataError {
    #[error("column '{0}' does not exist in the data")]
    MissingColumn(String),
    #[error("x has {x} values, xerr has {xerr}, y has {y} and yerr has {yerr}")]
    LengthMismatch {
        x: usize,
        xerr: usize,
        y: usize,
        yerr: usize,
    },
    #[error("records selection has {actual} entries but the data has {expected} records")]
    RecordsMismatch { expected: usize, actual: usize },
    #[error("no records were chosen")]
    Empty,
}

// ---------------------------------------------------------------------------
// Column / Dataset – the raw data dictionary
// ---------------------------------------------------------------------------

/// One named numeric column of the input file.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<f64>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Ordered mapping from column name to values. All columns share one length.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let first = columns.first().ok_or(DatasetError::NoColumns)?;
        let expected = first.values.len();

        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(DatasetError::DuplicateColumn(col.name.clone()));
            }
            if col.values.len() != expected {
                return Err(DatasetError::UnevenColumns {
                    first: first.name.clone(),
                    expected,
                    column: col.name.clone(),
                    actual: col.values.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Number of records (rows).
    pub fn records(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    /// Values of a single record across all columns, in column order.
    pub fn record(&self, index: usize) -> Vec<f64> {
        self.columns
            .iter()
            .filter_map(|c| c.values.get(index).copied())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Column selection
// ---------------------------------------------------------------------------

/// The four columns a fit is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSelection {
    pub x: String,
    pub xerr: String,
    pub y: String,
    pub yerr: String,
}

// ---------------------------------------------------------------------------
// FitData
// ---------------------------------------------------------------------------

/// The x/y values and their uncertainties that take part in a fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitData {
    pub x: Vec<f64>,
    pub xerr: Vec<f64>,
    pub y: Vec<f64>,
    pub yerr: Vec<f64>,
}

impl FitData {
    pub fn new(
        x: Vec<f64>,
        xerr: Vec<f64>,
        y: Vec<f64>,
        yerr: Vec<f64>,
    ) -> Result<Self, FitDataError> {
        let n = x.len();
        if xerr.len() != n || y.len() != n || yerr.len() != n {
            return Err(FitDataError::LengthMismatch {
                x: n,
                xerr: xerr.len(),
                y: y.len(),
                yerr: yerr.len(),
            });
        }
        if n == 0 {
            return Err(FitDataError::Empty);
        }
        Ok(Self { x, xerr, y, yerr })
    }

    /// Restrict `dataset` to the chosen records and the selected columns.
    pub fn from_dataset(
        dataset: &Dataset,
        chosen_records: &[bool],
        columns: &ColumnSelection,
    ) -> Result<Self, FitDataError> {
        if chosen_records.len() != dataset.records() {
            return Err(FitDataError::RecordsMismatch {
                expected: dataset.records(),
                actual: chosen_records.len(),
            });
        }
        let pick = |name: &str| -> Result<Vec<f64>, FitDataError> {
            dataset
                .column(name)
                .map(|values| filter_records(values, chosen_records))
                .ok_or_else(|| FitDataError::MissingColumn(name.to_string()))
        };
        Self::new(
            pick(&columns.x)?,
            pick(&columns.xerr)?,
            pick(&columns.y)?,
            pick(&columns.yerr)?,
        )
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Smallest and largest x value.
    pub fn x_range(&self) -> (f64, f64) {
        min_max(&self.x)
    }
}

/// Keep only the values whose record is chosen.
pub fn filter_records(values: &[f64], chosen_records: &[bool]) -> Vec<f64> {
    values
        .iter()
        .zip(chosen_records)
        .filter(|(_, chosen)| **chosen)
        .map(|(&v, _)| v)
        .collect()
}

pub fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}
