// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One observation of an animated "race" chart: a measured value for a
/// category at a discrete time frame.
///
/// The time is kept in its string form. Frames are ordered by the
/// lexicographic order of these strings, so the data source is expected to
/// provide values whose string form sorts chronologically (`2021-04`,
/// `2021-05`, ...).
#[derive(PartialEq, Debug, Clone)]
pub struct FrameRow {
    pub time: String,
    pub category: String,
    pub value: f64,
}

/// One observation of an animated pie chart: an amount attributed to a
/// category in a given year.
#[derive(PartialEq, Debug, Clone)]
pub struct SliceRow {
    pub year: String,
    pub category: String,
    pub amount: f64,
}

// ******** Output data structures *********

/// A complete (year x category) grid with no missing combination.
///
/// `years` and `categories` are the ordered key sequences that drive one
/// animation frame per year and one fixed-color slice per category.
#[derive(PartialEq, Debug, Clone)]
pub struct DenseGrid {
    pub years: Vec<String>,
    /// Lexicographic order. This is also the color-assignment order, so it
    /// must be identical across repeated runs on the same input.
    pub categories: Vec<String>,
    /// Row-major: `values[year_index][category_index]`.
    pub values: Vec<Vec<f64>>,
}

impl DenseGrid {
    /// The amounts for one animation frame.
    pub fn frame(&self, year_index: usize) -> &[f64] {
        &self.values[year_index]
    }
}

/// Errors that prevent a transform from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TransformError {
    /// No distinct frames or categories remain after filtering.
    EmptyDataset,
    /// The top-N bound must be strictly positive.
    InvalidTopN,
}

impl Error for TransformError {}

impl Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::EmptyDataset => {
                write!(f, "no distinct frames or categories remain after filtering")
            }
            TransformError::InvalidTopN => write!(f, "top-n must be greater than zero"),
        }
    }
}
