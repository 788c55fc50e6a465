// Primitives for reading the chart CSV files.

use log::debug;
use snafu::prelude::*;

use std::path::Path;

use chart_transforms::{FrameRow, SliceRow};

use crate::viz::{schema, *};

pub const BAR_COLUMNS: [&str; 3] = ["time", "category", "value"];
pub const MAP_COLUMNS: [&str; 4] = ["year", "state", "abbr", "median_income"];
pub const PIE_COLUMNS: [&str; 3] = ["year", "category", "amount"];

/// One row of the choropleth input: a state measure for one year.
#[derive(PartialEq, Debug, Clone)]
pub struct StateRow {
    pub year: String,
    pub state: String,
    pub abbr: String,
    pub median_income: f64,
}

pub fn read_bar_rows(path: &Path) -> VizResult<Vec<FrameRow>> {
    let (header, records) = read_table(path)?;
    let idx = schema::resolve_required_columns("Bar race", &header, &BAR_COLUMNS)?;

    let mut res: Vec<FrameRow> = Vec::new();
    for (lineno, record) in number_records(&records) {
        let time = get_field(record, idx[0], lineno)?;
        let category = get_field(record, idx[1], lineno)?;
        let value = parse_numeric(get_field(record, idx[2], lineno)?, "value", lineno)?;
        res.push(FrameRow {
            time: time.to_string(),
            category: category.to_string(),
            value,
        });
    }
    debug!("read_bar_rows: {} rows from {:?}", res.len(), path);
    Ok(res)
}

pub fn read_state_rows(path: &Path) -> VizResult<Vec<StateRow>> {
    let (header, records) = read_table(path)?;
    let idx = schema::resolve_required_columns("Map", &header, &MAP_COLUMNS)?;

    let mut res: Vec<StateRow> = Vec::new();
    for (lineno, record) in number_records(&records) {
        let year = get_field(record, idx[0], lineno)?;
        let state = get_field(record, idx[1], lineno)?;
        let abbr = get_field(record, idx[2], lineno)?;
        let income = parse_numeric(get_field(record, idx[3], lineno)?, "median_income", lineno)?;
        res.push(StateRow {
            year: year.to_string(),
            state: state.to_string(),
            abbr: abbr.to_string(),
            median_income: income,
        });
    }
    debug!("read_state_rows: {} rows from {:?}", res.len(), path);
    Ok(res)
}

pub fn read_pie_rows(path: &Path) -> VizResult<Vec<SliceRow>> {
    let (header, records) = read_table(path)?;
    let idx = schema::resolve_required_columns("Pie", &header, &PIE_COLUMNS)?;

    let mut res: Vec<SliceRow> = Vec::new();
    for (lineno, record) in number_records(&records) {
        let year = get_field(record, idx[0], lineno)?;
        let category = get_field(record, idx[1], lineno)?;
        // Malformed amounts are coerced to zero rather than rejected.
        let amount = coerce_numeric(get_field(record, idx[2], lineno)?);
        res.push(SliceRow {
            year: year.to_string(),
            category: category.to_string(),
            amount,
        });
    }
    debug!("read_pie_rows: {} rows from {:?}", res.len(), path);
    Ok(res)
}

fn read_table(path: &Path) -> VizResult<(Vec<String>, Vec<csv::StringRecord>)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .context(CsvOpenSnafu {
            path: path.display().to_string(),
        })?;
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu {})?
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut records: Vec<csv::StringRecord> = Vec::new();
    for line_r in rdr.records() {
        let line = line_r.context(CsvLineParseSnafu {})?;
        records.push(line);
    }
    Ok((header, records))
}

// The header is line 1, so the first record is line 2.
fn number_records(
    records: &[csv::StringRecord],
) -> impl Iterator<Item = (usize, &csv::StringRecord)> {
    records.iter().enumerate().map(|(idx, r)| (idx + 2, r))
}

fn get_field(record: &csv::StringRecord, idx: usize, lineno: usize) -> VizResult<&str> {
    record.get(idx).context(CsvLineTooShortSnafu { lineno })
}

// Strict numeric parse. Non-finite values count as failures so that NaN does
// not leak into the ranking order.
fn parse_numeric(raw: &str, column: &str, lineno: usize) -> VizResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .context(DataTypeSnafu {
            lineno,
            column,
            value: raw,
        })
}

// Lenient variant for the pie amounts: anything that fails coercion becomes
// zero, so a malformed cell shrinks a slice instead of aborting the build.
fn coerce_numeric(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
