use log::{debug, info};

use snafu::{prelude::*, Snafu};

use std::path::PathBuf;

use chart_transforms::{dense_pivot, top_n_by_frame, TransformError};

pub mod figure;
pub mod html;
pub mod io_csv;
pub mod schema;

use crate::viz::figure::Figure;

#[derive(Debug, Snafu)]
pub enum VizError {
    #[snafu(display("{kind} data must contain columns {required:?}, got {present:?}"))]
    Schema {
        kind: String,
        required: Vec<String>,
        present: Vec<String>,
    },

    #[snafu(display("Line {lineno}: column '{column}' is not numeric, got {value:?}"))]
    DataType {
        lineno: usize,
        column: String,
        value: String,
    },

    #[snafu(display("{source}"))]
    Transform { source: TransformError },

    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },

    #[snafu(display("Error reading a CSV record"))]
    CsvLineParse { source: csv::Error },

    #[snafu(display("Line {lineno} is missing some columns"))]
    CsvLineTooShort { lineno: usize },

    #[snafu(display("Error serializing the figure to JSON"))]
    SerializingFigure { source: serde_json::Error },

    #[snafu(display("Error writing output file {path}"))]
    WritingHtml {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type VizResult<T> = Result<T, VizError>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ChartKind {
    BarRace,
    Choropleth,
    Pie,
}

const DEFAULT_BAR_CSV: &str = "data/bar_race_sample.csv";
const DEFAULT_MAP_CSV: &str = "data/median_income_states.csv";
const DEFAULT_PIE_CSV: &str = "data/revenue_pie_sample.csv";

const DEFAULT_BAR_OUT: &str = "dist/bar_race.html";
const DEFAULT_MAP_OUT: &str = "dist/median_income_map.html";
const DEFAULT_PIE_OUT: &str = "dist/revenue_pie.html";

/// The configuration of one build invocation.
///
/// Defaults are resolved once at the CLI boundary; the build functions never
/// consult any implicit global paths.
#[derive(PartialEq, Debug, Clone)]
pub struct BuildConfig {
    pub kind: ChartKind,
    pub data: PathBuf,
    pub out: PathBuf,
    pub top_n: usize,
}

impl BuildConfig {
    pub fn resolve(
        kind: ChartKind,
        data: Option<String>,
        out: Option<String>,
        top_n: usize,
    ) -> BuildConfig {
        let (default_data, default_out) = match kind {
            ChartKind::BarRace => (DEFAULT_BAR_CSV, DEFAULT_BAR_OUT),
            ChartKind::Choropleth => (DEFAULT_MAP_CSV, DEFAULT_MAP_OUT),
            ChartKind::Pie => (DEFAULT_PIE_CSV, DEFAULT_PIE_OUT),
        };
        BuildConfig {
            kind,
            data: data
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default_data)),
            out: out
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default_out)),
            top_n,
        }
    }
}

/// Runs one complete build: read and validate the input, shape the data,
/// assemble the figure and write the document.
///
/// Either a complete valid document is written, or nothing is written.
pub fn run_build(config: &BuildConfig) -> VizResult<()> {
    debug!("run_build: config: {:?}", config);
    let fig = match config.kind {
        ChartKind::BarRace => build_bar_race(config)?,
        ChartKind::Choropleth => build_map(config)?,
        ChartKind::Pie => build_pie(config)?,
    };
    let doc = html::render_document(&fig)?;
    html::write_document(&config.out, &doc)?;
    println!("Wrote: {}", config.out.display());
    Ok(())
}

/// Animated horizontal bar 'race'.
fn build_bar_race(config: &BuildConfig) -> VizResult<Figure> {
    let rows = io_csv::read_bar_rows(&config.data)?;
    info!(
        "build_bar_race: {} rows read from {}",
        rows.len(),
        config.data.display()
    );
    let filtered = top_n_by_frame(&rows, config.top_n).context(TransformSnafu)?;
    debug!("build_bar_race: {} rows after top-n filter", filtered.len());
    Ok(figure::bar_race_figure(&filtered, config.top_n))
}

/// Animated US-state choropleth over time.
fn build_map(config: &BuildConfig) -> VizResult<Figure> {
    let rows = io_csv::read_state_rows(&config.data)?;
    info!(
        "build_map: {} rows read from {}",
        rows.len(),
        config.data.display()
    );
    if rows.is_empty() {
        return Err(VizError::Transform {
            source: TransformError::EmptyDataset,
        });
    }
    Ok(figure::choropleth_figure(&rows))
}

/// Animated donut with one frame per year and one stable-colored slice per
/// category.
fn build_pie(config: &BuildConfig) -> VizResult<Figure> {
    let rows = io_csv::read_pie_rows(&config.data)?;
    info!(
        "build_pie: {} rows read from {}",
        rows.len(),
        config.data.display()
    );
    let grid = dense_pivot(&rows).context(TransformSnafu)?;
    debug!(
        "build_pie: grid is {} years x {} categories",
        grid.years.len(),
        grid.categories.len()
    );
    Ok(figure::pie_figure(&grid))
}
