use clap::Parser;

/// This program generates static, self-contained animated HTML charts from CSV data.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The kind of chart to generate: 'bar' (animated horizontal bar race), 'map'
    /// (animated US-state choropleth) or 'pie' (animated donut).
    #[clap(long = "type", value_parser)]
    pub chart_type: String,

    /// (file path, optional) The CSV file to read. Each chart type has its own default
    /// under the data/ directory.
    #[clap(short, long, value_parser)]
    pub data: Option<String>,

    /// (file path, optional) Where the HTML document will be written. Each chart type
    /// has its own default under the dist/ directory.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (bar type only) The number of bars to keep per animation frame.
    #[clap(long, value_parser, default_value_t = 8)]
    pub top_n: usize,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
