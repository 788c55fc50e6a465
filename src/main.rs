use clap::Parser;
use log::debug;
use snafu::ErrorCompat;

mod args;
mod viz;

use crate::args::Args;
use crate::viz::{BuildConfig, ChartKind};

fn main() {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_default_env();
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();

    debug!("arguments: {:?}", args);

    let kind = match args.chart_type.as_str() {
        "bar" => ChartKind::BarRace,
        "map" => ChartKind::Choropleth,
        "pie" => ChartKind::Pie,
        other => {
            eprintln!("Unknown chart type: {:?}", other);
            std::process::exit(2);
        }
    };

    let config = BuildConfig::resolve(kind, args.data, args.out, args.top_n);
    if let Err(e) = viz::run_build(&config) {
        eprintln!("An error occured: {}", e);
        if let Some(bt) = ErrorCompat::backtrace(&e) {
            eprintln!("trace: {}", bt);
        }
        std::process::exit(1);
    }
}
