//! Plotly figure assembly.
//!
//! All rendering, layout and animation mechanics belong to the plotly.js
//! runtime; this module only prepares its declarative inputs: the initial
//! traces, the layout (including the play/pause buttons and the frame
//! slider) and one animation frame per distinct time value.

use serde::Serialize;
use serde_json::{json, Value};

use std::collections::HashSet;

use chart_transforms::{DenseGrid, FrameRow};

use crate::viz::io_csv::StateRow;

const DARK_PAPER: &str = "#0b0f14";
const DARK_GRID: &str = "#1f2937";
const DARK_FONT: &str = "#e5e7eb";
const FONT_FAMILY: &str = "Inter, Segoe UI, Roboto, Arial";

// Fixed slice palette, assigned by category order and cycled.
const PASTEL: [&str; 7] = [
    "#a5b4fc", "#86efac", "#fde68a", "#f9a8d4", "#c4b5fd", "#93c5fd", "#fda4af",
];

/// A plotly figure: the initial traces, the layout and the animation frames.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    #[serde(skip)]
    pub page_title: String,
    #[serde(skip)]
    pub page_background: &'static str,
    pub data: Vec<Value>,
    pub layout: Value,
    pub frames: Vec<Value>,
}

/// Animated horizontal bar race. `rows` must already be in canonical
/// `(time ascending, value descending)` order.
pub fn bar_race_figure(rows: &[FrameRow], top_n: usize) -> Figure {
    let mut times: Vec<String> = Vec::new();
    for r in rows.iter() {
        if times.last() != Some(&r.time) {
            times.push(r.time.clone());
        }
    }
    let max_value = rows.iter().map(|r| r.value).fold(0.0_f64, f64::max);

    let per_frame = |time: &str| -> Vec<&FrameRow> { rows.iter().filter(|r| r.time == time).collect() };
    let frames: Vec<Value> = times
        .iter()
        .map(|t| json!({ "name": t, "data": [bar_trace(&per_frame(t))] }))
        .collect();
    let data = times
        .first()
        .map(|t| vec![bar_trace(&per_frame(t))])
        .unwrap_or_default();

    let layout = json!({
        "title": { "text": format!("Top Categories Over Time (Top {})", top_n), "font": { "size": 22 } },
        "font": { "family": FONT_FAMILY, "size": 14, "color": DARK_FONT },
        "margin": { "l": 10, "r": 10, "t": 60, "b": 10 },
        "paper_bgcolor": DARK_PAPER,
        "plot_bgcolor": DARK_PAPER,
        "xaxis": { "gridcolor": DARK_GRID, "title": "Value", "range": [0.0, max_value * 1.1] },
        "yaxis": { "gridcolor": DARK_GRID, "title": "", "automargin": true },
        "showlegend": false,
        "updatemenus": [play_pause_menu(500, 350)],
        "sliders": [frame_slider("Time: ", &times)],
    });

    Figure {
        page_title: "Top Categories Over Time".to_string(),
        page_background: DARK_PAPER,
        data,
        layout,
        frames,
    }
}

fn bar_trace(rows: &[&FrameRow]) -> Value {
    let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
    let categories: Vec<&str> = rows.iter().map(|r| r.category.as_str()).collect();
    json!({
        "type": "bar",
        "orientation": "h",
        "x": &values,
        "y": &categories,
        "text": &values,
        "texttemplate": "%{text:,.0f}",
        "textposition": "outside",
        "cliponaxis": false,
    })
}

/// Animated US-state choropleth, one frame per year.
///
/// The color range is shared across all frames so that a state's color is
/// comparable from one year to the next.
pub fn choropleth_figure(rows: &[StateRow]) -> Figure {
    let mut years: Vec<String> = rows
        .iter()
        .map(|r| r.year.clone())
        .collect::<HashSet<String>>()
        .into_iter()
        .collect();
    years.sort();

    let zmin = rows
        .iter()
        .map(|r| r.median_income)
        .fold(f64::INFINITY, f64::min);
    let zmax = rows
        .iter()
        .map(|r| r.median_income)
        .fold(f64::NEG_INFINITY, f64::max);

    let per_frame = |year: &str| -> Vec<&StateRow> { rows.iter().filter(|r| r.year == year).collect() };
    let frames: Vec<Value> = years
        .iter()
        .map(|y| json!({ "name": y, "data": [choropleth_trace(&per_frame(y))] }))
        .collect();
    let data = years
        .first()
        .map(|y| vec![choropleth_trace(&per_frame(y))])
        .unwrap_or_default();

    let layout = json!({
        "title": { "text": "Median Household Income by US State (Animated)", "font": { "size": 22 } },
        "font": { "family": FONT_FAMILY, "size": 14, "color": DARK_FONT },
        "margin": { "l": 10, "r": 10, "t": 60, "b": 10 },
        "paper_bgcolor": DARK_PAPER,
        "plot_bgcolor": DARK_PAPER,
        "geo": { "scope": "usa", "bgcolor": DARK_PAPER, "lakecolor": DARK_PAPER },
        "coloraxis": {
            "colorscale": "Viridis",
            "cmin": zmin,
            "cmax": zmax,
            "colorbar": { "title": "Income", "tickformat": "~s" }
        },
        "updatemenus": [play_pause_menu(600, 400)],
        "sliders": [frame_slider("Year: ", &years)],
    });

    Figure {
        page_title: "Median Household Income by US State".to_string(),
        page_background: DARK_PAPER,
        data,
        layout,
        frames,
    }
}

fn choropleth_trace(rows: &[&StateRow]) -> Value {
    json!({
        "type": "choropleth",
        "locationmode": "USA-states",
        "locations": rows.iter().map(|r| r.abbr.as_str()).collect::<Vec<&str>>(),
        "z": rows.iter().map(|r| r.median_income).collect::<Vec<f64>>(),
        "text": rows.iter().map(|r| r.state.as_str()).collect::<Vec<&str>>(),
        "hovertemplate": "%{text}<br>Income: %{z:,.0f}<extra>%{location}</extra>",
        "coloraxis": "coloraxis",
    })
}

/// Animated donut, one frame per year and one fixed-color slice per
/// category. The grid is dense, so a category that is absent in a year
/// shrinks to zero instead of vanishing.
pub fn pie_figure(grid: &DenseGrid) -> Figure {
    let colors = slice_colors(&grid.categories);
    let pie_trace = |values: &[f64]| -> Value {
        json!({
            "type": "pie",
            "labels": &grid.categories,
            "values": values,
            "hole": 0.3,
            "sort": false,
            "marker": { "colors": &colors },
            "textinfo": "label+percent",
            "hovertemplate": "%{label}<br>%{value:,}<extra></extra>",
        })
    };

    let frames: Vec<Value> = grid
        .years
        .iter()
        .enumerate()
        .map(|(i, y)| json!({ "name": y, "data": [pie_trace(grid.frame(i))] }))
        .collect();
    let data = vec![pie_trace(grid.frame(0))];

    let layout = json!({
        "title": { "text": "Category Share by Year (Animated)", "font": { "size": 22 } },
        "font": { "family": FONT_FAMILY, "size": 14, "color": "#222" },
        "margin": { "l": 10, "r": 10, "t": 60, "b": 10 },
        "paper_bgcolor": "#ffffff",
        "plot_bgcolor": "#ffffff",
        "updatemenus": [play_pause_menu(800, 400)],
        "sliders": [frame_slider("Year: ", &grid.years)],
    });

    Figure {
        page_title: "Category Share by Year".to_string(),
        page_background: "#ffffff",
        data,
        layout,
        frames,
    }
}

fn slice_colors(categories: &[String]) -> Vec<&'static str> {
    categories
        .iter()
        .enumerate()
        .map(|(i, _)| PASTEL[i % PASTEL.len()])
        .collect()
}

fn play_pause_menu(frame_ms: u32, transition_ms: u32) -> Value {
    json!({
        "type": "buttons",
        "showactive": false,
        "x": 0.02,
        "y": 1.15,
        "xanchor": "left",
        "yanchor": "top",
        "buttons": [
            {
                "label": "▶ Play",
                "method": "animate",
                "args": [null, {
                    "frame": { "duration": frame_ms, "redraw": true },
                    "transition": { "duration": transition_ms },
                    "fromcurrent": true
                }]
            },
            {
                "label": "⏸ Pause",
                "method": "animate",
                "args": [[null], {
                    "mode": "immediate",
                    "frame": { "duration": 0, "redraw": false },
                    "transition": { "duration": 0 }
                }]
            }
        ]
    })
}

fn frame_slider(prefix: &str, names: &[String]) -> Value {
    let steps: Vec<Value> = names
        .iter()
        .map(|name| {
            json!({
                "label": name,
                "method": "animate",
                "args": [[name], {
                    "mode": "immediate",
                    "frame": { "duration": 0, "redraw": true },
                    "transition": { "duration": 0 }
                }]
            })
        })
        .collect();
    json!({
        "active": 0,
        "x": 0.1,
        "y": 0.02,
        "len": 0.8,
        "currentvalue": { "prefix": prefix, "font": { "size": 16 } },
        "steps": steps,
    })
}
