// Final document assembly and writing.
//
// The plotly.js runtime is loaded from its CDN, so the document needs
// network access to render. This mirrors the upstream export behavior and
// keeps the document small.

use log::debug;
use snafu::prelude::*;

use std::fs;
use std::path::Path;

use crate::viz::figure::Figure;
use crate::viz::{SerializingFigureSnafu, VizResult, WritingHtmlSnafu};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.32.0.min.js";

/// Renders a complete standalone HTML document embedding the figure and the
/// CDN reference to the rendering runtime.
pub fn render_document(fig: &Figure) -> VizResult<String> {
    let figure_json = serde_json::to_string(fig).context(SerializingFigureSnafu {})?;
    let doc = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}" charset="utf-8"></script>
<style>
html, body {{ margin: 0; padding: 0; background: {background}; }}
#chart {{ width: 100vw; height: 100vh; }}
</style>
</head>
<body>
<div id="chart"></div>
<script>
var figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout, {{"responsive": true}}).then(function (gd) {{
    Plotly.addFrames(gd, figure.frames);
}});
</script>
</body>
</html>
"#,
        title = html_escape(&fig.page_title),
        cdn = PLOTLY_CDN,
        background = fig.page_background,
        figure = figure_json,
    );
    Ok(doc)
}

/// Writes the document, creating parent directories as needed. Creation is
/// idempotent: an already existing directory is not an error.
pub fn write_document(path: &Path, doc: &str) -> VizResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingHtmlSnafu {
                path: path.display().to_string(),
            })?;
        }
    }
    fs::write(path, doc).context(WritingHtmlSnafu {
        path: path.display().to_string(),
    })?;
    debug!("write_document: {} bytes to {:?}", doc.len(), path);
    Ok(())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_embeds_runtime_and_figure() {
        let fig = Figure {
            page_title: "A <test> & more".to_string(),
            page_background: "#ffffff",
            data: vec![json!({"type": "bar"})],
            layout: json!({"showlegend": false}),
            frames: vec![],
        };
        let doc = render_document(&fig).unwrap();
        assert!(doc.contains(PLOTLY_CDN));
        assert!(doc.contains("<title>A &lt;test&gt; &amp; more</title>"));
        assert!(doc.contains(r#""showlegend":false"#));
        assert!(doc.contains("Plotly.newPlot"));
    }
}
