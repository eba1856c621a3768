// src/api/report.rs

//! Plain-text and JSON rendering of a [`QueryReport`].

use std::fmt;

use serde::Serialize;

use super::runner::{QueryReport, RankedNeighbor};
use crate::core::common::KdSearchError;
use crate::core::performance::as_millis_f64;
use crate::core::records::TextLookup;

/// Quoted JSON string, or the placeholder when there is no text.
fn quoted_text(text: Option<&str>) -> String {
    text.and_then(|t| serde_json::to_string(t).ok())
        .unwrap_or_else(|| TextLookup::MISSING.to_string())
}

fn phase_millis(report: &QueryReport, name: &str) -> f64 {
    report.timings.phase(name).map_or(0.0, as_millis_f64)
}

/// Human-readable form of a report: the query, one block per neighbor, and
/// the timing block when `show_performance` is set.
pub struct TextReport<'a> {
    report: &'a QueryReport,
    show_performance: bool,
}

impl<'a> TextReport<'a> {
    pub fn new(report: &'a QueryReport, show_performance: bool) -> Self {
        Self { report, show_performance }
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        writeln!(f, "query:")?;
        writeln!(f, "  text:    {}\n", quoted_text(report.query_text.as_deref()))?;

        for neighbor in &report.neighbors {
            writeln!(f, "Neighbor {}:", neighbor.rank)?;
            writeln!(f, "  id:      {}, dist = {}", neighbor.id, neighbor.distance)?;
            writeln!(f, "  text:    {}\n", quoted_text(neighbor.text.as_deref()))?;
        }

        if self.show_performance {
            let build_label = match report.backend.as_str() {
                "kdtree" => "KD-tree",
                _ => "Linear index",
            };
            writeln!(f, "#### Performance Metrics ####")?;
            writeln!(f, "Elapsed time: {:.3} ms", as_millis_f64(report.timings.elapsed()))?;
            writeln!(f, "Processing time: {:.3} ms", phase_millis(report, "processing"))?;
            writeln!(f, "{} build time: {:.3} ms", build_label, phase_millis(report, "build"))?;
            writeln!(f, "K-NN query time: {:.3} ms", phase_millis(report, "query"))?;
        }
        Ok(())
    }
}

/// Renders the human-readable report; see [`TextReport`].
pub fn render(report: &QueryReport, show_performance: bool) -> String {
    TextReport::new(report, show_performance).to_string()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    query_text: Option<&'a str>,
    backend: &'a str,
    dimension: usize,
    point_count: usize,
    neighbors: &'a [RankedNeighbor],
    #[serde(skip_serializing_if = "Option::is_none")]
    timings_ms: Option<Vec<(&'a str, f64)>>,
}

/// Renders the report as pretty-printed JSON.
pub fn render_json(report: &QueryReport, show_performance: bool) -> Result<String, KdSearchError> {
    let timings_ms = show_performance.then(|| {
        report
            .timings
            .phases()
            .iter()
            .map(|(name, duration)| (name.as_str(), as_millis_f64(*duration)))
            .collect()
    });
    let view = JsonReport {
        query_text: report.query_text.as_deref(),
        backend: &report.backend,
        dimension: report.dimension,
        point_count: report.point_count,
        neighbors: &report.neighbors,
        timings_ms,
    };
    Ok(serde_json::to_string_pretty(&view)?)
}
