// Ranked report rendering

use crate::rank::{RankEntry, RankReport};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Number of ranked entries shown when not configured.
pub const DEFAULT_DISPLAY: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedRow {
    pub position: usize,
    #[serde(flatten)]
    pub entry: RankEntry,
}

/// The first `display` entries, numbered from 1.
pub fn top_entries(report: &RankReport, display: usize) -> Vec<RankedRow> {
    report
        .entries
        .iter()
        .take(display)
        .enumerate()
        .map(|(i, entry)| RankedRow {
            position: i + 1,
            entry: entry.clone(),
        })
        .collect()
}

/// Plain-text ranking table headed by the url count and elapsed time.
///
/// `in` counts the pages linking to a row's url (column sum of the relation)
/// and `out` the pages it links to (row sum). Tables written by older tools
/// that printed the row sum under `in` will show these two columns swapped.
pub fn generate_text_report(report: &RankReport, display: usize) -> String {
    let mut text = String::new();

    text.push_str(&format!("url count: {}\n", report.node_count()));
    text.push_str(&format!(
        "time elapsed: {} ms ({})\n",
        report.elapsed.as_millis(),
        report.method.as_str()
    ));
    text.push_str(&format!(
        "{:>4} {:>8} {:>4} {:>4} {}\n",
        "rank", "score", "in", "out", "url"
    ));

    for row in top_entries(report, display) {
        text.push_str(&format!(
            "{:>3}. {:.6} {:>4} {:>4} {}\n",
            row.position, row.entry.score, row.entry.links_in, row.entry.links_out, row.entry.url
        ));
    }

    text
}

pub fn generate_json_report(
    report: &RankReport,
    display: usize,
) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "metadata": {
            "generator": "pagerank",
            "version": env!("CARGO_PKG_VERSION"),
            "method": report.method.as_str(),
            "elapsed_ms": report.elapsed.as_millis() as u64,
        },
        "url_count": report.node_count(),
        "ranking": top_entries(report, display),
    });

    serde_json::to_string_pretty(&json_report)
}

/// Boolean adjacency matrix, one row per page in graph order: `#` marks an
/// edge from the row's page to the column's page.
pub fn render_relation_matrix(report: &RankReport) -> String {
    let mut text = String::new();

    for (i, row) in report.relation.iter().enumerate() {
        let cells: String = row.iter().map(|&edge| if edge { '#' } else { '.' }).collect();
        text.push_str(&format!("{:>4} {} {}\n", i, cells, report.nodes[i]));
    }

    text
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
