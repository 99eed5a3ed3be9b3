use std::fmt::Write as _;
use std::path::Path;

use crate::analysis::AnalysisSummary;
use crate::error::Result;

/// Render the plain-text summary of a run
pub fn render_text_report(summary: &AnalysisSummary) -> String {
    let mut out = String::new();
    out.push_str("Log Analysis Report\n");
    out.push_str("===================\n");
    let _ = writeln!(out, "Total entries: {}", summary.total_entries());
    let _ = writeln!(out, "Total alerts: {}", summary.alerts.len());
    out.push('\n');
    out.push_str("Alerts:\n");

    if summary.alerts.is_empty() {
        out.push_str("None detected.\n");
    } else {
        for alert in &summary.alerts {
            let _ = writeln!(out, "- {}", alert.message);
        }
    }
    out
}

pub fn write_text_report(path: &Path, summary: &AnalysisSummary) -> Result<()> {
    std::fs::write(path, render_text_report(summary))?;
    log::info!("Wrote report to {:?}", path);
    Ok(())
}
