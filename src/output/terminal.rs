//! Terminal summary of a run.

use crate::bgp::ScanReport;
use crate::processing::Summary;
use colored::Colorize;
use itertools::Itertools;

/// Format a `label: value` line with the value right-aligned to `width`.
pub fn format_row<T: ToString>(label: &str, value: T, width: usize) -> String {
    let value = value.to_string();
    format!("{label:<20}{value:>width$}")
}

/// Lines printed at the end of a run.
pub fn summary_lines(summary: &Summary, report: &ScanReport) -> Vec<String> {
    let mut lines = vec![
        format_row("ASNs scanned", report.asns.len(), 8),
        format_row("Unique tokens", report.cidrs.len(), 8),
        format_row("Accepted", summary.accepted, 8),
        format_row("IPv4 prefixes", summary.result.ipv4.len(), 8),
        format_row("IPv6 prefixes", summary.result.ipv6.len(), 8),
        format_row("Skipped tokens", summary.skipped.len(), 8),
    ];
    lines.extend(summary.skipped.iter().map(|e| format!("  - {e}")));
    if !report.failed.is_empty() {
        lines.push(format!("Not retrieved: {}", report.failed.iter().join(", ")));
    }
    lines
}

pub fn print_summary(summary: &Summary, report: &ScanReport) {
    println!("{}", "# Summary".bold());
    for line in summary_lines(summary, report) {
        if line.starts_with("  - ") || line.starts_with("Not retrieved") {
            println!("{}", line.yellow());
        } else {
            println!("{line}");
        }
    }
}
