//! Output formatting and reporting

use anyhow::Result;
use colored::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strata_core::Literal;

use crate::OutputFormat;

/// Longest content preview shown in human output, in characters
const PREVIEW_CHARS: usize = 40;

/// Scan result for one file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub literals: Vec<Literal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    pub fn scanned(path: &Path, literals: Vec<Literal>) -> Self {
        Self {
            path: path.to_path_buf(),
            literals,
            error: None,
        }
    }

    pub fn failed(path: &Path, error: String) -> Self {
        Self {
            path: path.to_path_buf(),
            literals: Vec::new(),
            error: Some(error),
        }
    }
}

/// Summary statistics for a scan
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub files_scanned: usize,
    pub literals: usize,
    pub failures: usize,
    #[serde(skip)]
    pub duration: Duration,
}

impl ScanSummary {
    pub fn from_reports(reports: &[FileReport], duration: Duration) -> Self {
        Self {
            files_scanned: reports.len(),
            literals: reports.iter().map(|r| r.literals.len()).sum(),
            failures: reports.iter().filter(|r| r.error.is_some()).count(),
            duration,
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: &'a [FileReport],
    summary: &'a ScanSummary,
}

/// Output formatter for different formats
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn print_scan(&self, reports: &[FileReport], summary: &ScanSummary) -> Result<()> {
        match self.format {
            OutputFormat::Human => self.print_scan_human(reports, summary),
            OutputFormat::Json => self.print_json(reports, summary),
        }
    }

    pub fn print_check(&self, reports: &[FileReport], summary: &ScanSummary) -> Result<()> {
        for report in reports {
            match &report.error {
                None => println!("{} {}", "✓".green(), report.path.display()),
                Some(error) => println!("{} {}: {}", "✗".red(), report.path.display(), error),
            }
        }
        self.print_summary_human(summary);
        Ok(())
    }

    fn print_scan_human(&self, reports: &[FileReport], summary: &ScanSummary) -> Result<()> {
        for report in reports {
            if report.literals.is_empty() && report.error.is_none() {
                continue;
            }
            println!("{}", report.path.display().to_string().bold());
            for literal in &report.literals {
                println!(
                    "  {:>8}  {}  {}",
                    literal.start.to_string().cyan(),
                    format!("level {}", literal.level).dimmed(),
                    preview(&literal.content)
                );
            }
            if let Some(error) = &report.error {
                println!("  {} {}", "error:".red().bold(), error);
            }
        }
        self.print_summary_human(summary);
        Ok(())
    }

    fn print_summary_human(&self, summary: &ScanSummary) {
        println!("\n{}", "Summary:".bold());
        println!("  Files scanned: {}", summary.files_scanned);
        println!("  Literals found: {}", summary.literals);
        if summary.failures > 0 {
            println!(
                "  Files with errors: {}",
                summary.failures.to_string().red()
            );
        }
    }

    fn print_json(&self, reports: &[FileReport], summary: &ScanSummary) -> Result<()> {
        let report = JsonReport {
            files: reports,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

/// Single-line, escaped, truncated rendering of literal content
fn preview(content: &str) -> String {
    let escaped: String = content.escape_debug().collect();
    if escaped.chars().count() <= PREVIEW_CHARS {
        return format!("\"{escaped}\"");
    }
    let head: String = escaped.chars().take(PREVIEW_CHARS).collect();
    format!("\"{head}\"…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_escapes_and_truncates() {
        assert_eq!(preview("a\nb"), "\"a\\nb\"");
        let long = "x".repeat(50);
        let shown = preview(&long);
        assert!(shown.ends_with('…'));
        assert_eq!(shown.chars().filter(|c| *c == 'x').count(), PREVIEW_CHARS);
    }

    #[test]
    fn summary_counts_literals_and_failures() {
        let ok = FileReport::scanned(
            Path::new("a.lua"),
            strata_core::scan("[[a]] [[b]]", &Default::default()).unwrap(),
        );
        let bad = FileReport::failed(Path::new("b.lua"), "unterminated".into());
        let summary = ScanSummary::from_reports(&[ok, bad], Duration::ZERO);
        assert_eq!(summary.files_scanned, 2);
        assert_eq!(summary.literals, 2);
        assert_eq!(summary.failures, 1);
    }
}
