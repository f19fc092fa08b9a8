//! Output formatters for run reports
//!
//! Provides Table, JSON, CSV and summary output formats.

use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

use crate::executor::RunOutcome;
use crate::models::{BatchSummary, Status, TestCase};

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    JsonPretty,
    Csv,
    Summary,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            "json-pretty" | "jsonpretty" => Some(OutputFormat::JsonPretty),
            "csv" => Some(OutputFormat::Csv),
            "summary" => Some(OutputFormat::Summary),
            _ => None,
        }
    }
}

/// Flat per-case row of a report
#[derive(Clone, Debug, Serialize)]
pub struct CaseReport {
    pub identity: String,
    pub label: String,
    pub category: String,
    pub status: Status,
    pub duration_ms: u64,
    pub message: Option<String>,
}

impl CaseReport {
    pub fn from_case(case: &TestCase) -> Self {
        let (status, result) = case.snapshot();
        Self {
            identity: case.identity.to_string(),
            label: case.label().to_string(),
            category: case.category_path.to_string(),
            status,
            duration_ms: result.as_ref().map_or(0, |r| r.duration_ms()),
            message: result.and_then(|r| r.fail_message),
        }
    }

    /// First non-empty line of the failure message
    fn headline(&self) -> Option<&str> {
        self.message
            .as_deref()
            .and_then(|m| m.lines().find(|l| !l.trim().is_empty()))
            .map(str::trim)
    }
}

#[derive(Serialize)]
struct RunReport<'a> {
    summary: &'a BatchSummary,
    cases: &'a [CaseReport],
}

/// Result formatter
pub struct ResultFormatter {
    format: OutputFormat,
    colorize: bool,
}

impl ResultFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            colorize: true,
        }
    }

    pub fn no_color(mut self) -> Self {
        self.colorize = false;
        self
    }

    /// Format the settled cases and summary of a run
    pub fn format_outcome(&self, outcome: &RunOutcome) -> Result<String> {
        let rows: Vec<CaseReport> = outcome
            .cases
            .iter()
            .map(|c| CaseReport::from_case(c))
            .collect();

        match self.format {
            OutputFormat::Table => Ok(self.format_table(&rows, &outcome.summary)),
            OutputFormat::Json => Ok(serde_json::to_string(&RunReport {
                summary: &outcome.summary,
                cases: &rows,
            })?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(&RunReport {
                summary: &outcome.summary,
                cases: &rows,
            })?),
            OutputFormat::Csv => self.format_csv(&rows),
            OutputFormat::Summary => Ok(self.format_brief(&rows, &outcome.summary)),
        }
    }

    fn status_str(&self, status: Status) -> String {
        let plain = format!("{} {}", status.symbol(), status);
        if !self.colorize {
            return plain;
        }
        let color = match status {
            Status::Succeeded => "32",
            Status::Failed | Status::ExceptionThrown => "31",
            Status::Running => "33",
            Status::NotRun => "90",
        };
        format!("\x1b[{color}m{plain}\x1b[0m")
    }

    fn format_row(&self, row: &CaseReport) -> String {
        let mut line = format!(
            "{:8} {:40} [{:>6}ms]",
            self.status_str(row.status),
            row.identity,
            row.duration_ms
        );
        if row.label != row.identity.rsplit("::").next().unwrap_or_default() {
            line.push_str(&format!(" {}", row.label));
        }
        if let Some(headline) = row.headline() {
            line.push_str(&format!("  {headline}"));
        }
        line
    }

    fn format_table(&self, rows: &[CaseReport], summary: &BatchSummary) -> String {
        let mut output = String::new();

        output.push_str("\n╔══════════════════════════════════════════════════════════════╗\n");
        output.push_str(&format!(
            "║  Test run - {:48} ║\n",
            summary.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        for row in rows {
            output.push_str(&format!("║  {}\n", self.format_row(row)));
        }

        output.push_str("╠══════════════════════════════════════════════════════════════╣\n");

        let pass_str = if self.colorize {
            format!("\x1b[32m{}\x1b[0m", summary.succeeded)
        } else {
            summary.succeeded.to_string()
        };
        let fail_str = if self.colorize && summary.failed > 0 {
            format!("\x1b[31m{}\x1b[0m", summary.failed)
        } else {
            summary.failed.to_string()
        };

        output.push_str(&format!(
            "║  Total: {:3} | Pass: {} | Fail: {} | Error: {:3} | Skipped: {:3}\n",
            summary.total, pass_str, fail_str, summary.exceptions, summary.rejected
        ));
        output.push_str(&format!(
            "║  Pass Rate: {:5.1}% | Duration: {:6}ms\n",
            summary.pass_rate(),
            summary.total_duration_ms
        ));
        output.push_str("╚══════════════════════════════════════════════════════════════╝\n");

        output
    }

    fn format_csv(&self, rows: &[CaseReport]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer.serialize(row)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
        Ok(String::from_utf8(bytes)?)
    }

    fn format_brief(&self, rows: &[CaseReport], summary: &BatchSummary) -> String {
        let mut output = format!(
            "{}/{} passed ({:.1}%) in {}ms\n",
            summary.succeeded,
            summary.total,
            summary.pass_rate(),
            summary.total_duration_ms
        );
        for row in rows.iter().filter(|r| !r.status.is_success()) {
            output.push_str(&format!(
                "{} {} ({})\n",
                row.status.symbol(),
                row.identity,
                row.label
            ));
        }
        output
    }
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self::new(OutputFormat::Table)
    }
}

/// Write a run report to a file
pub fn write_outcome_to_file(path: &str, outcome: &RunOutcome, format: OutputFormat) -> Result<()> {
    let formatter = ResultFormatter::new(format).no_color();
    let content = formatter.format_outcome(outcome)?;

    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create report file: {}", path))?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{CaseFilter, ExecutionEngine, RegistryInvoker, TestRunner};
    use crate::registry::{Registry, TestDef};

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("TABLE"), Some(OutputFormat::Table));
        assert_eq!(
            OutputFormat::from_str("json-pretty"),
            Some(OutputFormat::JsonPretty)
        );
        assert_eq!(OutputFormat::from_str("unknown"), None);
    }

    #[test]
    fn test_formatter_creation() {
        let formatter = ResultFormatter::new(OutputFormat::Json).no_color();
        assert_eq!(formatter.format, OutputFormat::Json);
        assert!(!formatter.colorize);
    }

    async fn outcome() -> RunOutcome {
        let mut registry = Registry::new();
        registry
            .suite("demo", "Report")
            .category("Reports")
            .add(TestDef::sync("passes", |_| Ok(())))
            .unwrap()
            .add(TestDef::sync("fails", |_| Err(anyhow::anyhow!("boom"))))
            .unwrap();

        let runner = TestRunner::new(ExecutionEngine::new(RegistryInvoker::from_registry(
            &registry,
        )));
        runner
            .run(registry.cases(), &CaseFilter::default())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_table_lists_every_case() {
        let outcome = outcome().await;
        let output = ResultFormatter::new(OutputFormat::Table)
            .no_color()
            .format_outcome(&outcome)
            .unwrap();
        assert!(output.contains("✓ PASS"));
        assert!(output.contains("demo::Report::fails"));
        assert!(output.contains("Exception:"));
        assert!(output.contains("Pass Rate:  50.0%"));
    }

    #[tokio::test]
    async fn test_json_report() {
        let outcome = outcome().await;
        let output = ResultFormatter::new(OutputFormat::Json)
            .format_outcome(&outcome)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["summary"]["succeeded"], 1);
        assert_eq!(value["cases"][1]["status"], "exception_thrown");
        assert_eq!(value["cases"][0]["category"], "Reports");
    }

    #[tokio::test]
    async fn test_csv_report() {
        let outcome = outcome().await;
        let output = ResultFormatter::new(OutputFormat::Csv)
            .format_outcome(&outcome)
            .unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("identity,label,category,status,duration_ms,message")
        );
        assert!(lines.next().unwrap().starts_with("demo::Report::passes,passes,Reports,succeeded,"));
    }

    #[tokio::test]
    async fn test_summary_lists_failures_only() {
        let outcome = outcome().await;
        let output = ResultFormatter::new(OutputFormat::Summary)
            .format_outcome(&outcome)
            .unwrap();
        assert!(output.starts_with("1/2 passed (50.0%)"));
        assert!(output.contains("! demo::Report::fails (fails)"));
        assert!(!output.contains("passes"));
    }
}
