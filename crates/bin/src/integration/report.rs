//! Printing stage reports as text or JSON.

use bedflow_data::ExtractReport;
use bedflow_features::FeatureReport;
use bedflow_preprocess::PreprocessReport;
use clap::ValueEnum;
use serde::Serialize;

/// How a stage report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable lines
    Text,
    /// Pretty-printed JSON
    Json,
}

/// A report that can be printed as text.
pub(crate) trait StageSummary: Serialize {
    /// Heading line.
    fn title(&self) -> &'static str;

    /// Body lines.
    fn lines(&self) -> Vec<String>;
}

/// Reports of both stages of a `run`.
#[derive(Debug, Serialize)]
pub(crate) struct PipelineReport {
    pub(crate) preprocess: PreprocessReport,
    pub(crate) features: FeatureReport,
}

impl StageSummary for ExtractReport {
    fn title(&self) -> &'static str {
        "EXTRACTION"
    }

    fn lines(&self) -> Vec<String> {
        vec![
            format!("Pages fetched: {}", self.pages),
            format!("Rows written:  {}", self.rows),
        ]
    }
}

impl StageSummary for PreprocessReport {
    fn title(&self) -> &'static str {
        "PREPROCESSING"
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Rows in:  {}", self.rows_in),
            format!("Rows out: {}", self.rows_out),
        ];
        if !self.missing_columns.is_empty() {
            lines.push(format!(
                "Missing columns: {}",
                self.missing_columns.join(", ")
            ));
        }
        if !self.unexpected_columns.is_empty() {
            lines.push(format!(
                "Extra columns (kept as is): {}",
                self.unexpected_columns.join(", ")
            ));
        }

        lines.push("Imputed:".to_string());
        for imputed in &self.imputed {
            lines.push(format!(
                "  {:<14} {:>6} null, {:>6} unparseable",
                imputed.column, imputed.nulls, imputed.unparseable
            ));
        }

        lines.push("Outliers removed:".to_string());
        for filter in &self.outliers {
            lines.push(format!(
                "  {:<14} {:>6} outside [{:.2}, {:.2}]",
                filter.column, filter.removed, filter.bounds.lower, filter.bounds.upper
            ));
        }
        lines
    }
}

impl StageSummary for FeatureReport {
    fn title(&self) -> &'static str {
        "FEATURE ENGINEERING"
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Rows:         {}", self.rows),
            format!("Weekend rows: {}", self.weekend_rows),
            format!("Holiday rows: {}", self.holiday_rows),
            format!("Encoded:      {}", self.encoded_columns.join(", ")),
        ];
        if self.non_finite_utilization > 0 {
            lines.push(format!(
                "Non-finite utilization (zero total beds): {} rows",
                self.non_finite_utilization
            ));
        }
        if !self.uncovered_years.is_empty() {
            let years: Vec<String> = self.uncovered_years.iter().map(i32::to_string).collect();
            lines.push(format!("No holiday data for: {}", years.join(", ")));
        }
        lines
    }
}

impl StageSummary for PipelineReport {
    fn title(&self) -> &'static str {
        "PIPELINE"
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = section(&self.preprocess);
        lines.push(String::new());
        lines.extend(section(&self.features));
        lines
    }
}

fn section<R: StageSummary>(report: &R) -> Vec<String> {
    let mut lines = vec![format!("[{}]", report.title())];
    lines.extend(report.lines());
    lines
}

/// Render `report` in `format`.
pub(crate) fn render<R: StageSummary>(
    report: &R,
    format: OutputFormat,
) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(report),
        OutputFormat::Text => {
            let mut out = format!("{}\n", report.title());
            for line in report.lines() {
                out.push_str(&line);
                out.push('\n');
            }
            Ok(out)
        }
    }
}

/// Print `report` on stdout in `format`.
pub(crate) fn print_report<R: StageSummary>(
    report: &R,
    format: OutputFormat,
) -> Result<(), serde_json::Error> {
    println!("{}", render(report, format)?);
    Ok(())
}
