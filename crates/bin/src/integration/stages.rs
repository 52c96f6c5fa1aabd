//! Stage runners that need more than a library call.

use bedflow::Config;
use bedflow_data::{ExtractOptions, ExtractReport, Extractor, SqliteSource};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Extract `source_db` into the raw table at `INPUT_FILEPATH`, showing a spinner.
pub(crate) fn extract(
    config: &Config,
    source_db: &Path,
    options: ExtractOptions,
) -> Result<ExtractReport, Box<dyn std::error::Error>> {
    info!(source = %source_db.display(), "opening source database");
    let source = SqliteSource::open(source_db)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {elapsed} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting...");

    let result = Extractor::new(source, options).run_with_progress(&config.paths.input, |report| {
        pb.set_message(format!("{} pages, {} rows", report.pages, report.rows));
    });

    match result {
        Ok(report) => {
            pb.finish_with_message(format!(
                "Extracted {} rows in {} pages",
                report.rows, report.pages
            ));
            Ok(report)
        }
        Err(e) => {
            pb.abandon_with_message("Failed!");
            Err(e.into())
        }
    }
}
