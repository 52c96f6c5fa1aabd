//! Paginated extraction into the raw CSV table.

use crate::error::{ExtractError, Result};
use crate::source::RowSource;
use bedflow::schema::raw_column_names;
use serde::Serialize;
use std::fs::{self, File};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Rows requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// Pause between pages, to limit load on the source.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(500);

/// Pagination settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Rows requested per page
    pub page_size: usize,
    /// Pause after every non-empty page
    pub page_delay: Duration,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }
}

/// Summary of an extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    /// Non-empty pages fetched
    pub pages: usize,
    /// Rows written
    pub rows: usize,
}

/// Walks a [`RowSource`] page by page and writes the raw table.
#[derive(Debug)]
pub struct Extractor<S> {
    source: S,
    options: ExtractOptions,
}

impl<S: RowSource> Extractor<S> {
    /// Create an extractor over `source`.
    pub const fn new(source: S, options: ExtractOptions) -> Self {
        Self { source, options }
    }

    /// Extract every row into `path`.
    pub fn run(&mut self, path: &Path) -> Result<ExtractReport> {
        self.run_with_progress(path, |_| {})
    }

    /// Extract every row into `path`, calling `on_page` after each page is written.
    ///
    /// The header is written before the first page, so an empty source still
    /// yields a valid table. Failed pages are not retried.
    pub fn run_with_progress<F>(&mut self, path: &Path, mut on_page: F) -> Result<ExtractReport>
    where
        F: FnMut(&ExtractReport),
    {
        let ExtractOptions {
            page_size,
            page_delay,
        } = self.options;
        if page_size == 0 {
            return Err(ExtractError::InvalidPageSize);
        }

        info!(
            source = %self.source.describe(),
            path = %path.display(),
            page_size,
            "extraction started"
        );

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(File::create(path)?);
        writer.write_record(raw_column_names())?;
        writer.flush()?;

        let mut report = ExtractReport::default();
        let mut offset = 0;

        loop {
            let page = self.source.fetch_page(offset, page_size)?;
            if page.is_empty() {
                break;
            }

            for record in &page {
                writer.serialize(record)?;
            }
            writer.flush()?;

            report.pages += 1;
            report.rows += page.len();
            info!(
                from = offset,
                to = offset + page_size,
                rows = page.len(),
                "page saved"
            );
            on_page(&report);

            offset += page_size;
            thread::sleep(page_delay);
        }

        info!(pages = report.pages, rows = report.rows, "extraction complete");
        Ok(report)
    }

    /// Consume the extractor, returning its source.
    pub fn into_source(self) -> S {
        self.source
    }
}
