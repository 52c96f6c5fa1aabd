#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bedflow/bedflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod extract;
pub mod source;
pub mod sqlite;

pub use error::{ExtractError, Result};
pub use extract::{DEFAULT_PAGE_DELAY, DEFAULT_PAGE_SIZE, ExtractOptions, ExtractReport, Extractor};
pub use source::{RawRecord, RowSource};
pub use sqlite::SqliteSource;
