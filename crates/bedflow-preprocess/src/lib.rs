#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bedflow/bedflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod coerce;
pub mod error;
pub mod flags;
pub mod impute;
pub mod outliers;
pub mod pipeline;
pub mod table;

pub use error::{PreprocessError, Result};
pub use impute::ImputedColumn;
pub use outliers::{IqrBounds, OutlierFilter};
pub use pipeline::{PreprocessReport, Preprocessed, preprocess, run};
pub use table::RawTable;
