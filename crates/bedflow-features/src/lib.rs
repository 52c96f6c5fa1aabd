#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bedflow/bedflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod encoding;
pub mod error;
pub mod pipeline;
pub mod time;
pub mod utilization;

pub use encoding::CategoryDomain;
pub use error::{FeatureError, Result};
pub use pipeline::{Engineered, FeatureReport, engineer, run};
pub use time::{TimeFeatures, TimeOfDay, classify_time_of_day};
