#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/bedflow/bedflow/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod holidays;
pub mod io;
pub mod schema;
pub mod timestamp;

pub use config::{Config, DatabaseConfig, PathConfig, SshConfig};
pub use error::{ConfigError, TableError};
pub use holidays::{HolidayCalendar, KoreanHolidays};
pub use schema::{ColumnKind, ColumnSpec, SchemaReport};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
