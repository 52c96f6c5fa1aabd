//! Glue between the CLI and the pipeline crates.

pub(crate) mod report;
pub(crate) mod stages;
