//! bedflow CLI binary.
//!
//! Runs the emergency-bed pipeline stages: extraction, cleaning and feature
//! derivation. Settings come from the environment (and `.env`).

mod integration;

use bedflow::{Config, KoreanHolidays};
use bedflow_data::{DEFAULT_PAGE_DELAY, DEFAULT_PAGE_SIZE, ExtractOptions};
use bedflow_features::CategoryDomain;
use clap::{ArgAction, Parser, Subcommand};
use integration::report::{OutputFormat, PipelineReport, print_report};
use integration::stages;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "bedflow")]
#[command(about = "bedflow: emergency-bed availability ETL", long_about = None)]
#[command(version)]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Stage report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the raw table from the source database
    Extract {
        /// SQLite database to read (defaults to DB_NAME)
        #[arg(long)]
        source_db: Option<PathBuf>,

        /// Rows per page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Pause between pages, in milliseconds
        #[arg(long, default_value_t = DEFAULT_PAGE_DELAY.as_millis() as u64)]
        page_delay_ms: u64,
    },

    /// Clean the raw table
    Preprocess,

    /// Derive features from the cleaned table
    Features {
        /// Encode only the categories present in the data
        #[arg(long)]
        observed_categories: bool,
    },

    /// Clean the raw table, then derive features
    Run {
        /// Encode only the categories present in the data
        #[arg(long)]
        observed_categories: bool,
    },
}

const fn category_domain(observed: bool) -> CategoryDomain {
    if observed {
        CategoryDomain::Observed
    } else {
        CategoryDomain::Full
    }
}

fn log_filter(verbose: u8, quiet: bool) -> &'static str {
    match verbose {
        0 if quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(verbose, quiet)));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter);

    tracing_subscriber::registry().with(stderr_layer).init();
}

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        error!("{e}");
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    match cli.command {
        Commands::Extract {
            source_db,
            page_size,
            page_delay_ms,
        } => {
            let source_db = source_db.unwrap_or_else(|| PathBuf::from(&config.database.name));
            let options = ExtractOptions {
                page_size,
                page_delay: Duration::from_millis(page_delay_ms),
            };
            let report = stages::extract(&config, &source_db, options)?;
            print_report(&report, cli.format)?;
        }
        Commands::Preprocess => {
            let report = bedflow_preprocess::run(&config)?;
            print_report(&report, cli.format)?;
        }
        Commands::Features {
            observed_categories,
        } => {
            let calendar = KoreanHolidays::new()?;
            let report =
                bedflow_features::run(&config, &calendar, category_domain(observed_categories))?;
            print_report(&report, cli.format)?;
        }
        Commands::Run {
            observed_categories,
        } => {
            let calendar = KoreanHolidays::new()?;
            let preprocess = bedflow_preprocess::run(&config)?;
            let features =
                bedflow_features::run(&config, &calendar, category_domain(observed_categories))?;
            print_report(
                &PipelineReport {
                    preprocess,
                    features,
                },
                cli.format,
            )?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_extract_defaults() {
        let cli = Cli::try_parse_from(["bedflow", "extract"]).unwrap();
        match cli.command {
            Commands::Extract {
                source_db,
                page_size,
                page_delay_ms,
            } => {
                assert!(source_db.is_none());
                assert_eq!(page_size, 1000);
                assert_eq!(page_delay_ms, 500);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "bedflow",
            "features",
            "--observed-categories",
            "-vv",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Features {
                observed_categories: true
            }
        ));
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["bedflow", "-q", "-v", "run"]).is_err());
    }

    #[rstest]
    #[case(0, false, "info")]
    #[case(0, true, "error")]
    #[case(1, false, "debug")]
    #[case(3, false, "trace")]
    fn test_log_filter(#[case] verbose: u8, #[case] quiet: bool, #[case] expected: &str) {
        assert_eq!(log_filter(verbose, quiet), expected);
    }

    #[test]
    fn test_category_domain() {
        assert_eq!(category_domain(false), CategoryDomain::Full);
        assert_eq!(category_domain(true), CategoryDomain::Observed);
    }
}
