//! Configuration

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::cli::Command;

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Vitrine CLI configuration
#[derive(Debug, Parser)]
#[command(name = "vitrine", about = "Storefront cart and product page pricing", long_about = None)]
pub(crate) struct Config {
    /// Directory holding the `catalog`, `carts`, `policy` and `promotions` fixtures
    #[arg(long, env = "VITRINE_FIXTURES_DIR", default_value = "./fixtures", global = true)]
    pub fixtures_dir: PathBuf,

    #[command(flatten)]
    pub logging: LoggingConfig,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
