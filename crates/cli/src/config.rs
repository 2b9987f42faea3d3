//! CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser};
use concierge::cart::CART_STORAGE_KEY;

use crate::commands::Command;

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
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
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub(crate) log_format: LogFormat,
}

/// Where catalogs are read from and the cart is kept.
#[derive(Debug, Args)]
pub(crate) struct StorageConfig {
    /// Directory holding the persisted cart
    #[arg(long, env = "CONCIERGE_DATA_DIR", default_value = ".concierge", global = true)]
    pub(crate) data_dir: PathBuf,

    /// Directory of catalog YAML files overriding the bundled data
    #[arg(long, env = "CONCIERGE_CATALOG_DIR", global = true)]
    pub(crate) catalog_dir: Option<PathBuf>,

    /// Storage key of the cart, e.g. one per room
    #[arg(long, env = "CONCIERGE_CART_KEY", default_value = CART_STORAGE_KEY, global = true)]
    pub(crate) cart_key: String,
}

/// Concierge CLI configuration
#[derive(Debug, Parser)]
#[command(name = "concierge", about = "Hotel concierge catalogs and room-service cart", long_about = None)]
pub(crate) struct Config {
    /// Storage settings.
    #[command(flatten)]
    pub(crate) storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub(crate) logging: LoggingConfig,

    /// Command to run.
    #[command(subcommand)]
    pub(crate) command: Command,
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
