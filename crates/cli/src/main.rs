//! Concierge CLI

use std::{io, process};

use tracing::error;

use crate::{commands::Context, config::Config};

mod commands;
mod config;
mod logging;

/// Concierge CLI entry point
fn main() {
    // Load configuration from .env and CLI arguments
    let config = Config::load().unwrap_or_else(|error| error.exit());

    if let Err(init_error) = logging::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for subscriber errors"
        )]
        {
            eprintln!("Logging error: {init_error}");
        }

        process::exit(1);
    }

    let context = match Context::from_config(&config.storage) {
        Ok(context) => context,
        Err(context_error) => {
            error!("failed to load catalogs: {context_error}");

            process::exit(1);
        }
    };

    let mut out = io::stdout().lock();

    if let Err(command_error) = commands::run(config.command, &context, &mut out) {
        error!("{command_error}");

        process::exit(1);
    }
}
