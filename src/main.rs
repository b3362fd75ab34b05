//! Vitrine CLI

use std::{io, process::ExitCode};

use tracing::error;

use crate::config::Config;

mod cli;
mod config;
mod logging;

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            // Logging is not up yet; clap prints to the right stream itself.
            _ = err.print();

            return if err.use_stderr() {
                ExitCode::from(2)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = logging::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging failed to initialise, must use eprintln"
        )]
        {
            eprintln!("Logging error: {err}");
        }

        return ExitCode::FAILURE;
    }

    let stdout = io::stdout();

    match config.command.run(&config.fixtures_dir, stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");

            ExitCode::FAILURE
        }
    }
}
