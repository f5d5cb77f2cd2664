//! `hexseal-cli` — command-line entry point.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`Config`] from environment variables.
//! 3. Initialise structured JSON logging.
//! 4. Build the [`HexSeal`] facade from the configured key and fixed nonce.
//! 5. Run the one-shot operation or the batch loop.

mod batch;
mod cli;
mod config;
mod telemetry;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use common::ServiceError;
use hexseal::HexSeal;
use tracing::{debug, error};

use cli::Cli;
use config::Config;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::from(exit_code(&e))
        }
    }
}

/// Exit code of the first [`ServiceError`] in the chain, 1 if there is none.
fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|c| c.downcast_ref::<ServiceError>())
        .map_or(1, ServiceError::exit_code)
}

fn run() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Command line
    // -----------------------------------------------------------------------
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // --help and --version land here too, on stdout.
        Err(e) if !e.use_stderr() => {
            e.print()?;
            return Ok(());
        }
        Err(e) => {
            e.print()?;
            return Err(ServiceError::BadRequest("invalid command line".into()).into());
        }
    };

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| ServiceError::Unconfigured(format!("{e:#}")))?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    debug!(version = env!("CARGO_PKG_VERSION"), "hexseal-cli starting");

    // -----------------------------------------------------------------------
    // 4. Facade
    // -----------------------------------------------------------------------
    let seal = HexSeal::new(&cfg.options()).map_err(|e| {
        error!(field = %e.field(), "rejected key material");
        ServiceError::from(e)
    })?;
    drop(cfg);

    // -----------------------------------------------------------------------
    // 5. Dispatch
    // -----------------------------------------------------------------------
    cli::execute(&seal, &cli.command, io::stdin().lock(), io::stdout().lock())?;

    Ok(())
}
