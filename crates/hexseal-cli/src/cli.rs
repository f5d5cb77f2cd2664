//! Command-line arguments and one-shot dispatch.

use std::io::{BufRead, Read, Write};

use clap::{Parser, Subcommand};
use common::{Operation, ServiceError};
use hexseal::HexSeal;
use tracing::{debug, info, warn};

use crate::batch;

const ENV_HELP: &str = "\
Environment:
  HEXSEAL_KEY            64 hex characters (32 bytes)
  HEXSEAL_FIXED_NONCE    24 hex characters (12 bytes)
  HEXSEAL_LOG_LEVEL      log filter, default `warn` (RUST_LOG overrides)";

/// hexseal-cli: AES-256-GCM string encryption with hex-encoded output.
#[derive(Parser, Debug)]
#[command(
    name = "hexseal-cli",
    version,
    about = "AES-256-GCM string encryption with hex-encoded output",
    after_help = ENV_HELP
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Encrypt under a fresh random nonce.
    Encrypt {
        /// Plaintext; read from stdin when omitted or `-`.
        input: Option<String>,
    },

    /// Decrypt a random-nonce (or fixed-nonce) ciphertext.
    Decrypt {
        /// Hex ciphertext; read from stdin when omitted or `-`.
        input: Option<String>,
    },

    /// Encrypt under the configured fixed nonce (deterministic).
    #[command(alias = "encrypt_fixed")]
    EncryptFixed {
        /// Plaintext; read from stdin when omitted or `-`.
        input: Option<String>,
    },

    /// Decrypt a fixed-nonce ciphertext.
    #[command(alias = "decrypt_fixed")]
    DecryptFixed {
        /// Hex ciphertext; read from stdin when omitted or `-`.
        input: Option<String>,
    },

    /// Read JSON lines {"op":"encrypt","input":"..."} from stdin, answer one line each.
    Batch,
}

/// Where a one-shot command takes its input from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Arg(String),
    Stdin,
}

impl Input {
    fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None | Some("-") => Input::Stdin,
            Some(s) => Input::Arg(s.to_owned()),
        }
    }
}

impl Command {
    /// The facade operation and its input, or `None` for `batch`.
    pub fn operation(&self) -> Option<(Operation, Input)> {
        let (op, arg) = match self {
            Command::Encrypt { input } => (Operation::Encrypt, input),
            Command::Decrypt { input } => (Operation::Decrypt, input),
            Command::EncryptFixed { input } => (Operation::EncryptFixed, input),
            Command::DecryptFixed { input } => (Operation::DecryptFixed, input),
            Command::Batch => return None,
        };
        Some((op, Input::from_arg(arg.as_deref())))
    }
}

/// Resolve an [`Input`] to its text.
///
/// Stdin input loses a single trailing line ending, so `echo secret |` and
/// `printf secret |` give the same result.
pub fn read_input<R: Read>(input: Input, mut stdin: R) -> Result<String, ServiceError> {
    match input {
        Input::Arg(s) => Ok(s),
        Input::Stdin => {
            let mut buf = String::new();
            stdin
                .read_to_string(&mut buf)
                .map_err(|e| ServiceError::Internal(format!("failed to read stdin: {e}")))?;
            if buf.ends_with('\n') {
                buf.pop();
                if buf.ends_with('\r') {
                    buf.pop();
                }
            }
            Ok(buf)
        }
    }
}

/// Run `command` against `seal`, reading from `stdin` and answering on `stdout`.
///
/// # Errors
///
/// A one-shot command returns its [`ServiceError::Crypto`] failure. I/O
/// failures surface as [`ServiceError::Internal`]. `batch` reports request
/// failures inline and only fails on I/O.
pub fn execute<R, W>(
    seal: &HexSeal,
    command: &Command,
    stdin: R,
    mut stdout: W,
) -> Result<(), ServiceError>
where
    R: BufRead,
    W: Write,
{
    let Some((op, input)) = command.operation() else {
        let summary = batch::run(seal, stdin, stdout)?;
        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch complete"
        );
        return Ok(());
    };

    let input = read_input(input, stdin)?;
    let output = batch::apply(seal, op, &input).map_err(|e| {
        warn!(operation = %e.operation(), code = e.kind().code(), "operation failed");
        ServiceError::from(e)
    })?;
    debug!(operation = %op, "operation succeeded");

    writeln!(stdout, "{output}")
        .and_then(|()| stdout.flush())
        .map_err(|e| ServiceError::Internal(format!("failed to write stdout: {e}")))
}
