//! JSON-lines batch mode and single-operation dispatch.
//!
//! Every non-blank input line yields exactly one output line, in order. A
//! failing line never stops the batch; only I/O errors do.

use std::io::{BufRead, Write};

use common::protocol::{ErrorLine, ErrorResponse, SealRequest, SealResponse};
use common::{CryptoError, Operation, ServiceError};
use hexseal::HexSeal;
use tracing::{debug, warn};

/// Counts reported at the end of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

/// Run one facade operation.
pub fn apply(seal: &HexSeal, op: Operation, input: &str) -> Result<String, CryptoError> {
    match op {
        Operation::Encrypt => seal.encrypt(input),
        Operation::Decrypt => seal.decrypt(input),
        Operation::EncryptFixed => seal.encrypt_fixed(input),
        Operation::DecryptFixed => seal.decrypt_fixed(input),
    }
}

/// Process requests from `reader` until EOF, writing responses to `writer`.
///
/// # Errors
///
/// Returns [`ServiceError::Internal`] if reading or writing fails. A line
/// that is not UTF-8 is a bad request, not a read failure.
pub fn run<R, W>(seal: &HexSeal, mut reader: R, mut writer: W) -> Result<Summary, ServiceError>
where
    R: BufRead,
    W: Write,
{
    let mut summary = Summary::default();
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| ServiceError::Internal(format!("failed to read stdin: {e}")))?;
        if read == 0 {
            break;
        }
        line_no += 1;

        let result = match std::str::from_utf8(strip_line_ending(&buf)) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(seal, line),
            Err(e) => Err(ServiceError::BadRequest(format!(
                "request is not valid UTF-8 after byte {}",
                e.valid_up_to()
            ))),
        };

        let rendered = match result {
            Ok(output) => {
                summary.succeeded += 1;
                serde_json::to_string(&SealResponse { output })
            }
            Err(e) => {
                summary.failed += 1;
                warn!(line = line_no, code = e.code(), "batch request failed");
                serde_json::to_string(&ErrorLine {
                    error: ErrorResponse::new(e.code(), e.to_string()),
                })
            }
        }
        .map_err(|e| ServiceError::Internal(format!("failed to serialise response: {e}")))?;

        writeln!(writer, "{rendered}")
            .map_err(|e| ServiceError::Internal(format!("failed to write stdout: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| ServiceError::Internal(format!("failed to flush stdout: {e}")))?;
    Ok(summary)
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn handle_line(seal: &HexSeal, line: &str) -> Result<String, ServiceError> {
    // serde_json's message can quote the offending input; keep only the position.
    let req: SealRequest = serde_json::from_str(line).map_err(|e| {
        ServiceError::BadRequest(format!(
            "malformed request at column {}: expected {{\"op\",\"input\"}}",
            e.column()
        ))
    })?;
    debug!(operation = %req.op, "batch request");
    Ok(apply(seal, req.op, &req.input)?)
}
