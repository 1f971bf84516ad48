use std::io::{BufRead, Read, Write};

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::capture::reader::SerialCaptureReader;

/// Replay a capture export as a raw byte stream.
///
/// Opens a `SerialCaptureReader` over the input and pulls one byte per
/// decoded frame through its byte-stream adapter, writing each to the
/// output in row order. Returns the number of bytes copied. On failure,
/// the count of bytes transferred before the terminating condition is
/// logged before the error is returned.
pub fn replay<R: BufRead, W: Write>(input: R, output: &mut W) -> Result<u64> {
    let mut reader =
        SerialCaptureReader::open(input).context("failed to read capture export header")?;

    let mut bytes_copied: u64 = 0;
    let mut byte = [0u8; 1];
    loop {
        match reader.read(&mut byte) {
            Ok(0) => break,
            Ok(n) => {
                output
                    .write_all(&byte[..n])
                    .context("failed to write to output")?;
                bytes_copied += n as u64;
            }
            Err(e) => {
                error!(bytes_copied, %e, "replay aborted");
                return Err(e).context("failed to decode capture export");
            }
        }
    }

    output.flush().context("failed to flush output")?;
    info!(bytes_copied, "replay complete");

    Ok(bytes_copied)
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    const HEADER: &str = "Time [s],Value,Parity Error,Framing Error\n";

    #[traced_test]
    #[test]
    fn replay_copies_decoded_bytes() {
        let input = format!("{HEADER}0.1,A,,\n0.2,COMMA,,\n");
        let mut out = Vec::new();
        let copied = replay(input.as_bytes(), &mut out).unwrap();
        assert_eq!(copied, 2);
        assert_eq!(out, b"A,");
        assert!(logs_contain("replay complete"));
    }

    #[test]
    fn replay_of_header_only_export_copies_nothing() {
        let mut out = Vec::new();
        let copied = replay(HEADER.as_bytes(), &mut out).unwrap();
        assert_eq!(copied, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn replay_keeps_partial_output_before_failure() {
        let input = format!("{HEADER}0.1,A,,\n0.2,#weird,,\n0.3,B,,\n");
        let mut out = Vec::new();
        let err = replay(input.as_bytes(), &mut out).unwrap_err();
        assert_eq!(out, b"A");
        assert!(format!("{err:#}").contains("#weird"));
    }

    #[test]
    fn replay_rejects_malformed_header() {
        let mut out = Vec::new();
        let err = replay(&b"Time,Value\n"[..], &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("header"));
    }
}
