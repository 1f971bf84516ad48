use std::io::{self, BufRead, Read};
use std::time::Duration;

use tracing::{debug, info};

use crate::error::DecodeError;

use super::frame::SerialFrame;

/// Number of columns in a serial capture export: offset, value, parity, framing.
const COLUMNS: usize = 4;

/// Decodes frames from a logic analyzer serial capture export.
///
/// The export is a comma-separated table with a header row followed by one
/// row per decoded byte. The value column is written in several formats
/// depending on the analyzer settings (plain characters, named symbols,
/// hex escapes, quoted decimal codes, backslash escapes), so decoding
/// applies an ordered set of rules where the first match wins.
#[derive(Debug)]
pub struct SerialCaptureReader<R> {
    input: R,
    line: u64,
    frames_read: u64,
}

impl<R: BufRead> SerialCaptureReader<R> {
    /// Open a capture export for decoding, consuming and validating the
    /// header row.
    pub fn open(input: R) -> Result<Self, DecodeError> {
        let mut reader = Self {
            input,
            line: 0,
            frames_read: 0,
        };
        let Some(header) = reader.next_record()? else {
            return Err(DecodeError::MissingHeader);
        };
        if header.len() != COLUMNS {
            return Err(DecodeError::ColumnCount {
                line: reader.line,
                row: header,
            });
        }
        info!(header = ?header, "capture export opened");
        Ok(reader)
    }

    /// Read the next frame from the export, or `None` when the export is
    /// exhausted.
    pub fn next_frame(&mut self) -> Result<Option<SerialFrame>, DecodeError> {
        let Some(row) = self.next_record()? else {
            info!(total_frames = self.frames_read, "capture export ended");
            return Ok(None);
        };
        if row.len() != COLUMNS {
            return Err(DecodeError::ColumnCount {
                line: self.line,
                row,
            });
        }

        let offset = parse_offset(&row[0])?;
        let value = decode_value(&row[1])?;
        // Columns 3 and 4 (parity/framing indicators) are read but not
        // interpreted.
        self.frames_read += 1;

        debug!(line = self.line, value, "decoded frame");

        Ok(Some(SerialFrame {
            offset,
            value,
            parity_error: false,
            framing_error: false,
        }))
    }

    /// Read the next non-blank line and split it into fields, or `None` at
    /// end of input.
    fn next_record(&mut self) -> Result<Option<Vec<String>>, DecodeError> {
        let mut buf = String::new();
        loop {
            buf.clear();
            if self.input.read_line(&mut buf)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let line = buf.trim_end_matches(['\n', '\r']);
            if line.is_empty() {
                continue;
            }
            return Ok(Some(split_record(line)));
        }
    }
}

/// Byte-stream adapter: each read yields the value of the next decoded
/// frame, and a clean end of input reads as EOF. Format errors surface as
/// `InvalidData`.
impl<R: BufRead> Read for SerialCaptureReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        match self.next_frame() {
            Ok(Some(frame)) => {
                buf[0] = frame.value;
                Ok(1)
            }
            Ok(None) => Ok(0),
            Err(DecodeError::Io(e)) => Err(e),
            Err(e) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        }
    }
}

/// Split a comma-separated line into fields, honoring double-quoted fields
/// with `""` as an embedded literal quote. Unterminated quoting is
/// tolerated since real exports are inconsistent about it.
fn split_record(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            '"' => field.push('"'),
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

/// Parse the offset column as a decimal number of seconds.
fn parse_offset(field: &str) -> Result<Duration, DecodeError> {
    let secs: f64 = field
        .parse()
        .map_err(|_| DecodeError::InvalidOffset(field.to_owned()))?;
    // Rejects non-finite, negative, and out-of-range values.
    Duration::try_from_secs_f64(secs).map_err(|_| DecodeError::InvalidOffset(field.to_owned()))
}

/// Decode the value column into a single byte.
///
/// Rules are ordered and the first match wins: a one-byte field is taken
/// literally, then the `COMMA` symbol, then `0x` hex, then a dispatch on
/// the leading character for the quoting and escape forms.
fn decode_value(field: &str) -> Result<u8, DecodeError> {
    if field.len() == 1 {
        return Ok(field.as_bytes()[0]);
    }
    if field == "COMMA" {
        return Ok(b',');
    }
    if let Some(hex) = field.strip_prefix("0x") {
        // Signed 16-bit range, truncated to the low byte.
        let v = i16::from_str_radix(hex, 16)
            .map_err(|_| DecodeError::InvalidHex(field.to_owned()))?;
        return Ok(v as u8);
    }

    let bytes = field.as_bytes();
    match bytes.first() {
        // A leading double quote is a quoting artifact of the export, not
        // a quoted string.
        Some(b'"') => Ok(b'"'),
        Some(b'\'') => {
            if bytes.get(1) == Some(&b' ') {
                Ok(b' ')
            } else {
                // Quoted numeric code, e.g. '65' for 0x41. The digits sit
                // between the opening quote and the final character.
                std::str::from_utf8(&bytes[1..bytes.len() - 1])
                    .ok()
                    .and_then(|digits| digits.parse::<i16>().ok())
                    .map(|v| v as u8)
                    .ok_or_else(|| DecodeError::InvalidQuotedDecimal(field.to_owned()))
            }
        }
        Some(b'\\') => match field.chars().nth(1) {
            Some('t') => Ok(b'\t'),
            Some('r') => Ok(b'\r'),
            Some('n') => Ok(b'\n'),
            Some(other) => Err(DecodeError::UnhandledEscape(other)),
            None => Err(DecodeError::UnrecognizedValue(field.to_owned())),
        },
        _ => Err(DecodeError::UnrecognizedValue(field.to_owned())),
    }
}
