use thiserror::Error;

/// Errors produced while decoding a serial capture export.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to read from capture export")]
    Io(#[from] std::io::Error),

    #[error("capture export is empty, no header row")]
    MissingHeader,

    #[error("line {line}: expected 4 columns, got {row:?}")]
    ColumnCount { line: u64, row: Vec<String> },

    #[error("invalid offset {0:?}, expected decimal seconds")]
    InvalidOffset(String),

    #[error("invalid hex value {0:?}")]
    InvalidHex(String),

    #[error("invalid quoted decimal value {0:?}")]
    InvalidQuotedDecimal(String),

    #[error("unhandled escape code: {0}")]
    UnhandledEscape(char),

    #[error("unhandled value {0:?}")]
    UnrecognizedValue(String),
}
