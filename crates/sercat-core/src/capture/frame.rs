use std::time::Duration;

/// A single value reconstructed from a serial capture export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialFrame {
    /// Elapsed time since the start of the capture.
    pub offset: Duration,
    /// The reconstructed byte.
    pub value: u8,
    /// Parity error indicator. The export has a column for this but it is
    /// never interpreted; always false.
    pub parity_error: bool,
    /// Framing error indicator. Same status as `parity_error`.
    pub framing_error: bool,
}
