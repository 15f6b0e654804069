/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// Not enough bytes yet. Retry once more data has arrived.
    #[error("incomplete frame ({available} bytes available, {needed} needed)")]
    Incomplete { needed: usize, available: usize },

    /// The first byte is not one of the accepted sync markers.
    #[error("invalid sync byte 0x{0:02X} (expected 0xA4 or 0xA5)")]
    InvalidSync(u8),

    /// The trailing checksum does not match the recomputed one.
    #[error("bad checksum (expected 0x{expected:02X}, found 0x{found:02X})")]
    BadChecksum { expected: u8, found: u8 },

    /// The payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte source ended before a complete frame was received.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

impl FrameError {
    /// True for errors that resolve once more bytes arrive.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, FrameError::Incomplete { .. })
    }

    /// True for errors that mean the bytes themselves are bad.
    ///
    /// Corrupted input is never retryable on the same bytes; a stream
    /// reader drops the candidate and resynchronizes.
    pub fn is_corrupted(&self) -> bool {
        matches!(
            self,
            FrameError::InvalidSync(_) | FrameError::BadChecksum { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
