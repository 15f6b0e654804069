use antcore_frame::FrameError;

/// Errors raised by the message layer.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    /// Framing failed: not enough bytes, bad sync, or bad checksum.
    #[error(transparent)]
    Frame(#[from] FrameError),

    /// The payload is longer than its format allows.
    #[error("payload too large for {format} message ({size} bytes, max {max})")]
    PayloadTooLarge {
        format: &'static str,
        size: usize,
        max: usize,
    },

    /// The payload is shorter than its format or variant requires.
    #[error("payload too short for {format} message ({size} bytes, min {min})")]
    PayloadTooShort {
        format: &'static str,
        size: usize,
        min: usize,
    },

    /// A field value is outside its declared numeric or bit range.
    #[error("{field} out of range ({value}, max {max})")]
    OutOfRange {
        field: &'static str,
        value: u32,
        max: u32,
    },

    /// The optional block holding this field is not enabled.
    #[error("{0} not available (block not enabled)")]
    DataUnavailable(&'static str),

    /// The type id does not fit in one byte.
    #[error("message type {0:#06X} out of range (max 0xFF)")]
    TypeOutOfRange(u16),

    /// The flag byte sets bits outside the three defined enable bits.
    #[error("invalid extended flag byte 0x{0:02X}")]
    InvalidFlag(u8),

    /// A typed view was requested for a message of another type.
    #[error("unexpected message type 0x{found:02X} for {expected}")]
    WrongType { expected: &'static str, found: u8 },
}

impl MessageError {
    /// True when more bytes may resolve the error.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, MessageError::Frame(err) if err.is_incomplete())
    }

    /// True when the bytes failed sync or checksum validation.
    pub fn is_corrupted(&self) -> bool {
        matches!(self, MessageError::Frame(err) if err.is_corrupted())
    }

    /// True for payload size and field range violations.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            MessageError::PayloadTooLarge { .. }
                | MessageError::PayloadTooShort { .. }
                | MessageError::OutOfRange { .. }
        )
    }
}

impl From<std::io::Error> for MessageError {
    fn from(err: std::io::Error) -> Self {
        MessageError::Frame(FrameError::Io(err))
    }
}

pub type Result<T> = std::result::Result<T, MessageError>;
