//! Checksummed framing for the ANT serial protocol.
//!
//! This is the byte-level layer of antcore. Every message on the wire is framed as:
//! - A 1-byte sync marker (`0xA4`, or `0xA5` on LSB-first links)
//! - A 1-byte payload length
//! - A 1-byte message type
//! - The payload
//! - A 1-byte XOR checksum over everything before it
//!
//! The [`scan`] module recovers frames from a noisy byte stream, and
//! [`FrameReader`]/[`FrameWriter`] drive it over any blocking `Read`/`Write`.

pub mod codec;
pub mod error;
pub mod reader;
pub mod scan;
pub mod sync;
pub mod writer;

pub use codec::{
    checksum, decode_frame, encode_frame, Frame, FrameConfig, DEFAULT_MAX_PAYLOAD, FOOTER_SIZE,
    HEADER_SIZE, MAX_PAYLOAD, MIN_FRAME_SIZE,
};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use scan::{next_frame, scan_frames};
pub use sync::{is_sync, MESSAGE_TX_SYNC, MESSAGE_TX_SYNC_LSB};
pub use writer::FrameWriter;
