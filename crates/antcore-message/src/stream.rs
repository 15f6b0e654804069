//! Message extraction from an accumulating byte stream.

use antcore_frame::{scan_frames, FrameConfig};
use bytes::Bytes;
use tracing::debug;

use crate::error::Result;
use crate::message::Message;
use crate::registry::registry;
use crate::variants::AntMessage;

/// Extract every complete message from `buffer`.
///
/// Noise, bad checksums and oversized length bytes are skipped by
/// resynchronizing one byte past the rejected sync candidate. A partial frame
/// at the tail is returned as the remainder for the caller to extend.
///
/// Each frame that passed the checksum becomes one entry in arrival order.
/// An entry is an error only when the frame is well formed but its payload
/// does not fit the registered variant.
pub fn frame_stream(buffer: &[u8]) -> (Bytes, Vec<Result<AntMessage>>) {
    frame_stream_with_config(buffer, &FrameConfig::default())
}

pub fn frame_stream_with_config(
    buffer: &[u8],
    config: &FrameConfig,
) -> (Bytes, Vec<Result<AntMessage>>) {
    let (rest, frames) = scan_frames(buffer, config);
    let messages: Vec<Result<AntMessage>> = frames
        .into_iter()
        .map(|frame| Message::from_frame(frame).and_then(|msg| registry().interpret(msg)))
        .collect();

    let rejected = messages.iter().filter(|msg| msg.is_err()).count();
    if rejected > 0 {
        debug!(rejected, total = messages.len(), "frames failed typed decode");
    }
    (rest, messages)
}
