//! Frame recovery from an accumulating byte stream.
//!
//! Transports hand over bytes in arbitrary chunks, and real links interleave
//! noise with frames. The scanner locates sync candidates, validates them,
//! and skips past anything that does not check out. A partial frame at the
//! tail is left in the buffer for the next call.

use bytes::{Buf, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::codec::{decode_frame, Frame, FrameConfig, HEADER_SIZE};
use crate::sync::is_sync;

/// Pull the next valid frame off the front of `src`.
///
/// Returns `None` when no complete frame is available. In that case `src`
/// either is empty or starts at the sync candidate waiting for more bytes.
/// Noise and rejected candidates are consumed.
pub fn next_frame(src: &mut BytesMut, config: &FrameConfig) -> Option<Frame> {
    loop {
        match src.iter().position(|byte| is_sync(*byte)) {
            None => {
                if !src.is_empty() {
                    debug!(discarded = src.len(), "no sync byte in buffer");
                    src.clear();
                }
                return None;
            }
            Some(0) => {}
            Some(skip) => {
                debug!(discarded = skip, "skipping noise before sync byte");
                src.advance(skip);
            }
        }

        if src.len() < HEADER_SIZE {
            return None;
        }

        let declared = src[1] as usize;
        if declared > config.max_payload_size {
            debug!(
                declared,
                max = config.max_payload_size,
                "rejecting sync candidate with oversized length"
            );
            src.advance(1);
            continue;
        }

        match decode_frame(&src[..]) {
            Ok(frame) => {
                trace!(
                    msg_type = frame.msg_type,
                    len = frame.payload.len(),
                    "frame recovered"
                );
                src.advance(frame.wire_size());
                return Some(frame);
            }
            Err(err) if err.is_incomplete() => return None,
            Err(err) => {
                debug!(error = %err, "resyncing past rejected sync byte");
                src.advance(1);
            }
        }
    }
}

/// Extract every complete frame from a buffer snapshot.
///
/// Returns the unconsumed tail, which the caller keeps and extends with the
/// next chunk from the transport, and the frames in arrival order.
pub fn scan_frames(buffer: &[u8], config: &FrameConfig) -> (Bytes, Vec<Frame>) {
    let mut src = BytesMut::from(buffer);
    let mut frames = Vec::new();
    while let Some(frame) = next_frame(&mut src, config) {
        frames.push(frame);
    }
    (src.freeze(), frames)
}
