use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};
use crate::sync::{is_sync, MESSAGE_TX_SYNC};

/// Frame header: sync (1) + length (1) + type (1) = 3 bytes.
pub const HEADER_SIZE: usize = 3;

/// Frame footer: checksum (1).
pub const FOOTER_SIZE: usize = 1;

/// Smallest byte count `decode_frame` will attempt to decode.
pub const MIN_FRAME_SIZE: usize = 5;

/// Largest payload the one-byte length field can describe.
pub const MAX_PAYLOAD: usize = u8::MAX as usize;

/// Default maximum payload accepted from a stream.
pub const DEFAULT_MAX_PAYLOAD: usize = 64;

/// One frame as it appears on the wire, minus the checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The sync byte the frame was (or will be) sent with.
    pub sync: u8,
    /// The message type byte.
    pub msg_type: u8,
    /// The message payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame using the default sync byte.
    pub fn new(msg_type: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            sync: MESSAGE_TX_SYNC,
            msg_type,
            payload: payload.into(),
        }
    }

    /// Replace the sync byte.
    pub fn with_sync(mut self, sync: u8) -> Self {
        self.sync = sync;
        self
    }

    /// The checksum this frame carries on the wire.
    pub fn checksum(&self) -> u8 {
        checksum(
            self.sync,
            self.payload.len() as u8,
            self.msg_type,
            self.payload.as_ref(),
        )
    }

    /// The total wire size of this frame (header + payload + checksum).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len() + FOOTER_SIZE
    }
}

/// XOR-fold of the header bytes and payload.
///
/// The sync byte is part of the fold, so a corrupted header is caught as
/// well as a corrupted payload.
pub fn checksum(sync: u8, length: u8, msg_type: u8, payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(sync ^ length ^ msg_type, |acc, byte| acc ^ byte)
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬────────────┬──────────┬──────────────────┬────────────┐
/// │ Sync (1) │ Length (1) │ Type (1) │ Payload (Length) │ XOR (1)    │
/// │ A4 / A5  │            │          │                  │            │
/// └──────────┴────────────┴──────────┴──────────────────┴────────────┘
/// ```
pub fn encode_frame(sync: u8, msg_type: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    let length = payload.len() as u8;
    dst.reserve(HEADER_SIZE + payload.len() + FOOTER_SIZE);
    dst.put_u8(sync);
    dst.put_u8(length);
    dst.put_u8(msg_type);
    dst.put_slice(payload);
    dst.put_u8(checksum(sync, length, msg_type, payload));
    Ok(())
}

/// Decode one frame from the start of `raw`.
///
/// Trailing bytes after the frame are ignored; use [`Frame::wire_size`] to
/// find where the next frame starts.
pub fn decode_frame(raw: &[u8]) -> Result<Frame> {
    if raw.len() < MIN_FRAME_SIZE {
        return Err(FrameError::Incomplete {
            needed: MIN_FRAME_SIZE,
            available: raw.len(),
        });
    }

    let (sync, length, msg_type) = (raw[0], raw[1], raw[2]);
    if !is_sync(sync) {
        return Err(FrameError::InvalidSync(sync));
    }

    let total = HEADER_SIZE + length as usize + FOOTER_SIZE;
    if raw.len() < total {
        return Err(FrameError::Incomplete {
            needed: total,
            available: raw.len(),
        });
    }

    let payload = &raw[HEADER_SIZE..total - FOOTER_SIZE];
    let expected = checksum(sync, length, msg_type, payload);
    let found = raw[total - FOOTER_SIZE];
    if expected != found {
        return Err(FrameError::BadChecksum { expected, found });
    }

    Ok(Frame {
        sync,
        msg_type,
        payload: Bytes::copy_from_slice(payload),
    })
}

/// Configuration for stream framing.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Largest payload accepted from a stream or sent by a writer. Default: 64.
    ///
    /// A sync candidate that declares a longer payload is treated as noise.
    pub max_payload_size: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::MESSAGE_TX_SYNC_LSB;

    fn encoded(sync: u8, msg_type: u8, payload: &[u8]) -> BytesMut {
        let mut buf = BytesMut::new();
        encode_frame(sync, msg_type, payload, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_encode_layout() {
        let buf = encoded(MESSAGE_TX_SYNC, 0x42, &[0x00, 0x00, 0x00]);

        assert_eq!(buf.len(), 3 + 4);
        assert_eq!(&buf[..3], &[0xA4, 0x03, 0x42]);
        assert_eq!(buf[6], 0xA4 ^ 0x03 ^ 0x42);
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let payload = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09];
        let buf = encoded(MESSAGE_TX_SYNC, 0x4E, &payload);

        let frame = decode_frame(&buf).unwrap();

        assert_eq!(frame.sync, MESSAGE_TX_SYNC);
        assert_eq!(frame.msg_type, 0x4E);
        assert_eq!(frame.payload.as_ref(), &payload);
        assert_eq!(frame.wire_size(), buf.len());
    }

    #[test]
    fn test_lsb_sync_is_part_of_checksum() {
        let msb = encoded(MESSAGE_TX_SYNC, 0x4E, b"abc");
        let lsb = encoded(MESSAGE_TX_SYNC_LSB, 0x4E, b"abc");

        assert_ne!(msb[msb.len() - 1], lsb[lsb.len() - 1]);
        assert_eq!(decode_frame(&lsb).unwrap().sync, MESSAGE_TX_SYNC_LSB);
    }

    #[test]
    fn test_decode_too_short() {
        let err = decode_frame(&[0xA4, 0x01, 0x4E, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            FrameError::Incomplete {
                needed: 5,
                available: 4
            }
        ));
    }

    #[test]
    fn test_decode_incomplete_payload() {
        let buf = encoded(MESSAGE_TX_SYNC, 0x4E, &[0u8; 9]);
        let err = decode_frame(&buf[..8]).unwrap_err();
        assert!(err.is_incomplete());
    }

    #[test]
    fn test_decode_invalid_sync() {
        let err = decode_frame(&[0x00, 0x01, 0x4E, 0x00, 0x4F]).unwrap_err();
        assert!(matches!(err, FrameError::InvalidSync(0x00)));
        assert!(err.is_corrupted());
    }

    #[test]
    fn test_decode_bad_checksum() {
        let mut buf = encoded(MESSAGE_TX_SYNC, 0x4E, &[1, 2, 3]);
        let last = buf.len() - 1;
        buf[last] ^= 0xFF;

        let err = decode_frame(&buf).unwrap_err();
        assert!(matches!(err, FrameError::BadChecksum { .. }));
        assert!(err.is_corrupted());
    }

    #[test]
    fn test_single_bit_flip_is_corrupted() {
        let buf = encoded(MESSAGE_TX_SYNC, 0x4E, &[0, 1, 2, 3, 4, 5, 6, 7, 8]);

        // The length byte is skipped: growing it yields Incomplete instead.
        for index in (0..buf.len()).filter(|i| *i != 1) {
            for bit in 0..8 {
                let mut flipped = buf.clone();
                flipped[index] ^= 1 << bit;
                let err = decode_frame(&flipped).unwrap_err();
                assert!(err.is_corrupted(), "byte {index} bit {bit}: {err}");
            }
        }
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut buf = encoded(MESSAGE_TX_SYNC, 0x4A, &[0x00]);
        buf.extend_from_slice(&[0xA4, 0x09]);

        let frame = decode_frame(&buf).unwrap();
        assert_eq!(frame.msg_type, 0x4A);
        assert_eq!(frame.wire_size(), 5);
    }

    #[test]
    fn test_encode_payload_too_large() {
        let mut buf = BytesMut::new();
        let err = encode_frame(MESSAGE_TX_SYNC, 0x4E, &[0u8; 256], &mut buf).unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { size: 256, max: 255 }));
        assert!(buf.is_empty());
    }

    #[test]
    fn test_checksum_matches_manual_fold() {
        let payload = [0x10, 0x20, 0x30];
        let manual = 0xA4 ^ 0x03 ^ 0x4E ^ 0x10 ^ 0x20 ^ 0x30;
        assert_eq!(checksum(0xA4, 3, 0x4E, &payload), manual);

        let frame = Frame::new(0x4E, Bytes::copy_from_slice(&payload));
        assert_eq!(frame.checksum(), manual);
    }

    #[test]
    fn test_frame_wire_size() {
        let frame = Frame::new(0x4E, Bytes::from_static(b"test"));
        assert_eq!(frame.wire_size(), HEADER_SIZE + 4 + FOOTER_SIZE);
    }
}
