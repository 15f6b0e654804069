//! `tokio_util` codec over the resyncing frame scanner.

use antcore_frame::{next_frame, FrameConfig};
use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};
use tracing::debug;

use crate::error::{MessageError, Result};
use crate::message::Message;
use crate::registry::registry;
use crate::variants::AntMessage;

/// Decodes typed messages from a byte stream and encodes them back.
///
/// Decoding skips noise and corrupted frames the same way
/// [`frame_stream`](crate::frame_stream) does. A frame that passes the
/// checksum but does not fit its registered variant is yielded as an
/// `Err` item, so a `FramedRead` keeps going with the frames after it.
/// The decoder error is reserved for I/O failures.
#[derive(Debug, Clone, Default)]
pub struct AntCodec {
    config: FrameConfig,
}

impl AntCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FrameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}

impl Decoder for AntCodec {
    type Item = Result<AntMessage>;
    type Error = MessageError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        let Some(frame) = next_frame(src, &self.config) else {
            return Ok(None);
        };
        let item = Message::from_frame(frame).and_then(|msg| registry().interpret(msg));
        if let Err(err) = &item {
            debug!(error = %err, "frame failed typed decode");
        }
        Ok(Some(item))
    }
}

impl Encoder<AntMessage> for AntCodec {
    type Error = MessageError;

    fn encode(&mut self, item: AntMessage, dst: &mut BytesMut) -> Result<()> {
        Encoder::<&Message>::encode(self, item.message(), dst)
    }
}

impl Encoder<&Message> for AntCodec {
    type Error = MessageError;

    fn encode(&mut self, item: &Message, dst: &mut BytesMut) -> Result<()> {
        let size = item.payload().len();
        if size > self.config.max_payload_size {
            return Err(MessageError::PayloadTooLarge {
                format: item.format().name(),
                size,
                max: self.config.max_payload_size,
            });
        }
        item.encode_into(dst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variants::{ChannelAssign, ChannelData, ChannelOpen, TypedMessage};

    #[test]
    fn decode_one_at_a_time() {
        let mut codec = AntCodec::new();
        let mut src = BytesMut::new();
        src.extend_from_slice(&ChannelOpen::new(1).encode());
        src.extend_from_slice(&[0x00, 0x13]);
        src.extend_from_slice(&ChannelAssign::new(2, 0, 0).encode());

        let first = codec.decode(&mut src).unwrap().unwrap().unwrap();
        let second = codec.decode(&mut src).unwrap().unwrap().unwrap();

        assert_eq!(first.name(), "ChannelOpen");
        assert_eq!(second.channel_number(), Some(2));
        assert!(codec.decode(&mut src).unwrap().is_none());
        assert!(src.is_empty());
    }

    #[test]
    fn decode_waits_for_more_bytes() {
        let mut codec = AntCodec::new();
        let wire = ChannelData::broadcast(0, [1; 8]).encode();
        let mut src = BytesMut::from(&wire[..5]);

        assert!(codec.decode(&mut src).unwrap().is_none());
        assert_eq!(src.len(), 5);

        src.extend_from_slice(&wire[5..]);
        let msg = codec.decode(&mut src).unwrap().unwrap().unwrap();
        assert!(matches!(msg, AntMessage::Data(_)));
    }

    #[test]
    fn malformed_frame_does_not_end_stream() {
        let mut codec = AntCodec::new();
        let mut src = BytesMut::new();
        src.extend_from_slice(&ChannelOpen::new(0).encode());
        src.extend_from_slice(&Message::new(0x42, &[0]).unwrap().encode());
        src.extend_from_slice(&ChannelOpen::new(1).encode());

        let mut items = Vec::new();
        while let Some(item) = codec.decode(&mut src).unwrap() {
            items.push(item);
        }

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().channel_number(), Some(0));
        assert!(items[1].as_ref().unwrap_err().is_malformed());
        assert_eq!(items[2].as_ref().unwrap().channel_number(), Some(1));
        assert!(src.is_empty());
    }

    #[test]
    fn bad_flag_byte_is_an_item_error() {
        let mut codec = AntCodec::new();
        let mut payload = [0u8; 10];
        payload[crate::extended::FLAG_OFFSET] = 0x01;
        let mut src = BytesMut::new();
        antcore_frame::encode_frame(antcore_frame::MESSAGE_TX_SYNC, 0x4E, &payload, &mut src)
            .unwrap();
        src.extend_from_slice(&ChannelOpen::new(4).encode());

        let first = codec.decode(&mut src).unwrap().unwrap();
        assert!(matches!(first, Err(MessageError::InvalidFlag(0x01))));
        let second = codec.decode(&mut src).unwrap().unwrap().unwrap();
        assert_eq!(second.channel_number(), Some(4));
    }

    #[test]
    fn encode_matches_message_encode() {
        let mut codec = AntCodec::new();
        let msg: AntMessage = ChannelAssign::new(0, 0, 0).into();
        let mut dst = BytesMut::new();

        Encoder::<AntMessage>::encode(&mut codec, msg.clone(), &mut dst).unwrap();
        assert_eq!(&dst[..], &msg.encode()[..]);
    }

    #[test]
    fn encode_enforces_configured_limit() {
        let mut codec = AntCodec::with_config(FrameConfig {
            max_payload_size: 2,
        });
        let msg = ChannelAssign::new(0, 0, 0).into_message();
        let mut dst = BytesMut::new();

        let err = Encoder::<&Message>::encode(&mut codec, &msg, &mut dst).unwrap_err();
        assert!(err.is_malformed());
        assert!(dst.is_empty());
    }
}
