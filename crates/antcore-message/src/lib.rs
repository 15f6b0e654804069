//! Typed ANT messages on top of [`antcore_frame`].
//!
//! A frame's payload is interpreted in three steps:
//! 1. The payload length picks the family: standard (up to 9 bytes), legacy
//!    extended (13 bytes) or flagged extended (anything else from 10 bytes).
//! 2. The [`Registry`] maps the type byte to a typed variant.
//! 3. Extended blocks (channel id, RSSI, RX timestamp) are located by the
//!    family's layout and read through bounds-checked accessors.
//!
//! Burst data packs a rolling [`BurstSequence`] code into byte 0 next to the
//! channel number.
//!
//! ```
//! use antcore_message::{decode, AntMessage, ChannelAssign, ChannelMessage, TypedMessage};
//!
//! let wire = ChannelAssign::new(0, 0x00, 0x00).encode();
//! let AntMessage::ChannelAssign(assign) = decode(&wire).unwrap() else {
//!     unreachable!();
//! };
//! assert_eq!(assign.channel_number(), 0);
//! ```

pub mod burst;
pub mod channel;
#[cfg(feature = "async")]
pub mod codec;
pub mod error;
pub mod extended;
pub mod ids;
pub mod message;
pub mod registry;
pub mod stream;
pub mod variants;

pub use antcore_frame::{checksum, Frame, FrameConfig, FrameError};
pub use burst::BurstSequence;
pub use channel::{pack, unpack, ChannelAddress};
#[cfg(feature = "async")]
pub use codec::AntCodec;
pub use error::{MessageError, Result};
pub use extended::{ChannelId, ExtendedFlags, FlaggedLayout, PayloadFormat, Rssi};
pub use message::Message;
pub use registry::{registry, Registry};
pub use stream::{frame_stream, frame_stream_with_config};
pub use variants::*;

use bytes::Bytes;

/// Decode one frame from the start of `raw` through the built-in registry.
pub fn decode(raw: &[u8]) -> Result<AntMessage> {
    registry().decode(raw)
}

/// Serialize any message to its wire form.
pub fn encode(msg: &AntMessage) -> Bytes {
    msg.encode()
}

/// Construct the default message of `type_id` through the built-in registry.
pub fn construct(type_id: u16) -> Result<AntMessage> {
    registry().construct(type_id)
}
