//! Channel addressing in payload byte 0.
//!
//! Channel-scoped messages put the channel number in byte 0. Burst messages
//! share that byte with a 3-bit sequence code:
//!
//! ```text
//!   7   6   5   4   3   2   1   0
//! ┌───────────┬───────────────────┐
//! │ sequence  │  channel (0..=31) │
//! └───────────┴───────────────────┘
//! ```

use crate::error::{MessageError, Result};

pub const CHANNEL_MASK: u8 = 0b0001_1111;
pub const SEQUENCE_MASK: u8 = 0b1110_0000;
pub const SEQUENCE_SHIFT: u32 = 5;

/// Highest channel number that fits next to a sequence code.
pub const MAX_BURST_CHANNEL: u8 = CHANNEL_MASK;

/// Highest 3-bit sequence code.
pub const MAX_SEQUENCE: u8 = 0b111;

/// How a message interprets payload byte 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelAddress {
    /// The whole byte is the channel number.
    Plain,
    /// Low 5 bits channel, high 3 bits sequence code.
    Burst,
}

impl ChannelAddress {
    pub fn max_channel(self) -> u8 {
        match self {
            ChannelAddress::Plain => u8::MAX,
            ChannelAddress::Burst => MAX_BURST_CHANNEL,
        }
    }

    pub fn channel_number(self, byte0: u8) -> u8 {
        match self {
            ChannelAddress::Plain => byte0,
            ChannelAddress::Burst => byte0 & CHANNEL_MASK,
        }
    }

    /// The sequence code, for burst addressing only.
    pub fn sequence(self, byte0: u8) -> Option<u8> {
        match self {
            ChannelAddress::Plain => None,
            ChannelAddress::Burst => Some(sequence_of(byte0)),
        }
    }

    /// Replace the channel number in `byte0`, keeping any sequence bits.
    pub fn with_channel(self, byte0: u8, channel: u8) -> Result<u8> {
        match self {
            ChannelAddress::Plain => Ok(channel),
            ChannelAddress::Burst => pack(channel, sequence_of(byte0)),
        }
    }
}

/// Combine a burst channel number and sequence code into byte 0.
pub fn pack(channel: u8, sequence: u8) -> Result<u8> {
    check_channel(channel)?;
    if sequence > MAX_SEQUENCE {
        return Err(MessageError::OutOfRange {
            field: "sequence code",
            value: u32::from(sequence),
            max: u32::from(MAX_SEQUENCE),
        });
    }
    Ok(channel | (sequence << SEQUENCE_SHIFT))
}

/// Split burst byte 0 into `(channel, sequence)`.
pub fn unpack(byte0: u8) -> (u8, u8) {
    (byte0 & CHANNEL_MASK, sequence_of(byte0))
}

fn sequence_of(byte0: u8) -> u8 {
    (byte0 & SEQUENCE_MASK) >> SEQUENCE_SHIFT
}

pub(crate) fn check_channel(channel: u8) -> Result<()> {
    if channel > MAX_BURST_CHANNEL {
        return Err(MessageError::OutOfRange {
            field: "burst channel number",
            value: u32::from(channel),
            max: u32::from(MAX_BURST_CHANNEL),
        });
    }
    Ok(())
}
