//! Payload layouts for extended messages.
//!
//! A standard payload carries at most 9 bytes. Extended payloads append
//! optional blocks after that:
//!
//! - **Legacy**: fixed 13-byte payload, channel id block at byte 5.
//! - **Flagged**: byte 9 is a flag byte; each set bit appends one block
//!   starting at byte 10, in the order channel id, RSSI, RX timestamp.
//!
//! ```text
//! flag 0xE0:  [ data 0..9 ][flag][ chan id (4) ][ rssi (3) ][ ts (2) ]
//!                           9     10            14          17        19
//! ```

use crate::error::{MessageError, Result};

/// Largest payload of a standard (non-extended) message.
pub const STANDARD_PAYLOAD_SIZE: usize = 9;

/// Fixed payload size of a legacy extended message.
pub const LEGACY_PAYLOAD_SIZE: usize = 13;

/// Offset of the channel id block in a legacy extended payload.
pub const LEGACY_CHANNEL_ID_OFFSET: usize = 5;

/// Offset of the flag byte in a flagged extended payload.
pub const FLAG_OFFSET: usize = 9;

/// Offset of the first optional block in a flagged extended payload.
pub const EXTENDED_DATA_OFFSET: usize = 10;

pub const CHANNEL_ID_BLOCK_SIZE: usize = 4;
pub const RSSI_BLOCK_SIZE: usize = 3;
pub const RX_TIMESTAMP_BLOCK_SIZE: usize = 2;

/// The enable bits of a flagged extended payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExtendedFlags(u8);

impl ExtendedFlags {
    pub const CHANNEL_ID: u8 = 0x80;
    pub const RSSI: u8 = 0x40;
    pub const RX_TIMESTAMP: u8 = 0x20;
    pub const ALL: u8 = Self::CHANNEL_ID | Self::RSSI | Self::RX_TIMESTAMP;

    /// Parse a flag byte, rejecting bits outside the three enable bits.
    pub fn from_bits(bits: u8) -> Result<Self> {
        if bits & !Self::ALL != 0 {
            return Err(MessageError::InvalidFlag(bits));
        }
        Ok(Self(bits))
    }

    pub fn new(channel_id: bool, rssi: bool, rx_timestamp: bool) -> Self {
        let mut bits = 0;
        if channel_id {
            bits |= Self::CHANNEL_ID;
        }
        if rssi {
            bits |= Self::RSSI;
        }
        if rx_timestamp {
            bits |= Self::RX_TIMESTAMP;
        }
        Self(bits)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn channel_id(self) -> bool {
        self.0 & Self::CHANNEL_ID != 0
    }

    pub fn rssi(self) -> bool {
        self.0 & Self::RSSI != 0
    }

    pub fn rx_timestamp(self) -> bool {
        self.0 & Self::RX_TIMESTAMP != 0
    }
}

/// Device number, device type and transmission type of a channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ChannelId {
    pub device_number: u16,
    pub device_type: u8,
    pub transmission_type: u8,
}

impl ChannelId {
    pub fn new(device_number: u16, device_type: u8, transmission_type: u8) -> Self {
        Self {
            device_number,
            device_type,
            transmission_type,
        }
    }

    pub(crate) fn read(block: &[u8]) -> Self {
        Self {
            device_number: u16::from_le_bytes([block[0], block[1]]),
            device_type: block[2],
            transmission_type: block[3],
        }
    }

    pub(crate) fn write(&self, block: &mut [u8]) {
        block[..2].copy_from_slice(&self.device_number.to_le_bytes());
        block[2] = self.device_type;
        block[3] = self.transmission_type;
    }
}

/// Received signal strength block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rssi {
    pub measurement_type: u8,
    pub value: i8,
    pub threshold: i8,
}

impl Rssi {
    pub(crate) fn read(block: &[u8]) -> Self {
        Self {
            measurement_type: block[0],
            value: block[1] as i8,
            threshold: block[2] as i8,
        }
    }

    pub(crate) fn write(&self, block: &mut [u8]) {
        block[0] = self.measurement_type;
        block[1] = self.value as u8;
        block[2] = self.threshold as u8;
    }
}

/// Block offsets of a flagged extended payload, derived from its flag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlaggedLayout {
    flags: ExtendedFlags,
    channel_id: Option<usize>,
    rssi: Option<usize>,
    rx_timestamp: Option<usize>,
    payload_len: usize,
}

impl FlaggedLayout {
    /// Lay out the enabled blocks back to back after the flag byte.
    pub fn new(flags: ExtendedFlags) -> Self {
        let mut offset = EXTENDED_DATA_OFFSET;
        let mut place = |enabled: bool, size: usize| {
            enabled.then(|| {
                let at = offset;
                offset += size;
                at
            })
        };

        let channel_id = place(flags.channel_id(), CHANNEL_ID_BLOCK_SIZE);
        let rssi = place(flags.rssi(), RSSI_BLOCK_SIZE);
        let rx_timestamp = place(flags.rx_timestamp(), RX_TIMESTAMP_BLOCK_SIZE);

        Self {
            flags,
            channel_id,
            rssi,
            rx_timestamp,
            payload_len: offset,
        }
    }

    pub fn from_flag_byte(bits: u8) -> Result<Self> {
        ExtendedFlags::from_bits(bits).map(Self::new)
    }

    pub fn flags(&self) -> ExtendedFlags {
        self.flags
    }

    pub fn channel_id_offset(&self) -> Option<usize> {
        self.channel_id
    }

    pub fn rssi_offset(&self) -> Option<usize> {
        self.rssi
    }

    pub fn rx_timestamp_offset(&self) -> Option<usize> {
        self.rx_timestamp
    }

    /// Total payload length implied by the flag byte.
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }
}

/// Which payload family a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadFormat {
    Standard,
    LegacyExtended,
    FlaggedExtended(FlaggedLayout),
}

impl PayloadFormat {
    /// Pick the family from the payload length: up to 9 is standard,
    /// 13 is legacy extended, anything else is flagged extended.
    pub fn detect(payload: &[u8]) -> Result<Self> {
        let format = match payload.len() {
            len if len <= STANDARD_PAYLOAD_SIZE => PayloadFormat::Standard,
            LEGACY_PAYLOAD_SIZE => PayloadFormat::LegacyExtended,
            _ => PayloadFormat::FlaggedExtended(FlaggedLayout::from_flag_byte(
                payload[FLAG_OFFSET],
            )?),
        };
        format.check_len(payload.len())?;
        Ok(format)
    }

    pub fn name(&self) -> &'static str {
        match self {
            PayloadFormat::Standard => "standard",
            PayloadFormat::LegacyExtended => "legacy extended",
            PayloadFormat::FlaggedExtended(_) => "flagged extended",
        }
    }

    pub fn is_extended(&self) -> bool {
        !matches!(self, PayloadFormat::Standard)
    }

    pub fn min_len(&self) -> usize {
        match self {
            PayloadFormat::Standard => 0,
            PayloadFormat::LegacyExtended => LEGACY_PAYLOAD_SIZE,
            PayloadFormat::FlaggedExtended(layout) => layout.payload_len(),
        }
    }

    pub fn max_len(&self) -> usize {
        match self {
            PayloadFormat::Standard => STANDARD_PAYLOAD_SIZE,
            PayloadFormat::LegacyExtended => LEGACY_PAYLOAD_SIZE,
            PayloadFormat::FlaggedExtended(layout) => layout.payload_len(),
        }
    }

    /// Reject payload lengths the format cannot hold.
    pub fn check_len(&self, len: usize) -> Result<()> {
        if len > self.max_len() {
            return Err(MessageError::PayloadTooLarge {
                format: self.name(),
                size: len,
                max: self.max_len(),
            });
        }
        if len < self.min_len() {
            return Err(MessageError::PayloadTooShort {
                format: self.name(),
                size: len,
                min: self.min_len(),
            });
        }
        Ok(())
    }

    pub fn layout(&self) -> Option<&FlaggedLayout> {
        match self {
            PayloadFormat::FlaggedExtended(layout) => Some(layout),
            _ => None,
        }
    }

    pub fn channel_id_offset(&self) -> Option<usize> {
        match self {
            PayloadFormat::Standard => None,
            PayloadFormat::LegacyExtended => Some(LEGACY_CHANNEL_ID_OFFSET),
            PayloadFormat::FlaggedExtended(layout) => layout.channel_id_offset(),
        }
    }

    pub fn rssi_offset(&self) -> Option<usize> {
        self.layout().and_then(FlaggedLayout::rssi_offset)
    }

    pub fn rx_timestamp_offset(&self) -> Option<usize> {
        self.layout().and_then(FlaggedLayout::rx_timestamp_offset)
    }
}
