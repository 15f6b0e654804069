//! Broadcast, acknowledged and burst data in every payload family.
//!
//! | kind         | standard / flagged | legacy extended |
//! |--------------|--------------------|-----------------|
//! | broadcast    | `0x4E`             | `0x5D`          |
//! | acknowledged | `0x4F`             | `0x5E`          |
//! | burst        | `0x50`             | `0x5F`          |
//!
//! Burst kinds pack a sequence code next to the channel number in byte 0.

use std::fmt;

use bytes::Bytes;

use crate::burst::BurstSequence;
use crate::channel::{self, ChannelAddress};
use crate::error::{MessageError, Result};
use crate::extended::{
    ChannelId, ExtendedFlags, FlaggedLayout, PayloadFormat, Rssi, FLAG_OFFSET,
    LEGACY_PAYLOAD_SIZE, STANDARD_PAYLOAD_SIZE,
};
use crate::ids;
use crate::message::Message;

use super::{check_len, ChannelMessage};

/// Bytes of application data in a standard or flagged data message.
pub const DATA_SIZE: usize = 8;

/// Bytes after the channel byte in a legacy extended data message.
pub const LEGACY_DATA_SIZE: usize = LEGACY_PAYLOAD_SIZE - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    Broadcast,
    Acknowledged,
    Burst,
}

impl DataKind {
    /// Kind and legacy-ness of a data type byte.
    pub fn from_type(msg_type: u8) -> Option<(Self, bool)> {
        match msg_type {
            ids::BROADCAST_DATA => Some((DataKind::Broadcast, false)),
            ids::ACKNOWLEDGED_DATA => Some((DataKind::Acknowledged, false)),
            ids::BURST_DATA => Some((DataKind::Burst, false)),
            ids::EXTENDED_BROADCAST_DATA => Some((DataKind::Broadcast, true)),
            ids::EXTENDED_ACKNOWLEDGED_DATA => Some((DataKind::Acknowledged, true)),
            ids::EXTENDED_BURST_DATA => Some((DataKind::Burst, true)),
            _ => None,
        }
    }

    /// Type byte for standard and flagged extended payloads.
    pub fn standard_type(self) -> u8 {
        match self {
            DataKind::Broadcast => ids::BROADCAST_DATA,
            DataKind::Acknowledged => ids::ACKNOWLEDGED_DATA,
            DataKind::Burst => ids::BURST_DATA,
        }
    }

    /// Type byte for legacy extended payloads.
    pub fn legacy_type(self) -> u8 {
        match self {
            DataKind::Broadcast => ids::EXTENDED_BROADCAST_DATA,
            DataKind::Acknowledged => ids::EXTENDED_ACKNOWLEDGED_DATA,
            DataKind::Burst => ids::EXTENDED_BURST_DATA,
        }
    }

    pub fn address(self) -> ChannelAddress {
        match self {
            DataKind::Burst => ChannelAddress::Burst,
            _ => ChannelAddress::Plain,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataKind::Broadcast => "BroadcastData",
            DataKind::Acknowledged => "AcknowledgedData",
            DataKind::Burst => "BurstData",
        }
    }

    pub(crate) fn legacy_name(self) -> &'static str {
        match self {
            DataKind::Broadcast => "LegacyBroadcastData",
            DataKind::Acknowledged => "LegacyAcknowledgedData",
            DataKind::Burst => "LegacyBurstData",
        }
    }

    pub(crate) fn extended_name(self) -> &'static str {
        match self {
            DataKind::Broadcast => "ExtendedBroadcastData",
            DataKind::Acknowledged => "ExtendedAcknowledgedData",
            DataKind::Burst => "ExtendedBurstData",
        }
    }
}

/// Channel data message: byte 0 addresses the channel, the rest is
/// application data plus any extended blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelData {
    msg: Message,
    kind: DataKind,
}

impl ChannelData {
    pub fn broadcast(channel: u8, data: [u8; DATA_SIZE]) -> Self {
        Self::standard(DataKind::Broadcast, channel, data)
    }

    pub fn acknowledged(channel: u8, data: [u8; DATA_SIZE]) -> Self {
        Self::standard(DataKind::Acknowledged, channel, data)
    }

    /// Burst packet with an explicit sequence code.
    pub fn burst(channel: u8, sequence: u8, data: [u8; DATA_SIZE]) -> Result<Self> {
        let byte0 = channel::pack(channel, sequence)?;
        Ok(Self::standard(DataKind::Burst, byte0, data))
    }

    /// Burst packet taking the next code from `sequence`.
    pub fn burst_from(
        sequence: &mut BurstSequence,
        channel: u8,
        data: [u8; DATA_SIZE],
    ) -> Result<Self> {
        let byte0 = sequence.combine(channel)?;
        Ok(Self::standard(DataKind::Burst, byte0, data))
    }

    fn standard(kind: DataKind, byte0: u8, data: [u8; DATA_SIZE]) -> Self {
        let mut msg = Message::zeroed(kind.standard_type(), STANDARD_PAYLOAD_SIZE);
        msg.set_byte(0, byte0);
        msg.bytes_mut(1, DATA_SIZE).copy_from_slice(&data);
        Self { msg, kind }
    }

    /// Legacy extended data message. Burst kinds start at sequence code 0.
    pub fn legacy(kind: DataKind, channel: u8, data: [u8; LEGACY_DATA_SIZE]) -> Result<Self> {
        let byte0 = kind.address().with_channel(0, channel)?;
        let mut payload = [0u8; LEGACY_PAYLOAD_SIZE];
        payload[0] = byte0;
        payload[1..].copy_from_slice(&data);
        let msg = Message::legacy_extended(kind.legacy_type(), &payload)?;
        Ok(Self { msg, kind })
    }

    /// Flagged extended data message with zero-filled blocks for `flags`.
    pub fn extended(
        kind: DataKind,
        channel: u8,
        data: [u8; DATA_SIZE],
        flags: ExtendedFlags,
    ) -> Result<Self> {
        let byte0 = kind.address().with_channel(0, channel)?;
        let layout = FlaggedLayout::new(flags);
        let mut payload = vec![0u8; layout.payload_len()];
        payload[0] = byte0;
        payload[1..FLAG_OFFSET].copy_from_slice(&data);
        payload[FLAG_OFFSET] = flags.bits();
        let msg = Message::flagged_extended(kind.standard_type(), &payload)?;
        Ok(Self { msg, kind })
    }

    pub fn kind(&self) -> DataKind {
        self.kind
    }

    /// Family-qualified name, e.g. `ExtendedBurstData`.
    pub fn name(&self) -> &'static str {
        match self.msg.format() {
            PayloadFormat::Standard => self.kind.name(),
            PayloadFormat::LegacyExtended => self.kind.legacy_name(),
            PayloadFormat::FlaggedExtended(_) => self.kind.extended_name(),
        }
    }

    pub fn message(&self) -> &Message {
        &self.msg
    }

    pub fn into_message(self) -> Message {
        self.msg
    }

    pub fn encode(&self) -> Bytes {
        self.msg.encode()
    }

    fn data_len(&self) -> usize {
        match self.msg.format() {
            PayloadFormat::LegacyExtended => LEGACY_DATA_SIZE,
            _ => DATA_SIZE,
        }
    }

    /// Application data after the channel byte.
    pub fn data(&self) -> &[u8] {
        self.msg.bytes(1, self.data_len())
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        let len = self.data_len();
        self.msg.bytes_mut(1, len)
    }

    /// Burst sequence code, `None` for broadcast and acknowledged data.
    pub fn sequence(&self) -> Option<u8> {
        self.kind.address().sequence(self.msg.byte(0))
    }

    pub fn set_sequence(&mut self, sequence: u8) -> Result<()> {
        if self.kind != DataKind::Burst {
            return Err(MessageError::DataUnavailable("sequence code"));
        }
        let byte0 = channel::pack(self.channel_number(), sequence)?;
        self.msg.set_byte(0, byte0);
        Ok(())
    }

    pub fn flag(&self) -> Result<ExtendedFlags> {
        self.msg.flag()
    }

    /// See [`Message::set_flag`].
    pub fn set_flag(&mut self, bits: u8) -> Result<()> {
        self.msg.set_flag(bits)
    }

    pub fn channel_id(&self) -> Result<ChannelId> {
        self.msg.channel_id()
    }

    pub fn set_channel_id(&mut self, id: ChannelId) -> Result<()> {
        self.msg.set_channel_id(id)
    }

    pub fn rssi(&self) -> Result<Rssi> {
        self.msg.rssi()
    }

    pub fn set_rssi(&mut self, rssi: Rssi) -> Result<()> {
        self.msg.set_rssi(rssi)
    }

    pub fn rx_timestamp(&self) -> Result<u16> {
        self.msg.rx_timestamp()
    }

    pub fn set_rx_timestamp(&mut self, timestamp: u16) -> Result<()> {
        self.msg.set_rx_timestamp(timestamp)
    }

    /// Zeroed message of `msg_type`, used for construct-by-type.
    pub(crate) fn default_for(msg_type: u8) -> Option<Self> {
        let (kind, legacy) = DataKind::from_type(msg_type)?;
        if legacy {
            return Self::legacy(kind, 0, [0; LEGACY_DATA_SIZE]).ok();
        }
        Some(Self::standard(kind, 0, [0; DATA_SIZE]))
    }
}

impl TryFrom<Message> for ChannelData {
    type Error = MessageError;

    fn try_from(msg: Message) -> Result<Self> {
        let Some((kind, legacy)) = DataKind::from_type(msg.msg_type()) else {
            return Err(MessageError::WrongType {
                expected: "ChannelData",
                found: msg.msg_type(),
            });
        };

        let len = msg.payload().len();
        if legacy {
            check_len(kind.legacy_name(), len, LEGACY_PAYLOAD_SIZE, LEGACY_PAYLOAD_SIZE)?;
        } else if msg.format() == PayloadFormat::Standard {
            check_len(kind.name(), len, STANDARD_PAYLOAD_SIZE, STANDARD_PAYLOAD_SIZE)?;
        }
        Ok(Self { msg, kind })
    }
}

impl ChannelMessage for ChannelData {
    fn channel_number(&self) -> u8 {
        self.kind.address().channel_number(self.msg.byte(0))
    }

    fn set_channel_number(&mut self, channel: u8) -> Result<()> {
        let byte0 = self.kind.address().with_channel(self.msg.byte(0), channel)?;
        self.msg.set_byte(0, byte0);
        Ok(())
    }
}

impl fmt::Display for ChannelData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: C({})>", self.name(), self.channel_number())
    }
}
