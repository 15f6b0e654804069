use std::fmt;

use antcore_frame::{
    checksum, decode_frame, is_sync, Frame, FrameError, FOOTER_SIZE, HEADER_SIZE, MESSAGE_TX_SYNC,
};
use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{MessageError, Result};
use crate::extended::{
    ChannelId, ExtendedFlags, FlaggedLayout, PayloadFormat, Rssi, CHANNEL_ID_BLOCK_SIZE,
    EXTENDED_DATA_OFFSET, FLAG_OFFSET, RSSI_BLOCK_SIZE,
    RX_TIMESTAMP_BLOCK_SIZE, STANDARD_PAYLOAD_SIZE,
};

/// A decoded message: type byte, sync byte and an owned payload buffer.
///
/// The payload format (standard, legacy extended, flagged extended) is
/// derived once from the payload and cached, together with the block
/// offsets of a flagged payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    msg_type: u8,
    sync: u8,
    payload: BytesMut,
    format: PayloadFormat,
}

impl Message {
    /// Create a standard message. The payload may hold at most 9 bytes.
    pub fn new(msg_type: u8, payload: &[u8]) -> Result<Self> {
        PayloadFormat::Standard.check_len(payload.len())?;
        Ok(Self::with_format(msg_type, payload, PayloadFormat::Standard))
    }

    /// Create a legacy extended message. The payload must be 13 bytes.
    pub fn legacy_extended(msg_type: u8, payload: &[u8]) -> Result<Self> {
        PayloadFormat::LegacyExtended.check_len(payload.len())?;
        Ok(Self::with_format(
            msg_type,
            payload,
            PayloadFormat::LegacyExtended,
        ))
    }

    /// Create a flagged extended message. Byte 9 is the flag byte and the
    /// payload length must match the blocks it enables.
    pub fn flagged_extended(msg_type: u8, payload: &[u8]) -> Result<Self> {
        if payload.len() <= FLAG_OFFSET {
            return Err(MessageError::PayloadTooShort {
                format: "flagged extended",
                size: payload.len(),
                min: EXTENDED_DATA_OFFSET,
            });
        }
        let format = PayloadFormat::FlaggedExtended(FlaggedLayout::from_flag_byte(
            payload[FLAG_OFFSET],
        )?);
        format.check_len(payload.len())?;
        Ok(Self::with_format(msg_type, payload, format))
    }

    /// Create a message whose format is picked from the payload length.
    pub fn from_payload(msg_type: u8, payload: &[u8]) -> Result<Self> {
        let format = PayloadFormat::detect(payload)?;
        Ok(Self::with_format(msg_type, payload, format))
    }

    /// Build a zero-filled standard message.
    pub(crate) fn zeroed(msg_type: u8, len: usize) -> Self {
        debug_assert!(len <= STANDARD_PAYLOAD_SIZE);
        Self {
            msg_type,
            sync: MESSAGE_TX_SYNC,
            payload: BytesMut::zeroed(len),
            format: PayloadFormat::Standard,
        }
    }

    fn with_format(msg_type: u8, payload: &[u8], format: PayloadFormat) -> Self {
        Self {
            msg_type,
            sync: MESSAGE_TX_SYNC,
            payload: BytesMut::from(payload),
            format,
        }
    }

    /// Decode an untyped message from the start of `raw`.
    pub fn decode(raw: &[u8]) -> Result<Self> {
        Self::from_frame(decode_frame(raw)?)
    }

    /// Interpret a checksum-validated frame.
    pub fn from_frame(frame: Frame) -> Result<Self> {
        let mut msg = Self::from_payload(frame.msg_type, frame.payload.as_ref())?;
        msg.sync = frame.sync;
        Ok(msg)
    }

    /// The frame this message is sent as.
    pub fn to_frame(&self) -> Frame {
        Frame::new(self.msg_type, Bytes::copy_from_slice(&self.payload)).with_sync(self.sync)
    }

    /// Serialize to exactly `payload.len() + 4` bytes.
    pub fn encode(&self) -> Bytes {
        let mut dst = BytesMut::with_capacity(self.wire_size());
        self.encode_into(&mut dst);
        dst.freeze()
    }

    /// Append the wire form of this message to `dst`.
    pub fn encode_into(&self, dst: &mut BytesMut) {
        dst.reserve(self.wire_size());
        dst.put_u8(self.sync);
        dst.put_u8(self.payload.len() as u8);
        dst.put_u8(self.msg_type);
        dst.put_slice(&self.payload);
        dst.put_u8(self.checksum());
    }

    /// XOR checksum over sync, length, type and payload.
    pub fn checksum(&self) -> u8 {
        checksum(
            self.sync,
            self.payload.len() as u8,
            self.msg_type,
            &self.payload,
        )
    }

    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len() + FOOTER_SIZE
    }

    pub fn msg_type(&self) -> u8 {
        self.msg_type
    }

    pub fn sync(&self) -> u8 {
        self.sync
    }

    /// Replace the sync byte. Only the two sync markers are accepted.
    pub fn set_sync(&mut self, sync: u8) -> Result<()> {
        if !is_sync(sync) {
            return Err(FrameError::InvalidSync(sync).into());
        }
        self.sync = sync;
        Ok(())
    }

    pub fn with_sync(mut self, sync: u8) -> Result<Self> {
        self.set_sync(sync)?;
        Ok(self)
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Replace the payload, staying in the current format family.
    ///
    /// A flagged payload re-reads its flag byte and recomputes block offsets.
    pub fn set_payload(&mut self, payload: &[u8]) -> Result<()> {
        let format = match self.format {
            PayloadFormat::FlaggedExtended(_) => {
                return self.replace_with(Self::flagged_extended(self.msg_type, payload)?);
            }
            other => other,
        };
        format.check_len(payload.len())?;
        self.payload = BytesMut::from(payload);
        Ok(())
    }

    fn replace_with(&mut self, other: Message) -> Result<()> {
        self.payload = other.payload;
        self.format = other.format;
        Ok(())
    }

    pub(crate) fn byte(&self, index: usize) -> u8 {
        self.payload[index]
    }

    pub(crate) fn set_byte(&mut self, index: usize, value: u8) {
        self.payload[index] = value;
    }

    pub(crate) fn bytes(&self, start: usize, len: usize) -> &[u8] {
        &self.payload[start..start + len]
    }

    pub(crate) fn bytes_mut(&mut self, start: usize, len: usize) -> &mut [u8] {
        &mut self.payload[start..start + len]
    }

    pub(crate) fn push_byte(&mut self, value: u8) -> Result<()> {
        self.format.check_len(self.payload.len() + 1)?;
        self.payload.put_u8(value);
        Ok(())
    }

    pub fn format(&self) -> PayloadFormat {
        self.format
    }

    pub fn is_extended(&self) -> bool {
        self.format.is_extended()
    }

    /// The flag byte of a flagged extended payload.
    pub fn flag(&self) -> Result<ExtendedFlags> {
        self.format
            .layout()
            .map(FlaggedLayout::flags)
            .ok_or(MessageError::DataUnavailable("flag byte"))
    }

    /// Change which optional blocks a flagged payload carries.
    ///
    /// Blocks that stay enabled keep their contents; newly enabled blocks are
    /// zero-filled and the payload is resized to the new layout.
    pub fn set_flag(&mut self, bits: u8) -> Result<()> {
        let Some(old) = self.format.layout().copied() else {
            return Err(MessageError::DataUnavailable("flag byte"));
        };
        let new = FlaggedLayout::from_flag_byte(bits)?;

        let mut payload = BytesMut::zeroed(new.payload_len());
        payload[..FLAG_OFFSET].copy_from_slice(&self.payload[..FLAG_OFFSET]);
        payload[FLAG_OFFSET] = bits;

        let blocks = [
            (
                old.channel_id_offset(),
                new.channel_id_offset(),
                CHANNEL_ID_BLOCK_SIZE,
            ),
            (old.rssi_offset(), new.rssi_offset(), RSSI_BLOCK_SIZE),
            (
                old.rx_timestamp_offset(),
                new.rx_timestamp_offset(),
                RX_TIMESTAMP_BLOCK_SIZE,
            ),
        ];
        for (from, to, size) in blocks {
            if let (Some(from), Some(to)) = (from, to) {
                payload[to..to + size].copy_from_slice(&self.payload[from..from + size]);
            }
        }

        self.payload = payload;
        self.format = PayloadFormat::FlaggedExtended(new);
        Ok(())
    }

    fn block(&self, offset: Option<usize>, size: usize, name: &'static str) -> Result<&[u8]> {
        let offset = offset.ok_or(MessageError::DataUnavailable(name))?;
        self.payload
            .get(offset..offset + size)
            .ok_or(MessageError::PayloadTooShort {
                format: self.format.name(),
                size: self.payload.len(),
                min: offset + size,
            })
    }

    fn block_mut(
        &mut self,
        offset: Option<usize>,
        size: usize,
        name: &'static str,
    ) -> Result<&mut [u8]> {
        let offset = offset.ok_or(MessageError::DataUnavailable(name))?;
        let len = self.payload.len();
        let format = self.format.name();
        self.payload
            .get_mut(offset..offset + size)
            .ok_or(MessageError::PayloadTooShort {
                format,
                size: len,
                min: offset + size,
            })
    }

    /// Channel id block of an extended payload.
    pub fn channel_id(&self) -> Result<ChannelId> {
        self.block(
            self.format.channel_id_offset(),
            CHANNEL_ID_BLOCK_SIZE,
            "channel id",
        )
        .map(ChannelId::read)
    }

    pub fn set_channel_id(&mut self, id: ChannelId) -> Result<()> {
        let offset = self.format.channel_id_offset();
        id.write(self.block_mut(offset, CHANNEL_ID_BLOCK_SIZE, "channel id")?);
        Ok(())
    }

    /// RSSI block of a flagged extended payload.
    pub fn rssi(&self) -> Result<Rssi> {
        self.block(self.format.rssi_offset(), RSSI_BLOCK_SIZE, "rssi")
            .map(Rssi::read)
    }

    pub fn set_rssi(&mut self, rssi: Rssi) -> Result<()> {
        let offset = self.format.rssi_offset();
        rssi.write(self.block_mut(offset, RSSI_BLOCK_SIZE, "rssi")?);
        Ok(())
    }

    /// RX timestamp block of a flagged extended payload (little-endian).
    pub fn rx_timestamp(&self) -> Result<u16> {
        self.block(
            self.format.rx_timestamp_offset(),
            RX_TIMESTAMP_BLOCK_SIZE,
            "rx timestamp",
        )
        .map(|block| u16::from_le_bytes([block[0], block[1]]))
    }

    pub fn set_rx_timestamp(&mut self, timestamp: u16) -> Result<()> {
        let offset = self.format.rx_timestamp_offset();
        self.block_mut(offset, RX_TIMESTAMP_BLOCK_SIZE, "rx timestamp")?
            .copy_from_slice(&timestamp.to_le_bytes());
        Ok(())
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Message 0x{:02X}: {} bytes>", self.msg_type, self.payload.len())
    }
}
