//! Channel and device configuration commands.

use crate::error::Result;
use crate::extended::{ChannelId, ExtendedFlags, CHANNEL_ID_BLOCK_SIZE};
use crate::ids;
use crate::message::Message;

use super::TypedMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelUnassign {
    msg: Message,
}

impl ChannelUnassign {
    pub fn new(channel: u8) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 1);
        msg.set_byte(0, channel);
        Self { msg }
    }
}

impl Default for ChannelUnassign {
    fn default() -> Self {
        Self::new(0)
    }
}

typed_message!(ChannelUnassign, ids::CHANNEL_UNASSIGN, "ChannelUnassign", 1);
channel_message!(ChannelUnassign);

/// Assign a channel type and network to a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelAssign {
    msg: Message,
}

impl ChannelAssign {
    pub fn new(channel: u8, channel_type: u8, network: u8) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 3);
        msg.set_byte(0, channel);
        msg.set_byte(1, channel_type);
        msg.set_byte(2, network);
        Self { msg }
    }

    pub fn channel_type(&self) -> u8 {
        self.msg.byte(1)
    }

    pub fn set_channel_type(&mut self, channel_type: u8) {
        self.msg.set_byte(1, channel_type);
    }

    pub fn network_number(&self) -> u8 {
        self.msg.byte(2)
    }

    pub fn set_network_number(&mut self, network: u8) {
        self.msg.set_byte(2, network);
    }
}

impl Default for ChannelAssign {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

typed_message!(ChannelAssign, ids::CHANNEL_ASSIGN, "ChannelAssign", 3);
channel_message!(ChannelAssign);

/// Channel message period in 1/32768 s units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPeriod {
    msg: Message,
}

impl ChannelPeriod {
    pub const DEFAULT_PERIOD: u16 = 8192;

    pub fn new(channel: u8, period: u16) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 3);
        msg.set_byte(0, channel);
        msg.bytes_mut(1, 2).copy_from_slice(&period.to_le_bytes());
        Self { msg }
    }

    pub fn period(&self) -> u16 {
        let raw = self.msg.bytes(1, 2);
        u16::from_le_bytes([raw[0], raw[1]])
    }

    pub fn set_period(&mut self, period: u16) {
        self.msg.bytes_mut(1, 2).copy_from_slice(&period.to_le_bytes());
    }
}

impl Default for ChannelPeriod {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_PERIOD)
    }
}

typed_message!(ChannelPeriod, ids::CHANNEL_PERIOD, "ChannelPeriod", 3);
channel_message!(ChannelPeriod);

/// Search timeout in 2.5 s units; `0xFF` searches forever.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSearchTimeout {
    msg: Message,
}

impl ChannelSearchTimeout {
    pub const DEFAULT_TIMEOUT: u8 = 0xFF;

    pub fn new(channel: u8, timeout: u8) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 2);
        msg.set_byte(0, channel);
        msg.set_byte(1, timeout);
        Self { msg }
    }

    pub fn timeout(&self) -> u8 {
        self.msg.byte(1)
    }

    pub fn set_timeout(&mut self, timeout: u8) {
        self.msg.set_byte(1, timeout);
    }
}

impl Default for ChannelSearchTimeout {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_TIMEOUT)
    }
}

typed_message!(
    ChannelSearchTimeout,
    ids::CHANNEL_SEARCH_TIMEOUT,
    "ChannelSearchTimeout",
    2
);
channel_message!(ChannelSearchTimeout);

/// RF frequency as an offset from 2400 MHz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFrequency {
    msg: Message,
}

impl ChannelFrequency {
    pub const DEFAULT_FREQUENCY: u8 = 66;

    pub fn new(channel: u8, frequency: u8) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 2);
        msg.set_byte(0, channel);
        msg.set_byte(1, frequency);
        Self { msg }
    }

    pub fn frequency(&self) -> u8 {
        self.msg.byte(1)
    }

    pub fn set_frequency(&mut self, frequency: u8) {
        self.msg.set_byte(1, frequency);
    }
}

impl Default for ChannelFrequency {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_FREQUENCY)
    }
}

typed_message!(ChannelFrequency, ids::CHANNEL_FREQUENCY, "ChannelFrequency", 2);
channel_message!(ChannelFrequency);

pub const NETWORK_KEY_SIZE: usize = 8;

/// Set the 8-byte key of a network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkKey {
    msg: Message,
}

impl NetworkKey {
    pub fn new(network: u8, key: [u8; NETWORK_KEY_SIZE]) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 1 + NETWORK_KEY_SIZE);
        msg.set_byte(0, network);
        msg.bytes_mut(1, NETWORK_KEY_SIZE).copy_from_slice(&key);
        Self { msg }
    }

    pub fn network_number(&self) -> u8 {
        self.msg.byte(0)
    }

    pub fn set_network_number(&mut self, network: u8) {
        self.msg.set_byte(0, network);
    }

    pub fn key(&self) -> &[u8] {
        self.msg.bytes(1, NETWORK_KEY_SIZE)
    }

    pub fn set_key(&mut self, key: [u8; NETWORK_KEY_SIZE]) {
        self.msg.bytes_mut(1, NETWORK_KEY_SIZE).copy_from_slice(&key);
    }
}

impl Default for NetworkKey {
    fn default() -> Self {
        Self::new(0, [0; NETWORK_KEY_SIZE])
    }
}

typed_message!(NetworkKey, ids::NETWORK_KEY, "NetworkKey", 9);
device_message!(NetworkKey);

/// Transmit power for all channels. Byte 0 is filler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxPower {
    msg: Message,
}

impl TxPower {
    pub fn new(power: u8) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 2);
        msg.set_byte(1, power);
        Self { msg }
    }

    pub fn power(&self) -> u8 {
        self.msg.byte(1)
    }

    pub fn set_power(&mut self, power: u8) {
        self.msg.set_byte(1, power);
    }
}

impl Default for TxPower {
    fn default() -> Self {
        Self::new(0)
    }
}

typed_message!(TxPower, ids::TX_POWER, "TxPower", 2);
device_message!(TxPower);

/// Channel id configuration. A zero field acts as a wildcard when searching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelIdConfig {
    msg: Message,
}

impl ChannelIdConfig {
    pub fn new(channel: u8, id: ChannelId) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 1 + CHANNEL_ID_BLOCK_SIZE);
        msg.set_byte(0, channel);
        id.write(msg.bytes_mut(1, CHANNEL_ID_BLOCK_SIZE));
        Self { msg }
    }

    pub fn id(&self) -> ChannelId {
        ChannelId::read(self.msg.bytes(1, CHANNEL_ID_BLOCK_SIZE))
    }

    pub fn set_id(&mut self, id: ChannelId) {
        id.write(self.msg.bytes_mut(1, CHANNEL_ID_BLOCK_SIZE));
    }

    pub fn device_number(&self) -> u16 {
        self.id().device_number
    }

    pub fn device_type(&self) -> u8 {
        self.id().device_type
    }

    pub fn transmission_type(&self) -> u8 {
        self.id().transmission_type
    }
}

impl Default for ChannelIdConfig {
    fn default() -> Self {
        Self::new(0, ChannelId::default())
    }
}

typed_message!(ChannelIdConfig, ids::CHANNEL_ID, "ChannelId", 5);
channel_message!(ChannelIdConfig);

/// Transmit power of a single channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTxPower {
    msg: Message,
}

impl ChannelTxPower {
    pub fn new(channel: u8, power: u8) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 2);
        msg.set_byte(0, channel);
        msg.set_byte(1, power);
        Self { msg }
    }

    pub fn power(&self) -> u8 {
        self.msg.byte(1)
    }

    pub fn set_power(&mut self, power: u8) {
        self.msg.set_byte(1, power);
    }
}

impl Default for ChannelTxPower {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

typed_message!(ChannelTxPower, ids::CHANNEL_TX_POWER, "ChannelTxPower", 2);
channel_message!(ChannelTxPower);

/// Toggle legacy extended data output. Byte 0 is filler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnableExtended {
    msg: Message,
}

impl EnableExtended {
    pub fn new(enable: bool) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 2);
        msg.set_byte(1, u8::from(enable));
        Self { msg }
    }

    pub fn is_enabled(&self) -> bool {
        self.msg.byte(1) != 0
    }

    pub fn set_enabled(&mut self, enable: bool) {
        self.msg.set_byte(1, u8::from(enable));
    }
}

impl Default for EnableExtended {
    fn default() -> Self {
        Self::new(true)
    }
}

typed_message!(
    EnableExtended,
    ids::ENABLE_EXTENDED_MESSAGES,
    "EnableExtended",
    2
);
device_message!(EnableExtended);

/// Select which blocks flagged extended data carries. Byte 0 is filler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibConfig {
    msg: Message,
}

impl LibConfig {
    pub const DEFAULT_MASK: u8 = ExtendedFlags::CHANNEL_ID | ExtendedFlags::RX_TIMESTAMP;

    pub fn new(flags: ExtendedFlags) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 2);
        msg.set_byte(1, flags.bits());
        Self { msg }
    }

    /// The raw mask byte as received.
    pub fn mask(&self) -> u8 {
        self.msg.byte(1)
    }

    /// The mask as enable flags. Fails with `InvalidFlag` on undefined bits.
    pub fn flags(&self) -> Result<ExtendedFlags> {
        ExtendedFlags::from_bits(self.mask())
    }

    pub fn set_mask(&mut self, bits: u8) -> Result<()> {
        let flags = ExtendedFlags::from_bits(bits)?;
        self.msg.set_byte(1, flags.bits());
        Ok(())
    }
}

impl Default for LibConfig {
    fn default() -> Self {
        Self::new(ExtendedFlags::new(true, false, true))
    }
}

typed_message!(LibConfig, ids::LIB_CONFIG, "LibConfig", 2);
device_message!(LibConfig);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MessageError;
    use crate::variants::ChannelMessage;

    #[test]
    fn assign_fields() {
        let mut assign = ChannelAssign::new(0, 0x00, 0x00);
        assert_eq!(assign.message().payload(), &[0, 0, 0]);

        assign.set_channel_type(0x40);
        assign.set_network_number(2);
        assign.set_channel_number(5).unwrap();
        assert_eq!(assign.message().payload(), &[5, 0x40, 2]);
        assert_eq!(assign.channel_type(), 0x40);
        assert_eq!(assign.network_number(), 2);
    }

    #[test]
    fn period_is_little_endian() {
        let period = ChannelPeriod::default();
        assert_eq!(period.period(), 8192);
        assert_eq!(period.message().payload(), &[0, 0x00, 0x20]);

        let mut period = ChannelPeriod::new(1, 0x1F86);
        assert_eq!(period.message().payload(), &[1, 0x86, 0x1F]);
        period.set_period(4096);
        assert_eq!(period.period(), 4096);
    }

    #[test]
    fn defaults() {
        assert_eq!(ChannelSearchTimeout::default().timeout(), 0xFF);
        assert_eq!(ChannelFrequency::default().frequency(), 66);
        assert!(EnableExtended::default().is_enabled());
        assert_eq!(LibConfig::default().mask(), LibConfig::DEFAULT_MASK);
        assert_eq!(LibConfig::DEFAULT_MASK, 0xA0);
    }

    #[test]
    fn network_key() {
        let key = [0xB9, 0xA5, 0x21, 0xFB, 0xBD, 0x72, 0xC3, 0x45];
        let mut msg = NetworkKey::new(1, key);
        assert_eq!(msg.network_number(), 1);
        assert_eq!(msg.key(), &key);
        assert_eq!(msg.message().payload().len(), 9);

        msg.set_key([0; 8]);
        assert_eq!(msg.key(), &[0; 8]);
        assert_eq!(msg.to_string(), "<NetworkKey>");
    }

    #[test]
    fn filler_byte_first() {
        assert_eq!(TxPower::new(3).message().payload(), &[0, 3]);
        assert_eq!(EnableExtended::new(false).message().payload(), &[0, 0]);
        assert_eq!(LibConfig::default().message().payload(), &[0, 0xA0]);
    }

    #[test]
    fn channel_id_config() {
        let id = ChannelId::new(0x3039, 0x78, 0x01);
        let msg = ChannelIdConfig::new(2, id);
        assert_eq!(msg.message().payload(), &[2, 0x39, 0x30, 0x78, 0x01]);
        assert_eq!(msg.id(), id);
        assert_eq!(msg.device_number(), 0x3039);
        assert_eq!(msg.device_type(), 0x78);
        assert_eq!(msg.transmission_type(), 0x01);
        assert_eq!(msg.to_string(), "<ChannelId: C(2)>");
    }

    #[test]
    fn lib_config_mask_validation() {
        let mut config = LibConfig::default();
        assert!(matches!(config.set_mask(0x01), Err(MessageError::InvalidFlag(0x01))));
        assert_eq!(config.mask(), 0xA0);

        config.set_mask(ExtendedFlags::ALL).unwrap();
        assert!(config.flags().unwrap().rssi());

        let raw = Message::new(ids::LIB_CONFIG, &[0, 0x0F]).unwrap();
        let decoded = LibConfig::try_from(raw).unwrap();
        assert!(matches!(decoded.flags(), Err(MessageError::InvalidFlag(0x0F))));
    }
}
