//! Channel events, command responses and requested device information.

use std::fmt;

use crate::error::Result;
use crate::ids;
use crate::message::Message;
use crate::registry::registry;

use super::{ChannelMessage, TypedMessage};

/// An RF event on a channel, or the response to a command sent on it.
///
/// Message id [`ids::EVENT_RF`] marks an RF event; any other id is the type
/// byte of the command being answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEvent {
    msg: Message,
}

impl ChannelEvent {
    pub fn new(channel: u8, message_id: u8, code: u8) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 3);
        msg.set_byte(0, channel);
        msg.set_byte(1, message_id);
        msg.set_byte(2, code);
        Self { msg }
    }

    pub fn message_id(&self) -> u8 {
        self.msg.byte(1)
    }

    pub fn set_message_id(&mut self, message_id: u8) {
        self.msg.set_byte(1, message_id);
    }

    pub fn message_code(&self) -> u8 {
        self.msg.byte(2)
    }

    pub fn set_message_code(&mut self, code: u8) {
        self.msg.set_byte(2, code);
    }

    pub fn is_rf_event(&self) -> bool {
        self.message_id() == ids::EVENT_RF
    }

    /// True for a response that reports success.
    pub fn is_ok(&self) -> bool {
        !self.is_rf_event() && self.message_code() == ids::RESPONSE_NO_ERROR
    }
}

impl Default for ChannelEvent {
    fn default() -> Self {
        Self::new(0, 0, 0)
    }
}

typed_message!(ChannelEvent, ids::CHANNEL_EVENT, "ChannelEvent", 3);
channel_message!(@address ChannelEvent);

impl fmt::Display for ChannelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.message_code();
        if self.is_rf_event() {
            return write!(f, "<ChannelEvent: C({}): 0x{:02x}>", self.channel_number(), code);
        }

        let id = self.message_id();
        let name = registry()
            .name(id)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("0x{id:02X}"));
        if code == ids::RESPONSE_NO_ERROR {
            write!(
                f,
                "<ChannelResponse: '{}' on C({}): OK>",
                name,
                self.channel_number()
            )
        } else {
            write!(
                f,
                "<ChannelResponse: '{}' on C({}): 0x{:02x}>",
                name,
                self.channel_number(),
                code
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStatus {
    msg: Message,
}

impl ChannelStatus {
    pub fn new(channel: u8, status: u8) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 2);
        msg.set_byte(0, channel);
        msg.set_byte(1, status);
        Self { msg }
    }

    pub fn status(&self) -> u8 {
        self.msg.byte(1)
    }

    pub fn set_status(&mut self, status: u8) {
        self.msg.set_byte(1, status);
    }
}

impl Default for ChannelStatus {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

typed_message!(ChannelStatus, ids::CHANNEL_STATUS, "ChannelStatus", 2);
channel_message!(ChannelStatus);

pub const VERSION_SIZE: usize = 9;

/// Firmware version string, NUL padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    msg: Message,
}

impl Version {
    pub fn new(version: [u8; VERSION_SIZE]) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, VERSION_SIZE);
        msg.bytes_mut(0, VERSION_SIZE).copy_from_slice(&version);
        Self { msg }
    }

    pub fn version(&self) -> &[u8] {
        self.msg.bytes(0, VERSION_SIZE)
    }

    pub fn set_version(&mut self, version: [u8; VERSION_SIZE]) {
        self.msg.bytes_mut(0, VERSION_SIZE).copy_from_slice(&version);
    }

    /// The version bytes up to the first NUL, lossily decoded.
    pub fn version_string(&self) -> String {
        let raw = self.version();
        let end = raw.iter().position(|b| *b == 0).unwrap_or(raw.len());
        String::from_utf8_lossy(&raw[..end]).into_owned()
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new([0; VERSION_SIZE])
    }
}

typed_message!(Version, ids::VERSION, "Version", VERSION_SIZE);
device_message!(Version);

/// Transceiver capabilities. The second advanced options byte is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    msg: Message,
}

impl Capabilities {
    const BASE_SIZE: usize = 4;
    const ADV_OPTIONS2_OFFSET: usize = 4;

    pub fn new(max_channels: u8, max_networks: u8, std_options: u8, adv_options: u8) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, Self::BASE_SIZE);
        msg.set_byte(0, max_channels);
        msg.set_byte(1, max_networks);
        msg.set_byte(2, std_options);
        msg.set_byte(3, adv_options);
        Self { msg }
    }

    pub fn max_channels(&self) -> u8 {
        self.msg.byte(0)
    }

    pub fn set_max_channels(&mut self, value: u8) {
        self.msg.set_byte(0, value);
    }

    pub fn max_networks(&self) -> u8 {
        self.msg.byte(1)
    }

    pub fn set_max_networks(&mut self, value: u8) {
        self.msg.set_byte(1, value);
    }

    pub fn std_options(&self) -> u8 {
        self.msg.byte(2)
    }

    pub fn set_std_options(&mut self, value: u8) {
        self.msg.set_byte(2, value);
    }

    pub fn adv_options(&self) -> u8 {
        self.msg.byte(3)
    }

    pub fn set_adv_options(&mut self, value: u8) {
        self.msg.set_byte(3, value);
    }

    /// Reads as 0 when the byte is absent.
    pub fn adv_options2(&self) -> u8 {
        self.msg
            .payload()
            .get(Self::ADV_OPTIONS2_OFFSET)
            .copied()
            .unwrap_or(0)
    }

    /// Extends the payload to five bytes when the byte is absent.
    pub fn set_adv_options2(&mut self, value: u8) -> Result<()> {
        if self.msg.payload().len() > Self::ADV_OPTIONS2_OFFSET {
            self.msg.set_byte(Self::ADV_OPTIONS2_OFFSET, value);
            return Ok(());
        }
        self.msg.push_byte(value)
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

typed_message!(Capabilities, ids::CAPABILITIES, "Capabilities", 4, 9);
device_message!(Capabilities);

pub const SERIAL_NUMBER_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialNumber {
    msg: Message,
}

impl SerialNumber {
    pub fn new(serial: [u8; SERIAL_NUMBER_SIZE]) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, SERIAL_NUMBER_SIZE);
        msg.bytes_mut(0, SERIAL_NUMBER_SIZE).copy_from_slice(&serial);
        Self { msg }
    }

    pub fn serial_number(&self) -> &[u8] {
        self.msg.bytes(0, SERIAL_NUMBER_SIZE)
    }

    pub fn set_serial_number(&mut self, serial: [u8; SERIAL_NUMBER_SIZE]) {
        self.msg
            .bytes_mut(0, SERIAL_NUMBER_SIZE)
            .copy_from_slice(&serial);
    }

    /// The serial number as a little-endian integer.
    pub fn value(&self) -> u32 {
        let raw = self.serial_number();
        u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])
    }
}

impl Default for SerialNumber {
    fn default() -> Self {
        Self::new([0; SERIAL_NUMBER_SIZE])
    }
}

typed_message!(SerialNumber, ids::SERIAL_NUMBER, "SerialNumber", SERIAL_NUMBER_SIZE);
device_message!(SerialNumber);

/// Sent by the transceiver after a reset; byte 0 is a reset cause bitmask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Startup {
    msg: Message,
}

impl Startup {
    pub fn new(cause: u8) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 1);
        msg.set_byte(0, cause);
        Self { msg }
    }

    pub fn cause(&self) -> u8 {
        self.msg.byte(0)
    }

    pub fn set_cause(&mut self, cause: u8) {
        self.msg.set_byte(0, cause);
    }

    fn has_bit(&self, bit: u8) -> bool {
        self.cause() & (1 << bit) != 0
    }

    pub fn is_power_on_reset(&self) -> bool {
        self.cause() == 0
    }

    pub fn is_hardware_line_reset(&self) -> bool {
        self.has_bit(0)
    }

    pub fn is_watchdog_reset(&self) -> bool {
        self.has_bit(1)
    }

    pub fn is_command_reset(&self) -> bool {
        self.has_bit(5)
    }

    pub fn is_synchronous_reset(&self) -> bool {
        self.has_bit(6)
    }

    pub fn is_suspend_reset(&self) -> bool {
        self.has_bit(7)
    }
}

impl Default for Startup {
    fn default() -> Self {
        Self::new(0)
    }
}

typed_message!(Startup, ids::STARTUP, "Startup", 1);
device_message!(Startup);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MessageError;

    #[test]
    fn rf_event_display() {
        let event = ChannelEvent::new(2, ids::EVENT_RF, 0x03);
        assert!(event.is_rf_event());
        assert!(!event.is_ok());
        assert_eq!(event.to_string(), "<ChannelEvent: C(2): 0x03>");
    }

    #[test]
    fn response_display() {
        let ok = ChannelEvent::new(0, ids::CHANNEL_ASSIGN, ids::RESPONSE_NO_ERROR);
        assert!(ok.is_ok());
        assert_eq!(ok.to_string(), "<ChannelResponse: 'ChannelAssign' on C(0): OK>");

        let failed = ChannelEvent::new(1, ids::CHANNEL_OPEN, 0x15);
        assert_eq!(
            failed.to_string(),
            "<ChannelResponse: 'ChannelOpen' on C(1): 0x15>"
        );

        let unknown = ChannelEvent::new(1, 0xEE, 0);
        assert_eq!(unknown.to_string(), "<ChannelResponse: '0xEE' on C(1): OK>");
    }

    #[test]
    fn status_fields() {
        let mut status = ChannelStatus::new(3, 0x02);
        assert_eq!(status.status(), 0x02);
        status.set_status(0x03);
        assert_eq!(status.message().payload(), &[3, 3]);
        assert_eq!(status.to_string(), "<ChannelStatus: C(3)>");
    }

    #[test]
    fn version_requires_nine_bytes() {
        let version = Version::new(*b"AJK3.00\0\0");
        assert_eq!(version.version_string(), "AJK3.00");

        let short = Message::new(ids::VERSION, b"AP2").unwrap();
        assert!(matches!(
            Version::try_from(short),
            Err(MessageError::PayloadTooShort { min: 9, .. })
        ));
    }

    #[test]
    fn capabilities_optional_byte() {
        let mut caps = Capabilities::new(8, 3, 0, 0xBA);
        assert_eq!(caps.message().payload().len(), 4);
        assert_eq!(caps.adv_options2(), 0);

        caps.set_adv_options2(0x36).unwrap();
        assert_eq!(caps.message().payload(), &[8, 3, 0, 0xBA, 0x36]);
        assert_eq!(caps.adv_options2(), 0x36);

        caps.set_adv_options2(0x07).unwrap();
        assert_eq!(caps.message().payload().len(), 5);
        assert_eq!(caps.max_channels(), 8);
        assert_eq!(caps.max_networks(), 3);
    }

    #[test]
    fn serial_number() {
        let serial = SerialNumber::new([0x78, 0x56, 0x34, 0x12]);
        assert_eq!(serial.value(), 0x1234_5678);

        let long = Message::new(ids::SERIAL_NUMBER, &[0; 5]).unwrap();
        assert!(SerialNumber::try_from(long).unwrap_err().is_malformed());
    }

    #[test]
    fn startup_causes() {
        assert!(Startup::new(0).is_power_on_reset());

        let startup = Startup::new(0b1110_0011);
        assert!(!startup.is_power_on_reset());
        assert!(startup.is_hardware_line_reset());
        assert!(startup.is_watchdog_reset());
        assert!(startup.is_command_reset());
        assert!(startup.is_synchronous_reset());
        assert!(startup.is_suspend_reset());

        let command = Startup::new(0x20);
        assert!(command.is_command_reset());
        assert!(!command.is_watchdog_reset());
    }
}
