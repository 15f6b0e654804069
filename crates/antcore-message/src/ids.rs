//! Message type bytes.
//!
//! Names for these live in the registry; see [`crate::registry::Registry::name`].

// Events and requested responses
pub const CHANNEL_EVENT: u8 = 0x40;
pub const CHANNEL_STATUS: u8 = 0x52;
pub const VERSION: u8 = 0x3E;
pub const CAPABILITIES: u8 = 0x54;
pub const SERIAL_NUMBER: u8 = 0x61;
pub const STARTUP: u8 = 0x6F;

// Configuration
pub const CHANNEL_UNASSIGN: u8 = 0x41;
pub const CHANNEL_ASSIGN: u8 = 0x42;
pub const CHANNEL_PERIOD: u8 = 0x43;
pub const CHANNEL_SEARCH_TIMEOUT: u8 = 0x44;
pub const CHANNEL_FREQUENCY: u8 = 0x45;
pub const NETWORK_KEY: u8 = 0x46;
pub const TX_POWER: u8 = 0x47;
pub const CHANNEL_ID: u8 = 0x51;
pub const CHANNEL_TX_POWER: u8 = 0x60;
pub const ENABLE_EXTENDED_MESSAGES: u8 = 0x66;
pub const LIB_CONFIG: u8 = 0x6E;

// Control
pub const SYSTEM_RESET: u8 = 0x4A;
pub const CHANNEL_OPEN: u8 = 0x4B;
pub const CHANNEL_CLOSE: u8 = 0x4C;
pub const CHANNEL_REQUEST: u8 = 0x4D;
pub const OPEN_RX_SCAN: u8 = 0x5B;

// Data
pub const BROADCAST_DATA: u8 = 0x4E;
pub const ACKNOWLEDGED_DATA: u8 = 0x4F;
pub const BURST_DATA: u8 = 0x50;
pub const EXTENDED_BROADCAST_DATA: u8 = 0x5D;
pub const EXTENDED_ACKNOWLEDGED_DATA: u8 = 0x5E;
pub const EXTENDED_BURST_DATA: u8 = 0x5F;

/// Channel event message id carried by RF events (as opposed to responses).
pub const EVENT_RF: u8 = 0x01;

/// Response code for a successfully processed command.
pub const RESPONSE_NO_ERROR: u8 = 0x00;
