//! Sync markers.
//!
//! Every frame starts with one of two marker bytes. Which one a device uses
//! depends on the bit order of its serial link.

/// Sync byte for MSB-first links (the common case, USB sticks included).
pub const MESSAGE_TX_SYNC: u8 = 0xA4;

/// Sync byte for LSB-first synchronous serial links.
pub const MESSAGE_TX_SYNC_LSB: u8 = 0xA5;

/// Returns true if the byte is an accepted sync marker.
pub fn is_sync(byte: u8) -> bool {
    byte == MESSAGE_TX_SYNC || byte == MESSAGE_TX_SYNC_LSB
}

/// Returns a human-readable name for a sync byte.
pub fn sync_name(byte: u8) -> &'static str {
    match byte {
        MESSAGE_TX_SYNC => "MSB",
        MESSAGE_TX_SYNC_LSB => "LSB",
        _ => "INVALID",
    }
}
