//! ANT wireless protocol codec.
//!
//! antcore encodes and decodes the framed binary messages a host exchanges
//! with an ANT USB or serial transceiver: checksummed framing, typed message
//! variants, extended payload layouts and burst sequencing.
//!
//! # Crate Structure
//!
//! - [`frame`]: sync, length and checksum framing with stream resynchronization
//! - [`message`]: typed messages, the type registry, extended layouts and burst codes
//!
//! The transport driver and the channel session layer are left to the caller.

/// Re-export frame types.
pub mod frame {
    pub use antcore_frame::*;
}

/// Re-export message types.
pub mod message {
    pub use antcore_message::*;
}
