//! Reset, open/close and request commands.

use std::fmt;

use crate::ids;
use crate::message::Message;
use crate::registry::registry;

use super::{ChannelMessage, TypedMessage};

/// Reset the transceiver. The single payload byte is filler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemReset {
    msg: Message,
}

impl SystemReset {
    pub fn new() -> Self {
        Self {
            msg: Message::zeroed(Self::TYPE, 1),
        }
    }
}

impl Default for SystemReset {
    fn default() -> Self {
        Self::new()
    }
}

typed_message!(SystemReset, ids::SYSTEM_RESET, "SystemReset", 1);
device_message!(SystemReset);

macro_rules! channel_command {
    ($(#[$meta:meta])* $ty:ident, $id:expr, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $ty {
            msg: Message,
        }

        impl $ty {
            pub fn new(channel: u8) -> Self {
                let mut msg = Message::zeroed(Self::TYPE, 1);
                msg.set_byte(0, channel);
                Self { msg }
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new(0)
            }
        }

        typed_message!($ty, $id, $name, 1);
        channel_message!($ty);
    };
}

channel_command!(ChannelOpen, ids::CHANNEL_OPEN, "ChannelOpen");
channel_command!(ChannelClose, ids::CHANNEL_CLOSE, "ChannelClose");
channel_command!(
    /// Open channel 0 in continuous scan mode.
    ChannelOpenRxScan,
    ids::OPEN_RX_SCAN,
    "ChannelOpenRxScan"
);

/// Ask the transceiver to answer with the given message type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRequest {
    msg: Message,
}

impl ChannelRequest {
    pub fn new(channel: u8, message_id: u8) -> Self {
        let mut msg = Message::zeroed(Self::TYPE, 2);
        msg.set_byte(0, channel);
        msg.set_byte(1, message_id);
        Self { msg }
    }

    /// Type byte of the requested message.
    pub fn message_id(&self) -> u8 {
        self.msg.byte(1)
    }

    pub fn set_message_id(&mut self, message_id: u8) {
        self.msg.set_byte(1, message_id);
    }
}

impl Default for ChannelRequest {
    fn default() -> Self {
        Self::new(0, ids::CHANNEL_STATUS)
    }
}

typed_message!(ChannelRequest, ids::CHANNEL_REQUEST, "ChannelRequest", 2);
channel_message!(@address ChannelRequest);

impl fmt::Display for ChannelRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match registry().name(self.message_id()) {
            Some(name) => write!(
                f,
                "<{}: '{}' on C({})>",
                Self::NAME,
                name,
                self.channel_number()
            ),
            None => write!(
                f,
                "<{}: 0x{:02X} on C({})>",
                Self::NAME,
                self.message_id(),
                self.channel_number()
            ),
        }
    }
}
