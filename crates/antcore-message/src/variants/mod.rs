//! Typed views over [`Message`] payloads.
//!
//! Each variant owns one [`Message`] and exposes named accessors at fixed
//! payload offsets. Conversion from an untyped message checks the type byte
//! and the payload length first, so accessors never index out of bounds.

use std::fmt;

use bytes::Bytes;

use crate::error::{MessageError, Result};
use crate::message::Message;

/// Implements [`TypedMessage`] and `TryFrom<Message>` for a variant struct
/// holding its message in a `msg` field.
macro_rules! typed_message {
    ($ty:ident, $id:expr, $name:literal, $len:expr) => {
        typed_message!($ty, $id, $name, $len, $len);
    };
    ($ty:ident, $id:expr, $name:literal, $min:expr, $max:expr) => {
        impl $crate::variants::TypedMessage for $ty {
            const TYPE: u8 = $id;
            const NAME: &'static str = $name;
            const MIN_LEN: usize = $min;
            const MAX_LEN: usize = $max;

            fn message(&self) -> &$crate::message::Message {
                &self.msg
            }

            fn into_message(self) -> $crate::message::Message {
                self.msg
            }
        }

        impl TryFrom<$crate::message::Message> for $ty {
            type Error = $crate::error::MessageError;

            fn try_from(msg: $crate::message::Message) -> $crate::error::Result<Self> {
                $crate::variants::check_view::<Self>(&msg)?;
                Ok(Self { msg })
            }
        }
    };
}

/// Implements [`ChannelMessage`] and the `<Name: C(n)>` display for a
/// variant whose byte 0 is a plain channel number.
macro_rules! channel_message {
    ($ty:ident) => {
        channel_message!(@address $ty);

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                use $crate::variants::{ChannelMessage, TypedMessage};
                write!(f, "<{}: C({})>", Self::NAME, self.channel_number())
            }
        }
    };
    (@address $ty:ident) => {
        impl $crate::variants::ChannelMessage for $ty {
            fn channel_number(&self) -> u8 {
                self.msg.byte(0)
            }

            fn set_channel_number(&mut self, channel: u8) -> $crate::error::Result<()> {
                self.msg.set_byte(0, channel);
                Ok(())
            }
        }
    };
}

/// Implements the `<Name>` display for a variant without a channel.
macro_rules! device_message {
    ($ty:ident) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                use $crate::variants::TypedMessage;
                write!(f, "<{}>", Self::NAME)
            }
        }
    };
}

mod config;
mod control;
mod data;
mod events;

pub use config::{
    ChannelAssign, ChannelFrequency, ChannelIdConfig, ChannelPeriod, ChannelSearchTimeout,
    ChannelTxPower, ChannelUnassign, EnableExtended, LibConfig, NetworkKey, TxPower,
    NETWORK_KEY_SIZE,
};
pub use control::{ChannelClose, ChannelOpen, ChannelOpenRxScan, ChannelRequest, SystemReset};
pub use data::{ChannelData, DataKind, DATA_SIZE, LEGACY_DATA_SIZE};
pub use events::{
    Capabilities, ChannelEvent, ChannelStatus, SerialNumber, Startup, Version, SERIAL_NUMBER_SIZE,
    VERSION_SIZE,
};

/// A message variant bound to exactly one type byte.
pub trait TypedMessage: Sized {
    const TYPE: u8;
    const NAME: &'static str;
    const MIN_LEN: usize;
    const MAX_LEN: usize;

    fn message(&self) -> &Message;

    fn into_message(self) -> Message;

    fn encode(&self) -> Bytes {
        self.message().encode()
    }
}

/// A variant that addresses one channel through payload byte 0.
pub trait ChannelMessage {
    fn channel_number(&self) -> u8;

    /// Fails with `OutOfRange` when the channel does not fit the addressing
    /// mode (0..=31 for burst data).
    fn set_channel_number(&mut self, channel: u8) -> Result<()>;
}

pub(crate) fn check_view<T: TypedMessage>(msg: &Message) -> Result<()> {
    if msg.msg_type() != T::TYPE {
        return Err(MessageError::WrongType {
            expected: T::NAME,
            found: msg.msg_type(),
        });
    }
    check_len(T::NAME, msg.payload().len(), T::MIN_LEN, T::MAX_LEN)
}

pub(crate) fn check_len(name: &'static str, len: usize, min: usize, max: usize) -> Result<()> {
    if len < min {
        return Err(MessageError::PayloadTooShort {
            format: name,
            size: len,
            min,
        });
    }
    if len > max {
        return Err(MessageError::PayloadTooLarge {
            format: name,
            size: len,
            max,
        });
    }
    Ok(())
}

macro_rules! ant_messages {
    (
        channel: [$($chan:ident),+ $(,)?],
        device: [$($dev:ident),+ $(,)?] $(,)?
    ) => {
        /// Any decoded message: a typed variant, channel data, or an untyped
        /// message whose type byte is not registered.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum AntMessage {
            Untyped(Message),
            Data(ChannelData),
            $($chan($chan),)+
            $($dev($dev),)+
        }

        impl AntMessage {
            pub fn message(&self) -> &Message {
                match self {
                    AntMessage::Untyped(msg) => msg,
                    AntMessage::Data(data) => data.message(),
                    $(AntMessage::$chan(v) => v.message(),)+
                    $(AntMessage::$dev(v) => v.message(),)+
                }
            }

            pub fn into_message(self) -> Message {
                match self {
                    AntMessage::Untyped(msg) => msg,
                    AntMessage::Data(data) => data.into_message(),
                    $(AntMessage::$chan(v) => v.into_message(),)+
                    $(AntMessage::$dev(v) => v.into_message(),)+
                }
            }

            /// Variant name, `"Message"` for untyped messages.
            pub fn name(&self) -> &'static str {
                match self {
                    AntMessage::Untyped(_) => "Message",
                    AntMessage::Data(data) => data.name(),
                    $(AntMessage::$chan(_) => <$chan as TypedMessage>::NAME,)+
                    $(AntMessage::$dev(_) => <$dev as TypedMessage>::NAME,)+
                }
            }

            /// Channel number for channel-scoped variants.
            pub fn channel_number(&self) -> Option<u8> {
                match self {
                    AntMessage::Untyped(_) => None,
                    AntMessage::Data(data) => Some(data.channel_number()),
                    $(AntMessage::$chan(v) => Some(v.channel_number()),)+
                    $(AntMessage::$dev(_) => None,)+
                }
            }
        }

        impl fmt::Display for AntMessage {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    AntMessage::Untyped(msg) => fmt::Display::fmt(msg, f),
                    AntMessage::Data(data) => fmt::Display::fmt(data, f),
                    $(AntMessage::$chan(v) => fmt::Display::fmt(v, f),)+
                    $(AntMessage::$dev(v) => fmt::Display::fmt(v, f),)+
                }
            }
        }

        $(
            impl From<$chan> for AntMessage {
                fn from(value: $chan) -> Self {
                    AntMessage::$chan(value)
                }
            }
        )+
        $(
            impl From<$dev> for AntMessage {
                fn from(value: $dev) -> Self {
                    AntMessage::$dev(value)
                }
            }
        )+
    };
}

ant_messages! {
    channel: [
        ChannelUnassign,
        ChannelAssign,
        ChannelPeriod,
        ChannelSearchTimeout,
        ChannelFrequency,
        ChannelIdConfig,
        ChannelTxPower,
        ChannelOpen,
        ChannelClose,
        ChannelRequest,
        ChannelOpenRxScan,
        ChannelEvent,
        ChannelStatus,
    ],
    device: [
        NetworkKey,
        TxPower,
        EnableExtended,
        LibConfig,
        SystemReset,
        Version,
        Capabilities,
        SerialNumber,
        Startup,
    ],
}

impl AntMessage {
    pub fn msg_type(&self) -> u8 {
        self.message().msg_type()
    }

    pub fn encode(&self) -> Bytes {
        self.message().encode()
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self, AntMessage::Untyped(_))
    }
}

impl From<ChannelData> for AntMessage {
    fn from(value: ChannelData) -> Self {
        AntMessage::Data(value)
    }
}

impl From<Message> for AntMessage {
    fn from(value: Message) -> Self {
        AntMessage::Untyped(value)
    }
}
