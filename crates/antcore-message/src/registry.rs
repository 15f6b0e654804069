//! Type byte to variant dispatch.
//!
//! The registry is an explicit table filled once by [`Registry::builtin`].
//! Decoding looks up the type byte and hands the untyped [`Message`] to the
//! variant's view constructor; unregistered types stay untyped.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::trace;

use crate::error::{MessageError, Result};
use crate::ids;
use crate::message::Message;
use crate::variants::{
    AntMessage, Capabilities, ChannelAssign, ChannelClose, ChannelData, ChannelEvent,
    ChannelFrequency, ChannelIdConfig, ChannelOpen, ChannelOpenRxScan, ChannelPeriod,
    ChannelRequest, ChannelSearchTimeout, ChannelStatus, ChannelTxPower, ChannelUnassign,
    DataKind, EnableExtended, LibConfig, NetworkKey, SerialNumber, Startup, SystemReset, TxPower,
    TypedMessage, Version,
};

/// Builds the default message of a type.
pub type BuildFn = fn() -> AntMessage;

/// Interprets an untyped message as the registered variant.
pub type ViewFn = fn(Message) -> Result<AntMessage>;

#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub msg_type: u8,
    pub name: &'static str,
    build: BuildFn,
    view: ViewFn,
}

impl Entry {
    pub fn build(&self) -> AntMessage {
        (self.build)()
    }

    pub fn view(&self, msg: Message) -> Result<AntMessage> {
        (self.view)(msg)
    }
}

/// Mapping from type byte to variant constructors.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: BTreeMap<u8, Entry>,
}

fn build_typed<T>() -> AntMessage
where
    T: TypedMessage + Default + Into<AntMessage>,
{
    T::default().into()
}

fn view_typed<T>(msg: Message) -> Result<AntMessage>
where
    T: TypedMessage + TryFrom<Message, Error = MessageError> + Into<AntMessage>,
{
    T::try_from(msg).map(Into::into)
}

fn view_data(msg: Message) -> Result<AntMessage> {
    ChannelData::try_from(msg).map(AntMessage::Data)
}

macro_rules! data_builder {
    ($name:ident, $id:expr) => {
        fn $name() -> AntMessage {
            match ChannelData::default_for($id) {
                Some(data) => AntMessage::Data(data),
                None => AntMessage::Untyped(Message::zeroed($id, 0)),
            }
        }
    };
}

data_builder!(build_broadcast, ids::BROADCAST_DATA);
data_builder!(build_acknowledged, ids::ACKNOWLEDGED_DATA);
data_builder!(build_burst, ids::BURST_DATA);
data_builder!(build_legacy_broadcast, ids::EXTENDED_BROADCAST_DATA);
data_builder!(build_legacy_acknowledged, ids::EXTENDED_ACKNOWLEDGED_DATA);
data_builder!(build_legacy_burst, ids::EXTENDED_BURST_DATA);

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in variant.
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.register_typed::<ChannelUnassign>();
        registry.register_typed::<ChannelAssign>();
        registry.register_typed::<ChannelPeriod>();
        registry.register_typed::<ChannelSearchTimeout>();
        registry.register_typed::<ChannelFrequency>();
        registry.register_typed::<NetworkKey>();
        registry.register_typed::<TxPower>();
        registry.register_typed::<ChannelIdConfig>();
        registry.register_typed::<ChannelTxPower>();
        registry.register_typed::<EnableExtended>();
        registry.register_typed::<LibConfig>();

        registry.register_typed::<SystemReset>();
        registry.register_typed::<ChannelOpen>();
        registry.register_typed::<ChannelClose>();
        registry.register_typed::<ChannelRequest>();
        registry.register_typed::<ChannelOpenRxScan>();

        registry.register_typed::<ChannelEvent>();
        registry.register_typed::<ChannelStatus>();
        registry.register_typed::<Version>();
        registry.register_typed::<Capabilities>();
        registry.register_typed::<SerialNumber>();
        registry.register_typed::<Startup>();

        let data: [(DataKind, BuildFn, BuildFn); 3] = [
            (DataKind::Broadcast, build_broadcast, build_legacy_broadcast),
            (DataKind::Acknowledged, build_acknowledged, build_legacy_acknowledged),
            (DataKind::Burst, build_burst, build_legacy_burst),
        ];
        for (kind, standard, legacy) in data {
            registry.register(kind.standard_type(), kind.name(), standard, view_data);
            registry.register(kind.legacy_type(), kind.legacy_name(), legacy, view_data);
        }

        registry
    }

    /// Register a constructor pair for a type byte.
    ///
    /// # Panics
    ///
    /// Panics if `msg_type` is already registered. Each type byte belongs to
    /// exactly one variant.
    pub fn register(&mut self, msg_type: u8, name: &'static str, build: BuildFn, view: ViewFn) {
        let entry = Entry {
            msg_type,
            name,
            build,
            view,
        };
        if let Some(existing) = self.entries.insert(msg_type, entry) {
            panic!(
                "message type 0x{msg_type:02X} registered twice ({} and {name})",
                existing.name
            );
        }
    }

    /// Register a [`TypedMessage`] variant under its own type byte.
    pub fn register_typed<T>(&mut self)
    where
        T: TypedMessage + Default + TryFrom<Message, Error = MessageError> + Into<AntMessage>,
    {
        self.register(T::TYPE, T::NAME, build_typed::<T>, view_typed::<T>);
    }

    pub fn get(&self, msg_type: u8) -> Option<&Entry> {
        self.entries.get(&msg_type)
    }

    pub fn contains(&self, msg_type: u8) -> bool {
        self.entries.contains_key(&msg_type)
    }

    /// Variant name of a type byte.
    pub fn name(&self, msg_type: u8) -> Option<&'static str> {
        self.get(msg_type).map(|entry| entry.name)
    }

    /// Registered entries in type byte order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Construct the default message of `type_id`.
    ///
    /// Unregistered types within `0x00..=0xFF` yield an untyped message with
    /// an empty payload.
    pub fn construct(&self, type_id: u16) -> Result<AntMessage> {
        let msg_type = u8::try_from(type_id).map_err(|_| MessageError::TypeOutOfRange(type_id))?;
        Ok(match self.get(msg_type) {
            Some(entry) => entry.build(),
            None => AntMessage::Untyped(Message::zeroed(msg_type, 0)),
        })
    }

    /// Construct a message of `type_id` from explicit payload bytes.
    pub fn construct_with_payload(&self, type_id: u16, payload: &[u8]) -> Result<AntMessage> {
        let msg_type = u8::try_from(type_id).map_err(|_| MessageError::TypeOutOfRange(type_id))?;
        self.interpret(Message::from_payload(msg_type, payload)?)
    }

    /// Interpret an untyped message through its registered variant.
    pub fn interpret(&self, msg: Message) -> Result<AntMessage> {
        match self.get(msg.msg_type()) {
            Some(entry) => {
                trace!(msg_type = msg.msg_type(), name = entry.name, "typed decode");
                entry.view(msg)
            }
            None => {
                trace!(msg_type = msg.msg_type(), "unregistered type left untyped");
                Ok(AntMessage::Untyped(msg))
            }
        }
    }

    /// Decode one frame from the start of `raw` into a typed message.
    pub fn decode(&self, raw: &[u8]) -> Result<AntMessage> {
        self.interpret(Message::decode(raw)?)
    }
}

/// The process-wide built-in registry.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(Registry::builtin)
}
