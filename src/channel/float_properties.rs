use std::any::Any;
use std::collections::HashMap;

use tracing::{debug, trace};
use uuid::Uuid;

use super::errors::ChannelError;
use super::message::{IncomingMessage, OutgoingMessage};
use super::traits::SideChannel;

/// Id shared with the Python trainer for float property messages.
pub const FLOAT_PROPERTIES_CHANNEL_ID: Uuid = Uuid::from_u128(0x60ccf7d0_4f7e_11ea_b238_784f4387d1f7);

pub type FloatCallback = Box<dyn FnMut(f32) + Send>;

/// Named float values the trainer can change between (or during) episodes.
///
/// Components subscribe to a key with [`register_callback`](Self::register_callback)
/// and are invoked every time that key receives a new value.
#[derive(Default)]
pub struct FloatPropertiesChannel {
    properties: HashMap<String, f32>,
    callbacks: HashMap<String, FloatCallback>,
    outgoing: Vec<Vec<u8>>,
}

impl std::fmt::Debug for FloatPropertiesChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FloatPropertiesChannel")
            .field("properties", &self.properties)
            .field("callbacks", &self.callbacks.keys().collect::<Vec<_>>())
            .field("outgoing", &self.outgoing.len())
            .finish()
    }
}

impl FloatPropertiesChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_callback(&self, key: &str) -> bool {
        self.callbacks.contains_key(key)
    }

    /// Subscribe `callback` to changes of `key`. A key holds at most one callback.
    pub fn register_callback<F>(&mut self, key: &str, callback: F) -> Result<(), ChannelError>
    where
        F: FnMut(f32) + Send + 'static,
    {
        if self.has_callback(key) {
            return Err(ChannelError::DuplicateCallback {
                key: key.to_string(),
            });
        }
        debug!(key, "registered float property callback");
        self.callbacks.insert(key.to_string(), Box::new(callback));
        Ok(())
    }

    /// Set a value locally, notify the trainer, and fire the key's callback.
    pub fn set_property(&mut self, key: &str, value: f32) -> Result<(), ChannelError> {
        let mut msg = OutgoingMessage::new();
        msg.write_string(key)?.write_f32(value);
        self.outgoing.push(msg.into_bytes());
        self.apply(key, value);
        Ok(())
    }

    pub fn get_property(&self, key: &str) -> Option<f32> {
        self.properties.get(key).copied()
    }

    pub fn get_property_with_default(&self, key: &str, default: f32) -> f32 {
        self.get_property(key).unwrap_or(default)
    }

    pub fn list_properties(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.properties.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn apply(&mut self, key: &str, value: f32) {
        trace!(key, value, "float property changed");
        self.properties.insert(key.to_string(), value);
        if let Some(callback) = self.callbacks.get_mut(key) {
            callback(value);
        }
    }
}

impl SideChannel for FloatPropertiesChannel {
    fn channel_id(&self) -> Uuid {
        FLOAT_PROPERTIES_CHANNEL_ID
    }

    fn on_message_received(&mut self, msg: &mut IncomingMessage<'_>) -> Result<(), ChannelError> {
        let key = msg.read_string()?;
        let value = msg.read_f32()?;
        self.apply(&key, value);
        Ok(())
    }

    fn take_outgoing(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.outgoing)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
