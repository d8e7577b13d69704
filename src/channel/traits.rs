use std::any::Any;

use uuid::Uuid;

use super::errors::ChannelError;
use super::message::IncomingMessage;

/// A typed stream of messages multiplexed over the trainer connection.
///
/// Each channel is addressed by a fixed id that both ends agree on.
pub trait SideChannel: Any + Send {
    fn channel_id(&self) -> Uuid;

    /// Handle one message addressed to this channel.
    fn on_message_received(&mut self, msg: &mut IncomingMessage<'_>) -> Result<(), ChannelError>;

    /// Drain messages queued for the trainer.
    fn take_outgoing(&mut self) -> Vec<Vec<u8>>;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
