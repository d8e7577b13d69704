use std::collections::BTreeMap;

use tracing::{debug, warn};
use uuid::Uuid;

use super::errors::ChannelError;
use super::message::{IncomingMessage, length_prefix};
use super::traits::SideChannel;

/// Routes framed side-channel payloads to registered channels.
///
/// A payload is a sequence of frames, each laid out as
/// `[16-byte channel id (GUID byte order)][i32 body length][body]`.
#[derive(Default)]
pub struct SideChannelManager {
    channels: BTreeMap<Uuid, Box<dyn SideChannel>>,
}

impl SideChannelManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, channel: Box<dyn SideChannel>) -> Result<(), ChannelError> {
        let id = channel.channel_id();
        if self.channels.contains_key(&id) {
            return Err(ChannelError::DuplicateChannel(id));
        }
        debug!(%id, "registered side channel");
        self.channels.insert(id, channel);
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn get_mut<T: SideChannel>(&mut self, id: &Uuid) -> Option<&mut T> {
        self.channels
            .get_mut(id)
            .and_then(|channel| channel.as_any_mut().downcast_mut::<T>())
    }

    /// Dispatch every frame in `data`, returning how many were delivered.
    ///
    /// The whole payload is framed before anything is dispatched, so a
    /// malformed frame header rejects the payload without side effects.
    /// Frames for unknown channels, and bodies their channel cannot decode,
    /// are skipped with a warning.
    pub fn process_side_channel_data(&mut self, data: &[u8]) -> Result<usize, ChannelError> {
        let frames = read_frames(data)?;
        let mut delivered = 0;

        for (id, body) in frames {
            let Some(channel) = self.channels.get_mut(&id) else {
                warn!(
                    error = %ChannelError::UnknownChannel(id),
                    "skipping side channel message"
                );
                continue;
            };
            if let Err(error) = channel.on_message_received(&mut IncomingMessage::new(body)) {
                warn!(%id, %error, "skipping undecodable side channel message");
                continue;
            }
            delivered += 1;
        }

        Ok(delivered)
    }

    /// Frame every queued outgoing message for the trainer.
    pub fn generate_side_channel_data(&mut self) -> Result<Vec<u8>, ChannelError> {
        let mut out = Vec::new();
        for (id, channel) in self.channels.iter_mut() {
            for body in channel.take_outgoing() {
                out.extend_from_slice(&id.to_bytes_le());
                out.extend_from_slice(&length_prefix(body.len())?.to_le_bytes());
                out.extend_from_slice(&body);
            }
        }
        Ok(out)
    }
}

fn read_frames(data: &[u8]) -> Result<Vec<(Uuid, &[u8])>, ChannelError> {
    let mut reader = IncomingMessage::new(data);
    let mut frames = Vec::new();
    while reader.remaining() > 0 {
        let id = read_channel_id(&mut reader)?;
        let len = reader.read_i32()?;
        let len = usize::try_from(len).map_err(|_| ChannelError::NegativeLength(len))?;
        frames.push((id, reader.read_bytes(len)?));
    }
    Ok(frames)
}

fn read_channel_id(reader: &mut IncomingMessage<'_>) -> Result<Uuid, ChannelError> {
    let bytes = reader.read_bytes(16)?;
    let mut raw = [0u8; 16];
    raw.copy_from_slice(bytes);
    Ok(Uuid::from_bytes_le(raw))
}
