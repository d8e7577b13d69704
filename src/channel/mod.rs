mod errors;
mod float_properties;
mod manager;
mod message;
mod traits;

pub use errors::ChannelError;
pub use float_properties::{FLOAT_PROPERTIES_CHANNEL_ID, FloatCallback, FloatPropertiesChannel};
pub use manager::SideChannelManager;
pub use message::{IncomingMessage, OutgoingMessage};
pub use traits::SideChannel;
