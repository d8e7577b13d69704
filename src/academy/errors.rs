use thiserror::Error;

use crate::channel::ChannelError;

#[derive(Error, Debug, PartialEq)]
pub enum AcademyError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("curriculum parameter `{key}` is already bound on this academy")]
    DuplicateRegistration { key: String },

    #[error("side channel error: {0}")]
    Channel(#[from] ChannelError),
}
