use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq)]
pub enum ChannelError {
    #[error("unexpected end of message: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    #[error("negative length prefix: {0}")]
    NegativeLength(i32),

    #[error("{0} bytes do not fit an i32 length prefix")]
    MessageTooLarge(usize),

    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    #[error("callback already registered for key `{key}`")]
    DuplicateCallback { key: String },

    #[error("side channel {0} is already registered")]
    DuplicateChannel(Uuid),

    #[error("no side channel registered with id {0}")]
    UnknownChannel(Uuid),
}
