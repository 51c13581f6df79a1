//! Structured error kinds for the engine's public operations.
//!
//! No teacher counterpart (the teacher propagates `io::Error`/`StreamError` ad hoc); grounded on
//! `sid3xyz-slirc-proto::error::ProtocolError`'s `thiserror` derive pattern.

use irc_wire::ProtocolError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EngineError {
    #[error("not connected")]
    NotConnected,

    #[error("already connected")]
    AlreadyConnected,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0:?} is not a channel")]
    NotAChannel(String),

    #[error("channel {0:?} is not tracked")]
    ChannelNotTracked(String),

    #[error("nick {0:?} exceeds the server's maximum nick length ({1})")]
    NickTooLong(String, u32),

    #[error("field can't be changed while connected")]
    InUseWhileConnected,

    #[error("protocol error: {0}")]
    ProtocolError(#[from] ProtocolError),

    #[error("server error: {0}")]
    ServerError(String),

    #[error("nick in use and no onNickInUse callback handled it")]
    NickInUseUnhandled,

    #[error("io error: {0}")]
    Io(String),
}

impl From<io::Error> for EngineError {
    fn from(e: io::Error) -> Self {
        EngineError::Io(e.to_string())
    }
}
