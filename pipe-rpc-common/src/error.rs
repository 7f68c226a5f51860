use std::io;

use thiserror::Error;

use crate::proto::RemoteError;

pub type Result<T, E = RpcError> = std::result::Result<T, E>;

/// Failures surfaced by the channel, the client call path and the serve loop.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The local endpoint was closed, or the peer hung up before replying.
    #[error("connection closed")]
    ConnectionClosed,

    #[error("transport i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode {what}: {message}")]
    Encode { what: &'static str, message: String },

    #[error("failed to decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error("frame of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    #[error("reply sequence {actual} does not match call sequence {expected}")]
    UnexpectedReply { expected: u64, actual: u64 },

    /// Reported by the server inside a reply envelope.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("server thread panicked")]
    ThreadPanicked,
}

impl RpcError {
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    // anything that leaves the stream in an unknown state
    pub fn is_transport(&self) -> bool {
        !self.is_remote()
    }
}
