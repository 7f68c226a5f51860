use bincode::{Decode, Encode};
use thiserror::Error;

// Envelope for a single call, the argument is encoded separately
// so the server can route it before knowing its type
#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct CallEnvelope {
    // echoed in the reply, used to detect cross-talk
    pub seq: u64,
    pub method: String,
    pub args: Vec<u8>,
}

#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct ReplyEnvelope {
    pub seq: u64,
    pub body: ReplyBody,
}

#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub enum ReplyBody {
    Ok(Vec<u8>),
    Err(RemoteError),
}

/// Errors produced on the server side and delivered to the caller.
#[derive(Encode, Decode, Error, PartialEq, Eq, Debug, Clone)]
pub enum RemoteError {
    #[error("rpc: can't find method {0}")]
    MethodNotFound(String),

    #[error("rpc: invalid argument for {method}: {message}")]
    InvalidArgument { method: String, message: String },

    #[error("{0}")]
    Handler(String),
}
