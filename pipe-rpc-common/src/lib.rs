pub mod channel;
pub mod codec;
pub mod error;
pub mod log;
pub mod proto;

pub use error::{Result, RpcError};
