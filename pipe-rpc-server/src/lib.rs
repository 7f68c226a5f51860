pub mod handler;
pub mod server;

pub use server::{registry::RegisterError, Server, ServerHandle};
