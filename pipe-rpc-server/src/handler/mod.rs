mod say_hello;
pub use say_hello::*;

use std::{fmt::Display, marker::PhantomData};

use bincode::{Decode, Encode};
use pipe_rpc_common::{codec, proto::RemoteError};

// a registered method with its argument and result types erased
pub trait Handler: Send + Sync {
    fn call(&self, method: &str, args: &[u8]) -> Result<Vec<u8>, RemoteError>;
}

// wraps a statically typed function `Fn(Req) -> Result<Res, E>`
pub struct FnHandler<Req, Res, E, F> {
    func: F,
    _types: PhantomData<fn(Req) -> Result<Res, E>>,
}

impl<Req, Res, E, F> FnHandler<Req, Res, E, F>
where
    F: Fn(Req) -> Result<Res, E>,
{
    pub fn new(func: F) -> Self {
        Self {
            func,
            _types: PhantomData,
        }
    }
}

impl<Req, Res, E, F> Handler for FnHandler<Req, Res, E, F>
where
    Req: Decode,
    Res: Encode,
    E: Display,
    F: Fn(Req) -> Result<Res, E> + Send + Sync,
{
    fn call(&self, method: &str, args: &[u8]) -> Result<Vec<u8>, RemoteError> {
        let req = codec::decode::<Req>("argument", args).map_err(|e| {
            RemoteError::InvalidArgument {
                method: method.to_string(),
                message: e.to_string(),
            }
        })?;

        let res = (self.func)(req).map_err(|e| RemoteError::Handler(e.to_string()))?;

        codec::encode("result", res).map_err(|e| RemoteError::Handler(e.to_string()))
    }
}
