pub mod registry;

use std::{
    fmt::Display,
    thread::{self, JoinHandle},
};

use bincode::{Decode, Encode};
use pipe_rpc_common::{
    channel::{transport::Transport, RemoteChannel},
    proto::{CallEnvelope, RemoteError, ReplyBody, ReplyEnvelope},
    Result, RpcError,
};
use tracing::{debug, warn};

use crate::handler::FnHandler;

use self::registry::{RegisterError, Registry};

/// Serves registered methods to exactly one connection.
///
/// Methods are registered up front; `serve` and `start` consume the server,
/// so the registry can no longer change once calls are being dispatched.
#[derive(Default)]
pub struct Server {
    registry: Registry,
}

pub struct ServerHandle {
    handle: JoinHandle<Result<()>>,
}

impl Server {
    pub fn new() -> Self {
        Self::default()
    }

    // duplicate names are rejected rather than replaced
    pub fn register<Req, Res, E, F>(
        &mut self,
        method: impl Into<String>,
        func: F,
    ) -> Result<(), RegisterError>
    where
        Req: Decode + 'static,
        Res: Encode + 'static,
        E: Display + 'static,
        F: Fn(Req) -> Result<Res, E> + Send + Sync + 'static,
    {
        let method = method.into();
        self.registry
            .insert(method.clone(), Box::new(FnHandler::new(func)))?;

        debug!(%method, "registered method");
        Ok(())
    }

    // runs the serve loop on its own thread
    pub fn start(self, transport: impl Transport + Send + 'static) -> ServerHandle {
        let handle = thread::spawn(move || self.serve(transport));

        ServerHandle { handle }
    }

    // blocks until the peer closes the connection or the transport fails,
    // the endpoint is closed on both paths
    pub fn serve(self, transport: impl Transport) -> Result<()> {
        let mut chan = RemoteChannel::new(transport);

        let res = self.work(&mut chan);
        chan.close();

        match &res {
            Ok(_) => debug!("connection closed by peer"),
            Err(err) => warn!(%err, "serve loop terminated"),
        }

        res
    }

    fn work(&self, chan: &mut RemoteChannel) -> Result<()> {
        debug!(methods = ?self.registry.methods(), "serving connection");

        while let Some(call) = chan.read_msg::<CallEnvelope>()? {
            let reply = self.dispatch(call);
            chan.write_msg(reply)?;
        }

        Ok(())
    }

    fn dispatch(&self, call: CallEnvelope) -> ReplyEnvelope {
        debug!(seq = call.seq, method = %call.method, "handling call");

        let res = match self.registry.get(&call.method) {
            Some(handler) => handler.call(&call.method, &call.args),
            None => Err(RemoteError::MethodNotFound(call.method.clone())),
        };

        let body = match res {
            Ok(data) => ReplyBody::Ok(data),
            Err(err) => {
                debug!(seq = call.seq, %err, "call failed");
                ReplyBody::Err(err)
            }
        };

        ReplyEnvelope {
            seq: call.seq,
            body,
        }
    }
}

impl ServerHandle {
    // waits for the serve loop, which ends once the client closes its endpoint
    pub fn join(self) -> Result<()> {
        self.handle.join().map_err(|_| RpcError::ThreadPanicked)?
    }
}
