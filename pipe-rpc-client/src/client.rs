use bincode::{Decode, Encode};
use pipe_rpc_common::{
    channel::{transport::Transport, RemoteChannel},
    codec,
    proto::{CallEnvelope, ReplyBody, ReplyEnvelope},
    Result, RpcError,
};
use tracing::{debug, warn};

/// Blocking RPC client over one connection.
///
/// A call writes the envelope and waits for the matching reply, so at most
/// one call is ever in flight. After a transport failure the client shuts
/// down: the endpoint is closed and later calls fail with
/// [`RpcError::ConnectionClosed`]. Errors raised while encoding a call are
/// returned before anything is written and keep the client open.
pub struct Client {
    chan: RemoteChannel,
    // sequence number of the next call
    seq: u64,
}

impl Client {
    pub fn new(transport: impl Transport) -> Self {
        Self {
            chan: RemoteChannel::new(transport),
            seq: 0,
        }
    }

    pub fn call<Req, Res>(&mut self, method: &str, args: Req) -> Result<Res>
    where
        Req: Encode,
        Res: Decode,
    {
        let seq = self.seq;

        // nothing has been written yet, so a payload that can't be framed
        // leaves the connection usable
        let args = codec::encode("argument", args)?;
        let frame = RemoteChannel::encode_frame(CallEnvelope {
            seq,
            method: method.to_string(),
            args,
        })?;

        self.seq = self.seq.wrapping_add(1);
        let res = self.exchange(seq, method, &frame);

        if let Err(err) = &res {
            if err.is_transport() && !self.chan.is_closed() {
                warn!(method, %err, "shutting down client");
                self.chan.close();
            }
        }

        res
    }

    fn exchange<Res>(&mut self, seq: u64, method: &str, frame: &[u8]) -> Result<Res>
    where
        Res: Decode,
    {
        debug!(seq, method, "sending call");
        self.chan.write_frame(frame)?;

        let reply = self
            .chan
            .read_msg::<ReplyEnvelope>()?
            .ok_or(RpcError::ConnectionClosed)?;

        if reply.seq != seq {
            return Err(RpcError::UnexpectedReply {
                expected: seq,
                actual: reply.seq,
            });
        }

        match reply.body {
            ReplyBody::Ok(data) => codec::decode("result", &data),
            ReplyBody::Err(err) => Err(err.into()),
        }
    }

    // idempotent, the server's serve loop returns once it observes the close
    pub fn close(&mut self) {
        self.chan.close();
    }

    pub fn is_closed(&self) -> bool {
        self.chan.is_closed()
    }
}
