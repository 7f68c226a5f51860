pub mod mock;
pub mod transport;

use std::io::{self, Read, Write};

use bincode::{Decode, Encode};
use tracing::trace;

use crate::{
    codec,
    error::{Result, RpcError},
};

use self::transport::Transport;

// upper bound for a single encoded message, checked on both sides
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

const HEADER_LEN: usize = 4;

// One end of a connection exchanging length-prefixed messages.
// Only one thread drives a channel, a call is a write followed by a read.
pub struct RemoteChannel {
    // both halves are dropped on close
    reader: Option<Box<dyn Read + Send>>,
    writer: Option<Box<dyn Write + Send>>,
}

impl RemoteChannel {
    pub fn new(transport: impl Transport) -> Self {
        let (reader, writer) = transport.split();
        Self {
            reader: Some(reader),
            writer: Some(writer),
        }
    }

    // serialise and write a message to the underlying transport
    pub fn write_msg<M>(&mut self, msg: M) -> Result<()>
    where
        M: Encode,
    {
        let data = Self::encode_frame(msg)?;
        self.write_frame(&data)
    }

    // serialises a message into a frame body without touching the stream
    pub fn encode_frame<M>(msg: M) -> Result<Vec<u8>>
    where
        M: Encode,
    {
        let data = codec::encode("message", msg)?;

        if data.len() > MAX_FRAME_LEN {
            return Err(RpcError::FrameTooLarge {
                len: data.len(),
                max: MAX_FRAME_LEN,
            });
        }

        Ok(data)
    }

    // writes a body produced by encode_frame behind its length header
    pub fn write_frame(&mut self, data: &[u8]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or(RpcError::ConnectionClosed)?;
        writer.write_all(&(data.len() as u32).to_le_bytes())?;
        writer.write_all(data)?;
        writer.flush()?;

        trace!(len = data.len(), "wrote frame");
        Ok(())
    }

    // blocks for the next message, None once the peer closed cleanly
    pub fn read_msg<M>(&mut self) -> Result<Option<M>>
    where
        M: Decode,
    {
        let reader = self.reader.as_mut().ok_or(RpcError::ConnectionClosed)?;

        let mut header = [0u8; HEADER_LEN];
        if !read_header(reader, &mut header)? {
            return Ok(None);
        }

        let len = u32::from_le_bytes(header) as usize;
        if len > MAX_FRAME_LEN {
            return Err(RpcError::FrameTooLarge {
                len,
                max: MAX_FRAME_LEN,
            });
        }

        let mut data = vec![0u8; len];
        reader.read_exact(&mut data)?;
        trace!(len, "read frame");

        codec::decode("message", &data).map(Some)
    }

    // idempotent, the peer observes end of stream
    pub fn close(&mut self) {
        let writer = self.writer.take();
        let reader = self.reader.take();

        if writer.is_some() || reader.is_some() {
            trace!("closed channel");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none() && self.writer.is_none()
    }
}

// fills the length header, returns false on end of stream before the first byte
fn read_header<R: Read>(reader: &mut R, header: &mut [u8; HEADER_LEN]) -> io::Result<bool> {
    let mut filled = 0;

    while filled < header.len() {
        match reader.read(&mut header[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(io::Error::from(io::ErrorKind::UnexpectedEof)),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::{
        io::{self, Write},
        thread,
    };

    use crate::{
        channel::{
            transport::{mem::MemoryTransport, rw::ReadWriteTransport},
            RemoteChannel, MAX_FRAME_LEN,
        },
        error::RpcError,
        proto::{CallEnvelope, Person, ReplyBody, ReplyEnvelope},
    };

    fn channel_over(input: Vec<u8>) -> RemoteChannel {
        RemoteChannel::new(ReadWriteTransport::replay(input))
    }

    #[test]
    fn test_send_receive_msg() {
        let (t1, t2) = MemoryTransport::pair();

        let mut c1 = RemoteChannel::new(t1);
        let mut c2 = RemoteChannel::new(t2);

        let call = CallEnvelope {
            seq: 0,
            method: "API.SayHello".to_string(),
            args: vec![4, b'A', b'n', b't', b'o'],
        };
        let call2 = call.clone();

        // reply on another thread
        let reply_thread = thread::spawn(move || {
            let actual = c2.read_msg::<CallEnvelope>().unwrap().unwrap();
            assert_eq!(actual, call2);

            c2.write_msg(ReplyEnvelope {
                seq: actual.seq,
                body: ReplyBody::Ok(actual.args),
            })
            .unwrap();
        });

        c1.write_msg(call.clone()).unwrap();
        let reply = c1.read_msg::<ReplyEnvelope>().unwrap().unwrap();
        assert_eq!(reply.seq, call.seq);
        assert_eq!(reply.body, ReplyBody::Ok(call.args));

        reply_thread.join().expect("failed to join reply thread");
    }

    #[test]
    fn test_send_receive_msg_loop() {
        let (t1, t2) = MemoryTransport::pair();

        let mut c1 = RemoteChannel::new(t1);
        let mut c2 = RemoteChannel::new(t2);
        let num_iters = 100;

        // echo until the sender hangs up
        let reply_thread = thread::spawn(move || {
            let mut count = 0;
            while let Some(person) = c2.read_msg::<Person>().unwrap() {
                c2.write_msg(person).unwrap();
                count += 1;
            }
            count
        });

        for i in 0..num_iters {
            let person = Person {
                name: format!("person-{}", i),
            };
            c1.write_msg(person.clone()).unwrap();
            assert_eq!(c1.read_msg::<Person>().unwrap(), Some(person));
        }

        c1.close();
        let count = reply_thread.join().expect("failed to join reply thread");
        assert_eq!(count, num_iters);
    }

    #[test]
    fn test_read_clean_eof() {
        let mut chan = channel_over(vec![]);

        assert_eq!(chan.read_msg::<Person>().unwrap(), None);
    }

    #[test]
    fn test_read_truncated_header() {
        let mut chan = channel_over(vec![5, 0]);

        match chan.read_msg::<Person>() {
            Err(RpcError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof),
            res => {
                dbg!(res);
                unreachable!()
            }
        }
    }

    #[test]
    fn test_read_truncated_body() {
        let mut chan = channel_over(vec![5, 0, 0, 0, 4, b'A']);

        match chan.read_msg::<Person>() {
            Err(RpcError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof),
            res => {
                dbg!(res);
                unreachable!()
            }
        }
    }

    #[test]
    fn test_read_oversized_frame() {
        let len = (MAX_FRAME_LEN as u32 + 1).to_le_bytes();
        let mut chan = channel_over(len.to_vec());

        match chan.read_msg::<Person>() {
            Err(RpcError::FrameTooLarge { len, max }) => {
                assert_eq!(len, MAX_FRAME_LEN + 1);
                assert_eq!(max, MAX_FRAME_LEN);
            }
            res => {
                dbg!(res);
                unreachable!()
            }
        }
    }

    #[test]
    fn test_write_oversized_frame() {
        let mut chan = channel_over(vec![]);

        let res = chan.write_msg(vec![0u8; MAX_FRAME_LEN + 1]);
        assert!(matches!(res, Err(RpcError::FrameTooLarge { .. })));

        // rejected before anything reached the stream
        assert!(!chan.is_closed());
    }

    #[test]
    fn test_encode_frame_then_write() {
        let (t1, t2) = MemoryTransport::pair();

        let mut c1 = RemoteChannel::new(t1);
        let mut c2 = RemoteChannel::new(t2);

        let person = Person {
            name: "Anto".to_string(),
        };
        let data = RemoteChannel::encode_frame(person.clone()).unwrap();
        c1.write_frame(&data).unwrap();

        assert_eq!(c2.read_msg::<Person>().unwrap(), Some(person));
    }

    #[test]
    fn test_close_is_idempotent() {
        let (t1, t2) = MemoryTransport::pair();

        let mut c1 = RemoteChannel::new(t1);
        let mut c2 = RemoteChannel::new(t2);

        c1.close();
        c1.close();
        assert!(c1.is_closed());

        assert!(matches!(
            c1.write_msg(Person {
                name: "Anto".to_string()
            }),
            Err(RpcError::ConnectionClosed)
        ));
        assert!(matches!(
            c1.read_msg::<Person>(),
            Err(RpcError::ConnectionClosed)
        ));

        // peer sees end of stream, and can no longer write
        assert_eq!(c2.read_msg::<Person>().unwrap(), None);
        assert!(matches!(
            c2.write_msg(Person {
                name: "Anto".to_string()
            }),
            Err(RpcError::Io(_))
        ));

        c2.close();
        c2.close();
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::ConnectionReset))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_io_error() {
        let mut chan = RemoteChannel::new(ReadWriteTransport::new(io::empty(), FailingWriter));

        match chan.write_msg(1u32) {
            Err(RpcError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::ConnectionReset),
            res => {
                dbg!(res);
                unreachable!()
            }
        }
    }
}
