use std::{
    cmp::min,
    io::{self, Read, Write},
    sync::mpsc::{channel, Receiver, Sender},
};

use super::Transport;

// in-process duplex pipe, each end owns one direction's sender
// and the other direction's receiver
pub struct MemoryTransport {
    tx: Tx,
    rx: Rx,
}

pub struct Tx(Sender<Vec<u8>>);
pub struct Rx(Receiver<Vec<u8>>, Vec<u8>);

impl MemoryTransport {
    pub fn pair() -> (Self, Self) {
        let (tx1, rx1) = channel();
        let (tx2, rx2) = channel();

        (
            Self {
                tx: Tx(tx1),
                rx: Rx(rx2, vec![]),
            },
            Self {
                tx: Tx(tx2),
                rx: Rx(rx1, vec![]),
            },
        )
    }
}

impl Transport for MemoryTransport {
    fn split(self) -> (Box<dyn Read + Send>, Box<dyn Write + Send>) {
        (Box::new(self.rx), Box::new(self.tx))
    }
}

impl Write for Tx {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // fails once the peer's reader is gone
        self.0
            .send(buf.to_vec())
            .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for Rx {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        while self.1.is_empty() {
            self.1 = match self.0.recv() {
                Ok(chunk) => chunk,
                // peer's writer dropped: end of stream
                Err(_) => return Ok(0),
            };
        }

        let idx = min(buf.len(), self.1.len());
        let remaining = self.1.split_off(idx);
        buf[..idx].copy_from_slice(self.1.as_slice());
        self.1 = remaining;

        Ok(idx)
    }
}
