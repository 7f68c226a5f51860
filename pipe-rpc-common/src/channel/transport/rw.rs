use std::io::{self, Cursor, Read, Write};

use super::Transport;

/// Transport over two unrelated halves, e.g. a pipe pair or canned bytes.
#[derive(Debug)]
pub struct ReadWriteTransport<R: Read + Send, W: Write + Send> {
    reader: R,
    writer: W,
}

impl<R: Read + Send, W: Write + Send> ReadWriteTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

impl ReadWriteTransport<Cursor<Vec<u8>>, io::Sink> {
    // replays recorded frames, anything written is discarded
    pub fn replay(input: Vec<u8>) -> Self {
        Self::new(Cursor::new(input), io::sink())
    }
}

impl<R: Read + Send + 'static, W: Write + Send + 'static> Transport for ReadWriteTransport<R, W> {
    fn split(self) -> (Box<dyn Read + Send>, Box<dyn Write + Send>) {
        (Box::new(self.reader), Box::new(self.writer))
    }
}
