use std::{
    io::{self, Read, Write},
    net::TcpStream,
};

use super::Transport;

#[derive(Debug)]
pub struct TcpTransport {
    reader: TcpStream,
    writer: TcpStream,
}

impl TcpTransport {
    pub fn new(socket: TcpStream) -> io::Result<Self> {
        // small request/reply frames, don't wait for coalescing
        socket.set_nodelay(true)?;

        Ok(Self {
            reader: socket.try_clone()?,
            writer: socket,
        })
    }
}

impl Transport for TcpTransport {
    fn split(self) -> (Box<dyn Read + Send>, Box<dyn Write + Send>) {
        (Box::new(self.reader), Box::new(self.writer))
    }
}
