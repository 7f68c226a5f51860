use std::io::{Read, Write};

// generic duplex transport interface
pub trait Transport {
    fn split(self) -> (Box<dyn Read + Send>, Box<dyn Write + Send>);
}

pub mod mem;
pub mod rw;
pub mod tcp;
pub mod unix_socket;
