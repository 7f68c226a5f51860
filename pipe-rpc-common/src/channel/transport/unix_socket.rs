use std::{
    io::{self, Read, Write},
    os::unix::net::UnixStream,
};

use super::Transport;

#[derive(Debug)]
pub struct UnixSocketTransport {
    reader: UnixStream,
    writer: UnixStream,
}

impl UnixSocketTransport {
    pub fn new(socket: UnixStream) -> io::Result<Self> {
        Ok(Self {
            reader: socket.try_clone()?,
            writer: socket,
        })
    }

    pub fn pair() -> io::Result<(Self, Self)> {
        let (s1, s2) = UnixStream::pair()?;

        Ok((Self::new(s1)?, Self::new(s2)?))
    }
}

impl Transport for UnixSocketTransport {
    fn split(self) -> (Box<dyn Read + Send>, Box<dyn Write + Send>) {
        (Box::new(self.reader), Box::new(self.writer))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::{channel::RemoteChannel, proto::Person};

    use super::UnixSocketTransport;

    #[test]
    fn test_round_trip_over_socket_pair() {
        let (t1, t2) = UnixSocketTransport::pair().unwrap();

        let echo_thread = thread::spawn(move || {
            let mut chan = RemoteChannel::new(t2);

            while let Some(person) = chan.read_msg::<Person>().unwrap() {
                chan.write_msg(person).unwrap();
            }
        });

        let mut chan = RemoteChannel::new(t1);
        let person = Person {
            name: "Anto".to_string(),
        };

        chan.write_msg(person.clone()).unwrap();
        assert_eq!(chan.read_msg::<Person>().unwrap(), Some(person));

        chan.close();
        echo_thread.join().expect("failed to join echo thread");
    }
}
