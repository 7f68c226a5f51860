use std::thread::{self, JoinHandle};

use crate::proto::{CallEnvelope, ReplyEnvelope};

use super::{transport::mem::MemoryTransport, RemoteChannel};

// Scripted server side of a connection: asserts each incoming call
// and answers with the matching canned reply
pub struct MockPeer {
    thread_handle: Option<JoinHandle<()>>,
}

impl MockPeer {
    // returns the client end of the connection alongside the mock
    pub fn assert_calls(
        expected_calls: Vec<CallEnvelope>,
        replies: Vec<ReplyEnvelope>,
    ) -> (MemoryTransport, Self) {
        let (t1, t2) = MemoryTransport::pair();

        // assert and reply in new thread
        let thread_handle = thread::spawn(move || {
            let mut chan = RemoteChannel::new(t2);

            for (call, reply) in expected_calls.into_iter().zip(replies) {
                let actual_call = chan
                    .read_msg::<CallEnvelope>()
                    .unwrap()
                    .expect("peer closed before sending expected call");
                assert_eq!(actual_call, call);

                chan.write_msg(reply).unwrap();
            }
        });

        (
            t1,
            Self {
                thread_handle: Some(thread_handle),
            },
        )
    }

    // answers nothing and hangs up as soon as the first call arrives
    pub fn hang_up() -> (MemoryTransport, Self) {
        let (t1, t2) = MemoryTransport::pair();

        let thread_handle = thread::spawn(move || {
            let mut chan = RemoteChannel::new(t2);
            let _ = chan.read_msg::<CallEnvelope>();
            chan.close();
        });

        (
            t1,
            Self {
                thread_handle: Some(thread_handle),
            },
        )
    }
}

impl Drop for MockPeer {
    fn drop(&mut self) {
        // ensure we validate the thread exits cleanly
        // when the test ends
        if let Some(handle) = self.thread_handle.take() {
            if let Err(panic) = handle.join() {
                if !thread::panicking() {
                    std::panic::resume_unwind(panic);
                }
            }
        }
    }
}
