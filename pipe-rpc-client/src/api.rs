use pipe_rpc_common::{
    proto::{Person, SAY_HELLO},
    Result,
};

use crate::Client;

// typed stub for API.SayHello
pub fn say_hello(client: &mut Client, person: Person) -> Result<Person> {
    client.call(SAY_HELLO, person)
}
