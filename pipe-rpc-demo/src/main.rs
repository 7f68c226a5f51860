use std::process;

use anyhow::{Context, Result};
use pipe_rpc_client::{api, Client};
use pipe_rpc_common::{
    channel::transport::mem::MemoryTransport,
    log,
    proto::{Person, SAY_HELLO},
};
use pipe_rpc_server::{handler::say_hello, Server};
use tracing::{debug, error};

// runs a server and a client on either end of an in-memory pipe
// and prints the name echoed back by API.SayHello
//
// PIPE_RPC_LOG=debug cargo run --bin pipe-rpc
fn main() {
    log::init();

    let person = Person {
        name: "Anto".to_string(),
    };

    match say_hello_over_pipe(person) {
        Ok(reply) => println!("{}", reply.name),
        Err(err) => {
            error!("{:#}", err);
            process::exit(1);
        }
    }
}

fn say_hello_over_pipe(person: Person) -> Result<Person> {
    let (server_end, client_end) = MemoryTransport::pair();

    let mut server = Server::new();
    server
        .register(SAY_HELLO, say_hello)
        .context("failed to register method")?;
    let handle = server.start(server_end);

    let mut client = Client::new(client_end);
    let reply = api::say_hello(&mut client, person);

    // the serve loop only returns once it sees our end close
    client.close();
    let served = handle.join();
    debug!("server stopped");

    let reply = reply.context("SayHello call failed")?;
    served.context("server loop failed")?;

    Ok(reply)
}
