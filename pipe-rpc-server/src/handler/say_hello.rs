use std::convert::Infallible;

use pipe_rpc_common::proto::Person;

// API.SayHello: replies with the person it was given
pub fn say_hello(person: Person) -> Result<Person, Infallible> {
    Ok(person)
}
