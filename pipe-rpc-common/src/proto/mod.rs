mod msg;
pub use msg::*;
mod structs;
pub use structs::*;

// the demo service method, named Service.Method
pub const SAY_HELLO: &str = "API.SayHello";
