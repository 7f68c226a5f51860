use bincode::{Decode, Encode};

#[derive(Encode, Decode, PartialEq, Eq, Debug, Clone)]
pub struct Person {
    pub name: String,
}
