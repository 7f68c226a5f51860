use bincode::{Decode, Encode};

use crate::error::{Result, RpcError};

// every envelope and payload on the wire uses the same encoding
pub fn conf() -> bincode::config::Configuration {
    bincode::config::standard()
}

pub fn encode<T>(what: &'static str, value: T) -> Result<Vec<u8>>
where
    T: Encode,
{
    bincode::encode_to_vec(value, conf()).map_err(|e| RpcError::Encode {
        what,
        message: e.to_string(),
    })
}

pub fn decode<T>(what: &'static str, data: &[u8]) -> Result<T>
where
    T: Decode,
{
    let (value, read) = bincode::decode_from_slice(data, conf()).map_err(|e| RpcError::Decode {
        what,
        message: e.to_string(),
    })?;

    // a value of another type can share a valid prefix
    if read != data.len() {
        return Err(RpcError::Decode {
            what,
            message: format!("{} trailing bytes", data.len() - read),
        });
    }

    Ok(value)
}
