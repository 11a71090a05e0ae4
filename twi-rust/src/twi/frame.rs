use serde::{Deserialize, Serialize};

use super::BusError;

/// Signal the initiator drives onto the bus.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Start,
    Address { address: u8, read: bool },
    Data(u8),
    Stop,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub seq: u32,
    pub signal: Signal,
}

/// Completion flag for one phase, carrying the initiator-side status code.
/// `data` holds the byte clocked in from the responder on reads.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flag {
    pub seq: u32,
    pub status: u8,
    pub data: u8,
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, BusError> {
    serde_json::to_vec(value).map_err(|e| e.into())
}

pub fn decode<'a, T: Deserialize<'a>>(buf: &'a [u8]) -> Result<T, BusError> {
    serde_json::from_slice(buf).map_err(|e| e.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_plain_json() {
        let frame = Frame { seq: 7, signal: Signal::Address { address: 0x57, read: false } };
        let text = String::from_utf8(encode(&frame).unwrap()).unwrap();
        assert_eq!(text, r#"{"seq":7,"signal":{"Address":{"address":87,"read":false}}}"#);
    }

    #[test]
    fn garbage_is_a_codec_error() {
        match decode::<Flag>(b"not a flag") {
            Err(BusError::Codec(_)) => (),
            other => panic!("expected codec error, got {:?}", other),
        }
    }
}
