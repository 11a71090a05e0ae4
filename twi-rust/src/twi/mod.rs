/// ----- TWO-WIRE BUS -----
/// A two-wire bus simulated at phase level (start, address, data, stop).
/// Every phase the initiator puts on the wire is a datagram to the
/// responder, which answers with a status flag the initiator waits for.

use std::fmt;
use std::io;

pub mod frame;
pub mod initiator;
pub mod responder;
pub mod status;

mod sock;

/// Part of a transaction the initiator was waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Address,
    Data,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Start => write!(f, "start"),
            Phase::Address => write!(f, "address"),
            Phase::Data => write!(f, "data"),
        }
    }
}

#[derive(Debug)]
pub enum BusError {
    Timeout { phase: Phase },
    Io(io::Error),
    Codec(serde_json::Error),
}

impl From<io::Error> for BusError {
    fn from(e: io::Error) -> Self {
        BusError::Io(e)
    }
}

impl From<serde_json::Error> for BusError {
    fn from(e: serde_json::Error) -> Self {
        BusError::Codec(e)
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusError::Timeout { phase } => write!(f, "bus timed out waiting for {} flag", phase),
            BusError::Io(e) => write!(f, "bus socket error: {}", e),
            BusError::Codec(e) => write!(f, "bus frame error: {}", e),
        }
    }
}

impl std::error::Error for BusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BusError::Timeout { .. } => None,
            BusError::Io(e) => Some(e),
            BusError::Codec(e) => Some(e),
        }
    }
}
