use std::{error::Error, fmt, io};

use comms::DecodeError;

use crate::{config::ConfigErr, storage::StoreErr};

/// The parameter server's result type.
pub type Result<T> = std::result::Result<T, ServerErr>;

/// Parameter server failures.
///
/// `Transport` and `Config` are fatal at startup, `Decode` and `Store` are scoped
/// to a single request and get answered with an error reply.
#[derive(Debug)]
pub enum ServerErr {
    Transport(io::Error),
    Config(ConfigErr),
    Decode(DecodeError),
    Store(StoreErr),
}

impl fmt::Display for ServerErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerErr::Transport(e) => write!(f, "transport error: {e}"),
            ServerErr::Config(e) => write!(f, "configuration error: {e}"),
            ServerErr::Decode(e) => write!(f, "decode error: {e}"),
            ServerErr::Store(e) => write!(f, "rejected gradient: {e}"),
        }
    }
}

impl Error for ServerErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ServerErr::Transport(e) => Some(e),
            ServerErr::Config(e) => Some(e),
            ServerErr::Decode(e) => Some(e),
            ServerErr::Store(e) => Some(e),
        }
    }
}

impl From<io::Error> for ServerErr {
    fn from(value: io::Error) -> Self {
        Self::Transport(value)
    }
}

impl From<ConfigErr> for ServerErr {
    fn from(value: ConfigErr) -> Self {
        Self::Config(value)
    }
}

impl From<DecodeError> for ServerErr {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

impl From<StoreErr> for ServerErr {
    fn from(value: StoreErr) -> Self {
        Self::Store(value)
    }
}

/// Boundary conversion for binaries / I/O APIs.
impl From<ServerErr> for io::Error {
    fn from(value: ServerErr) -> Self {
        match value {
            ServerErr::Transport(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
