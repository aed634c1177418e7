use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The specific result type for frame decoding.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Error returned whenever a frame can't be read back into the values it's expected to hold.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// A value was requested past the end of the frame.
    Exhausted { index: usize },
    /// The bytes at `index` don't form a supported value.
    Malformed { index: usize, reason: String },
    /// The value read for `field` is of another kind.
    UnexpectedType {
        field: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    /// The value read for `field` has the right kind but an invalid content.
    InvalidField { field: &'static str, reason: String },
    /// The frame carries more values than its schema allows.
    TrailingValues { expected: usize },
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Exhausted { index } => {
                write!(f, "frame exhausted: no value left at position {index}")
            }
            DecodeError::Malformed { index, reason } => {
                write!(f, "malformed value at position {index}: {reason}")
            }
            DecodeError::UnexpectedType {
                field,
                expected,
                got,
            } => write!(f, "unexpected type for {field}: expected {expected}, got {got}"),
            DecodeError::InvalidField { field, reason } => {
                write!(f, "invalid {field}: {reason}")
            }
            DecodeError::TrailingValues { expected } => {
                write!(f, "frame carries more than the expected {expected} values")
            }
        }
    }
}

impl Error for DecodeError {}

impl From<DecodeError> for io::Error {
    fn from(value: DecodeError) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, value)
    }
}
