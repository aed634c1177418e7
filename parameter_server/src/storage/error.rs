use std::{
    error::Error,
    fmt::{self, Display},
};

/// The specific result type for the storage module.
pub type Result<T> = std::result::Result<T, StoreErr>;

/// Error returned by the `ParameterStore` whenever a gradient can't be applied to the weights.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreErr {
    /// The gradient's length differs from the established weights dimension.
    DimensionMismatch { expected: usize, got: usize },
    /// A zero length gradient, it can't establish nor update any weights.
    EmptyGradient,
}

impl Display for StoreErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreErr::DimensionMismatch { expected, got } => write!(
                f,
                "dimension mismatch: the weights have {expected} elements but the gradient has {got}"
            ),
            StoreErr::EmptyGradient => f.write_str("received an empty gradient"),
        }
    }
}

impl Error for StoreErr {}
