use std::{error, fmt};

// -------------------------------------------------------------------------------------------------

/// Provides an enumeration of all possible errors reported by grainstretch.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum Error {
    /// A grain extraction or reconstruction setting is out of its valid range.
    ParameterError(String),
    /// Reconstruction got called with an empty grain collection.
    EmptyGrainsError,
    /// The grain at the given collection index can not be mixed into the output.
    InvalidGrainError(usize, String),
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParameterError(str) => write!(f, "Invalid parameter: {str}"),
            Self::EmptyGrainsError => {
                write!(f, "Can not reconstruct audio from an empty grain list")
            }
            Self::InvalidGrainError(index, str) => {
                write!(f, "Invalid grain at index {index}: {str}")
            }
        }
    }
}
