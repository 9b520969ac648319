use thiserror::Error as ThisError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("out of memory")]
    OutOfMemory,

    #[error("insertion depth {depth} exceeds the maximum tree height {max_height}")]
    HeightExceeded { depth: usize, max_height: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<std::collections::TryReserveError> for Error {
    fn from(_: std::collections::TryReserveError) -> Self {
        Error::OutOfMemory
    }
}
