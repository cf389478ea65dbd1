use thiserror::Error;

use crate::session::Stage;

pub type Result<T> = std::result::Result<T, SpectraError>;

#[derive(Debug, Error)]
pub enum SpectraError {
    /// The audio bytes could not be obtained (missing file, HTTP failure).
    #[error("Failed to acquire audio from {source_name}: {message}")]
    Acquisition {
        source_name: String,
        message: String,
    },

    /// The bytes were obtained but are not decodable audio.
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Cannot {operation} a session in the {actual:?} stage")]
    Stage { operation: &'static str, actual: Stage },
}

impl SpectraError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        SpectraError::Configuration(message.into())
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        SpectraError::Decode(message.into())
    }
}

impl From<symphonia::core::errors::Error> for SpectraError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        SpectraError::Decode(err.to_string())
    }
}
