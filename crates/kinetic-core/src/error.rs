use thiserror::Error;

/// Errors raised by the geometry kernel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors raised while loading or validating the engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse engine config RON: {0}")]
    ParseError(String),

    #[error("Config field '{field}' is out of range: {reason}")]
    OutOfRange { field: &'static str, reason: String },
}
