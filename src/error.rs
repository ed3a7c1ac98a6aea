use thiserror::Error;

/// Main error type for the circuit test service
///
/// The classifier itself never fails; these cover loading configuration,
/// reading schedules from disk and rejecting malformed API input.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown measurement kind: {0}")]
    UnknownKind(String),

    #[error("Unsupported schedule format: {0}. Expected .json or .toml")]
    UnsupportedFormat(String),

    #[error("No maximum Zs tabulated for device: {0}")]
    UnknownDevice(String),
}

/// Reasons a raw reading could not be turned into a number
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadingError {
    #[error("Reading is empty")]
    Empty,

    #[error("Not a decimal number: {0}")]
    NotANumber(String),

    #[error("Negative reading: {0}")]
    Negative(String),
}
