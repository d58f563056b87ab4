use thiserror::Error;

/// Error type for metric computation and configuration loading
#[derive(Error, Debug)]
pub enum Error {
    #[error("Length mismatch: expected {expected} predicted labels, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("No data: {0}")]
    EmptyData(String),

    #[error("Unknown average mode: {0} (expected one of none, macro, micro, weighted)")]
    UnknownAverageMode(String),

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("I/O error")]
    Io(#[source] std::io::Error),

    #[error("JSON error")]
    Json(#[source] serde_json::Error),

    #[error("YAML error")]
    Yaml(#[source] serde_yaml::Error),

    #[error("TOML error")]
    Toml(#[source] toml::de::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

/// Checks that both label sequences are non-empty and of equal length
pub(crate) fn check_lengths(observed: usize, predicted: usize) -> Result<()> {
    if observed != predicted {
        return Err(Error::LengthMismatch {
            expected: observed,
            actual: predicted,
        });
    }

    if observed == 0 {
        return Err(Error::EmptyData(
            "cannot compute metrics over zero examples".to_string(),
        ));
    }

    Ok(())
}
