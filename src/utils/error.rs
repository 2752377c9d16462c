use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to allocate process table: {0}")]
    Allocation(#[from] TryReserveError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    InvalidConfig(#[from] config::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Others(#[from] anyhow::Error),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// A type alias that forces the usage of the custom error type.
pub type Result<T> = std::result::Result<T, Error>;

macro_rules! other_errors {
    ( $( $err:ty ),+ $(,)? ) => {
        $(
            impl From<$err> for Error {
                fn from(err: $err) -> Self {
                    Self::Others(anyhow::Error::from(err))
                }
            }
        )+
    };
}

other_errors![
    tracing::subscriber::SetGlobalDefaultError,
    tracing_subscriber::util::TryInitError,
    tracing_subscriber::reload::Error,
    serde_json::Error,
    serde_yaml::Error,
    csv::Error,
];
