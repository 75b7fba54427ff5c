//! Tracker error types

use thiserror::Error;

use crate::lookup::LookupError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum TrackerError {
    /// Bad or missing user input; nothing was changed
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A newer lookup was started before this one finished
    #[error("A newer nutrition lookup replaced this one")]
    Superseded,

    #[error("Failed to load tracker state: {0}")]
    Store(#[from] StoreError),
}

impl TrackerError {
    pub fn validation(message: impl Into<String>) -> Self {
        TrackerError::Validation(message.into())
    }
}

pub type TrackerResult<T> = Result<T, TrackerError>;
