// SPDX-License-Identifier: MPL-2.0
//! Crate-wide error type.

use crate::notifications::NotificationId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An entry with this id is already active in the queue.
    #[error("Duplicate notification id: {0}")]
    DuplicateId(NotificationId),

    /// The dispatcher was created outside of a tokio runtime.
    #[error("No async runtime available to drive expiry timers")]
    NoRuntime,

    #[error("I/O Error: {0}")]
    Io(String),

    #[error("Config Error: {0}")]
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
