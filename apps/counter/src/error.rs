//! # Counter Error Type
//!
//! Everything that can stop a counter command, mapped to a process exit code.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ConfigError / DbError / CoreError / ValidationError / io::Error        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CounterError ──► "error: <message>" on stderr, exit_code()            │
//! │                                                                         │
//! │  2  usage / bad argument / validation                                  │
//! │  3  not found                                                           │
//! │  1  everything else                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use vedaa_core::{CoreError, ValidationError};
use vedaa_db::DbError;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CounterError {
    #[error("{0}")]
    Usage(String),

    #[error("invalid value for {flag}: '{value}'")]
    InvalidArgument { flag: String, value: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("could not write invoice: {0}")]
    Io(#[from] std::io::Error),
}

impl CounterError {
    pub fn usage(message: impl Into<String>) -> Self {
        CounterError::Usage(message.into())
    }

    pub fn invalid(flag: impl Into<String>, value: impl Into<String>) -> Self {
        CounterError::InvalidArgument {
            flag: flag.into(),
            value: value.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            CounterError::Usage(_)
            | CounterError::InvalidArgument { .. }
            | CounterError::Validation(_)
            | CounterError::Core(CoreError::UnknownMetal(_))
            | CounterError::Core(CoreError::Validation(_))
            | CounterError::Db(DbError::Validation(_)) => 2,
            CounterError::Core(CoreError::ItemNotFound(_)) | CounterError::Db(DbError::NotFound { .. }) => 3,
            _ => 1,
        }
    }
}

pub type CounterResult<T> = Result<T, CounterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(CounterError::usage("missing command").exit_code(), 2);
        assert_eq!(CounterError::invalid("--weight", "ten").exit_code(), 2);
        assert_eq!(CounterError::from(DbError::not_found("Jewelry item", "x")).exit_code(), 3);
        assert_eq!(CounterError::from(DbError::Busy).exit_code(), 1);
    }

    #[test]
    fn test_invalid_argument_message() {
        let err = CounterError::invalid("--weight", "ten");
        assert_eq!(err.to_string(), "invalid value for --weight: 'ten'");
    }
}
