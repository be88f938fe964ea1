//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`InvalidPart`] thrown when an export part index is outside the plan.
//! - [`InvalidFilter`] thrown when a date filter is rejected in strict mode.
//! - [`Database`] thrown when the record source fails to answer.
//!
//!  [`InvalidPart`]: EngineError::InvalidPart
//!  [`InvalidFilter`]: EngineError::InvalidFilter
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The payload is the raw value the caller sent; it is logged, never echoed.
    #[error("invalid part")]
    InvalidPart(String),
    #[error("{0}")]
    InvalidFilter(String),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Invalid csv: {0}")]
    InvalidCsv(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidPart(a), Self::InvalidPart(b)) => a == b,
            (Self::InvalidFilter(a), Self::InvalidFilter(b)) => a == b,
            (Self::InvalidTransaction(a), Self::InvalidTransaction(b)) => a == b,
            (Self::InvalidCsv(a), Self::InvalidCsv(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Csv(a), Self::Csv(b)) => a.to_string() == b.to_string(),
            (Self::Io(a), Self::Io(b)) => a.kind() == b.kind(),
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
