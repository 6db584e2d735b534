//! The module contains the error the engine can throw.
//!
//! The settlement computation itself never fails: malformed snapshots degrade
//! to zero contributions. Errors only surface from parsing user input and from
//! session edits that address something that does not exist.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] thrown when a raw amount cannot be parsed.
//! - [`KeyNotFound`] thrown when an item are not found.
//! - [`ExistingKey`] thrown when an item with the same id is already present.
//! - [`InvalidSetting`] thrown when a mode or currency name is not recognised.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
//!  [`InvalidSetting`]: EngineError::InvalidSetting
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}
