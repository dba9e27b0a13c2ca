//! The module contains the errors the core can produce.
//!
//! Aggregation and identity decoding are total functions and never return
//! these; only parsing of user input does.

use thiserror::Error;

/// Core custom errors.
#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}
