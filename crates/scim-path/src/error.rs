//! Engine error type.

use thiserror::Error;

use crate::parser::ParseError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The textual path or filter is malformed.
    #[error("invalid path \"{text}\": {reason}")]
    PathSyntax { text: String, reason: ParseError },
    /// A mutating traversal addressed no value.
    #[error("no target: {0}")]
    NoTarget(String),
    /// The filter cannot be evaluated against the addressed value.
    #[error("invalid filter: {0}")]
    InvalidFilter(String),
    /// The value cannot be applied where the path points.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
