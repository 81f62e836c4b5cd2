//! CLI support for querytree
//!
//! Provides programmatic access to the `render` and `check` commands so the
//! same behavior can be embedded in other tools.

mod check;
mod render;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use render::{RenderOptions, execute_render};

use std::io;

use crate::{Query, QueryError, decode_query};

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Malformed query document
    Query(QueryError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
    /// Operator name given to `--deny` that does not exist
    UnknownOperator(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Query(e) => write!(f, "{}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => write!(f, "No input provided. Pass a query, use --input or pipe JSON to stdin."),
            CliError::UnknownOperator(op) => {
                write!(f, "Unknown operator: '{}'\nExpected one of =, !=, >, >=, <, <=, beginsWith, in, and, or, xor.", op)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Query(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        CliError::Query(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}

/// Parses and decodes the query document shared by every command.
fn read_query(input: Option<&str>) -> Result<Query, CliError> {
    let text = input.ok_or(CliError::NoInput)?;
    let json: serde_json::Value = serde_json::from_str(text)?;
    Ok(decode_query(&json)?)
}
