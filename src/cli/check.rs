//! Check a JSON query document against backend limits

use super::{CliError, read_query};
use crate::{Operator, QueryError, QueryGuard};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// JSON query document
    pub input: Option<String>,
    pub max_joins: Option<usize>,
    pub max_depth: Option<usize>,
    pub max_operands: Option<usize>,
    /// Operator names the backend cannot translate (`xor`, `beginsWith`, ...)
    pub deny: Vec<String>,
}

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// The query fits; carries its kind (`SelectQuery`, ...)
    Accepted(&'static str),
    /// The query is well formed but the guard refused it
    Rejected(QueryError),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let mut guard = QueryGuard::new();
    if let Some(max) = options.max_joins {
        guard = guard.max_joins(max);
    }
    if let Some(max) = options.max_depth {
        guard = guard.max_predicate_depth(max);
    }
    if let Some(max) = options.max_operands {
        guard = guard.max_operands(max);
    }
    for name in &options.deny {
        let operator = Operator::parse(name).ok_or_else(|| CliError::UnknownOperator(name.clone()))?;
        guard = guard.deny(operator);
    }

    let query = read_query(options.input.as_deref())?;
    match guard.check(&query) {
        Ok(()) => Ok(CheckResult::Accepted(query.kind())),
        Err(e) => Ok(CheckResult::Rejected(e)),
    }
}
