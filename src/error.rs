/// Errors a backend reports when it cannot use a query.
///
/// Building a query never fails; these kinds exist so every backend tells a
/// caller the same three things apart:
///
/// - the query is valid but too complex for this backend,
/// - this backend has no translation for a node or operator,
/// - the IR reconstructed from external input is malformed.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryError {
    /// The shape exceeds what the backend translates (join count, predicate depth, ...)
    TooComplexQuery(String),

    /// The backend has no translation for a node kind or operator
    QueryNotSupported(String),

    /// Malformed input while reconstructing IR; `path` locates the offending node
    QuerySyntax { path: String, message: String },
}

impl QueryError {
    pub(crate) fn syntax(path: &str, message: impl Into<String>) -> Self {
        QueryError::QuerySyntax {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::TooComplexQuery(msg) => write!(f, "Query too complex: {}", msg),
            QueryError::QueryNotSupported(msg) => write!(f, "Query not supported: {}", msg),
            QueryError::QuerySyntax { path, message } => {
                write!(f, "Query syntax error at {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for QueryError {}
