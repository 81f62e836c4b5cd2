//! Render a JSON query document as text

use super::{CliError, read_query};
use crate::{output::QueryPrinter, simplify_query};

/// Options for the render command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// JSON query document
    pub input: Option<String>,
    /// One clause per line
    pub pretty: bool,
    /// Flatten every predicate tree before rendering
    pub simplify: bool,
}

/// Execute a render operation, returning the text form of the query
pub fn execute_render(options: &RenderOptions) -> Result<String, CliError> {
    let mut query = read_query(options.input.as_deref())?;
    if options.simplify {
        query = simplify_query(&query);
    }
    Ok(QueryPrinter::new(options.pretty).print(&query))
}
