//! Backend capability checks.
//!
//! A backend usually cannot translate everything the IR can express: a
//! key-value store may have no joins, a search index may cap the depth of
//! boolean groups, and few stores implement XOR. [`QueryGuard`] describes
//! those limits and rejects a query before translation starts, with the
//! same [`QueryError`] kinds every backend reports.
//!
//! ```
//! use querytree::{BitwiseOperator, Comparison, Filter, Operator, Query, QueryError, SelectQuery};
//! use querytree::guard::QueryGuard;
//!
//! let guard = QueryGuard::new().deny(Operator::Bitwise(BitwiseOperator::Xor));
//!
//! let query = SelectQuery::new().from("Post").xor([Comparison::eq("a", 1), Comparison::eq("b", 2)]);
//! assert_eq!(
//!     guard.check(&Query::from(query)),
//!     Err(QueryError::QueryNotSupported("operator \"xor\"".to_string()))
//! );
//! ```

use crate::{
    ast::{AggregateQuery, Bitwise, Comparison, Operator, Query, SelectQuery},
    error::QueryError,
    visitor::{BitwiseMembers, ComparisonMembers, ComparisonsMembers, Raw, Visitor, visit},
};

#[derive(Debug, Clone, Default)]
pub struct QueryGuard {
    max_joins: Option<usize>,
    max_predicate_depth: Option<usize>,
    max_operands: Option<usize>,
    unsupported: Vec<Operator>,
}

impl QueryGuard {
    /// A guard without limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum number of joins across the whole query, sub-queries included.
    pub fn max_joins(mut self, max: usize) -> Self {
        self.max_joins = Some(max);
        self
    }

    /// Maximum nesting of boolean groups; a flat `WHERE` group has depth 1.
    pub fn max_predicate_depth(mut self, max: usize) -> Self {
        self.max_predicate_depth = Some(max);
        self
    }

    /// Maximum number of operands in a single boolean group.
    pub fn max_operands(mut self, max: usize) -> Self {
        self.max_operands = Some(max);
        self
    }

    pub fn deny(mut self, operator: Operator) -> Self {
        if !self.unsupported.contains(&operator) {
            self.unsupported.push(operator);
        }
        self
    }

    /// Returns the first violation found in `query`.
    pub fn check(&self, query: &Query) -> Result<(), QueryError> {
        let mut inspector = Inspector {
            guard: self,
            joins: 0,
            error: None,
        };
        visit(query, &mut inspector);
        match inspector.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Depth of the predicate group a result comes from; 0 for leaves.
struct Depth(usize);

impl From<Raw> for Depth {
    fn from(_: Raw) -> Self {
        Depth(0)
    }
}

struct Inspector<'g> {
    guard: &'g QueryGuard,
    joins: usize,
    error: Option<QueryError>,
}

impl Inspector<'_> {
    fn count_joins(&mut self, joins: usize) -> bool {
        self.joins += joins;
        if let Some(max) = self.guard.max_joins
            && self.joins > max
        {
            self.fail(QueryError::TooComplexQuery(format!(
                "{} joins exceed the limit of {}",
                self.joins, max
            )));
        }
        self.error.is_some()
    }

    fn check_operator(&mut self, operator: Operator) {
        if self.guard.unsupported.contains(&operator) {
            self.fail(QueryError::QueryNotSupported(format!("operator \"{}\"", operator)));
        }
    }

    fn fail(&mut self, error: QueryError) {
        self.error.get_or_insert(error);
    }
}

impl Visitor for Inspector<'_> {
    type Output = Depth;

    fn enter_select(&mut self, query: &SelectQuery) -> bool {
        self.count_joins(query.get_join().map_or(0, |j| j.len()))
    }

    fn enter_aggregate(&mut self, query: &AggregateQuery) -> bool {
        self.count_joins(query.get_join().map_or(0, |j| j.len()))
    }

    fn comparison(&mut self, _node: &Comparison, members: ComparisonMembers<Depth>) -> Option<Depth> {
        self.check_operator(Operator::Comparison(members.operator));
        Some(Depth(0))
    }

    fn comparisons(&mut self, _node: &Comparison, members: ComparisonsMembers<Depth>) -> Option<Depth> {
        self.check_operator(Operator::Comparison(members.operator));
        Some(Depth(0))
    }

    fn bitwise(&mut self, _node: &Bitwise, members: BitwiseMembers<Depth>) -> Option<Depth> {
        self.check_operator(Operator::Bitwise(members.operator));

        let count = members.operands.len();
        if let Some(max) = self.guard.max_operands
            && count > max
        {
            self.fail(QueryError::TooComplexQuery(format!(
                "{} operands in one {} group exceed the limit of {}",
                count, members.operator, max
            )));
        }

        let depth = 1 + members.operands.iter().flatten().map(|d| d.0).max().unwrap_or(0);
        if let Some(max) = self.guard.max_predicate_depth
            && depth > max
        {
            self.fail(QueryError::TooComplexQuery(format!(
                "predicate depth {} exceeds the limit of {}",
                depth, max
            )));
        }
        Some(Depth(depth))
    }
}
