//! SQL-like text rendering of queries, for debugging and logs.
//!
//! The output is never escaped and is not meant to be sent to a database.
//! Two layouts are available:
//!
//! - **Single line** via [`to_text()`] and every `Display` impl: clauses joined by one space
//! - **Multi-line** via [`to_text_pretty()`]: one clause per line, nested parts indented with tabs
//!
//! # Examples
//!
//! ```
//! use querytree::{Filter, Query, SelectQuery};
//! use querytree::output::{to_text, to_text_pretty};
//!
//! let query = Query::from(SelectQuery::new().from("Post").eq("id", "post1"));
//!
//! assert_eq!(to_text(&query), r#"SELECT * FROM Post WHERE id = "post1""#);
//! assert_eq!(to_text_pretty(&query), "SELECT *\nFROM Post\nWHERE id = \"post1\"");
//! ```

use std::fmt;

use crate::ast::{
    AggregateQuery, AlterCollectionQuery, Bitwise, Collection, CollectionExistsQuery,
    CreateCollectionQuery, DataMap, DeleteQuery, DescribeCollectionQuery, DropCollectionQuery,
    Filter, InsertQuery, JoinMap, Query, ReplaceQuery, SelectQuery, Sort, SortableField, Target,
    UnionQuery, UpdateQuery, descriptors::join,
};

pub struct QueryPrinter {
    multiline: bool,
}

impl QueryPrinter {
    pub fn new(multiline: bool) -> Self {
        QueryPrinter { multiline }
    }

    pub fn print(&self, query: &Query) -> String {
        match query {
            Query::Select(q) => self.print_select(q, 0),
            Query::Union(q) => self.print_union(q, 0),
            Query::Aggregate(q) => self.print_aggregate(q, 0),
            Query::Insert(q) => self.print_insert(q, 0),
            Query::Update(q) => {
                let (collection, fields) = (q.get_collection(), q.get_fields());
                self.print_mutation("UPDATE", collection, fields, q.get_filter(), q.get_limit(), 0)
            }
            Query::Replace(q) => {
                let (collection, fields) = (q.get_collection(), q.get_fields());
                self.print_mutation("REPLACE", collection, fields, q.get_filter(), q.get_limit(), 0)
            }
            Query::Delete(q) => self.print_delete(q, 0),
            Query::CreateCollection(q) => self.print_create_collection(q, 0),
            Query::DescribeCollection(q) => self.head("DESCRIBE COLLECTION", q.get_collection(), 0),
            Query::AlterCollection(q) => self.print_alter_collection(q, 0),
            Query::CollectionExists(q) => self.head("COLLECTION EXISTS", q.get_collection(), 0),
            Query::DropCollection(q) => self.head("DROP COLLECTION", q.get_collection(), 0),
        }
    }

    fn print_select(&self, query: &SelectQuery, depth: usize) -> String {
        let fields = match query.get_select() {
            Some(fields) if !fields.is_empty() => join(fields, ", "),
            _ => "*".to_string(),
        };
        let mut out = format!("{}SELECT {}", self.indent(depth), fields);
        if let Some(from) = query.get_from() {
            self.clause(&mut out, depth, format!("FROM {}", from));
        }
        self.print_joins(&mut out, query.get_join(), depth);
        self.print_where(&mut out, query.get_filter(), depth);
        self.print_sort(&mut out, query.get_sort(), depth);
        self.print_range(&mut out, query.get_offset(), query.get_limit(), depth);
        out
    }

    fn print_union(&self, query: &UnionQuery, depth: usize) -> String {
        let Some(selects) = query.get_selects() else {
            return String::new();
        };
        let nl = self.newline();
        let branches: Vec<String> = selects.iter().map(|s| self.print_select(s, depth + 1)).collect();
        let separator = format!("{nl}{}) UNION ({nl}", self.indent(depth));

        let mut out = format!(
            "{indent}({nl}{branches}{nl}{indent})",
            indent = self.indent(depth),
            branches = branches.join(&separator),
        );
        self.print_sort(&mut out, query.get_sort(), depth);
        self.print_range(&mut out, query.get_offset(), query.get_limit(), depth);
        out
    }

    fn print_aggregate(&self, query: &AggregateQuery, depth: usize) -> String {
        let fields = match query.get_select() {
            Some(select) if !select.is_empty() => select
                .iter()
                .map(|(alias, calc)| format!("{} AS {}", calc, alias))
                .collect::<Vec<_>>()
                .join(", "),
            _ => "*".to_string(),
        };
        let mut out = format!("{}AGGREGATE {}", self.indent(depth), fields);
        if let Some(from) = query.get_from() {
            self.clause(&mut out, depth, format!("FROM {}", from));
        }
        self.print_joins(&mut out, query.get_join(), depth);
        self.print_where(&mut out, query.get_filter(), depth);
        if let Some(group) = query.get_group().filter(|g| !g.is_empty()) {
            self.clause(&mut out, depth, format!("GROUP BY {}", join(group, ", ")));
        }
        self.print_sort(&mut out, query.get_sort(), depth);
        self.print_range(&mut out, query.get_offset(), query.get_limit(), depth);
        out
    }

    fn print_insert(&self, query: &InsertQuery, depth: usize) -> String {
        let mut out = self.head("INSERT", query.get_collection(), depth);
        self.print_data(&mut out, query.get_fields(), depth);
        out
    }

    fn print_mutation(
        &self,
        keyword: &str,
        collection: Option<&Collection>,
        fields: Option<&DataMap>,
        filter: Option<&Bitwise>,
        limit: Option<u64>,
        depth: usize,
    ) -> String {
        let mut out = self.head(keyword, collection, depth);
        self.print_data(&mut out, fields, depth);
        self.print_where(&mut out, filter, depth);
        self.print_range(&mut out, None, limit, depth);
        out
    }

    fn print_delete(&self, query: &DeleteQuery, depth: usize) -> String {
        let mut out = self.head("DELETE", query.get_collection(), depth);
        self.print_where(&mut out, query.get_filter(), depth);
        self.print_range(&mut out, None, query.get_limit(), depth);
        out
    }

    fn print_create_collection(&self, query: &CreateCollectionQuery, depth: usize) -> String {
        let mut out = self.head("CREATE COLLECTION", query.get_collection(), depth);
        if let Some(columns) = query.get_columns().filter(|c| !c.is_empty()) {
            out.push(' ');
            out.push_str(&self.block(columns, depth));
        }
        if let Some(indexes) = query.get_indexes().filter(|i| !i.is_empty()) {
            let block = self.block(indexes, depth);
            self.clause(&mut out, depth, format!("INDEXES {}", block));
        }
        out
    }

    fn print_alter_collection(&self, query: &AlterCollectionQuery, depth: usize) -> String {
        let mut out = self.head("ALTER COLLECTION", query.get_collection(), depth);
        if let Some(columns) = query.get_columns().filter(|c| !c.is_empty()) {
            out.push(' ');
            out.push_str(&self.block(columns, depth));
        }
        out
    }

    fn print_joins(&self, out: &mut String, joins: Option<&JoinMap>, depth: usize) {
        for (alias, entry) in joins.into_iter().flatten() {
            let sub = QueryPrinter::new(false).print_select(&entry.query, 0);
            self.clause(out, depth, format!("JOIN ({}) AS {} ON {}", sub, alias, entry.on));
        }
    }

    fn print_where(&self, out: &mut String, filter: Option<&Bitwise>, depth: usize) {
        let Some(filter) = filter else { return };
        let predicate = filter.to_string();
        if !predicate.is_empty() {
            self.clause(out, depth, format!("WHERE {}", predicate));
        }
    }

    fn print_sort(&self, out: &mut String, sort: Option<&[SortableField]>, depth: usize) {
        if let Some(sort) = sort.filter(|s| !s.is_empty()) {
            self.clause(out, depth, format!("SORT BY {}", join(sort, ", ")));
        }
    }

    fn print_range(&self, out: &mut String, offset: Option<u64>, limit: Option<u64>, depth: usize) {
        if let Some(offset) = offset {
            self.clause(out, depth, format!("OFFSET {}", offset));
        }
        if let Some(limit) = limit {
            self.clause(out, depth, format!("LIMIT {}", limit));
        }
    }

    fn print_data(&self, out: &mut String, data: Option<&DataMap>, depth: usize) {
        let Some(data) = data.filter(|d| !d.is_empty()) else {
            return;
        };
        let keys: Vec<&str> = data.keys().map(String::as_str).collect();
        let values: Vec<String> = data.values().map(ToString::to_string).collect();
        self.clause(out, depth, format!("({})", keys.join(", ")));
        self.clause(out, depth, format!("VALUES ({})", values.join(", ")));
    }

    fn head(&self, keyword: &str, collection: Option<&Collection>, depth: usize) -> String {
        match collection {
            Some(collection) => format!("{}{} {}", self.indent(depth), keyword, collection),
            None => format!("{}{}", self.indent(depth), keyword),
        }
    }

    /// `( a, b )` on one line, or one item per line one level deeper.
    fn block<T: fmt::Display>(&self, items: &[T], depth: usize) -> String {
        let nl = self.newline();
        let inner = self.indent(depth + 1);
        let items: Vec<String> = items.iter().map(ToString::to_string).collect();
        format!(
            "({nl}{inner}{items}{nl}{outer})",
            items = items.join(&format!(",{nl}{inner}")),
            outer = self.indent(depth),
        )
    }

    fn clause(&self, out: &mut String, depth: usize, text: String) {
        out.push_str(self.newline());
        out.push_str(&self.indent(depth));
        out.push_str(&text);
    }

    fn newline(&self) -> &'static str {
        if self.multiline { "\n" } else { " " }
    }

    fn indent(&self, depth: usize) -> String {
        if self.multiline {
            "\t".repeat(depth)
        } else {
            String::new()
        }
    }
}

/// Renders a query on a single line.
pub fn to_text(query: &Query) -> String {
    QueryPrinter::new(false).print(query)
}

/// Renders a query with one clause per line.
///
/// ```
/// use querytree::{Query, SelectQuery, UnionQuery};
/// use querytree::output::to_text_pretty;
///
/// let union = UnionQuery::new().select([
///     SelectQuery::new().from("Post"),
///     SelectQuery::new().from("Draft"),
/// ]);
///
/// assert_eq!(
///     to_text_pretty(&Query::from(union)),
///     "(\n\tSELECT *\n\tFROM Post\n) UNION (\n\tSELECT *\n\tFROM Draft\n)"
/// );
/// ```
pub fn to_text_pretty(query: &Query) -> String {
    QueryPrinter::new(true).print(query)
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_text(self))
    }
}

macro_rules! display_via_query {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&to_text(&Query::from(self.clone())))
                }
            }
        )*
    };
}

display_via_query!(
    SelectQuery,
    UnionQuery,
    AggregateQuery,
    InsertQuery,
    UpdateQuery,
    ReplaceQuery,
    DeleteQuery,
    CreateCollectionQuery,
    DescribeCollectionQuery,
    AlterCollectionQuery,
    CollectionExistsQuery,
    DropCollectionQuery,
);
