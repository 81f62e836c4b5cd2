//! # querytree - Query Intermediate Representation
//!
//! This module defines the immutable IR that clients build queries with and
//! that backends consume through [`visit`](crate::visitor::visit).
//!
//! ## Architecture Overview
//!
//! The IR is organized into focused submodules, leaves first:
//!
//! - **[operators]** - Comparison/bitwise operators, sort direction, column and index types
//! - **[descriptors]** - Leaf descriptors: `Collection`, `Field`, `SortableField`, `Column`, `Index`
//! - **[calc]** - Calculated fields (`COUNT`, `AVG`, `MAX`, ...)
//! - **[expressions]** - The boolean predicate tree (`Comparison`, `Bitwise`)
//! - **[clauses]** - Clause families shared by query kinds (`Filter`, `Sort`, `Target`)
//! - **[queries]** - Reads: `SelectQuery`, `UnionQuery`, `AggregateQuery`
//! - **[statements]** - Writes: `InsertQuery`, `UpdateQuery`, `ReplaceQuery`, `DeleteQuery`
//! - **[ddl]** - Collection definition statements
//! - **[query]** - The `Query` sum type over every statement kind
//!
//! ## Quick Start
//!
//! ```
//! use querytree::{Filter, SelectQuery};
//!
//! let query = SelectQuery::new().from("Post").eq("id", "post1").eq("author", "mgrenier");
//! assert_eq!(
//!     query.to_string(),
//!     r#"SELECT * FROM Post WHERE (id = "post1" and author = "mgrenier")"#
//! );
//! ```
//!
//! ## Core Concepts
//!
//! ### Immutability
//!
//! Every node is a cheap-to-clone handle over shared, never-mutated data.
//! Builder methods take `&self` and return a new node with exactly one
//! clause changed; the other clauses are the same shared handles. A
//! builder call that would not change anything returns a handle to the
//! very same data, observable with `ptr_eq`:
//!
//! ```
//! use querytree::SelectQuery;
//!
//! let query = SelectQuery::new().limit(5);
//! assert!(query.limit(5).ptr_eq(&query));
//! ```
//!
//! ### Replace versus append
//!
//! `filter`, `and`, `or` and `xor` replace the whole predicate tree.
//! `eq`, `ne`, `gt`, `gte`, `lt`, `lte`, `is_in` and `begins_with` append
//! one comparison to it, under an implicit AND when no tree exists yet.
//!
//! ### Text form
//!
//! `Display` renders a SQL-like debugging form. It is not escaped and
//! not meant to be executed.
pub mod calc;
pub mod clauses;
pub mod ddl;
pub mod descriptors;
pub mod expressions;
pub mod operators;
pub mod queries;
pub mod query;
pub mod statements;

pub use calc::{CalcField, CalcOperand};
pub use clauses::{CollectionRef, Filter, Join, Sort, Target};
pub use ddl::{
    AlterCollectionQuery, CollectionExistsQuery, CreateCollectionQuery, DescribeCollectionQuery,
    DropCollectionQuery,
};
pub use descriptors::{Collection, Column, Field, Index, SortableField};
pub use expressions::{Bitwise, Comparison, Expression};
pub use operators::{
    BitwiseOperator, CalcFunction, ColumnType, ComparisonOperator, Direction, IndexType, Operator,
};
pub use queries::{AggregateMap, AggregateQuery, JoinMap, SelectQuery, UnionQuery};
pub use query::Query;
pub use statements::{DataMap, DeleteQuery, InsertQuery, ReplaceQuery, UpdateQuery};
