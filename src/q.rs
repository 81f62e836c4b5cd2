//! Short constructors for every node kind.
//!
//! ```
//! use querytree::{Filter, q};
//!
//! let query = q::select(["title"])
//!     .from("Post")
//!     .filter(q::or([q::eq("author", "mgrenier"), q::begins_with("title", "Hello")]));
//!
//! assert_eq!(
//!     query.to_string(),
//!     r#"SELECT title FROM Post WHERE (author = "mgrenier" or title beginsWith "Hello")"#
//! );
//! ```

use crate::{
    ast::{
        AggregateQuery, AlterCollectionQuery, Bitwise, CalcField, CalcOperand, Collection,
        CollectionExistsQuery, CollectionRef, Column, ColumnType, Comparison,
        CreateCollectionQuery, DeleteQuery, DescribeCollectionQuery, Direction,
        DropCollectionQuery, Expression, Field, Index, IndexType, InsertQuery, ReplaceQuery,
        SelectQuery, SortableField, Target, UnionQuery, UpdateQuery,
    },
    value::Value,
};

// Queries

pub fn select<I>(fields: I) -> SelectQuery
where
    I: IntoIterator,
    I::Item: Into<Field>,
{
    SelectQuery::new().select(fields)
}

pub fn aggregate<I, K>(fields: I) -> AggregateQuery
where
    I: IntoIterator<Item = (K, CalcField)>,
    K: Into<String>,
{
    AggregateQuery::new().select(fields)
}

pub fn union(selects: impl IntoIterator<Item = SelectQuery>) -> UnionQuery {
    UnionQuery::new().select(selects)
}

pub fn insert<I, K, V>(fields: I) -> InsertQuery
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    InsertQuery::new().fields(fields)
}

pub fn update<I, K, V>(fields: I) -> UpdateQuery
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    UpdateQuery::new().fields(fields)
}

pub fn replace<I, K, V>(fields: I) -> ReplaceQuery
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    ReplaceQuery::new().fields(fields)
}

pub fn delete(target: impl Into<CollectionRef>) -> DeleteQuery {
    DeleteQuery::new().collection(target)
}

pub fn create_collection(target: impl Into<CollectionRef>) -> CreateCollectionQuery {
    CreateCollectionQuery::new().collection(target)
}

pub fn describe_collection(target: impl Into<CollectionRef>) -> DescribeCollectionQuery {
    DescribeCollectionQuery::new().collection(target)
}

pub fn alter_collection(target: impl Into<CollectionRef>) -> AlterCollectionQuery {
    AlterCollectionQuery::new().collection(target)
}

pub fn collection_exists(target: impl Into<CollectionRef>) -> CollectionExistsQuery {
    CollectionExistsQuery::new().collection(target)
}

pub fn drop_collection(target: impl Into<CollectionRef>) -> DropCollectionQuery {
    DropCollectionQuery::new().collection(target)
}

// Predicates

pub fn and<I>(operands: I) -> Bitwise
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    Bitwise::and(operands)
}

pub fn or<I>(operands: I) -> Bitwise
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    Bitwise::or(operands)
}

pub fn xor<I>(operands: I) -> Bitwise
where
    I: IntoIterator,
    I::Item: Into<Expression>,
{
    Bitwise::xor(operands)
}

pub fn eq(field: impl Into<Field>, value: impl Into<Value>) -> Comparison {
    Comparison::eq(field, value)
}

pub fn ne(field: impl Into<Field>, value: impl Into<Value>) -> Comparison {
    Comparison::ne(field, value)
}

pub fn gt(field: impl Into<Field>, value: impl Into<Value>) -> Comparison {
    Comparison::gt(field, value)
}

pub fn gte(field: impl Into<Field>, value: impl Into<Value>) -> Comparison {
    Comparison::gte(field, value)
}

pub fn lt(field: impl Into<Field>, value: impl Into<Value>) -> Comparison {
    Comparison::lt(field, value)
}

pub fn lte(field: impl Into<Field>, value: impl Into<Value>) -> Comparison {
    Comparison::lte(field, value)
}

pub fn is_in<I>(field: impl Into<Field>, values: I) -> Comparison
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    Comparison::is_in(field, values)
}

pub fn begins_with(field: impl Into<Field>, prefix: impl Into<String>) -> Comparison {
    Comparison::begins_with(field, prefix)
}

// Descriptors

pub fn collection(name: &str, namespace: Option<&str>) -> Collection {
    Collection::new(name, namespace)
}

pub fn column(name: &str, column_type: ColumnType) -> Column {
    Column::new(name, column_type)
}

pub fn index(name: &str, index_type: IndexType) -> Index {
    Index::new(name, index_type)
}

/// `name` or `table.name`.
pub fn field(path: &str) -> Field {
    match path.split_once('.') {
        Some((table, name)) => Field::qualified(table, name),
        None => Field::new(path),
    }
}

pub fn sort(name: &str, direction: Option<Direction>) -> SortableField {
    SortableField::new(name, direction)
}

// Calculated fields

pub fn count(field: impl Into<Field>) -> CalcField {
    CalcField::count(field)
}

pub fn avg(operand: impl Into<CalcOperand>) -> CalcField {
    CalcField::avg(operand)
}

pub fn sum(operand: impl Into<CalcOperand>) -> CalcField {
    CalcField::sum(operand)
}

pub fn sub(operand: impl Into<CalcOperand>) -> CalcField {
    CalcField::sub(operand)
}

pub fn max<I>(operands: I) -> CalcField
where
    I: IntoIterator,
    I::Item: Into<CalcOperand>,
{
    CalcField::max(operands)
}

pub fn min<I>(operands: I) -> CalcField
where
    I: IntoIterator,
    I::Item: Into<CalcOperand>,
{
    CalcField::min(operands)
}

pub fn concat<I>(operands: I) -> CalcField
where
    I: IntoIterator,
    I::Item: Into<CalcOperand>,
{
    CalcField::concat(operands)
}
