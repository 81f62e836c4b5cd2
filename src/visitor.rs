//! Generic post-order traversal of the IR.
//!
//! A backend implements [`Visitor`] for the node kinds it understands and
//! drives [`visit`] over a query. Children are reduced first, so every
//! callback receives its node together with the already-reduced results of
//! its children (its *members*). Unimplemented callbacks yield `None`, and
//! that `None` shows up in the members of the parent: partial visitors are
//! valid and must tolerate partial results.
//!
//! # Dispatch
//!
//! | Node | Callback | Members |
//! |---|---|---|
//! | each query kind | `enter_*` then `leave_*` | one record per kind |
//! | `COUNT`/`AVG`/`SUM`/`SUB` | [`Visitor::calc_field`] | [`CalcFieldMembers`] |
//! | `MAX`/`MIN`/`CONCAT` | [`Visitor::calc_fields`] | [`CalcFieldsMembers`] |
//! | simple comparison | [`Visitor::comparison`] | [`ComparisonMembers`] |
//! | `in` comparison | [`Visitor::comparisons`] | [`ComparisonsMembers`] |
//! | bitwise group | [`Visitor::bitwise`] | [`BitwiseMembers`] |
//! | collection, column, index, field | one method each | none |
//! | sortable field, literal value | none, passed through as [`Raw`] | none |
//!
//! When `enter_*` returns `true` the query node is skipped: its children
//! are not visited, `leave_*` is not called and `visit` returns `None`.
//!
//! # Example
//!
//! ```
//! use querytree::{Bitwise, Comparison};
//! use querytree::visitor::{BitwiseMembers, ComparisonMembers, Visitor, visit};
//!
//! struct Count;
//!
//! impl Visitor for Count {
//!     type Output = String;
//!
//!     fn comparison(&mut self, _node: &Comparison, _members: ComparisonMembers<String>) -> Option<String> {
//!         Some("?".to_string())
//!     }
//!
//!     fn bitwise(&mut self, _node: &Bitwise, members: BitwiseMembers<String>) -> Option<String> {
//!         let parts: Vec<String> = members.operands.into_iter().flatten().collect();
//!         Some(format!("{}({})", members.operator, parts.join(",")))
//!     }
//! }
//!
//! let tree = Bitwise::or([Comparison::eq("a", 1), Comparison::gt("b", 2)]);
//! assert_eq!(visit(&tree, &mut Count), Some("or(?,?)".to_string()));
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::{
    ast::{
        AggregateQuery, AlterCollectionQuery, Bitwise, BitwiseOperator, CalcField, CalcOperand,
        Collection, CollectionExistsQuery, Column, Comparison, ComparisonOperator,
        CreateCollectionQuery, DeleteQuery, DescribeCollectionQuery, DropCollectionQuery,
        Expression, Field, Filter, Index, InsertQuery, JoinMap, Query, ReplaceQuery, SelectQuery,
        Sort, SortableField, Target, UnionQuery, UpdateQuery,
    },
    value::Value,
};

/// Nodes without a callback of their own, handed to the visitor's output
/// type unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Raw {
    Value(Value),
    SortableField(SortableField),
}

impl fmt::Display for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Raw::Value(value) => value.fmt(f),
            Raw::SortableField(field) => field.fmt(f),
        }
    }
}

impl From<Raw> for String {
    fn from(raw: Raw) -> Self {
        raw.to_string()
    }
}

/// Anything [`visit`] can start from.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Select(&'a SelectQuery),
    Union(&'a UnionQuery),
    Aggregate(&'a AggregateQuery),
    Insert(&'a InsertQuery),
    Update(&'a UpdateQuery),
    Replace(&'a ReplaceQuery),
    Delete(&'a DeleteQuery),
    CreateCollection(&'a CreateCollectionQuery),
    DescribeCollection(&'a DescribeCollectionQuery),
    AlterCollection(&'a AlterCollectionQuery),
    CollectionExists(&'a CollectionExistsQuery),
    DropCollection(&'a DropCollectionQuery),
    Collection(&'a Collection),
    Column(&'a Column),
    Index(&'a Index),
    Field(&'a Field),
    SortableField(&'a SortableField),
    CalcField(&'a CalcField),
    Comparison(&'a Comparison),
    Bitwise(&'a Bitwise),
    Value(&'a Value),
}

/// Reduced members of a joined sub-query.
#[derive(Debug)]
pub struct JoinMembers<T> {
    pub query: Option<T>,
    pub on: Option<T>,
}

#[derive(Debug)]
pub struct SelectMembers<T> {
    pub select: Option<Vec<Option<T>>>,
    pub from: Option<T>,
    pub join: Option<IndexMap<String, JoinMembers<T>>>,
    pub filter: Option<T>,
    pub sort: Option<Vec<Option<T>>>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug)]
pub struct UnionMembers<T> {
    pub selects: Option<Vec<Option<T>>>,
    pub sort: Option<Vec<Option<T>>>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug)]
pub struct AggregateMembers<T> {
    pub select: Option<IndexMap<String, Option<T>>>,
    pub from: Option<T>,
    pub join: Option<IndexMap<String, JoinMembers<T>>>,
    pub filter: Option<T>,
    pub group: Option<Vec<Option<T>>>,
    pub sort: Option<Vec<Option<T>>>,
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug)]
pub struct InsertMembers<T> {
    pub fields: Option<IndexMap<String, Option<T>>>,
    pub collection: Option<T>,
}

/// Members of `UPDATE` and `REPLACE`.
#[derive(Debug)]
pub struct UpdateMembers<T> {
    pub collection: Option<T>,
    pub fields: Option<IndexMap<String, Option<T>>>,
    pub filter: Option<T>,
    pub limit: Option<u64>,
}

pub type ReplaceMembers<T> = UpdateMembers<T>;

#[derive(Debug)]
pub struct DeleteMembers<T> {
    pub collection: Option<T>,
    pub filter: Option<T>,
    pub limit: Option<u64>,
}

#[derive(Debug)]
pub struct CreateCollectionMembers<T> {
    pub collection: Option<T>,
    pub columns: Option<Vec<Option<T>>>,
    pub indexes: Option<Vec<Option<T>>>,
}

#[derive(Debug)]
pub struct AlterCollectionMembers<T> {
    pub collection: Option<T>,
    pub columns: Option<Vec<Option<T>>>,
}

/// Members of `DESCRIBE COLLECTION`, `COLLECTION EXISTS` and `DROP COLLECTION`.
#[derive(Debug)]
pub struct CollectionMembers<T> {
    pub collection: Option<T>,
}

#[derive(Debug)]
pub struct CalcFieldMembers<T> {
    /// Uppercase function name (`COUNT`, `AVG`, `SUM`, `SUB`)
    pub function: String,
    pub field: Option<T>,
}

#[derive(Debug)]
pub struct CalcFieldsMembers<T> {
    /// Uppercase function name (`MAX`, `MIN`, `CONCAT`)
    pub function: String,
    pub fields: Vec<Option<T>>,
}

#[derive(Debug)]
pub struct ComparisonMembers<T> {
    pub field: Option<T>,
    pub operator: ComparisonOperator,
    /// The literal, not visited
    pub value: Value,
}

#[derive(Debug)]
pub struct ComparisonsMembers<T> {
    pub field: Option<T>,
    pub operator: ComparisonOperator,
    /// Each value visited: fields reach [`Visitor::field`], literals pass through as [`Raw`]
    pub values: Vec<Option<T>>,
}

#[derive(Debug)]
pub struct BitwiseMembers<T> {
    pub operator: BitwiseOperator,
    pub operands: Vec<Option<T>>,
}

/// Callbacks invoked by [`visit`]. Every method has a default: `enter_*`
/// never skips and every other callback yields `None`.
///
/// The children of a query node are visited whether or not its `leave_*`
/// is overridden, so a visitor that only implements leaf callbacks still
/// sees every comparison, including those in joins and union branches.
/// [`QueryGuard`](crate::guard::QueryGuard) relies on this. Return `true`
/// from `enter_*` to skip a sub-tree.
#[allow(unused_variables)]
pub trait Visitor {
    type Output: From<Raw>;

    fn enter_select(&mut self, query: &SelectQuery) -> bool {
        false
    }
    fn leave_select(&mut self, query: &SelectQuery, members: SelectMembers<Self::Output>) -> Option<Self::Output> {
        None
    }

    fn enter_union(&mut self, query: &UnionQuery) -> bool {
        false
    }
    fn leave_union(&mut self, query: &UnionQuery, members: UnionMembers<Self::Output>) -> Option<Self::Output> {
        None
    }

    fn enter_aggregate(&mut self, query: &AggregateQuery) -> bool {
        false
    }
    fn leave_aggregate(
        &mut self,
        query: &AggregateQuery,
        members: AggregateMembers<Self::Output>,
    ) -> Option<Self::Output> {
        None
    }

    fn enter_insert(&mut self, query: &InsertQuery) -> bool {
        false
    }
    fn leave_insert(&mut self, query: &InsertQuery, members: InsertMembers<Self::Output>) -> Option<Self::Output> {
        None
    }

    fn enter_update(&mut self, query: &UpdateQuery) -> bool {
        false
    }
    fn leave_update(&mut self, query: &UpdateQuery, members: UpdateMembers<Self::Output>) -> Option<Self::Output> {
        None
    }

    fn enter_replace(&mut self, query: &ReplaceQuery) -> bool {
        false
    }
    fn leave_replace(&mut self, query: &ReplaceQuery, members: ReplaceMembers<Self::Output>) -> Option<Self::Output> {
        None
    }

    fn enter_delete(&mut self, query: &DeleteQuery) -> bool {
        false
    }
    fn leave_delete(&mut self, query: &DeleteQuery, members: DeleteMembers<Self::Output>) -> Option<Self::Output> {
        None
    }

    fn enter_create_collection(&mut self, query: &CreateCollectionQuery) -> bool {
        false
    }
    fn leave_create_collection(
        &mut self,
        query: &CreateCollectionQuery,
        members: CreateCollectionMembers<Self::Output>,
    ) -> Option<Self::Output> {
        None
    }

    fn enter_describe_collection(&mut self, query: &DescribeCollectionQuery) -> bool {
        false
    }
    fn leave_describe_collection(
        &mut self,
        query: &DescribeCollectionQuery,
        members: CollectionMembers<Self::Output>,
    ) -> Option<Self::Output> {
        None
    }

    fn enter_alter_collection(&mut self, query: &AlterCollectionQuery) -> bool {
        false
    }
    fn leave_alter_collection(
        &mut self,
        query: &AlterCollectionQuery,
        members: AlterCollectionMembers<Self::Output>,
    ) -> Option<Self::Output> {
        None
    }

    fn enter_collection_exists(&mut self, query: &CollectionExistsQuery) -> bool {
        false
    }
    fn leave_collection_exists(
        &mut self,
        query: &CollectionExistsQuery,
        members: CollectionMembers<Self::Output>,
    ) -> Option<Self::Output> {
        None
    }

    fn enter_drop_collection(&mut self, query: &DropCollectionQuery) -> bool {
        false
    }
    fn leave_drop_collection(
        &mut self,
        query: &DropCollectionQuery,
        members: CollectionMembers<Self::Output>,
    ) -> Option<Self::Output> {
        None
    }

    fn collection(&mut self, node: &Collection) -> Option<Self::Output> {
        None
    }

    fn column(&mut self, node: &Column) -> Option<Self::Output> {
        None
    }

    fn index(&mut self, node: &Index) -> Option<Self::Output> {
        None
    }

    fn field(&mut self, node: &Field) -> Option<Self::Output> {
        None
    }

    fn calc_field(&mut self, node: &CalcField, members: CalcFieldMembers<Self::Output>) -> Option<Self::Output> {
        None
    }

    fn calc_fields(&mut self, node: &CalcField, members: CalcFieldsMembers<Self::Output>) -> Option<Self::Output> {
        None
    }

    fn comparison(&mut self, node: &Comparison, members: ComparisonMembers<Self::Output>) -> Option<Self::Output> {
        None
    }

    fn comparisons(&mut self, node: &Comparison, members: ComparisonsMembers<Self::Output>) -> Option<Self::Output> {
        None
    }

    fn bitwise(&mut self, node: &Bitwise, members: BitwiseMembers<Self::Output>) -> Option<Self::Output> {
        None
    }
}

/// Walks `node` in post-order and returns the visitor's result for it.
pub fn visit<'a, V>(node: impl Into<Node<'a>>, visitor: &mut V) -> Option<V::Output>
where
    V: Visitor + ?Sized,
{
    match node.into() {
        Node::Select(query) => {
            if visitor.enter_select(query) {
                return None;
            }
            let members = SelectMembers {
                select: query.get_select().map(|fields| visit_all(fields, visitor)),
                from: query.get_from().and_then(|c| visit(c, visitor)),
                join: query.get_join().map(|join| visit_join(join, visitor)),
                filter: query.get_filter().and_then(|w| visit(w, visitor)),
                sort: query.get_sort().map(|sort| visit_all(sort, visitor)),
                offset: query.get_offset(),
                limit: query.get_limit(),
            };
            visitor.leave_select(query, members)
        }
        Node::Union(query) => {
            if visitor.enter_union(query) {
                return None;
            }
            let members = UnionMembers {
                selects: query.get_selects().map(|selects| visit_all(selects, visitor)),
                sort: query.get_sort().map(|sort| visit_all(sort, visitor)),
                offset: query.get_offset(),
                limit: query.get_limit(),
            };
            visitor.leave_union(query, members)
        }
        Node::Aggregate(query) => {
            if visitor.enter_aggregate(query) {
                return None;
            }
            let members = AggregateMembers {
                select: query.get_select().map(|select| {
                    select
                        .iter()
                        .map(|(alias, calc)| (alias.clone(), visit(calc, visitor)))
                        .collect()
                }),
                from: query.get_from().and_then(|c| visit(c, visitor)),
                join: query.get_join().map(|join| visit_join(join, visitor)),
                filter: query.get_filter().and_then(|w| visit(w, visitor)),
                group: query.get_group().map(|group| visit_all(group, visitor)),
                sort: query.get_sort().map(|sort| visit_all(sort, visitor)),
                offset: query.get_offset(),
                limit: query.get_limit(),
            };
            visitor.leave_aggregate(query, members)
        }
        Node::Insert(query) => {
            if visitor.enter_insert(query) {
                return None;
            }
            let members = InsertMembers {
                fields: query.get_fields().map(|data| visit_data(data, visitor)),
                collection: query.get_collection().and_then(|c| visit(c, visitor)),
            };
            visitor.leave_insert(query, members)
        }
        Node::Update(query) => {
            if visitor.enter_update(query) {
                return None;
            }
            let members = UpdateMembers {
                fields: query.get_fields().map(|data| visit_data(data, visitor)),
                collection: query.get_collection().and_then(|c| visit(c, visitor)),
                filter: query.get_filter().and_then(|w| visit(w, visitor)),
                limit: query.get_limit(),
            };
            visitor.leave_update(query, members)
        }
        Node::Replace(query) => {
            if visitor.enter_replace(query) {
                return None;
            }
            let members = UpdateMembers {
                fields: query.get_fields().map(|data| visit_data(data, visitor)),
                collection: query.get_collection().and_then(|c| visit(c, visitor)),
                filter: query.get_filter().and_then(|w| visit(w, visitor)),
                limit: query.get_limit(),
            };
            visitor.leave_replace(query, members)
        }
        Node::Delete(query) => {
            if visitor.enter_delete(query) {
                return None;
            }
            let members = DeleteMembers {
                collection: query.get_collection().and_then(|c| visit(c, visitor)),
                filter: query.get_filter().and_then(|w| visit(w, visitor)),
                limit: query.get_limit(),
            };
            visitor.leave_delete(query, members)
        }
        Node::CreateCollection(query) => {
            if visitor.enter_create_collection(query) {
                return None;
            }
            let members = CreateCollectionMembers {
                collection: query.get_collection().and_then(|c| visit(c, visitor)),
                columns: query.get_columns().map(|columns| visit_all(columns, visitor)),
                indexes: query.get_indexes().map(|indexes| visit_all(indexes, visitor)),
            };
            visitor.leave_create_collection(query, members)
        }
        Node::DescribeCollection(query) => {
            if visitor.enter_describe_collection(query) {
                return None;
            }
            let members = CollectionMembers {
                collection: query.get_collection().and_then(|c| visit(c, visitor)),
            };
            visitor.leave_describe_collection(query, members)
        }
        Node::AlterCollection(query) => {
            if visitor.enter_alter_collection(query) {
                return None;
            }
            let members = AlterCollectionMembers {
                collection: query.get_collection().and_then(|c| visit(c, visitor)),
                columns: query.get_columns().map(|columns| visit_all(columns, visitor)),
            };
            visitor.leave_alter_collection(query, members)
        }
        Node::CollectionExists(query) => {
            if visitor.enter_collection_exists(query) {
                return None;
            }
            let members = CollectionMembers {
                collection: query.get_collection().and_then(|c| visit(c, visitor)),
            };
            visitor.leave_collection_exists(query, members)
        }
        Node::DropCollection(query) => {
            if visitor.enter_drop_collection(query) {
                return None;
            }
            let members = CollectionMembers {
                collection: query.get_collection().and_then(|c| visit(c, visitor)),
            };
            visitor.leave_drop_collection(query, members)
        }
        Node::CalcField(calc) if calc.function().is_variadic() => {
            let members = CalcFieldsMembers {
                function: calc.function().to_string(),
                fields: visit_all(calc.fields(), visitor),
            };
            visitor.calc_fields(calc, members)
        }
        Node::CalcField(calc) => {
            let members = CalcFieldMembers {
                function: calc.function().to_string(),
                field: calc.field().and_then(|operand| visit(operand, visitor)),
            };
            visitor.calc_field(calc, members)
        }
        Node::Comparison(comparison) => match comparison.values() {
            Some(values) => {
                let members = ComparisonsMembers {
                    field: visit(comparison.field(), visitor),
                    operator: comparison.operator(),
                    values: visit_all(values, visitor),
                };
                visitor.comparisons(comparison, members)
            }
            None => {
                let members = ComparisonMembers {
                    field: visit(comparison.field(), visitor),
                    operator: comparison.operator(),
                    value: comparison.value().cloned().unwrap_or(Value::Null),
                };
                visitor.comparison(comparison, members)
            }
        },
        Node::Bitwise(bitwise) => {
            let members = BitwiseMembers {
                operator: bitwise.operator(),
                operands: visit_all(bitwise.operands(), visitor),
            };
            visitor.bitwise(bitwise, members)
        }
        Node::Collection(collection) => visitor.collection(collection),
        Node::Column(column) => visitor.column(column),
        Node::Index(index) => visitor.index(index),
        Node::Field(field) => visitor.field(field),
        Node::Value(Value::Field(field)) => visitor.field(field),
        Node::Value(value) => Some(Raw::Value(value.clone()).into()),
        Node::SortableField(field) => Some(Raw::SortableField(field.clone()).into()),
    }
}

fn visit_all<'a, T, V>(items: &'a [T], visitor: &mut V) -> Vec<Option<V::Output>>
where
    &'a T: Into<Node<'a>>,
    V: Visitor + ?Sized,
{
    items.iter().map(|item| visit(item, visitor)).collect()
}

fn visit_join<V>(join: &JoinMap, visitor: &mut V) -> IndexMap<String, JoinMembers<V::Output>>
where
    V: Visitor + ?Sized,
{
    join.iter()
        .map(|(alias, entry)| {
            let query = visit(&entry.query, visitor);
            let on = visit(&entry.on, visitor);
            (alias.clone(), JoinMembers { query, on })
        })
        .collect()
}

fn visit_data<V>(data: &IndexMap<String, Value>, visitor: &mut V) -> IndexMap<String, Option<V::Output>>
where
    V: Visitor + ?Sized,
{
    data.iter()
        .map(|(name, value)| (name.clone(), visit(value, visitor)))
        .collect()
}

macro_rules! node_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for Node<'a> {
                fn from(node: &'a $ty) -> Self {
                    Node::$variant(node)
                }
            }
        )*
    };
}

node_from! {
    SelectQuery => Select,
    UnionQuery => Union,
    AggregateQuery => Aggregate,
    InsertQuery => Insert,
    UpdateQuery => Update,
    ReplaceQuery => Replace,
    DeleteQuery => Delete,
    CreateCollectionQuery => CreateCollection,
    DescribeCollectionQuery => DescribeCollection,
    AlterCollectionQuery => AlterCollection,
    CollectionExistsQuery => CollectionExists,
    DropCollectionQuery => DropCollection,
    Collection => Collection,
    Column => Column,
    Index => Index,
    Field => Field,
    SortableField => SortableField,
    CalcField => CalcField,
    Comparison => Comparison,
    Bitwise => Bitwise,
    Value => Value,
}

impl<'a> From<&'a Query> for Node<'a> {
    fn from(query: &'a Query) -> Self {
        match query {
            Query::Select(q) => Node::Select(q),
            Query::Union(q) => Node::Union(q),
            Query::Aggregate(q) => Node::Aggregate(q),
            Query::Insert(q) => Node::Insert(q),
            Query::Update(q) => Node::Update(q),
            Query::Replace(q) => Node::Replace(q),
            Query::Delete(q) => Node::Delete(q),
            Query::CreateCollection(q) => Node::CreateCollection(q),
            Query::DescribeCollection(q) => Node::DescribeCollection(q),
            Query::AlterCollection(q) => Node::AlterCollection(q),
            Query::CollectionExists(q) => Node::CollectionExists(q),
            Query::DropCollection(q) => Node::DropCollection(q),
        }
    }
}

impl<'a> From<&'a Expression> for Node<'a> {
    fn from(expr: &'a Expression) -> Self {
        match expr {
            Expression::Comparison(comparison) => Node::Comparison(comparison),
            Expression::Bitwise(bitwise) => Node::Bitwise(bitwise),
        }
    }
}

impl<'a> From<&'a CalcOperand> for Node<'a> {
    fn from(operand: &'a CalcOperand) -> Self {
        match operand {
            CalcOperand::Field(field) => Node::Field(field),
            CalcOperand::Calc(calc) => Node::CalcField(calc),
        }
    }
}
