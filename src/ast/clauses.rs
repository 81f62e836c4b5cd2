//! Clause families shared by several query kinds.
//!
//! Each family is a trait with a couple of required accessors and provided
//! builder methods, so `eq`, `sort_by` or `collection` behave the same on
//! every query kind that carries the clause.

use std::sync::Arc;

use crate::{
    ast::{
        Bitwise, BitwiseOperator, Collection, Comparison, Direction, Expression, Field, SelectQuery,
        SortableField, descriptors::append,
    },
    value::Value,
};

/// Target of a `from` or `collection` clause.
///
/// A named target renames the collection already on the query (keeping it
/// when nothing changes); an existing [`Collection`] is used as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectionRef {
    Named {
        name: String,
        namespace: Option<String>,
    },
    Existing(Collection),
}

impl CollectionRef {
    /// Resolves against the collection currently set on a query.
    pub fn resolve(self, current: Option<&Collection>) -> Collection {
        match (self, current) {
            (CollectionRef::Existing(collection), _) => collection,
            (CollectionRef::Named { name, namespace }, Some(current)) => {
                current.rename(&name, namespace.as_deref())
            }
            (CollectionRef::Named { name, namespace }, None) => {
                Collection::new(name, namespace.as_deref())
            }
        }
    }
}

impl From<&str> for CollectionRef {
    fn from(name: &str) -> Self {
        CollectionRef::Named {
            name: name.to_string(),
            namespace: None,
        }
    }
}

impl From<String> for CollectionRef {
    fn from(name: String) -> Self {
        CollectionRef::Named {
            name,
            namespace: None,
        }
    }
}

/// `(name, namespace)`
impl From<(&str, &str)> for CollectionRef {
    fn from((name, namespace): (&str, &str)) -> Self {
        CollectionRef::Named {
            name: name.to_string(),
            namespace: Some(namespace.to_string()),
        }
    }
}

impl From<Collection> for CollectionRef {
    fn from(collection: Collection) -> Self {
        CollectionRef::Existing(collection)
    }
}

impl From<&Collection> for CollectionRef {
    fn from(collection: &Collection) -> Self {
        CollectionRef::Existing(collection.clone())
    }
}

/// Returns `None` when `next` is the collection already set.
pub(crate) fn changed_collection(current: Option<&Collection>, target: CollectionRef) -> Option<Collection> {
    let next = target.resolve(current);
    match current {
        Some(current) if current.ptr_eq(&next) => None,
        _ => Some(next),
    }
}

/// A sub-query joined under an alias.
#[derive(Debug, Clone)]
pub struct Join {
    pub query: SelectQuery,
    pub on: Expression,
}

/// Predicate clause (`WHERE`).
///
/// [`filter`](Filter::filter), [`and`](Filter::and), [`or`](Filter::or) and
/// [`xor`](Filter::xor) replace the whole predicate tree. The per-operator
/// helpers ([`eq`](Filter::eq), [`gt`](Filter::gt), ...) append one
/// comparison to the existing tree, starting an AND group when there is
/// none yet.
///
/// ```
/// use querytree::{Filter, SelectQuery};
///
/// let query = SelectQuery::new().from("Post").eq("id", "post1").eq("author", "mgrenier");
/// assert_eq!(query.get_filter().unwrap().to_string(), r#"(id = "post1" and author = "mgrenier")"#);
///
/// let replaced = query.or([querytree::Comparison::eq("id", "post2")]);
/// assert_eq!(replaced.get_filter().unwrap().to_string(), r#"id = "post2""#);
/// ```
pub trait Filter: Sized {
    fn get_filter(&self) -> Option<&Bitwise>;

    /// Replaces the predicate tree.
    fn filter(&self, predicate: Bitwise) -> Self;

    fn and<I>(&self, expressions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expression>,
    {
        self.filter(Bitwise::and(expressions))
    }

    fn or<I>(&self, expressions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expression>,
    {
        self.filter(Bitwise::or(expressions))
    }

    fn xor<I>(&self, expressions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expression>,
    {
        self.filter(Bitwise::xor(expressions))
    }

    /// Appends `comparison` to the predicate tree.
    fn push_comparison(&self, comparison: Comparison) -> Self {
        let predicate = match self.get_filter() {
            Some(predicate) => predicate.add(comparison),
            None => Bitwise::empty(BitwiseOperator::And).add(comparison),
        };
        self.filter(predicate)
    }

    fn eq(&self, field: impl Into<Field>, value: impl Into<Value>) -> Self {
        self.push_comparison(Comparison::eq(field, value))
    }

    fn ne(&self, field: impl Into<Field>, value: impl Into<Value>) -> Self {
        self.push_comparison(Comparison::ne(field, value))
    }

    fn gt(&self, field: impl Into<Field>, value: impl Into<Value>) -> Self {
        self.push_comparison(Comparison::gt(field, value))
    }

    fn gte(&self, field: impl Into<Field>, value: impl Into<Value>) -> Self {
        self.push_comparison(Comparison::gte(field, value))
    }

    fn lt(&self, field: impl Into<Field>, value: impl Into<Value>) -> Self {
        self.push_comparison(Comparison::lt(field, value))
    }

    fn lte(&self, field: impl Into<Field>, value: impl Into<Value>) -> Self {
        self.push_comparison(Comparison::lte(field, value))
    }

    fn is_in<I>(&self, field: impl Into<Field>, values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.push_comparison(Comparison::is_in(field, values))
    }

    fn begins_with(&self, field: impl Into<Field>, prefix: &str) -> Self {
        self.push_comparison(Comparison::begins_with(field, prefix))
    }
}

/// Ordering clause (`SORT BY`).
pub trait Sort: Sized + Clone {
    fn get_sort(&self) -> Option<&[SortableField]>;

    /// Replaces the sort list.
    fn with_sort(&self, fields: Arc<[SortableField]>) -> Self;

    /// Appends one field to the sort list.
    fn sort_by(&self, name: &str, direction: Option<Direction>) -> Self {
        let fields = append(self.get_sort(), SortableField::new(name, direction));
        self.with_sort(fields)
    }

    /// Replaces the sort list.
    fn sort<I>(&self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<SortableField>,
    {
        let fields: Arc<[SortableField]> = fields.into_iter().map(Into::into).collect();
        if self.get_sort() == Some(&fields[..]) {
            return self.clone();
        }
        self.with_sort(fields)
    }
}

/// Collection clause of the statements that do not read with `FROM`.
pub trait Target: Sized + Clone {
    fn get_collection(&self) -> Option<&Collection>;

    fn with_collection(&self, collection: Collection) -> Self;

    /// Sets the collection; returns `self` when it would not change.
    fn collection(&self, target: impl Into<CollectionRef>) -> Self {
        match changed_collection(self.get_collection(), target.into()) {
            Some(collection) => self.with_collection(collection),
            None => self.clone(),
        }
    }
}
