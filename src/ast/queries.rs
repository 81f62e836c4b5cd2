use std::sync::Arc;

use indexmap::IndexMap;

use crate::ast::{
    Bitwise, CalcField, Collection, CollectionRef, Expression, Field, Filter, Join, Sort,
    SortableField, clauses::changed_collection, descriptors::same_entries,
};

/// Aliased sub-queries of a `SELECT` or `AGGREGATE`, in insertion order.
pub type JoinMap = IndexMap<String, Join>;

/// Aggregate projection: alias to calculation, in insertion order.
pub type AggregateMap = IndexMap<String, CalcField>;

/// `SELECT fields FROM collection JOIN ... WHERE ... SORT BY ... OFFSET n LIMIT n`
///
/// ```
/// use querytree::{Filter, SelectQuery, Sort};
///
/// let query = SelectQuery::new()
///     .select(["title", "date"])
///     .from("Post")
///     .eq("author", "mgrenier")
///     .sort_by("date", Some(querytree::Direction::Desc))
///     .limit(10);
///
/// assert_eq!(
///     query.to_string(),
///     r#"SELECT title, date FROM Post WHERE author = "mgrenier" SORT BY date desc LIMIT 10"#
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct SelectQuery(Arc<SelectData>);

#[derive(Debug, Clone, Default)]
struct SelectData {
    select: Option<Arc<[Field]>>,
    from: Option<Collection>,
    join: Option<Arc<JoinMap>>,
    filter: Option<Bitwise>,
    sort: Option<Arc<[SortableField]>>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl SelectQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_select(&self) -> Option<&[Field]> {
        self.0.select.as_deref()
    }

    pub fn get_from(&self) -> Option<&Collection> {
        self.0.from.as_ref()
    }

    pub fn get_join(&self) -> Option<&JoinMap> {
        self.0.join.as_deref()
    }

    pub fn get_offset(&self) -> Option<u64> {
        self.0.offset
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.0.limit
    }

    /// Replaces the projection. An empty list selects every field (`*`).
    pub fn select<I>(&self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let fields: Arc<[Field]> = fields.into_iter().map(Into::into).collect();
        let fields = if fields.is_empty() { None } else { Some(fields) };
        if self.get_select() == fields.as_deref() {
            return self.clone();
        }
        self.update(|q| q.select = fields)
    }

    pub fn from(&self, target: impl Into<CollectionRef>) -> Self {
        match changed_collection(self.get_from(), target.into()) {
            Some(collection) => self.update(|q| q.from = Some(collection)),
            None => self.clone(),
        }
    }

    /// Joins `query` under `alias`; a later join on the same alias wins.
    pub fn join(&self, alias: &str, query: SelectQuery, on: impl Into<Expression>) -> Self {
        let join = with_join(self.get_join(), alias, query, on.into());
        self.update(|q| q.join = Some(join))
    }

    pub fn offset(&self, offset: u64) -> Self {
        if self.get_offset() == Some(offset) {
            return self.clone();
        }
        self.update(|q| q.offset = Some(offset))
    }

    pub fn limit(&self, limit: u64) -> Self {
        if self.get_limit() == Some(limit) {
            return self.clone();
        }
        self.update(|q| q.limit = Some(limit))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn update(&self, f: impl FnOnce(&mut SelectData)) -> Self {
        let mut data = (*self.0).clone();
        f(&mut data);
        SelectQuery(Arc::new(data))
    }
}

impl Filter for SelectQuery {
    fn get_filter(&self) -> Option<&Bitwise> {
        self.0.filter.as_ref()
    }

    fn filter(&self, predicate: Bitwise) -> Self {
        if self.get_filter().is_some_and(|current| current.ptr_eq(&predicate)) {
            return self.clone();
        }
        self.update(|q| q.filter = Some(predicate))
    }
}

impl Sort for SelectQuery {
    fn get_sort(&self) -> Option<&[SortableField]> {
        self.0.sort.as_deref()
    }

    fn with_sort(&self, fields: Arc<[SortableField]>) -> Self {
        self.update(|q| q.sort = Some(fields))
    }
}

/// `(SELECT ...) UNION (SELECT ...) SORT BY ... OFFSET n LIMIT n`
///
/// Sorting and paging apply to the union as a whole, never per branch.
#[derive(Debug, Clone, Default)]
pub struct UnionQuery(Arc<UnionData>);

#[derive(Debug, Clone, Default)]
struct UnionData {
    selects: Option<Arc<[SelectQuery]>>,
    sort: Option<Arc<[SortableField]>>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl UnionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_selects(&self) -> Option<&[SelectQuery]> {
        self.0.selects.as_deref()
    }

    pub fn get_offset(&self) -> Option<u64> {
        self.0.offset
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.0.limit
    }

    /// Replaces the branches.
    pub fn select(&self, selects: impl IntoIterator<Item = SelectQuery>) -> Self {
        let selects: Arc<[SelectQuery]> = selects.into_iter().collect();
        let unchanged = self.get_selects().is_some_and(|current| {
            current.len() == selects.len() && current.iter().zip(selects.iter()).all(|(a, b)| a.ptr_eq(b))
        });
        if unchanged {
            return self.clone();
        }
        self.update(|q| q.selects = Some(selects))
    }

    pub fn offset(&self, offset: u64) -> Self {
        if self.get_offset() == Some(offset) {
            return self.clone();
        }
        self.update(|q| q.offset = Some(offset))
    }

    pub fn limit(&self, limit: u64) -> Self {
        if self.get_limit() == Some(limit) {
            return self.clone();
        }
        self.update(|q| q.limit = Some(limit))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn update(&self, f: impl FnOnce(&mut UnionData)) -> Self {
        let mut data = (*self.0).clone();
        f(&mut data);
        UnionQuery(Arc::new(data))
    }
}

impl Sort for UnionQuery {
    fn get_sort(&self) -> Option<&[SortableField]> {
        self.0.sort.as_deref()
    }

    fn with_sort(&self, fields: Arc<[SortableField]>) -> Self {
        self.update(|q| q.sort = Some(fields))
    }
}

/// `AGGREGATE calc AS alias FROM ... WHERE ... GROUP BY ... SORT BY ...`
#[derive(Debug, Clone, Default)]
pub struct AggregateQuery(Arc<AggregateData>);

#[derive(Debug, Clone, Default)]
struct AggregateData {
    select: Option<Arc<AggregateMap>>,
    from: Option<Collection>,
    join: Option<Arc<JoinMap>>,
    filter: Option<Bitwise>,
    group: Option<Arc<[Field]>>,
    sort: Option<Arc<[SortableField]>>,
    offset: Option<u64>,
    limit: Option<u64>,
}

impl AggregateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_select(&self) -> Option<&AggregateMap> {
        self.0.select.as_deref()
    }

    pub fn get_from(&self) -> Option<&Collection> {
        self.0.from.as_ref()
    }

    pub fn get_join(&self) -> Option<&JoinMap> {
        self.0.join.as_deref()
    }

    pub fn get_group(&self) -> Option<&[Field]> {
        self.0.group.as_deref()
    }

    pub fn get_offset(&self) -> Option<u64> {
        self.0.offset
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.0.limit
    }

    /// Replaces the projection with `alias → calculation` pairs.
    pub fn select<I, K>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, CalcField)>,
        K: Into<String>,
    {
        let fields: AggregateMap = fields.into_iter().map(|(k, v)| (k.into(), v)).collect();
        if same_entries(self.get_select(), &fields) {
            return self.clone();
        }
        self.update(|q| q.select = Some(Arc::new(fields)))
    }

    pub fn from(&self, target: impl Into<CollectionRef>) -> Self {
        match changed_collection(self.get_from(), target.into()) {
            Some(collection) => self.update(|q| q.from = Some(collection)),
            None => self.clone(),
        }
    }

    pub fn join(&self, alias: &str, query: SelectQuery, on: impl Into<Expression>) -> Self {
        let join = with_join(self.get_join(), alias, query, on.into());
        self.update(|q| q.join = Some(join))
    }

    /// Replaces the `GROUP BY` list.
    pub fn group<I>(&self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let fields: Arc<[Field]> = fields.into_iter().map(Into::into).collect();
        if self.get_group() == Some(&fields[..]) {
            return self.clone();
        }
        self.update(|q| q.group = Some(fields))
    }

    pub fn offset(&self, offset: u64) -> Self {
        if self.get_offset() == Some(offset) {
            return self.clone();
        }
        self.update(|q| q.offset = Some(offset))
    }

    pub fn limit(&self, limit: u64) -> Self {
        if self.get_limit() == Some(limit) {
            return self.clone();
        }
        self.update(|q| q.limit = Some(limit))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn update(&self, f: impl FnOnce(&mut AggregateData)) -> Self {
        let mut data = (*self.0).clone();
        f(&mut data);
        AggregateQuery(Arc::new(data))
    }
}

impl Filter for AggregateQuery {
    fn get_filter(&self) -> Option<&Bitwise> {
        self.0.filter.as_ref()
    }

    fn filter(&self, predicate: Bitwise) -> Self {
        if self.get_filter().is_some_and(|current| current.ptr_eq(&predicate)) {
            return self.clone();
        }
        self.update(|q| q.filter = Some(predicate))
    }
}

impl Sort for AggregateQuery {
    fn get_sort(&self) -> Option<&[SortableField]> {
        self.0.sort.as_deref()
    }

    fn with_sort(&self, fields: Arc<[SortableField]>) -> Self {
        self.update(|q| q.sort = Some(fields))
    }
}

fn with_join(current: Option<&JoinMap>, alias: &str, query: SelectQuery, on: Expression) -> Arc<JoinMap> {
    let mut join = current.cloned().unwrap_or_default();
    join.insert(alias.to_string(), Join { query, on });
    Arc::new(join)
}
