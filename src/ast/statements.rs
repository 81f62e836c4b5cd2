use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    ast::{Bitwise, Collection, Filter, Target, descriptors::same_entries},
    value::Value,
};

/// Field name to value, in insertion order.
pub type DataMap = IndexMap<String, Value>;

fn data_map<I, K, V>(data: I) -> Arc<DataMap>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Arc::new(data.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
}

/// `INSERT collection (fields) VALUES (values)`
///
/// ```
/// use querytree::{InsertQuery, Target};
///
/// let query = InsertQuery::new()
///     .collection("Post")
///     .fields([("title", "Hello"), ("author", "mgrenier")]);
///
/// assert_eq!(query.to_string(), r#"INSERT Post (title, author) VALUES ("Hello", "mgrenier")"#);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InsertQuery(Arc<InsertData>);

#[derive(Debug, Clone, Default)]
struct InsertData {
    fields: Option<Arc<DataMap>>,
    collection: Option<Collection>,
}

impl InsertQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_fields(&self) -> Option<&DataMap> {
        self.0.fields.as_deref()
    }

    pub fn fields<I, K, V>(&self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let fields = data_map(data);
        if same_entries(self.get_fields(), &*fields) {
            return self.clone();
        }
        self.update(|q| q.fields = Some(fields))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn update(&self, f: impl FnOnce(&mut InsertData)) -> Self {
        let mut data = (*self.0).clone();
        f(&mut data);
        InsertQuery(Arc::new(data))
    }
}

impl Target for InsertQuery {
    fn get_collection(&self) -> Option<&Collection> {
        self.0.collection.as_ref()
    }

    fn with_collection(&self, collection: Collection) -> Self {
        self.update(|q| q.collection = Some(collection))
    }
}

/// Shared shape of `UPDATE` and `REPLACE`: a bounded mutation, so there is
/// a limit but no sort or offset.
#[derive(Debug, Clone, Default)]
struct MutationData {
    fields: Option<Arc<DataMap>>,
    collection: Option<Collection>,
    filter: Option<Bitwise>,
    limit: Option<u64>,
}

/// `UPDATE collection (fields) VALUES (values) WHERE ... LIMIT n`
#[derive(Debug, Clone, Default)]
pub struct UpdateQuery(Arc<MutationData>);

impl UpdateQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_fields(&self) -> Option<&DataMap> {
        self.0.fields.as_deref()
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.0.limit
    }

    pub fn fields<I, K, V>(&self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let fields = data_map(data);
        if same_entries(self.get_fields(), &*fields) {
            return self.clone();
        }
        self.update(|q| q.fields = Some(fields))
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

    fn update(&self, f: impl FnOnce(&mut MutationData)) -> Self {
        let mut data = (*self.0).clone();
        f(&mut data);
        UpdateQuery(Arc::new(data))
    }
}

impl Target for UpdateQuery {
    fn get_collection(&self) -> Option<&Collection> {
        self.0.collection.as_ref()
    }

    fn with_collection(&self, collection: Collection) -> Self {
        self.update(|q| q.collection = Some(collection))
    }
}

impl Filter for UpdateQuery {
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

/// `REPLACE collection (fields) VALUES (values) WHERE ... LIMIT n`
#[derive(Debug, Clone, Default)]
pub struct ReplaceQuery(Arc<MutationData>);

impl ReplaceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_fields(&self) -> Option<&DataMap> {
        self.0.fields.as_deref()
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.0.limit
    }

    pub fn fields<I, K, V>(&self, data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let fields = data_map(data);
        if same_entries(self.get_fields(), &*fields) {
            return self.clone();
        }
        self.update(|q| q.fields = Some(fields))
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

    fn update(&self, f: impl FnOnce(&mut MutationData)) -> Self {
        let mut data = (*self.0).clone();
        f(&mut data);
        ReplaceQuery(Arc::new(data))
    }
}

impl Target for ReplaceQuery {
    fn get_collection(&self) -> Option<&Collection> {
        self.0.collection.as_ref()
    }

    fn with_collection(&self, collection: Collection) -> Self {
        self.update(|q| q.collection = Some(collection))
    }
}

impl Filter for ReplaceQuery {
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

/// `DELETE collection WHERE ... LIMIT n`
#[derive(Debug, Clone, Default)]
pub struct DeleteQuery(Arc<DeleteData>);

#[derive(Debug, Clone, Default)]
struct DeleteData {
    collection: Option<Collection>,
    filter: Option<Bitwise>,
    limit: Option<u64>,
}

impl DeleteQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_limit(&self) -> Option<u64> {
        self.0.limit
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

    fn update(&self, f: impl FnOnce(&mut DeleteData)) -> Self {
        let mut data = (*self.0).clone();
        f(&mut data);
        DeleteQuery(Arc::new(data))
    }
}

impl Target for DeleteQuery {
    fn get_collection(&self) -> Option<&Collection> {
        self.0.collection.as_ref()
    }

    fn with_collection(&self, collection: Collection) -> Self {
        self.update(|q| q.collection = Some(collection))
    }
}

impl Filter for DeleteQuery {
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
