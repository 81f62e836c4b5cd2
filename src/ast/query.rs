use crate::ast::{
    AggregateQuery, AlterCollectionQuery, CollectionExistsQuery, CreateCollectionQuery,
    DeleteQuery, DescribeCollectionQuery, DropCollectionQuery, InsertQuery, ReplaceQuery,
    SelectQuery, UnionQuery, UpdateQuery,
};

/// Any statement the IR can represent.
///
/// Backends that accept "a query" take this type; every statement kind
/// converts into it with `From`.
#[derive(Debug, Clone)]
pub enum Query {
    Select(SelectQuery),
    Union(UnionQuery),
    Aggregate(AggregateQuery),
    Insert(InsertQuery),
    Update(UpdateQuery),
    Replace(ReplaceQuery),
    Delete(DeleteQuery),
    CreateCollection(CreateCollectionQuery),
    DescribeCollection(DescribeCollectionQuery),
    AlterCollection(AlterCollectionQuery),
    CollectionExists(CollectionExistsQuery),
    DropCollection(DropCollectionQuery),
}

impl Query {
    /// Name of the statement kind (`"SelectQuery"`, `"DropCollectionQuery"`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Query::Select(_) => "SelectQuery",
            Query::Union(_) => "UnionQuery",
            Query::Aggregate(_) => "AggregateQuery",
            Query::Insert(_) => "InsertQuery",
            Query::Update(_) => "UpdateQuery",
            Query::Replace(_) => "ReplaceQuery",
            Query::Delete(_) => "DeleteQuery",
            Query::CreateCollection(_) => "CreateCollectionQuery",
            Query::DescribeCollection(_) => "DescribeCollectionQuery",
            Query::AlterCollection(_) => "AlterCollectionQuery",
            Query::CollectionExists(_) => "CollectionExistsQuery",
            Query::DropCollection(_) => "DropCollectionQuery",
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Query::Select(a), Query::Select(b)) => a.ptr_eq(b),
            (Query::Union(a), Query::Union(b)) => a.ptr_eq(b),
            (Query::Aggregate(a), Query::Aggregate(b)) => a.ptr_eq(b),
            (Query::Insert(a), Query::Insert(b)) => a.ptr_eq(b),
            (Query::Update(a), Query::Update(b)) => a.ptr_eq(b),
            (Query::Replace(a), Query::Replace(b)) => a.ptr_eq(b),
            (Query::Delete(a), Query::Delete(b)) => a.ptr_eq(b),
            (Query::CreateCollection(a), Query::CreateCollection(b)) => a.ptr_eq(b),
            (Query::DescribeCollection(a), Query::DescribeCollection(b)) => a.ptr_eq(b),
            (Query::AlterCollection(a), Query::AlterCollection(b)) => a.ptr_eq(b),
            (Query::CollectionExists(a), Query::CollectionExists(b)) => a.ptr_eq(b),
            (Query::DropCollection(a), Query::DropCollection(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<SelectQuery> for Query {
    fn from(query: SelectQuery) -> Self {
        Query::Select(query)
    }
}

impl From<UnionQuery> for Query {
    fn from(query: UnionQuery) -> Self {
        Query::Union(query)
    }
}

impl From<AggregateQuery> for Query {
    fn from(query: AggregateQuery) -> Self {
        Query::Aggregate(query)
    }
}

impl From<InsertQuery> for Query {
    fn from(query: InsertQuery) -> Self {
        Query::Insert(query)
    }
}

impl From<UpdateQuery> for Query {
    fn from(query: UpdateQuery) -> Self {
        Query::Update(query)
    }
}

impl From<ReplaceQuery> for Query {
    fn from(query: ReplaceQuery) -> Self {
        Query::Replace(query)
    }
}

impl From<DeleteQuery> for Query {
    fn from(query: DeleteQuery) -> Self {
        Query::Delete(query)
    }
}

impl From<CreateCollectionQuery> for Query {
    fn from(query: CreateCollectionQuery) -> Self {
        Query::CreateCollection(query)
    }
}

impl From<DescribeCollectionQuery> for Query {
    fn from(query: DescribeCollectionQuery) -> Self {
        Query::DescribeCollection(query)
    }
}

impl From<AlterCollectionQuery> for Query {
    fn from(query: AlterCollectionQuery) -> Self {
        Query::AlterCollection(query)
    }
}

impl From<CollectionExistsQuery> for Query {
    fn from(query: CollectionExistsQuery) -> Self {
        Query::CollectionExists(query)
    }
}

impl From<DropCollectionQuery> for Query {
    fn from(query: DropCollectionQuery) -> Self {
        Query::DropCollection(query)
    }
}
