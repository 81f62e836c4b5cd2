use std::sync::Arc;

use crate::ast::{Collection, Column, Index, Target};

/// `CREATE COLLECTION name (columns) INDEXES (indexes)`
///
/// ```
/// use querytree::{Column, ColumnType, CreateCollectionQuery, Index, IndexType, Target};
///
/// let query = CreateCollectionQuery::new()
///     .collection("Post")
///     .columns([
///         Column::new("id", ColumnType::Int32).auto_increment(true),
///         Column::new("title", ColumnType::Text),
///     ])
///     .indexes([Index::new("post_id", IndexType::Primary).columns_by("id", None)]);
///
/// assert_eq!(
///     query.to_string(),
///     "CREATE COLLECTION Post ( id INT32 AUTOINCREMENT, title TEXT ) INDEXES ( PRIMARY post_id (id) )"
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreateCollectionQuery(Arc<CreateCollectionData>);

#[derive(Debug, Clone, Default)]
struct CreateCollectionData {
    collection: Option<Collection>,
    columns: Option<Arc<[Column]>>,
    indexes: Option<Arc<[Index]>>,
}

impl CreateCollectionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_columns(&self) -> Option<&[Column]> {
        self.0.columns.as_deref()
    }

    pub fn get_indexes(&self) -> Option<&[Index]> {
        self.0.indexes.as_deref()
    }

    /// Replaces the column list.
    pub fn columns(&self, columns: impl IntoIterator<Item = Column>) -> Self {
        let columns: Arc<[Column]> = columns.into_iter().collect();
        if self.get_columns() == Some(&columns[..]) {
            return self.clone();
        }
        self.update(|q| q.columns = Some(columns))
    }

    /// Replaces the index list.
    pub fn indexes(&self, indexes: impl IntoIterator<Item = Index>) -> Self {
        let indexes: Arc<[Index]> = indexes.into_iter().collect();
        if self.get_indexes() == Some(&indexes[..]) {
            return self.clone();
        }
        self.update(|q| q.indexes = Some(indexes))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn update(&self, f: impl FnOnce(&mut CreateCollectionData)) -> Self {
        let mut data = (*self.0).clone();
        f(&mut data);
        CreateCollectionQuery(Arc::new(data))
    }
}

impl Target for CreateCollectionQuery {
    fn get_collection(&self) -> Option<&Collection> {
        self.0.collection.as_ref()
    }

    fn with_collection(&self, collection: Collection) -> Self {
        self.update(|q| q.collection = Some(collection))
    }
}

/// `ALTER COLLECTION name (columns)`
#[derive(Debug, Clone, Default)]
pub struct AlterCollectionQuery(Arc<AlterCollectionData>);

#[derive(Debug, Clone, Default)]
struct AlterCollectionData {
    collection: Option<Collection>,
    columns: Option<Arc<[Column]>>,
}

impl AlterCollectionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_columns(&self) -> Option<&[Column]> {
        self.0.columns.as_deref()
    }

    pub fn columns(&self, columns: impl IntoIterator<Item = Column>) -> Self {
        let columns: Arc<[Column]> = columns.into_iter().collect();
        if self.get_columns() == Some(&columns[..]) {
            return self.clone();
        }
        self.update(|q| q.columns = Some(columns))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn update(&self, f: impl FnOnce(&mut AlterCollectionData)) -> Self {
        let mut data = (*self.0).clone();
        f(&mut data);
        AlterCollectionQuery(Arc::new(data))
    }
}

impl Target for AlterCollectionQuery {
    fn get_collection(&self) -> Option<&Collection> {
        self.0.collection.as_ref()
    }

    fn with_collection(&self, collection: Collection) -> Self {
        self.update(|q| q.collection = Some(collection))
    }
}

/// Statements that only name a collection: `DESCRIBE COLLECTION`,
/// `COLLECTION EXISTS` and `DROP COLLECTION`.
macro_rules! collection_statement {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default)]
        pub struct $name(Arc<Option<Collection>>);

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn ptr_eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0)
            }
        }

        impl Target for $name {
            fn get_collection(&self) -> Option<&Collection> {
                Option::as_ref(&self.0)
            }

            fn with_collection(&self, collection: Collection) -> Self {
                $name(Arc::new(Some(collection)))
            }
        }
    };
}

collection_statement!(
    /// `DESCRIBE COLLECTION name`
    DescribeCollectionQuery
);

collection_statement!(
    /// `COLLECTION EXISTS name`
    CollectionExistsQuery
);

collection_statement!(
    /// `DROP COLLECTION name`
    DropCollectionQuery
);
