use std::{fmt, sync::Arc};

use indexmap::IndexMap;

use crate::{
    ast::{ColumnType, Direction, IndexType},
    value::Value,
};

/// A storage unit (table or collection), optionally inside a namespace.
///
/// # Example
/// ```text
/// Post
/// blog.Post
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Collection(Arc<CollectionData>);

#[derive(Debug, PartialEq, Eq, Hash)]
struct CollectionData {
    name: String,
    namespace: Option<String>,
}

impl Collection {
    pub fn new(name: impl Into<String>, namespace: Option<&str>) -> Self {
        Collection(Arc::new(CollectionData {
            name: name.into(),
            namespace: namespace.map(str::to_string),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.0.namespace.as_deref()
    }

    /// Returns `self` when both name and namespace already match.
    pub fn rename(&self, name: &str, namespace: Option<&str>) -> Self {
        if self.name() == name && self.namespace() == namespace {
            return self.clone();
        }
        Collection::new(name, namespace)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace() {
            Some(namespace) if !namespace.is_empty() => write!(f, "{}.{}", namespace, self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

/// A field reference, optionally qualified by the alias of its source.
///
/// # Example
/// ```text
/// title
/// author.name
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field(Arc<FieldData>);

#[derive(Debug, PartialEq, Eq, Hash)]
struct FieldData {
    name: String,
    table: Option<String>,
}

impl Field {
    pub fn new(name: impl Into<String>) -> Self {
        Field(Arc::new(FieldData {
            name: name.into(),
            table: None,
        }))
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Field(Arc::new(FieldData {
            name: name.into(),
            table: Some(table.into()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn table(&self) -> Option<&str> {
        self.0.table.as_deref()
    }

    /// Returns `self` when both name and table already match.
    pub fn rename(&self, name: &str, table: Option<&str>) -> Self {
        if self.name() == name && self.table() == table {
            return self.clone();
        }
        Field(Arc::new(FieldData {
            name: name.to_string(),
            table: table.map(str::to_string),
        }))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::new(name)
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        Field::new(name)
    }
}

impl From<&Field> for Field {
    fn from(field: &Field) -> Self {
        field.clone()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table() {
            Some(table) if !table.is_empty() => write!(f, "{}.{}", table, self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

/// A field name with an optional ordering direction.
///
/// # Example
/// ```text
/// date desc
/// title
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SortableField(Arc<SortableFieldData>);

#[derive(Debug, PartialEq, Eq, Hash)]
struct SortableFieldData {
    name: String,
    direction: Option<Direction>,
}

impl SortableField {
    pub fn new(name: impl Into<String>, direction: Option<Direction>) -> Self {
        SortableField(Arc::new(SortableFieldData {
            name: name.into(),
            direction,
        }))
    }

    pub fn asc(name: impl Into<String>) -> Self {
        SortableField::new(name, Some(Direction::Asc))
    }

    pub fn desc(name: impl Into<String>) -> Self {
        SortableField::new(name, Some(Direction::Desc))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn direction(&self) -> Option<Direction> {
        self.0.direction
    }

    pub fn rename(&self, name: &str) -> Self {
        if self.name() == name {
            return self.clone();
        }
        SortableField::new(name, self.direction())
    }

    pub fn sort(&self, direction: Option<Direction>) -> Self {
        if self.direction() == direction {
            return self.clone();
        }
        SortableField::new(self.name(), direction)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<&str> for SortableField {
    fn from(name: &str) -> Self {
        SortableField::new(name, None)
    }
}

impl fmt::Display for SortableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction() {
            Some(direction) => write!(f, "{} {}", self.name(), direction),
            None => f.write_str(self.name()),
        }
    }
}

/// Column descriptor used by `CREATE COLLECTION` and `ALTER COLLECTION`.
///
/// # Example
/// ```text
/// id INT32 AUTOINCREMENT
/// status TEXT DEFAULT(draft)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Column(Arc<ColumnData>);

#[derive(Debug, Clone, PartialEq)]
struct ColumnData {
    name: String,
    column_type: ColumnType,
    default_value: Option<Value>,
    auto_increment: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Column(Arc::new(ColumnData {
            name: name.into(),
            column_type,
            default_value: None,
            auto_increment: false,
        }))
    }

    pub fn get_name(&self) -> &str {
        &self.0.name
    }

    pub fn get_type(&self) -> ColumnType {
        self.0.column_type
    }

    pub fn get_default_value(&self) -> Option<&Value> {
        self.0.default_value.as_ref()
    }

    pub fn get_auto_increment(&self) -> bool {
        self.0.auto_increment
    }

    pub fn name(&self, name: &str) -> Self {
        if self.get_name() == name {
            return self.clone();
        }
        self.update(|c| c.name = name.to_string())
    }

    pub fn column_type(&self, column_type: ColumnType) -> Self {
        if self.get_type() == column_type {
            return self.clone();
        }
        self.update(|c| c.column_type = column_type)
    }

    pub fn default_value(&self, value: impl Into<Value>) -> Self {
        let value = value.into();
        if self.get_default_value() == Some(&value) {
            return self.clone();
        }
        self.update(|c| c.default_value = Some(value))
    }

    pub fn auto_increment(&self, auto_increment: bool) -> Self {
        if self.get_auto_increment() == auto_increment {
            return self.clone();
        }
        self.update(|c| c.auto_increment = auto_increment)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn update(&self, f: impl FnOnce(&mut ColumnData)) -> Self {
        let mut data = (*self.0).clone();
        f(&mut data);
        Column(Arc::new(data))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.get_name(), self.get_type())?;
        if let Some(value) = self.get_default_value() {
            write!(f, " DEFAULT({})", value.to_raw_string())?;
        }
        if self.get_auto_increment() {
            f.write_str(" AUTOINCREMENT")?;
        }
        Ok(())
    }
}

/// Index descriptor used by `CREATE COLLECTION`.
///
/// # Example
/// ```text
/// PRIMARY post_id (id)
/// INDEX post_date (date desc, title)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Index(Arc<IndexData>);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct IndexData {
    name: String,
    index_type: IndexType,
    columns: Option<Arc<[SortableField]>>,
}

impl Index {
    pub fn new(name: impl Into<String>, index_type: IndexType) -> Self {
        Index(Arc::new(IndexData {
            name: name.into(),
            index_type,
            columns: None,
        }))
    }

    pub fn get_name(&self) -> &str {
        &self.0.name
    }

    pub fn get_type(&self) -> IndexType {
        self.0.index_type
    }

    pub fn get_columns(&self) -> Option<&[SortableField]> {
        self.0.columns.as_deref()
    }

    pub fn name(&self, name: &str) -> Self {
        if self.get_name() == name {
            return self.clone();
        }
        self.update(|i| i.name = name.to_string())
    }

    pub fn index_type(&self, index_type: IndexType) -> Self {
        if self.get_type() == index_type {
            return self.clone();
        }
        self.update(|i| i.index_type = index_type)
    }

    /// Appends one column to the index.
    pub fn columns_by(&self, name: &str, direction: Option<Direction>) -> Self {
        let column = SortableField::new(name, direction);
        let columns = append(self.0.columns.as_deref(), column);
        self.update(|i| i.columns = Some(columns))
    }

    /// Replaces the whole column list.
    pub fn columns(&self, columns: impl IntoIterator<Item = SortableField>) -> Self {
        let columns: Arc<[SortableField]> = columns.into_iter().collect();
        if self.get_columns() == Some(&columns[..]) {
            return self.clone();
        }
        self.update(|i| i.columns = Some(columns))
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn update(&self, f: impl FnOnce(&mut IndexData)) -> Self {
        let mut data = (*self.0).clone();
        f(&mut data);
        Index(Arc::new(data))
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (", self.get_type(), self.get_name())?;
        if let Some(columns) = self.get_columns() {
            write!(f, "{}", join(columns, ", "))?;
        }
        f.write_str(")")
    }
}

/// Copies `items` into a new shared slice with `item` appended.
pub(crate) fn append<T: Clone>(items: Option<&[T]>, item: T) -> Arc<[T]> {
    items
        .unwrap_or_default()
        .iter()
        .cloned()
        .chain(std::iter::once(item))
        .collect()
}

/// Same entries in the same order; `IndexMap`'s own `==` ignores order.
pub(crate) fn same_entries<V: PartialEq>(current: Option<&IndexMap<String, V>>, next: &IndexMap<String, V>) -> bool {
    current.is_some_and(|current| current.iter().eq(next.iter()))
}

pub(crate) fn join<T: fmt::Display>(items: &[T], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}
