//! JSON to IR decoding.
//!
//! Lets a query cross a process boundary (a request body, a fixture file,
//! the CLI) and come back as the same immutable IR the builders produce.
//! Every malformed node is reported as [`QueryError::QuerySyntax`] with a
//! JSON path pointing at it, such as `$.where.operands[1].op`.
//!
//! # Shape
//!
//! ```json
//! {
//!   "type": "select",
//!   "select": ["title", "date"],
//!   "from": "Post",
//!   "where": { "op": "and", "operands": [
//!     { "field": "author", "op": "=", "value": "mgrenier" },
//!     { "field": "group", "op": "in", "values": ["Admin", "Editor"] }
//!   ]},
//!   "sort": ["date desc"],
//!   "limit": 10
//! }
//! ```
//!
//! Literal values are JSON scalars. `{"$field": "name"}` refers to another
//! field and `{"$date": "2024-01-31T12:00:00Z"}` is an RFC 3339 date.
//! Integers decode to [`Value::Integer`]; other numbers to
//! [`Value::Decimal`] when their text is exact, [`Value::Float`] otherwise.
//!
//! ```
//! use querytree::decode::decode_query;
//!
//! let json = serde_json::json!({ "type": "delete", "collection": "Post", "limit": 1 });
//! let query = decode_query(&json).unwrap();
//! assert_eq!(query.to_string(), "DELETE Post LIMIT 1");
//! ```

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::{Map, Value as Json};

use crate::{
    ast::{
        AggregateQuery, AlterCollectionQuery, Bitwise, BitwiseOperator, CalcField, CalcFunction,
        CalcOperand, Collection, CollectionExistsQuery, Column, ColumnType, Comparison,
        ComparisonOperator, CreateCollectionQuery, DeleteQuery, DescribeCollectionQuery,
        Direction, DropCollectionQuery, Expression, Field, Filter, Index, IndexType, InsertQuery,
        Query, ReplaceQuery, SelectQuery, Sort, SortableField, Target, UnionQuery, UpdateQuery,
    },
    error::QueryError,
    value::Value,
};

static FIELD_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([A-Za-z_]\w*)\.)?([A-Za-z_]\w*)$").expect("field path pattern is valid")
});

static SORT_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_]\w*)(?:\s+((?i:asc|desc)))?$").expect("sort pattern is valid")
});

type Object = Map<String, Json>;
type Result<T> = std::result::Result<T, QueryError>;

/// Decodes any query kind from its JSON form.
pub fn decode_query(json: &Json) -> Result<Query> {
    query(json, "$")
}

/// Decodes a standalone predicate: a comparison or a bitwise group.
///
/// ```
/// use querytree::decode::decode_expression;
///
/// let json = serde_json::json!({ "field": "group", "op": "in", "values": ["Admin", "Editor"] });
/// let expr = decode_expression(&json).unwrap();
/// assert_eq!(expr.to_string(), r#"group in ("Admin", "Editor")"#);
/// ```
pub fn decode_expression(json: &Json) -> Result<Expression> {
    expression(json, "$")
}

fn query(json: &Json, path: &str) -> Result<Query> {
    let obj = object(json, path)?;
    let kind = string(required(obj, "type", path)?, &child(path, "type"))?;
    match kind {
        "select" => select(obj, path).map(Query::Select),
        "union" => union(obj, path).map(Query::Union),
        "aggregate" => aggregate(obj, path).map(Query::Aggregate),
        "insert" => insert(obj, path).map(Query::Insert),
        "update" => update(obj, path).map(Query::Update),
        "replace" => replace(obj, path).map(Query::Replace),
        "delete" => delete(obj, path).map(Query::Delete),
        "createCollection" => create_collection(obj, path).map(Query::CreateCollection),
        "alterCollection" => alter_collection(obj, path).map(Query::AlterCollection),
        "describeCollection" => {
            allow(obj, path, &["type", "collection"])?;
            target(DescribeCollectionQuery::new(), obj, path).map(Query::DescribeCollection)
        }
        "collectionExists" => {
            allow(obj, path, &["type", "collection"])?;
            target(CollectionExistsQuery::new(), obj, path).map(Query::CollectionExists)
        }
        "dropCollection" => {
            allow(obj, path, &["type", "collection"])?;
            target(DropCollectionQuery::new(), obj, path).map(Query::DropCollection)
        }
        other => Err(QueryError::syntax(
            &child(path, "type"),
            format!("unknown query type \"{}\"", other),
        )),
    }
}

/// A select either at the top level or nested in a join or union, where
/// `type` may be omitted.
fn nested_select(json: &Json, path: &str) -> Result<SelectQuery> {
    let obj = object(json, path)?;
    if let Some(kind) = obj.get("type") {
        let kind_path = child(path, "type");
        if string(kind, &kind_path)? != "select" {
            return Err(QueryError::syntax(&kind_path, "expected a select query"));
        }
    }
    select(obj, path)
}

fn select(obj: &Object, path: &str) -> Result<SelectQuery> {
    allow(obj, path, &["type", "select", "from", "join", "where", "sort", "offset", "limit"])?;

    let mut query = SelectQuery::new();
    if let Some(json) = obj.get("select") {
        query = query.select(list(json, &child(path, "select"), field)?);
    }
    if let Some(json) = obj.get("from") {
        query = query.from(collection(json, &child(path, "from"))?);
    }
    if let Some(json) = obj.get("join") {
        for (alias, sub, on) in joins(json, &child(path, "join"))? {
            query = query.join(&alias, sub, on);
        }
    }
    if let Some(json) = obj.get("where") {
        query = query.filter(predicate(json, &child(path, "where"))?);
    }
    if let Some(json) = obj.get("sort") {
        query = query.sort(list(json, &child(path, "sort"), sort_field)?);
    }
    if let Some(json) = obj.get("offset") {
        query = query.offset(count(json, &child(path, "offset"))?);
    }
    if let Some(json) = obj.get("limit") {
        query = query.limit(count(json, &child(path, "limit"))?);
    }
    Ok(query)
}

fn union(obj: &Object, path: &str) -> Result<UnionQuery> {
    allow(obj, path, &["type", "selects", "sort", "offset", "limit"])?;

    let mut query = UnionQuery::new();
    if let Some(json) = obj.get("selects") {
        query = query.select(list(json, &child(path, "selects"), nested_select)?);
    }
    if let Some(json) = obj.get("sort") {
        query = query.sort(list(json, &child(path, "sort"), sort_field)?);
    }
    if let Some(json) = obj.get("offset") {
        query = query.offset(count(json, &child(path, "offset"))?);
    }
    if let Some(json) = obj.get("limit") {
        query = query.limit(count(json, &child(path, "limit"))?);
    }
    Ok(query)
}

fn aggregate(obj: &Object, path: &str) -> Result<AggregateQuery> {
    allow(
        obj,
        path,
        &["type", "select", "from", "join", "where", "group", "sort", "offset", "limit"],
    )?;

    let mut query = AggregateQuery::new();
    if let Some(json) = obj.get("select") {
        let select_path = child(path, "select");
        let mut fields = Vec::new();
        for (alias, calc) in object(json, &select_path)? {
            fields.push((alias.clone(), calc_field(calc, &child(&select_path, alias))?));
        }
        query = query.select(fields);
    }
    if let Some(json) = obj.get("from") {
        query = query.from(collection(json, &child(path, "from"))?);
    }
    if let Some(json) = obj.get("join") {
        for (alias, sub, on) in joins(json, &child(path, "join"))? {
            query = query.join(&alias, sub, on);
        }
    }
    if let Some(json) = obj.get("where") {
        query = query.filter(predicate(json, &child(path, "where"))?);
    }
    if let Some(json) = obj.get("group") {
        query = query.group(list(json, &child(path, "group"), field)?);
    }
    if let Some(json) = obj.get("sort") {
        query = query.sort(list(json, &child(path, "sort"), sort_field)?);
    }
    if let Some(json) = obj.get("offset") {
        query = query.offset(count(json, &child(path, "offset"))?);
    }
    if let Some(json) = obj.get("limit") {
        query = query.limit(count(json, &child(path, "limit"))?);
    }
    Ok(query)
}

fn insert(obj: &Object, path: &str) -> Result<InsertQuery> {
    allow(obj, path, &["type", "collection", "fields"])?;

    let mut query = target(InsertQuery::new(), obj, path)?;
    if let Some(json) = obj.get("fields") {
        query = query.fields(data(json, &child(path, "fields"))?);
    }
    Ok(query)
}

fn update(obj: &Object, path: &str) -> Result<UpdateQuery> {
    allow(obj, path, &["type", "collection", "fields", "where", "limit"])?;

    let mut query = target(UpdateQuery::new(), obj, path)?;
    if let Some(json) = obj.get("fields") {
        query = query.fields(data(json, &child(path, "fields"))?);
    }
    if let Some(json) = obj.get("where") {
        query = query.filter(predicate(json, &child(path, "where"))?);
    }
    if let Some(json) = obj.get("limit") {
        query = query.limit(count(json, &child(path, "limit"))?);
    }
    Ok(query)
}

fn replace(obj: &Object, path: &str) -> Result<ReplaceQuery> {
    allow(obj, path, &["type", "collection", "fields", "where", "limit"])?;

    let mut query = target(ReplaceQuery::new(), obj, path)?;
    if let Some(json) = obj.get("fields") {
        query = query.fields(data(json, &child(path, "fields"))?);
    }
    if let Some(json) = obj.get("where") {
        query = query.filter(predicate(json, &child(path, "where"))?);
    }
    if let Some(json) = obj.get("limit") {
        query = query.limit(count(json, &child(path, "limit"))?);
    }
    Ok(query)
}

fn delete(obj: &Object, path: &str) -> Result<DeleteQuery> {
    allow(obj, path, &["type", "collection", "where", "limit"])?;

    let mut query = target(DeleteQuery::new(), obj, path)?;
    if let Some(json) = obj.get("where") {
        query = query.filter(predicate(json, &child(path, "where"))?);
    }
    if let Some(json) = obj.get("limit") {
        query = query.limit(count(json, &child(path, "limit"))?);
    }
    Ok(query)
}

fn create_collection(obj: &Object, path: &str) -> Result<CreateCollectionQuery> {
    allow(obj, path, &["type", "collection", "columns", "indexes"])?;

    let mut query = target(CreateCollectionQuery::new(), obj, path)?;
    if let Some(json) = obj.get("columns") {
        query = query.columns(list(json, &child(path, "columns"), column)?);
    }
    if let Some(json) = obj.get("indexes") {
        query = query.indexes(list(json, &child(path, "indexes"), index)?);
    }
    Ok(query)
}

fn alter_collection(obj: &Object, path: &str) -> Result<AlterCollectionQuery> {
    allow(obj, path, &["type", "collection", "columns"])?;

    let mut query = target(AlterCollectionQuery::new(), obj, path)?;
    if let Some(json) = obj.get("columns") {
        query = query.columns(list(json, &child(path, "columns"), column)?);
    }
    Ok(query)
}

fn target<T: Target>(query: T, obj: &Object, path: &str) -> Result<T> {
    match obj.get("collection") {
        Some(json) => Ok(query.collection(collection(json, &child(path, "collection"))?)),
        None => Ok(query),
    }
}

fn joins(json: &Json, path: &str) -> Result<Vec<(String, SelectQuery, Expression)>> {
    let mut joins = Vec::new();
    for (alias, entry) in object(json, path)? {
        let entry_path = child(path, alias);
        let obj = object(entry, &entry_path)?;
        allow(obj, &entry_path, &["query", "on"])?;
        let query_path = child(&entry_path, "query");
        let sub = nested_select(required(obj, "query", &entry_path)?, &query_path)?;
        let on = expression(required(obj, "on", &entry_path)?, &child(&entry_path, "on"))?;
        joins.push((alias.clone(), sub, on));
    }
    Ok(joins)
}

/// A `where` clause; a lone comparison becomes a one-operand AND group.
fn predicate(json: &Json, path: &str) -> Result<Bitwise> {
    match expression(json, path)? {
        Expression::Bitwise(bitwise) => Ok(bitwise),
        Expression::Comparison(comparison) => Ok(Bitwise::and([comparison])),
    }
}

fn expression(json: &Json, path: &str) -> Result<Expression> {
    let obj = object(json, path)?;
    let op_path = child(path, "op");
    let op = string(required(obj, "op", path)?, &op_path)?;

    if let Some(operator) = BitwiseOperator::parse(op) {
        allow(obj, path, &["op", "operands"])?;
        let operands_path = child(path, "operands");
        let operands = list(required(obj, "operands", path)?, &operands_path, expression)?;
        return Ok(Bitwise::new(operator, operands).into());
    }

    let Some(operator) = ComparisonOperator::parse(op) else {
        return Err(QueryError::syntax(&op_path, format!("unknown operator \"{}\"", op)));
    };
    let field = field(required(obj, "field", path)?, &child(path, "field"))?;

    if operator == ComparisonOperator::In {
        allow(obj, path, &["field", "op", "values"])?;
        let values = list(required(obj, "values", path)?, &child(path, "values"), value)?;
        return Ok(Comparison::is_in(field, values).into());
    }

    allow(obj, path, &["field", "op", "value"])?;
    let value_path = child(path, "value");
    let value = value(required(obj, "value", path)?, &value_path)?;
    if operator == ComparisonOperator::BeginsWith && value.as_str().is_none() {
        return Err(QueryError::syntax(&value_path, "beginsWith expects a string"));
    }
    Ok(Comparison::new(field, operator, value).into())
}

fn value(json: &Json, path: &str) -> Result<Value> {
    match json {
        Json::Null => Ok(Value::Null),
        Json::Bool(b) => Ok(Value::Boolean(*b)),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Value::Integer(i));
            }
            if let Ok(d) = Decimal::from_str_exact(&n.to_string()) {
                return Ok(Value::Decimal(d));
            }
            n.as_f64()
                .map(Value::Float)
                .ok_or_else(|| QueryError::syntax(path, format!("unsupported number {}", n)))
        }
        Json::String(s) => Ok(Value::String(s.clone())),
        Json::Object(obj) => {
            if let Some(name) = obj.get("$field") {
                allow(obj, path, &["$field"])?;
                return field(name, &child(path, "$field")).map(Value::Field);
            }
            if let Some(date) = obj.get("$date") {
                allow(obj, path, &["$date"])?;
                let date_path = child(path, "$date");
                let text = string(date, &date_path)?;
                return DateTime::parse_from_rfc3339(text)
                    .map(|d| Value::Date(d.with_timezone(&Utc)))
                    .map_err(|e| QueryError::syntax(&date_path, format!("invalid date: {}", e)));
            }
            Err(QueryError::syntax(path, "expected a literal, {\"$field\"} or {\"$date\"}"))
        }
        Json::Array(_) => Err(QueryError::syntax(path, "expected a literal, found an array")),
    }
}

fn field(json: &Json, path: &str) -> Result<Field> {
    let text = string(json, path)?;
    let caps = FIELD_PATH
        .captures(text)
        .ok_or_else(|| QueryError::syntax(path, format!("invalid field \"{}\"", text)))?;
    let name = &caps[2];
    Ok(match caps.get(1) {
        Some(table) => Field::qualified(table.as_str(), name),
        None => Field::new(name),
    })
}

fn sort_field(json: &Json, path: &str) -> Result<SortableField> {
    if let Json::Object(obj) = json {
        allow(obj, path, &["name", "direction"])?;
        let name_path = child(path, "name");
        let name = string(required(obj, "name", path)?, &name_path)?;
        if !SORT_FIELD.captures(name).is_some_and(|caps| caps.get(2).is_none()) {
            return Err(QueryError::syntax(&name_path, format!("invalid sort field \"{}\"", name)));
        }
        let direction = match obj.get("direction") {
            Some(json) => Some(direction(json, &child(path, "direction"))?),
            None => None,
        };
        return Ok(SortableField::new(name, direction));
    }

    let text = string(json, path)?;
    let caps = SORT_FIELD
        .captures(text.trim())
        .ok_or_else(|| QueryError::syntax(path, format!("invalid sort \"{}\"", text)))?;
    let direction = caps
        .get(2)
        .and_then(|d| Direction::parse(&d.as_str().to_ascii_lowercase()));
    Ok(SortableField::new(&caps[1], direction))
}

fn direction(json: &Json, path: &str) -> Result<Direction> {
    let text = string(json, path)?;
    Direction::parse(&text.to_ascii_lowercase())
        .ok_or_else(|| QueryError::syntax(path, format!("invalid direction \"{}\"", text)))
}

fn collection(json: &Json, path: &str) -> Result<Collection> {
    match json {
        Json::String(name) => Ok(Collection::new(name.as_str(), None)),
        Json::Object(obj) => {
            allow(obj, path, &["name", "namespace"])?;
            let name = string(required(obj, "name", path)?, &child(path, "name"))?;
            let namespace = match obj.get("namespace") {
                Some(json) => Some(string(json, &child(path, "namespace"))?),
                None => None,
            };
            Ok(Collection::new(name, namespace))
        }
        _ => Err(QueryError::syntax(path, "expected a collection name or object")),
    }
}

fn calc_field(json: &Json, path: &str) -> Result<CalcField> {
    let obj = object(json, path)?;
    let fn_path = child(path, "fn");
    let name = string(required(obj, "fn", path)?, &fn_path)?;
    let function = CalcFunction::parse(&name.to_ascii_lowercase())
        .ok_or_else(|| QueryError::syntax(&fn_path, format!("unknown function \"{}\"", name)))?;

    if function.is_variadic() {
        allow(obj, path, &["fn", "fields"])?;
        let operands = list(required(obj, "fields", path)?, &child(path, "fields"), calc_operand)?;
        return Ok(match function {
            CalcFunction::Max => CalcField::max(operands),
            CalcFunction::Min => CalcField::min(operands),
            _ => CalcField::concat(operands),
        });
    }

    allow(obj, path, &["fn", "field"])?;
    let operand_path = child(path, "field");
    let operand = calc_operand(required(obj, "field", path)?, &operand_path)?;
    match (function, operand) {
        (CalcFunction::Count, CalcOperand::Field(field)) => Ok(CalcField::count(field)),
        (CalcFunction::Count, CalcOperand::Calc(_)) => {
            Err(QueryError::syntax(&operand_path, "count expects a field"))
        }
        (CalcFunction::Average, operand) => Ok(CalcField::avg(operand)),
        (CalcFunction::Sum, operand) => Ok(CalcField::sum(operand)),
        (_, operand) => Ok(CalcField::sub(operand)),
    }
}

fn calc_operand(json: &Json, path: &str) -> Result<CalcOperand> {
    match json {
        Json::Object(_) => calc_field(json, path).map(CalcOperand::Calc),
        _ => field(json, path).map(CalcOperand::Field),
    }
}

fn column(json: &Json, path: &str) -> Result<Column> {
    let obj = object(json, path)?;
    allow(obj, path, &["name", "type", "default", "autoIncrement"])?;

    let name = string(required(obj, "name", path)?, &child(path, "name"))?;
    let type_path = child(path, "type");
    let type_name = string(required(obj, "type", path)?, &type_path)?;
    let column_type = ColumnType::parse(type_name)
        .ok_or_else(|| QueryError::syntax(&type_path, format!("unknown column type \"{}\"", type_name)))?;

    let mut column = Column::new(name, column_type);
    if let Some(json) = obj.get("default") {
        column = column.default_value(value(json, &child(path, "default"))?);
    }
    if let Some(json) = obj.get("autoIncrement") {
        let flag_path = child(path, "autoIncrement");
        let flag = json
            .as_bool()
            .ok_or_else(|| QueryError::syntax(&flag_path, "expected a boolean"))?;
        column = column.auto_increment(flag);
    }
    Ok(column)
}

fn index(json: &Json, path: &str) -> Result<Index> {
    let obj = object(json, path)?;
    allow(obj, path, &["name", "type", "columns"])?;

    let name = string(required(obj, "name", path)?, &child(path, "name"))?;
    let type_path = child(path, "type");
    let type_name = string(required(obj, "type", path)?, &type_path)?;
    let index_type = IndexType::parse(type_name)
        .ok_or_else(|| QueryError::syntax(&type_path, format!("unknown index type \"{}\"", type_name)))?;

    let mut index = Index::new(name, index_type);
    if let Some(json) = obj.get("columns") {
        index = index.columns(list(json, &child(path, "columns"), sort_field)?);
    }
    Ok(index)
}

fn data(json: &Json, path: &str) -> Result<Vec<(String, Value)>> {
    let mut fields = Vec::new();
    for (name, json) in object(json, path)? {
        fields.push((name.clone(), value(json, &child(path, name))?));
    }
    Ok(fields)
}

// Primitive readers

fn object<'j>(json: &'j Json, path: &str) -> Result<&'j Object> {
    json.as_object()
        .ok_or_else(|| QueryError::syntax(path, "expected an object"))
}

fn string<'j>(json: &'j Json, path: &str) -> Result<&'j str> {
    json.as_str()
        .ok_or_else(|| QueryError::syntax(path, "expected a string"))
}

fn count(json: &Json, path: &str) -> Result<u64> {
    json.as_u64()
        .ok_or_else(|| QueryError::syntax(path, "expected a non-negative integer"))
}

fn list<T>(json: &Json, path: &str, item: impl Fn(&Json, &str) -> Result<T>) -> Result<Vec<T>> {
    let items = json
        .as_array()
        .ok_or_else(|| QueryError::syntax(path, "expected an array"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, json)| item(json, &format!("{}[{}]", path, i)))
        .collect()
}

fn required<'j>(obj: &'j Object, key: &str, path: &str) -> Result<&'j Json> {
    obj.get(key)
        .ok_or_else(|| QueryError::syntax(path, format!("missing \"{}\"", key)))
}

fn allow(obj: &Object, path: &str, keys: &[&str]) -> Result<()> {
    match obj.keys().find(|key| !keys.contains(&key.as_str())) {
        Some(key) => Err(QueryError::syntax(&child(path, key), "unexpected key")),
        None => Ok(()),
    }
}

fn child(path: &str, key: &str) -> String {
    format!("{}.{}", path, key)
}
