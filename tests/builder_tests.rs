use querytree::{
    AggregateQuery, AlterCollectionQuery, BitwiseOperator, CalcField, Collection, Column,
    CollectionExistsQuery, ColumnType, Comparison, CreateCollectionQuery, DeleteQuery, DescribeCollectionQuery,
    Direction, DropCollectionQuery, Field, Filter, Index, IndexType, InsertQuery, Query,
    ReplaceQuery, SelectQuery, Sort, SortableField, Target, UnionQuery, UpdateQuery, Value,
};

fn post_query() -> SelectQuery {
    SelectQuery::new().from("Post").eq("id", "post1").eq("author", "mgrenier")
}

// ============================================================================
// Identity preservation
// ============================================================================

#[test]
fn test_limit_same_value_returns_same_node() {
    let query = SelectQuery::new().limit(5);
    assert!(query.limit(5).ptr_eq(&query));
    assert!(!query.limit(6).ptr_eq(&query));
}

#[test]
fn test_offset_same_value_returns_same_node() {
    let query = SelectQuery::new().offset(20);
    assert!(query.offset(20).ptr_eq(&query));
}

#[test]
fn test_offset_zero_is_a_value() {
    let query = SelectQuery::new().offset(0);
    assert_eq!(query.get_offset(), Some(0));
    assert!(!query.ptr_eq(&SelectQuery::new()));
}

#[test]
fn test_from_same_name_returns_same_node() {
    let query = SelectQuery::new().from("Post");
    assert!(query.from("Post").ptr_eq(&query));
    assert!(!query.from("Draft").ptr_eq(&query));
}

#[test]
fn test_from_existing_collection_is_kept() {
    let collection = Collection::new("Post", Some("blog"));
    let query = SelectQuery::new().from(&collection);
    assert!(query.get_from().unwrap().ptr_eq(&collection));
    assert!(query.from(&collection).ptr_eq(&query));
}

#[test]
fn test_from_with_namespace() {
    let query = SelectQuery::new().from(("Post", "blog"));
    let from = query.get_from().unwrap();
    assert_eq!(from.name(), "Post");
    assert_eq!(from.namespace(), Some("blog"));
    assert_eq!(from.to_string(), "blog.Post");
}

#[test]
fn test_collection_rename_identity() {
    let collection = Collection::new("Post", None);
    assert!(collection.rename("Post", None).ptr_eq(&collection));
    assert!(!collection.rename("Post", Some("blog")).ptr_eq(&collection));
}

#[test]
fn test_field_rename_identity() {
    let field = Field::qualified("author", "name");
    assert!(field.rename("name", Some("author")).ptr_eq(&field));
    assert_eq!(field.rename("email", Some("author")).to_string(), "author.email");
}

#[test]
fn test_sortable_field_sort_identity() {
    let field = SortableField::desc("date");
    assert!(field.sort(Some(Direction::Desc)).ptr_eq(&field));
    assert_eq!(field.sort(None).to_string(), "date");
}

#[test]
fn test_filter_same_tree_returns_same_node() {
    let query = post_query();
    let tree = query.get_filter().unwrap().clone();
    assert!(query.filter(tree).ptr_eq(&query));
}

#[test]
fn test_column_builders_identity() {
    let column = Column::new("id", ColumnType::Int32);
    assert!(column.auto_increment(false).ptr_eq(&column));
    assert!(column.column_type(ColumnType::Int32).ptr_eq(&column));
    assert!(column.name("id").ptr_eq(&column));

    let with_default = column.default_value(0);
    assert!(with_default.default_value(0).ptr_eq(&with_default));
}

#[test]
fn test_target_same_collection_returns_same_node() {
    let insert = InsertQuery::new().collection("Post");
    assert!(insert.collection("Post").ptr_eq(&insert));

    let describe = DescribeCollectionQuery::new().collection("Post");
    assert!(describe.collection("Post").ptr_eq(&describe));

    let drop = DropCollectionQuery::new().collection("Post");
    assert!(!drop.collection("Draft").ptr_eq(&drop));
}

#[test]
fn test_separate_collection_statements_are_distinct_nodes() {
    assert!(!DropCollectionQuery::new().ptr_eq(&DropCollectionQuery::new()));
    assert!(!CollectionExistsQuery::new().ptr_eq(&CollectionExistsQuery::new()));

    let post = Collection::new("Post", None);
    let first = DescribeCollectionQuery::new().collection(&post);
    let second = DescribeCollectionQuery::new().collection(&post);
    assert!(!first.ptr_eq(&second));
    assert!(first.ptr_eq(&first.clone()));

    let a = Query::from(DropCollectionQuery::new());
    let b = Query::from(DropCollectionQuery::new());
    assert!(!a.ptr_eq(&b));
}

#[test]
fn test_list_builders_same_contents_return_same_node() {
    let select = SelectQuery::new().select(["a", "b"]);
    assert!(select.select(["a", "b"]).ptr_eq(&select));
    assert!(!select.select(["b", "a"]).ptr_eq(&select));

    let sorted = SelectQuery::new().sort([SortableField::new("date", Some(Direction::Desc))]);
    assert!(sorted.sort([SortableField::new("date", Some(Direction::Desc))]).ptr_eq(&sorted));

    let grouped = AggregateQuery::new().group(["author"]);
    assert!(grouped.group(["author"]).ptr_eq(&grouped));

    let aggregate = AggregateQuery::new().select([("total", CalcField::count("id"))]);
    assert!(aggregate.select([("total", CalcField::count("id"))]).ptr_eq(&aggregate));

    let insert = InsertQuery::new().fields([("title", "Hello"), ("views", "0")]);
    assert!(insert.fields([("title", "Hello"), ("views", "0")]).ptr_eq(&insert));
    assert!(!insert.fields([("views", "0"), ("title", "Hello")]).ptr_eq(&insert));

    let update = UpdateQuery::new().fields([("title", "Bye")]);
    assert!(update.fields([("title", "Bye")]).ptr_eq(&update));

    let replace = ReplaceQuery::new().fields([("id", 1)]);
    assert!(replace.fields([("id", 1)]).ptr_eq(&replace));
}

#[test]
fn test_collection_definition_lists_same_contents_return_same_node() {
    let columns = || [Column::new("id", ColumnType::Int32), Column::new("title", ColumnType::Text)];

    let create = CreateCollectionQuery::new()
        .columns(columns())
        .indexes([Index::new("post_id", IndexType::Primary).columns_by("id", None)]);
    assert!(create.columns(columns()).ptr_eq(&create));
    assert!(
        create
            .indexes([Index::new("post_id", IndexType::Primary).columns_by("id", None)])
            .ptr_eq(&create)
    );

    let alter = AlterCollectionQuery::new().columns(columns());
    assert!(alter.columns(columns()).ptr_eq(&alter));
    assert!(!alter.columns([Column::new("id", ColumnType::Int64)]).ptr_eq(&alter));

    let index = Index::new("post_date", IndexType::Index).columns([SortableField::new("date", None)]);
    assert!(index.columns([SortableField::new("date", None)]).ptr_eq(&index));
}

#[test]
fn test_union_same_branches_return_same_node() {
    let post = SelectQuery::new().from("Post");
    let draft = SelectQuery::new().from("Draft");
    let union = UnionQuery::new().select([post.clone(), draft.clone()]);

    assert!(union.select([post.clone(), draft]).ptr_eq(&union));
    assert!(!union.select([post, SelectQuery::new().from("Draft")]).ptr_eq(&union));
}

// ============================================================================
// Immutability and sharing
// ============================================================================

#[test]
fn test_builders_never_mutate_the_receiver() {
    let base = SelectQuery::new().limit(5);
    let changed = base.limit(10).from("Post");

    assert_eq!(base.get_limit(), Some(5));
    assert!(base.get_from().is_none());
    assert_eq!(changed.get_limit(), Some(10));
}

#[test]
fn test_unchanged_clauses_are_shared() {
    let base = post_query();
    let changed = base.limit(10);

    assert!(changed.get_filter().unwrap().ptr_eq(base.get_filter().unwrap()));
    assert!(changed.get_from().unwrap().ptr_eq(base.get_from().unwrap()));
}

#[test]
fn test_comparison_appends_do_not_touch_previous_tree() {
    let base = SelectQuery::new().eq("a", 1);
    let extended = base.eq("b", 2);

    assert_eq!(base.get_filter().unwrap().operands().len(), 1);
    assert_eq!(extended.get_filter().unwrap().operands().len(), 2);
}

// ============================================================================
// Filter clause: append versus replace
// ============================================================================

#[test]
fn test_comparison_helpers_append_under_and() {
    let query = SelectQuery::new()
        .eq("a", 1)
        .ne("b", 2)
        .gt("c", 3)
        .gte("d", 4)
        .lt("e", 5)
        .lte("f", 6)
        .is_in("g", ["x", "y"])
        .begins_with("h", "pre");

    let tree = query.get_filter().unwrap();
    assert_eq!(tree.operator(), BitwiseOperator::And);
    assert_eq!(tree.operands().len(), 8);
    assert_eq!(
        tree.to_string(),
        r#"(a = 1 and b != 2 and c > 3 and d >= 4 and e < 5 and f <= 6 and g in ("x", "y") and h beginsWith "pre")"#
    );
}

#[test]
fn test_append_keeps_existing_operator() {
    let query = SelectQuery::new()
        .or([Comparison::eq("a", 1)])
        .eq("b", 2);

    let tree = query.get_filter().unwrap();
    assert_eq!(tree.operator(), BitwiseOperator::Or);
    assert_eq!(tree.to_string(), "(a = 1 or b = 2)");
}

#[test]
fn test_and_or_xor_replace_the_tree() {
    let query = post_query();

    let replaced = query.xor([Comparison::eq("a", 1), Comparison::eq("b", 2)]);
    let tree = replaced.get_filter().unwrap();
    assert_eq!(tree.operator(), BitwiseOperator::Xor);
    assert_eq!(tree.to_string(), "(a = 1 xor b = 2)");

    let replaced = query.and([Comparison::eq("c", 3)]);
    assert_eq!(replaced.get_filter().unwrap().to_string(), "c = 3");
}

#[test]
fn test_filter_on_write_statements() {
    let update = UpdateQuery::new().collection("Post").eq("id", "post1");
    let replace = ReplaceQuery::new().collection("Post").eq("id", "post1");
    let delete = DeleteQuery::new().collection("Post").eq("id", "post1");

    assert_eq!(update.get_filter().unwrap().operands().len(), 1);
    assert_eq!(replace.get_filter().unwrap().operands().len(), 1);
    assert_eq!(delete.get_filter().unwrap().operands().len(), 1);
}

// ============================================================================
// Sort clause
// ============================================================================

#[test]
fn test_sort_by_appends() {
    let query = SelectQuery::new()
        .sort_by("date", Some(Direction::Desc))
        .sort_by("title", None);

    let sort = query.get_sort().unwrap();
    assert_eq!(sort.len(), 2);
    assert_eq!(sort[0].name(), "date");
    assert_eq!(sort[0].direction(), Some(Direction::Desc));
    assert_eq!(sort[1].direction(), None);
}

#[test]
fn test_sort_replaces() {
    let query = SelectQuery::new()
        .sort_by("date", Some(Direction::Desc))
        .sort([SortableField::asc("title")]);

    let sort = query.get_sort().unwrap();
    assert_eq!(sort.len(), 1);
    assert_eq!(sort[0].to_string(), "title asc");
}

// ============================================================================
// Query kinds
// ============================================================================

#[test]
fn test_empty_projection_selects_everything() {
    let query = SelectQuery::new().select(Vec::<&str>::new());
    assert!(query.get_select().is_none());
}

#[test]
fn test_join_same_alias_replaces() {
    let author = SelectQuery::new().from("User");
    let on = Comparison::eq(Field::qualified("author", "id"), Value::from(Field::new("author")));

    let query = SelectQuery::new()
        .from("Post")
        .join("author", author.clone(), on.clone())
        .join("author", author.limit(1), on);

    let join = query.get_join().unwrap();
    assert_eq!(join.len(), 1);
    assert_eq!(join["author"].query.get_limit(), Some(1));
}

#[test]
fn test_union_offset_and_limit_are_independent() {
    let union = UnionQuery::new().limit(5).offset(5);
    assert_eq!(union.get_limit(), Some(5));
    assert_eq!(union.get_offset(), Some(5));
}

#[test]
fn test_union_keeps_branch_order() {
    let union = UnionQuery::new().select([
        SelectQuery::new().from("Post"),
        SelectQuery::new().from("Draft"),
    ]);
    let selects = union.get_selects().unwrap();
    assert_eq!(selects[0].get_from().unwrap().name(), "Post");
    assert_eq!(selects[1].get_from().unwrap().name(), "Draft");
}

#[test]
fn test_aggregate_keeps_alias_order() {
    let query = AggregateQuery::new()
        .select([("total", CalcField::count("id")), ("average", CalcField::avg("views"))])
        .from("Post")
        .group(["author"]);

    let select = query.get_select().unwrap();
    let aliases: Vec<&str> = select.keys().map(String::as_str).collect();
    assert_eq!(aliases, vec!["total", "average"]);
    assert_eq!(query.get_group().unwrap()[0].name(), "author");
}

#[test]
fn test_insert_keeps_field_order() {
    let query = InsertQuery::new()
        .collection("Post")
        .fields([("title", "Hello"), ("author", "mgrenier")]);

    let fields = query.get_fields().unwrap();
    let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["title", "author"]);
    assert_eq!(fields["title"], Value::from("Hello"));
}

#[test]
fn test_create_collection_keeps_indexes_when_collection_changes() {
    let query = CreateCollectionQuery::new()
        .collection("Post")
        .indexes([Index::new("post_id", IndexType::Primary).columns_by("id", None)]);

    let renamed = query.collection(Collection::new("Article", None));
    assert_eq!(renamed.get_collection().unwrap().name(), "Article");
    assert_eq!(renamed.get_indexes().unwrap().len(), 1);
}

#[test]
fn test_alter_collection_columns_replace() {
    let query = AlterCollectionQuery::new()
        .collection("Post")
        .columns([Column::new("title", ColumnType::Text)])
        .columns([Column::new("body", ColumnType::Text)]);

    let columns = query.get_columns().unwrap();
    assert_eq!(columns.len(), 1);
    assert_eq!(columns[0].get_name(), "body");
}

#[test]
fn test_index_columns_by_appends() {
    let index = Index::new("post_date", IndexType::Index)
        .columns_by("date", Some(Direction::Desc))
        .columns_by("title", None);
    assert_eq!(index.to_string(), "INDEX post_date (date desc, title)");
}

#[test]
fn test_calc_field_shapes() {
    let count = CalcField::count("id");
    assert!(count.field().is_some());
    assert_eq!(count.to_string(), "COUNT(id)");

    let max = CalcField::max(["a", "b"]);
    assert!(max.field().is_none());
    assert_eq!(max.fields().len(), 2);
    assert_eq!(max.to_string(), "MAX(a, b)");

    let nested = CalcField::avg(CalcField::sum("price"));
    assert_eq!(nested.to_string(), "AVG(SUM(price))");
}

#[test]
fn test_query_kind_names() {
    assert_eq!(Query::from(SelectQuery::new()).kind(), "SelectQuery");
    assert_eq!(Query::from(UnionQuery::new()).kind(), "UnionQuery");
    assert_eq!(Query::from(DropCollectionQuery::new()).kind(), "DropCollectionQuery");
}

#[test]
fn test_query_ptr_eq_across_kinds() {
    let select = Query::from(SelectQuery::new());
    let union = Query::from(UnionQuery::new());
    assert!(select.ptr_eq(&select.clone()));
    assert!(!select.ptr_eq(&union));
}
