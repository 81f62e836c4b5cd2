use querytree::output::QueryPrinter;
use querytree::{
    AggregateQuery, AlterCollectionQuery, CalcField, CollectionExistsQuery, Column, ColumnType,
    Comparison, CreateCollectionQuery, DeleteQuery, DescribeCollectionQuery, Direction,
    DropCollectionQuery, Field, Filter, Index, IndexType, InsertQuery, Query, ReplaceQuery,
    SelectQuery, Sort, Target, UnionQuery, UpdateQuery, to_text, to_text_pretty,
};

fn post_query() -> SelectQuery {
    SelectQuery::new()
        .select(["title", "date"])
        .from("Post")
        .eq("author", "mgrenier")
        .sort_by("date", Some(Direction::Desc))
        .limit(10)
}

fn post_collection() -> CreateCollectionQuery {
    CreateCollectionQuery::new()
        .collection("Post")
        .columns([
            Column::new("id", ColumnType::Int32).auto_increment(true),
            Column::new("title", ColumnType::Text),
        ])
        .indexes([Index::new("post_id", IndexType::Primary).columns_by("id", None)])
}

// ============================================================================
// Reads
// ============================================================================

#[test]
fn test_select_everything() {
    let query = SelectQuery::new().from("Post").eq("id", "post1").eq("author", "mgrenier");
    assert_eq!(
        query.to_string(),
        r#"SELECT * FROM Post WHERE (id = "post1" and author = "mgrenier")"#
    );
}

#[test]
fn test_select_projection_sort_limit() {
    assert_eq!(
        post_query().to_string(),
        r#"SELECT title, date FROM Post WHERE author = "mgrenier" SORT BY date desc LIMIT 10"#
    );
}

#[test]
fn test_select_multiline() {
    assert_eq!(
        to_text_pretty(&Query::from(post_query().offset(20))),
        "SELECT title, date\nFROM Post\nWHERE author = \"mgrenier\"\nSORT BY date desc\nOFFSET 20\nLIMIT 10"
    );
}

#[test]
fn test_select_with_join() {
    let author = SelectQuery::new().from("User").select(["id", "name"]);
    let on = Comparison::eq(Field::qualified("author", "id"), Field::new("author"));
    let query = SelectQuery::new().from("Post").join("author", author, on);

    assert_eq!(
        query.to_string(),
        "SELECT * FROM Post JOIN (SELECT id, name FROM User) AS author ON author.id = author"
    );
}

#[test]
fn test_select_with_namespace() {
    let query = SelectQuery::new().from(("Post", "blog")).is_in("group", ["Admin", "Editor"]);
    assert_eq!(
        query.to_string(),
        r#"SELECT * FROM blog.Post WHERE group in ("Admin", "Editor")"#
    );
}

#[test]
fn test_union_single_line() {
    let union = UnionQuery::new()
        .select([SelectQuery::new().from("Post"), SelectQuery::new().from("Draft")])
        .sort_by("date", None)
        .offset(5)
        .limit(10);

    assert_eq!(
        union.to_string(),
        "( SELECT * FROM Post ) UNION ( SELECT * FROM Draft ) SORT BY date OFFSET 5 LIMIT 10"
    );
}

#[test]
fn test_union_multiline_indents_branches() {
    let union = UnionQuery::new()
        .select([SelectQuery::new().from("Post").limit(1), SelectQuery::new().from("Draft")])
        .limit(10);

    assert_eq!(
        to_text_pretty(&Query::from(union)),
        "(\n\tSELECT *\n\tFROM Post\n\tLIMIT 1\n) UNION (\n\tSELECT *\n\tFROM Draft\n)\nLIMIT 10"
    );
}

#[test]
fn test_union_without_branches_is_empty() {
    assert_eq!(UnionQuery::new().to_string(), "");
}

#[test]
fn test_aggregate() {
    let query = AggregateQuery::new()
        .select([("total", CalcField::count("id")), ("longest", CalcField::max(["views", "likes"]))])
        .from("Post")
        .gt("views", 10)
        .group(["author"])
        .sort_by("total", Some(Direction::Desc));

    assert_eq!(
        query.to_string(),
        "AGGREGATE COUNT(id) AS total, MAX(views, likes) AS longest FROM Post WHERE views > 10 GROUP BY author SORT BY total desc"
    );
}

#[test]
fn test_aggregate_without_projection() {
    assert_eq!(AggregateQuery::new().from("Post").to_string(), "AGGREGATE * FROM Post");
}

// ============================================================================
// Writes
// ============================================================================

#[test]
fn test_insert() {
    let query = InsertQuery::new()
        .collection("Post")
        .fields([("title", "Hello"), ("author", "mgrenier")]);
    assert_eq!(query.to_string(), r#"INSERT Post (title, author) VALUES ("Hello", "mgrenier")"#);
}

#[test]
fn test_insert_multiline() {
    let query = InsertQuery::new().collection("Post").fields([("views", 0)]);
    assert_eq!(to_text_pretty(&Query::from(query)), "INSERT Post\n(views)\nVALUES (0)");
}

#[test]
fn test_update_renders_where_once() {
    let query = UpdateQuery::new()
        .collection("Post")
        .fields([("title", "Bye")])
        .eq("id", "post1")
        .limit(1);
    assert_eq!(
        query.to_string(),
        r#"UPDATE Post (title) VALUES ("Bye") WHERE id = "post1" LIMIT 1"#
    );
}

#[test]
fn test_replace() {
    let query = ReplaceQuery::new().collection("Post").fields([("title", "New")]).eq("id", 2);
    assert_eq!(query.to_string(), r#"REPLACE Post (title) VALUES ("New") WHERE id = 2"#);
}

#[test]
fn test_delete() {
    let query = DeleteQuery::new().collection("Post").lt("date", "2020-01-01").limit(100);
    assert_eq!(query.to_string(), r#"DELETE Post WHERE date < "2020-01-01" LIMIT 100"#);
}

// ============================================================================
// Collection definition
// ============================================================================

#[test]
fn test_create_collection() {
    assert_eq!(
        post_collection().to_string(),
        "CREATE COLLECTION Post ( id INT32 AUTOINCREMENT, title TEXT ) INDEXES ( PRIMARY post_id (id) )"
    );
}

#[test]
fn test_create_collection_multiline() {
    assert_eq!(
        to_text_pretty(&Query::from(post_collection())),
        "CREATE COLLECTION Post (\n\tid INT32 AUTOINCREMENT,\n\ttitle TEXT\n)\nINDEXES (\n\tPRIMARY post_id (id)\n)"
    );
}

#[test]
fn test_column_default() {
    let column = Column::new("status", ColumnType::Text).default_value("draft");
    assert_eq!(column.to_string(), "status TEXT DEFAULT(draft)");
}

#[test]
fn test_alter_collection() {
    let query = AlterCollectionQuery::new()
        .collection("Post")
        .columns([Column::new("views", ColumnType::UInt32).default_value(0)]);
    assert_eq!(query.to_string(), "ALTER COLLECTION Post ( views UINT32 DEFAULT(0) )");
}

#[test]
fn test_collection_statements() {
    assert_eq!(DescribeCollectionQuery::new().collection("Post").to_string(), "DESCRIBE COLLECTION Post");
    assert_eq!(CollectionExistsQuery::new().collection("Post").to_string(), "COLLECTION EXISTS Post");
    assert_eq!(
        DropCollectionQuery::new().collection(("Post", "blog")).to_string(),
        "DROP COLLECTION blog.Post"
    );
}

#[test]
fn test_display_matches_to_text() {
    let query = Query::from(post_query());
    assert_eq!(query.to_string(), to_text(&query));
    assert_eq!(QueryPrinter::new(false).print(&query), to_text(&query));
}
