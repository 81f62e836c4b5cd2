use querytree::{
    Bitwise, BitwiseOperator, Comparison, Expression, Filter, Query, SelectQuery, UnionQuery,
    simplify_bitwise_tree, simplify_query,
};

fn cmp(name: &str, value: i64) -> Expression {
    Comparison::eq(name, value).into()
}

fn and(operands: Vec<Expression>) -> Expression {
    Bitwise::and(operands).into()
}

fn or(operands: Vec<Expression>) -> Expression {
    Bitwise::or(operands).into()
}

fn names(tree: &Bitwise) -> Vec<String> {
    tree.operands().iter().map(ToString::to_string).collect()
}

#[test]
fn test_flattens_right_leaning_chain() {
    // (a and (b and (c and d)))
    let tree = Bitwise::and(vec![
        cmp("a", 1),
        and(vec![cmp("b", 2), and(vec![cmp("c", 3), cmp("d", 4)])]),
    ]);

    let flat = simplify_bitwise_tree(&tree);
    assert_eq!(flat.operator(), BitwiseOperator::And);
    assert_eq!(names(&flat), vec!["a = 1", "b = 2", "c = 3", "d = 4"]);
}

#[test]
fn test_flattens_left_leaning_chain_in_order() {
    // (((a or b) or c) or d)
    let tree = Bitwise::or(vec![
        or(vec![or(vec![cmp("a", 1), cmp("b", 2)]), cmp("c", 3)]),
        cmp("d", 4),
    ]);

    let flat = simplify_bitwise_tree(&tree);
    assert_eq!(names(&flat), vec!["a = 1", "b = 2", "c = 3", "d = 4"]);
}

#[test]
fn test_keeps_operator_boundaries() {
    // (a and (b or c)) stays as is
    let tree = Bitwise::and(vec![cmp("a", 1), or(vec![cmp("b", 2), cmp("c", 3)])]);
    let simplified = simplify_bitwise_tree(&tree);

    assert!(simplified.ptr_eq(&tree));
    assert_eq!(simplified.to_string(), "(a = 1 and (b = 2 or c = 3))");
}

#[test]
fn test_flattens_below_a_boundary() {
    // (a and (b or (c or d)))
    let tree = Bitwise::and(vec![
        cmp("a", 1),
        or(vec![cmp("b", 2), or(vec![cmp("c", 3), cmp("d", 4)])]),
    ]);

    let simplified = simplify_bitwise_tree(&tree);
    assert_eq!(simplified.to_string(), "(a = 1 and (b = 2 or c = 3 or d = 4))");
}

#[test]
fn test_flattens_xor_chains() {
    let tree = Bitwise::xor(vec![cmp("a", 1), Bitwise::xor(vec![cmp("b", 2)]).into()]);
    assert_eq!(simplify_bitwise_tree(&tree).to_string(), "(a = 1 xor b = 2)");
}

#[test]
fn test_leaf_returns_same_node() {
    let tree = Bitwise::and(vec![cmp("a", 1), cmp("b", 2)]);
    assert!(simplify_bitwise_tree(&tree).ptr_eq(&tree));

    let empty = Bitwise::empty(BitwiseOperator::Or);
    assert!(simplify_bitwise_tree(&empty).ptr_eq(&empty));
}

#[test]
fn test_empty_nested_group_disappears() {
    let tree = Bitwise::and(vec![cmp("a", 1), Bitwise::empty(BitwiseOperator::And).into()]);
    assert_eq!(names(&simplify_bitwise_tree(&tree)), vec!["a = 1"]);
}

#[test]
fn test_simplify_is_idempotent() {
    let tree = Bitwise::or(vec![
        and(vec![cmp("a", 1), and(vec![cmp("b", 2)])]),
        or(vec![cmp("c", 3), or(vec![cmp("d", 4)])]),
    ]);

    let once = simplify_bitwise_tree(&tree);
    let twice = simplify_bitwise_tree(&once);
    assert_eq!(once, twice);
    assert!(twice.ptr_eq(&once));
}

#[test]
fn test_input_is_untouched() {
    let tree = Bitwise::and(vec![cmp("a", 1), and(vec![cmp("b", 2)])]);
    let before = tree.to_string();
    let _ = simplify_bitwise_tree(&tree);
    assert_eq!(tree.to_string(), before);
}

#[test]
fn test_simplify_query_rewrites_where() {
    let query = SelectQuery::new().from("Post").and(vec![
        cmp("a", 1),
        and(vec![cmp("b", 2), cmp("c", 3)]),
    ]);

    let simplified = simplify_query(&Query::from(query));
    assert_eq!(simplified.to_string(), "SELECT * FROM Post WHERE (a = 1 and b = 2 and c = 3)");
}

#[test]
fn test_simplify_query_unchanged_returns_same_node() {
    let query = Query::from(SelectQuery::new().from("Post").eq("a", 1).eq("b", 2));
    assert!(simplify_query(&query).ptr_eq(&query));
}

#[test]
fn test_simplify_query_reaches_union_branches() {
    let branch = SelectQuery::new()
        .from("Post")
        .or(vec![cmp("a", 1), or(vec![cmp("b", 2)])]);
    let union = UnionQuery::new().select([branch, SelectQuery::new().from("Draft")]);

    let simplified = simplify_query(&Query::from(union));
    assert_eq!(
        simplified.to_string(),
        "( SELECT * FROM Post WHERE (a = 1 or b = 2) ) UNION ( SELECT * FROM Draft )"
    );
}
