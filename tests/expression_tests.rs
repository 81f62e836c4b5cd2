use chrono::{TimeZone, Utc};
use querytree::{Bitwise, BitwiseOperator, Comparison, ComparisonOperator, Expression, Field, Value};
use rust_decimal::Decimal;

fn a() -> Comparison {
    Comparison::eq("a", 1)
}

fn b() -> Comparison {
    Comparison::eq("b", 2)
}

fn c() -> Comparison {
    Comparison::eq("c", 3)
}

fn expr(comparison: Comparison) -> Expression {
    Expression::from(comparison)
}

// ============================================================================
// Comparison
// ============================================================================

#[test]
fn test_in_renders_value_list() {
    let comparison = Comparison::is_in("group", ["Admin", "Editor"]);
    assert_eq!(comparison.to_string(), r#"group in ("Admin", "Editor")"#);
    assert!(comparison.is_list());
    assert!(comparison.value().is_none());
}

#[test]
fn test_in_with_no_values() {
    let comparison = Comparison::is_in("group", Vec::<Value>::new());
    assert_eq!(comparison.values(), Some(&[][..]));
    assert_eq!(comparison.to_string(), "group in ()");
}

#[test]
fn test_new_with_in_wraps_single_value() {
    let comparison = Comparison::new("group", ComparisonOperator::In, "Admin");
    assert_eq!(comparison.values(), Some(&[Value::from("Admin")][..]));
}

#[test]
fn test_simple_comparison_value() {
    let comparison = Comparison::gte("views", 100);
    assert_eq!(comparison.operator(), ComparisonOperator::GreaterThanOrEqual);
    assert_eq!(comparison.value(), Some(&Value::Integer(100)));
    assert!(comparison.values().is_none());
}

#[test]
fn test_set_same_value_returns_same_node() {
    let comparison = Comparison::eq("id", "post1");
    assert!(comparison.set("post1").ptr_eq(&comparison));

    let changed = comparison.set("post2");
    assert_eq!(changed.to_string(), r#"id = "post2""#);
    assert_eq!(comparison.to_string(), r#"id = "post1""#);
}

#[test]
fn test_set_values_same_list_returns_same_node() {
    let comparison = Comparison::is_in("id", [1, 2]);
    assert!(comparison.set_values([1, 2]).ptr_eq(&comparison));
    assert_eq!(comparison.set_values([3]).to_string(), "id in (3)");
}

#[test]
fn test_field_reference_operand() {
    let comparison = Comparison::eq(Field::qualified("author", "id"), Field::new("author"));
    assert_eq!(comparison.to_string(), "author.id = author");
}

#[test]
fn test_value_rendering() {
    let date = Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap();
    assert_eq!(Comparison::eq("date", date).to_string(), "date = 2024-01-31T12:00:00Z");
    assert_eq!(Comparison::eq("price", Decimal::new(1999, 2)).to_string(), "price = 19.99");
    assert_eq!(Comparison::eq("deleted", Value::Null).to_string(), "deleted = null");
    assert_eq!(Comparison::eq("draft", false).to_string(), "draft = false");
}

// ============================================================================
// Bitwise
// ============================================================================

#[test]
fn test_bitwise_rendering() {
    assert_eq!(Bitwise::empty(BitwiseOperator::And).to_string(), "");
    assert_eq!(Bitwise::and([a()]).to_string(), "a = 1");
    assert_eq!(
        Bitwise::or([expr(a()), Bitwise::and([b(), c()]).into()]).to_string(),
        "(a = 1 or (b = 2 and c = 3))"
    );
}

#[test]
fn test_is_leaf() {
    assert!(Bitwise::and([a(), b()]).is_leaf());
    assert!(Bitwise::empty(BitwiseOperator::Or).is_leaf());
    assert!(!Bitwise::and([expr(a()), Bitwise::or([b()]).into()]).is_leaf());
}

#[test]
fn test_add_appends() {
    let tree = Bitwise::and([a()]);
    let added = tree.add(b());
    assert_eq!(added.operands().len(), 2);
    assert_eq!(tree.operands().len(), 1);
}

#[test]
fn test_remove_first_equal_operand() {
    let tree = Bitwise::and([a(), b(), a()]);
    let removed = tree.remove(&expr(a()));
    assert_eq!(removed.to_string(), "(b = 2 and a = 1)");
}

#[test]
fn test_remove_absent_returns_same_node() {
    let tree = Bitwise::and([a(), b()]);
    assert!(tree.remove(&expr(c())).ptr_eq(&tree));
}

#[test]
fn test_replace_shallow() {
    let tree = Bitwise::and([a(), b()]);
    let replaced = tree.replace(&expr(b()), &expr(c()), false);
    assert_eq!(replaced.to_string(), "(a = 1 and c = 3)");
}

#[test]
fn test_replace_shallow_skips_nested() {
    let tree = Bitwise::and([expr(a()), Bitwise::or([b(), c()]).into()]);
    let replaced = tree.replace(&expr(b()), &expr(a()), false);
    assert!(replaced.ptr_eq(&Expression::Bitwise(tree)));
}

#[test]
fn test_replace_deep() {
    let tree = Bitwise::and([expr(a()), Bitwise::or([b(), c()]).into()]);
    let replaced = tree.replace(&expr(b()), &expr(a()), true);
    assert_eq!(replaced.to_string(), "(a = 1 and (a = 1 or c = 3))");
}

#[test]
fn test_replace_root_returns_replacement() {
    let tree = Bitwise::and([a(), b()]);
    let replaced = tree.replace(&Expression::Bitwise(tree.clone()), &expr(c()), false);
    assert_eq!(replaced, expr(c()));
}

#[test]
fn test_replace_without_match_returns_same_node() {
    let tree = Bitwise::and([a(), b()]);
    let replaced = tree.replace(&expr(c()), &expr(a()), true);
    assert!(replaced.as_bitwise().unwrap().ptr_eq(&tree));
}

#[test]
fn test_structural_equality() {
    assert_eq!(Bitwise::and([a(), b()]), Bitwise::and([a(), b()]));
    assert_ne!(Bitwise::and([a(), b()]), Bitwise::and([b(), a()]));
    assert_ne!(Bitwise::and([a(), b()]), Bitwise::or([a(), b()]));
}
