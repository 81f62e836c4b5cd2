use querytree::QueryError;
use querytree::cli::{CheckOptions, CheckResult, CliError, RenderOptions, execute_check, execute_render};

const NESTED: &str = r#"{
    "type": "select",
    "from": "Post",
    "where": { "op": "and", "operands": [
        { "field": "a", "op": "=", "value": 1 },
        { "op": "and", "operands": [
            { "field": "b", "op": "=", "value": 2 },
            { "field": "c", "op": "beginsWith", "value": "x" }
        ]}
    ]},
    "limit": 5
}"#;

fn render(input: &str, pretty: bool, simplify: bool) -> Result<String, CliError> {
    execute_render(&RenderOptions {
        input: Some(input.to_string()),
        pretty,
        simplify,
    })
}

fn check(input: &str) -> CheckOptions {
    CheckOptions {
        input: Some(input.to_string()),
        ..Default::default()
    }
}

// ============================================================================
// render
// ============================================================================

#[test]
fn test_render_single_line() {
    assert_eq!(
        render(NESTED, false, false).unwrap(),
        r#"SELECT * FROM Post WHERE (a = 1 and (b = 2 and c beginsWith "x")) LIMIT 5"#
    );
}

#[test]
fn test_render_simplified() {
    assert_eq!(
        render(NESTED, false, true).unwrap(),
        r#"SELECT * FROM Post WHERE (a = 1 and b = 2 and c beginsWith "x") LIMIT 5"#
    );
}

#[test]
fn test_render_pretty() {
    let text = render(r#"{ "type": "describeCollection", "collection": "Post" }"#, true, false).unwrap();
    assert_eq!(text, "DESCRIBE COLLECTION Post");

    let text = render(r#"{ "type": "delete", "collection": "Post", "limit": 1 }"#, true, false).unwrap();
    assert_eq!(text, "DELETE Post\nLIMIT 1");
}

#[test]
fn test_render_without_input() {
    let result = execute_render(&RenderOptions::default());
    assert!(matches!(result, Err(CliError::NoInput)));
}

#[test]
fn test_render_invalid_json() {
    let result = render("{ not json", false, false);
    assert!(matches!(result, Err(CliError::Json(_))));
}

#[test]
fn test_render_reports_syntax_path() {
    let err = render(r#"{ "type": "select", "limit": "ten" }"#, false, false).unwrap_err();
    assert_eq!(err.to_string(), "Query syntax error at $.limit: expected a non-negative integer");
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_accepts_query_kind() {
    let result = execute_check(&check(NESTED)).unwrap();
    assert_eq!(result, CheckResult::Accepted("SelectQuery"));
}

#[test]
fn test_check_rejects_depth() {
    let options = CheckOptions {
        max_depth: Some(1),
        ..check(NESTED)
    };
    let result = execute_check(&options).unwrap();
    assert_eq!(
        result,
        CheckResult::Rejected(QueryError::TooComplexQuery(
            "predicate depth 2 exceeds the limit of 1".to_string()
        ))
    );
}

#[test]
fn test_check_rejects_denied_operator() {
    let options = CheckOptions {
        deny: vec!["beginsWith".to_string()],
        ..check(NESTED)
    };
    assert!(matches!(
        execute_check(&options).unwrap(),
        CheckResult::Rejected(QueryError::QueryNotSupported(_))
    ));
}

#[test]
fn test_check_accepts_within_limits() {
    let options = CheckOptions {
        max_joins: Some(0),
        max_depth: Some(2),
        max_operands: Some(2),
        deny: vec!["xor".to_string()],
        ..check(NESTED)
    };
    assert_eq!(execute_check(&options).unwrap(), CheckResult::Accepted("SelectQuery"));
}

#[test]
fn test_check_unknown_operator() {
    let options = CheckOptions {
        deny: vec!["like".to_string()],
        ..check(NESTED)
    };
    let err = execute_check(&options).unwrap_err();
    assert!(matches!(err, CliError::UnknownOperator(ref op) if op == "like"));
    assert!(err.to_string().starts_with("Unknown operator: 'like'"));
}

#[test]
fn test_check_malformed_query_is_an_error() {
    let result = execute_check(&check(r#"{ "type": "upsert" }"#));
    assert!(matches!(result, Err(CliError::Query(QueryError::QuerySyntax { .. }))));
}
