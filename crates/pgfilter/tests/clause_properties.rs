//! Properties of the clause builders that hold for any caller input.

use pgfilter::{
    ColumnAliases, DbError, FieldMap, FilterOp, FilterRules, Value, build_set_clause,
    build_where_clause,
};

fn max_marker(fragment: &str) -> usize {
    fragment
        .split('$')
        .skip(1)
        .filter_map(|rest| {
            let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
            digits.parse().ok()
        })
        .max()
        .unwrap_or(0)
}

fn job_rules() -> FilterRules {
    FilterRules::new()
        .field("title", FilterOp::ILike)
        .field_as("minSalary", "salary", FilterOp::Gt)
        .field_as("maxSalary", "salary", FilterOp::Lt)
        .range("minSalary", "maxSalary")
}

#[test]
fn highest_marker_matches_param_count() {
    let inputs = [
        FieldMap::new().with("title", "a"),
        FieldMap::new().with("title", "a").with("minSalary", 10),
        FieldMap::new()
            .with("maxSalary", 90)
            .with("title", "a")
            .with("minSalary", 10),
    ];
    for criteria in &inputs {
        let clause = build_where_clause(criteria, &job_rules()).unwrap();
        assert_eq!(max_marker(clause.fragment()), clause.params().len());
        assert_eq!(clause.next_marker(), clause.params().len() + 1);

        let set = build_set_clause(criteria, &ColumnAliases::new()).unwrap();
        assert_eq!(max_marker(set.fragment()), set.params().len());
    }
}

#[test]
fn values_never_appear_in_sql() {
    let payload = "x'; DROP TABLE jobs; --";
    let criteria = FieldMap::new().with("title", payload);

    let clause = build_where_clause(&criteria, &job_rules()).unwrap();
    assert!(!clause.fragment().contains("DROP"));
    assert_eq!(clause.params(), [Value::Text(format!("%{payload}%"))]);

    let set = build_set_clause(&criteria, &ColumnAliases::new()).unwrap();
    assert!(!set.fragment().contains("DROP"));
    assert_eq!(set.params(), [Value::from(payload)]);
}

#[test]
fn hostile_update_keys_stay_inside_one_identifier() {
    let fields = FieldMap::new().with(r#"title" = 'x', "salary"#, 1);
    let set = build_set_clause(&fields, &ColumnAliases::new()).unwrap();
    assert_eq!(set.fragment(), r#""title"" = 'x', ""salary"=$1"#);
}

#[test]
fn rejections_happen_before_any_sql() {
    let cases: Vec<(FieldMap, &str)> = vec![
        (FieldMap::new().with("salary", 5), "unknown_field"),
        (FieldMap::new().with("title", Value::Null), "no_recognized_field"),
        (
            FieldMap::new().with("minSalary", 100).with("maxSalary", 10),
            "range_conflict",
        ),
    ];
    for (criteria, kind) in cases {
        let err = build_where_clause(&criteria, &job_rules()).unwrap_err();
        assert_eq!(err.kind(), kind, "{criteria:?}");
        assert!(err.is_client_error());
    }
}

#[test]
fn query_string_bounds_compare_numerically() {
    // "9" > "10" as text; numerically it is not.
    let criteria = FieldMap::from_query_pairs([("minSalary", "9"), ("maxSalary", "10")]);
    assert!(build_where_clause(&criteria, &job_rules()).is_ok());
}

#[test]
fn empty_update_is_rejected() {
    let err = build_set_clause(&FieldMap::new(), &ColumnAliases::new()).unwrap_err();
    assert!(matches!(err, DbError::EmptyUpdate));
    assert_eq!(err.to_string(), "No data to update");
}

#[test]
fn json_body_feeds_the_set_builder() {
    let body: serde_json::Value = serde_json::json!({
        "title": "Welder",
        "salary": null,
        "companyHandle": "acme"
    });
    let serde_json::Value::Object(object) = body else {
        unreachable!()
    };
    let fields = FieldMap::from_json(object).unwrap();
    let aliases = ColumnAliases::new().with("companyHandle", "company_handle");

    let set = build_set_clause(&fields, &aliases).unwrap();
    assert_eq!(
        set.fragment(),
        r#""title"=$1, "salary"=$2, "company_handle"=$3"#
    );
    assert_eq!(
        set.params(),
        [Value::from("Welder"), Value::Null, Value::from("acme")]
    );
}
