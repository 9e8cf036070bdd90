use std::sync::Arc;

use valuscope::{
    CombineMode, FilterCondition, FilterSet, Record, Table, Value, ValuscopeError,
};
use valuscope_mock::MockSource;

use crate::helpers::fast_builder;

fn rows() -> Vec<Record> {
    vec![
        Record::new().with("A", "x").with("B", 10),
        Record::new().with("A", "x").with("B", 3),
        Record::new().with("A", "y").with("B", 10),
    ]
}

#[test]
fn and_combination_keeps_rows_matching_everything() {
    let vs = fast_builder(Arc::new(MockSource::new())).build().unwrap();
    let out = vs
        .filter_records(
            rows(),
            vec![FilterCondition::new("A", "eq", "x"), FilterCondition::new("B", "gt", 5)],
            "and",
        )
        .unwrap();
    assert_eq!(out, vec![rows()[0].clone()]);
}

#[test]
fn unknown_operator_returns_no_rows() {
    let vs = fast_builder(Arc::new(MockSource::new())).build().unwrap();
    let err = vs
        .filter_records(rows(), vec![FilterCondition::new("B", "foo", 5)], "and")
        .unwrap_err();
    assert_eq!(err, ValuscopeError::unsupported_operator("foo"));
}

#[test]
fn conditions_decode_from_json_payloads() {
    let vs = fast_builder(Arc::new(MockSource::new())).build().unwrap();
    let conditions: Vec<FilterCondition> = serde_json::from_str(
        r#"[
            {"column": "B", "operator": "in", "value": [3, 4]},
            {"column": "A", "value": "y"}
        ]"#,
    )
    .unwrap();
    let out = vs.filter_records(rows(), conditions, "or").unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].get("B"), Some(&Value::Int(3)));
    assert_eq!(out[1].get("A"), Some(&Value::Text("y".into())));
}

#[test]
fn table_filter_keeps_order_and_shape() {
    let vs = fast_builder(Arc::new(MockSource::new())).build().unwrap();
    let table = Table::from_records(&rows(), None).unwrap();
    let set = FilterSet::new(vec![FilterCondition::new("B", "ge", 10)], CombineMode::And);
    let out = vs.filter_table(&table, &set).unwrap();
    assert_eq!(out.height(), 2);
    assert_eq!(out.column_names(), table.column_names());
    assert_eq!(out.to_records()[1], rows()[2]);
}
