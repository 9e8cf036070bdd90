use valuscope_types::{CombineMode, FilterCondition, FilterSet, Value};

#[test]
fn filter_set_decodes_from_caller_json() {
    let set: FilterSet = serde_json::from_str(
        r#"{
            "conditions": [
                {"column": "industry", "operator": "in", "value": ["银行", "保险"]},
                {"column": "list_date", "operator": "lt", "value": "2010-01-01", "data_type": "date"},
                {"column": "pe", "value": 12.5}
            ],
            "mode": "or"
        }"#,
    )
    .expect("deserialize filter set");

    assert_eq!(set.mode, CombineMode::Or);
    assert_eq!(set.conditions.len(), 3);
    assert_eq!(
        set.conditions[0].value,
        Value::List(vec![Value::Text("银行".into()), Value::Text("保险".into())])
    );
    assert_eq!(set.conditions[1].data_type.as_deref(), Some("date"));
    assert_eq!(set.conditions[2].operator, "eq");
    assert_eq!(set.conditions[2].value, Value::Float(12.5));
}

#[test]
fn mode_defaults_to_and() {
    let set: FilterSet = serde_json::from_str(r#"{"conditions": []}"#).expect("deserialize");
    assert_eq!(set.mode, CombineMode::And);
    assert!(set.is_empty());
}

#[test]
fn condition_serializes_without_absent_data_type() {
    let json = serde_json::to_value(FilterCondition::new("A", "eq", "x")).expect("serialize");
    assert!(json.get("data_type").is_none());
}
