use nova_config::json_schema;

#[test]
fn schema_bounds_array_dimensions() {
    let schema = serde_json::to_value(json_schema()).unwrap();
    let store = &schema["definitions"]["StoreConfig"];
    let dims = &store["properties"]["max_array_dimensions"];

    assert_eq!(dims["minimum"], serde_json::json!(1.0));
    assert_eq!(dims["maximum"], serde_json::json!(255.0));
    assert_eq!(store["additionalProperties"], serde_json::json!(false));
}

#[test]
fn schema_documents_fields() {
    let schema = serde_json::to_value(json_schema()).unwrap();
    let logging = &schema["definitions"]["LoggingConfig"]["properties"];
    assert_eq!(
        logging["json"]["description"],
        serde_json::json!("Emit logs in JSON format.")
    );
}
