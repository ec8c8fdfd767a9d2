use super::*;

#[test]
fn test_parse_assignment() {
    assert_eq!(
        parse_assignment("room.schemaLocation=/tmp/a=b"),
        Ok(("room.schemaLocation".to_string(), "/tmp/a=b".to_string()))
    );
    assert_eq!(
        parse_assignment("novalue"),
        Err(OptionParseError::MissingSeparator("novalue".to_string()))
    );
    assert_eq!(
        parse_assignment(" =x"),
        Err(OptionParseError::EmptyKey(" =x".to_string()))
    );
}

#[test]
fn test_flag_reading() {
    let options: ProcessingOptions = [("a", "TRUE"), ("b", "off"), ("c", "maybe")]
        .into_iter()
        .collect();
    assert!(options.flag("a", false));
    assert!(!options.flag("b", true));
    assert!(options.flag("c", true));
    assert!(!options.flag("missing", false));
}

#[test]
fn test_merge_overrides_and_keeps_order() {
    let mut base: ProcessingOptions = [("a", "1"), ("b", "2")].into_iter().collect();
    let overrides: ProcessingOptions = [("b", "3"), ("c", "4")].into_iter().collect();
    base.merge(&overrides);
    let entries: Vec<_> = base.iter().collect();
    assert_eq!(entries, vec![("a", "1"), ("b", "3"), ("c", "4")]);
}

#[test]
fn test_deserialize_from_json_object() {
    let options: ProcessingOptions =
        serde_json::from_str(r#"{"x": "1", "y": "two"}"#).expect("valid options");
    assert_eq!(options.get("y"), Some("two"));
    assert_eq!(options.len(), 2);
}
