use super::*;

#[test]
fn parses_bare_and_quoted_strings() {
    let value = parse("{ name = App; path = \"My App\"; }").unwrap();
    assert_eq!(value.get("name").unwrap().as_str(), Some("App"));
    assert_eq!(value.get("path").unwrap().as_str(), Some("My App"));
}

#[test]
fn bare_atoms_may_contain_dots_dollars_and_slashes() {
    let value = parse("{ shellPath = /bin/sh; version = 5.9.1; expand = $BUILT_PRODUCTS_DIR; }")
        .unwrap();
    assert_eq!(value.get("shellPath").unwrap().as_str(), Some("/bin/sh"));
    assert_eq!(value.get("version").unwrap().as_str(), Some("5.9.1"));
    assert_eq!(
        value.get("expand").unwrap().as_str(),
        Some("$BUILT_PRODUCTS_DIR")
    );
}

#[test]
fn decodes_escape_sequences() {
    let value = parse(r#"{ script = "echo \"hi\"\n\tdone\\"; }"#).unwrap();
    assert_eq!(
        value.get("script").unwrap().as_str(),
        Some("echo \"hi\"\n\tdone\\")
    );
}

#[test]
fn rejects_unknown_escape() {
    let err = parse(r#"{ bad = "a\qb"; }"#).unwrap_err();
    assert!(matches!(err, PlistError::InvalidEscape { escape: 'q', .. }));
}

#[test]
fn arrays_accept_trailing_comma() {
    let with_trailing = parse("( a, b, )").unwrap();
    let without = parse("( a, b )").unwrap();
    assert_eq!(with_trailing, without);
    assert_eq!(
        with_trailing.as_array().unwrap(),
        &[
            PlistValue::String("a".to_string()),
            PlistValue::String("b".to_string())
        ]
    );
    assert_eq!(parse("( )").unwrap().as_array().unwrap().len(), 0);
}

#[test]
fn comments_are_discarded() {
    let input = "// !$*UTF8*$!\n{\n\tkey = A1 /* App.swift */;\n\t/* Begin section */\n\tother = B2; // tail\n}";
    let value = parse(input).unwrap();
    assert_eq!(value.get("key").unwrap().as_str(), Some("A1"));
    assert_eq!(value.get("other").unwrap().as_str(), Some("B2"));
}

#[test]
fn nested_structures_parse() {
    let input = "{ objects = { A = { isa = PBXGroup; children = ( B, C, ); }; }; rootObject = R; }";
    let value = parse(input).unwrap();
    let objects = value.get("objects").unwrap();
    let record = objects.get("A").unwrap();
    assert_eq!(record.get("isa").unwrap().as_str(), Some("PBXGroup"));
    assert_eq!(record.get("children").unwrap().as_array().unwrap().len(), 2);
}

#[test]
fn dict_preserves_textual_order() {
    let value = parse("{ zebra = 1; alpha = 2; middle = 3; }").unwrap();
    let keys: Vec<&str> = value
        .as_dict()
        .unwrap()
        .iter()
        .map(|(key, _)| key.as_str())
        .collect();
    assert_eq!(keys, ["zebra", "alpha", "middle"]);
}

#[test]
fn reports_missing_semicolon() {
    let err = parse("{ key = value }").unwrap_err();
    assert!(matches!(
        err,
        PlistError::UnexpectedToken { expected: "';'", .. }
    ));
}

#[test]
fn reports_unterminated_string_and_comment() {
    assert!(matches!(
        parse("{ key = \"open; }"),
        Err(PlistError::UnterminatedString { .. })
    ));
    assert!(matches!(
        parse("{ /* open\n key = v; }"),
        Err(PlistError::UnterminatedComment { .. })
    ));
}

#[test]
fn reports_eof_inside_dict() {
    assert!(matches!(
        parse("{ key = value;"),
        Err(PlistError::UnexpectedEof { .. })
    ));
}

#[test]
fn rejects_binary_data_literals() {
    let err = parse("{ blob = <0fbd777f>; }").unwrap_err();
    assert!(matches!(err, PlistError::DataUnsupported { .. }));
}

#[test]
fn rejects_trailing_content() {
    let err = parse("{ key = value; } extra").unwrap_err();
    assert!(matches!(err, PlistError::TrailingContent { .. }));
}

#[test]
fn error_positions_point_at_input() {
    let err = parse("{\n\tkey = value\n}").unwrap_err();
    match err {
        PlistError::UnexpectedToken { at, .. } => {
            assert_eq!(at, Position { line: 3, column: 1 });
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // columns count from 1 on the offending line
    let err = parse("{ key = value trailing; }").unwrap_err();
    match err {
        PlistError::UnexpectedToken { at, .. } => {
            assert_eq!(at, Position { line: 1, column: 15 });
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn quote_leaves_safe_atoms_bare() {
    assert_eq!(quote("App.swift"), "App.swift");
    assert_eq!(quote("Sources/App.swift"), "Sources/App.swift");
    assert_eq!(quote("$TARGET_NAME"), "$TARGET_NAME");
    assert_eq!(quote("2147483647"), "2147483647");
}

#[test]
fn quote_wraps_and_escapes() {
    assert_eq!(quote(""), "\"\"");
    assert_eq!(quote("My App"), "\"My App\"");
    assert_eq!(quote("<group>"), "\"<group>\"");
    assert_eq!(quote("com.apple.product-type.application").starts_with('"'), true);
    assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
    assert_eq!(quote("a\\b"), "\"a\\\\b\"");
    assert_eq!(quote("line1\nline2"), "\"line1\\nline2\"");
    assert_eq!(quote("col\tumn"), "\"col\\tumn\"");
    assert_eq!(quote("$(TARGET_NAME)"), "\"$(TARGET_NAME)\"");
}

#[test]
fn quoted_round_trip_through_parser() {
    let original = "swiftlint lint\n\techo \"done\"";
    let emitted = format!("{{ script = {}; }}", quote(original));
    let value = parse(&emitted).unwrap();
    assert_eq!(value.get("script").unwrap().as_str(), Some(original));
}
