use super::*;

#[test]
fn test_best_guess_default_package() {
    let name = ClassName::best_guess("IDontExist").expect("capitalized name");
    assert_eq!(name.package_name(), "");
    assert_eq!(name.simple_name(), "IDontExist");
    assert_eq!(name.canonical_name(), "IDontExist");
}

#[test]
fn test_best_guess_nested_in_package() {
    let name = ClassName::best_guess("foo.bar.Outer.Inner").expect("valid name");
    assert_eq!(name.package_name(), "foo.bar");
    assert_eq!(name.simple_names(), ["Outer", "Inner"]);
    assert_eq!(name, ClassName::new("foo.bar", "Outer").nested("Inner"));
}

#[test]
fn test_best_guess_rejects_lowercase_and_garbage() {
    assert_eq!(ClassName::best_guess("foo.bar"), None);
    assert_eq!(ClassName::best_guess(""), None);
    assert_eq!(ClassName::best_guess("(Int) -> Unit"), None);
    assert_eq!(ClassName::best_guess("foo..Bar"), None);
}

#[test]
fn test_undefined_name() {
    let undefined = TypeName::undefined();
    assert!(undefined.is_undefined());
    assert_eq!(
        undefined.to_string(),
        format!("{UNDEFINED_PACKAGE}.{UNDEFINED_SIMPLE_NAME}")
    );
    assert!(!TypeName::class("", UNDEFINED_SIMPLE_NAME).is_undefined());
}

#[test]
fn test_parameterized_display_and_raw() {
    let map = TypeName::Parameterized {
        raw: ClassName::new("kotlin.collections", "Map"),
        arguments: vec![
            TypeName::class("kotlin", "String"),
            TypeName::Parameterized {
                raw: ClassName::new("kotlin.collections", "List"),
                arguments: vec![TypeName::class("kotlin", "Int")],
            },
        ],
    };
    assert_eq!(
        map.to_string(),
        "kotlin.collections.Map<kotlin.String, kotlin.collections.List<kotlin.Int>>"
    );
    assert_eq!(map.raw(), TypeName::class("kotlin.collections", "Map"));
}

#[test]
fn test_wildcard_primitive_array_display() {
    assert_eq!(TypeName::wildcard().to_string(), "?");
    let bounded = TypeName::Wildcard {
        upper: Some(Box::new(TypeName::class("java.lang", "Number"))),
        lower: None,
    };
    assert_eq!(bounded.to_string(), "? extends java.lang.Number");
    let lower = TypeName::Wildcard {
        upper: None,
        lower: Some(Box::new(TypeName::Variable("T".into()))),
    };
    assert_eq!(lower.to_string(), "? super T");
    let array = TypeName::Array(Box::new(TypeName::Primitive(PrimitiveKind::Int)));
    assert_eq!(array.to_string(), "int[]");
}

#[test]
fn test_leading_identifier() {
    assert_eq!(leading_identifier("List<Foo>?"), Some("List"));
    assert_eq!(leading_identifier("  foo.Bar "), Some("foo.Bar"));
    assert_eq!(leading_identifier("foo..Bar"), Some("foo"));
    assert_eq!(leading_identifier("(Int) -> Unit"), None);
    assert_eq!(leading_identifier(""), None);
}
