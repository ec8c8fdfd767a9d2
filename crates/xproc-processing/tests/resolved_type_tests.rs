mod support;

use rustc_hash::FxHashSet;
use serde_json::json;
use support::{resolved_env, single_file, top_level_type};
use xproc_common::{PrimitiveKind, TypeName};
use xproc_processing::Nullability;

fn properties() -> xproc_symbols::Fixture {
    single_file(json!([
        { "kind": "property", "name": "names", "type": { "name": "List", "args": ["String?"] } },
        { "kind": "property", "name": "integers", "type": { "name": "List", "args": ["Int"] } },
        { "kind": "property", "name": "numbers",
          "type": { "name": "List", "args": [{ "variance": "out", "type": "Number" }] } },
        { "kind": "property", "name": "sinks",
          "type": { "name": "List", "args": [{ "variance": "in", "type": "Int" }] } },
        { "kind": "property", "name": "stars", "type": { "name": "List", "args": ["*"] } },
        { "kind": "property", "name": "broken", "type": { "name": "List", "args": ["IDontExist"] } },
        { "kind": "property", "name": "brokenBound",
          "type": { "name": "List", "args": [{ "variance": "out", "type": "IDontExist" }] } },
        { "kind": "property", "name": "nestedBroken",
          "type": { "name": "List", "args": [{ "name": "List", "args": ["IDontExist"] }] } },
        { "kind": "property", "name": "map", "type": { "name": "Map", "args": ["String", "Int"] } },
        { "kind": "property", "name": "array", "type": { "name": "Array", "args": ["Int"] } },
        { "kind": "property", "name": "intProp", "type": "Int" },
        { "kind": "property", "name": "nullableIntProp", "type": "Int?" },
        { "kind": "property", "name": "longProp", "type": "Long" },
        { "kind": "property", "name": "nullableLongProp", "type": "Long?" },
        { "kind": "property", "name": "byteProp", "type": "Byte" },
        { "kind": "property", "name": "booleanProp", "type": "Boolean" },
        { "kind": "property", "name": "floatProp", "type": "Float" },
        { "kind": "property", "name": "doubleProp", "type": "Double" },
        { "kind": "property", "name": "stringProp", "type": "String" },
        { "kind": "property", "name": "nullableStringProp", "type": "String?" },
        { "kind": "property", "name": "numberProp", "type": "Number" },
        { "kind": "property", "name": "anyProp", "type": "Any?" },
        { "kind": "property", "name": "errorProp", "type": "IDontExist" },
        { "kind": "property", "name": "otherErrorProp", "type": "IDontExist" },
        { "kind": "property", "name": "lambda", "type": { "raw": "(Int) -> Unit" } },
        { "kind": "function", "name": "run" },
        { "kind": "function", "name": "unit", "type": "Unit" },
        { "kind": "type_alias", "name": "Names", "type": { "name": "List", "args": ["String"] } },
        { "kind": "property", "name": "aliased", "type": "Names" },
        { "kind": "class", "name": "Box",
          "type_parameters": [{ "name": "T", "bounds": ["Number"] }],
          "members": [{ "kind": "property", "name": "value", "type": "T" }] }
    ]))
}

#[test]
fn test_generic_argument_is_boxed_and_unannotated() {
    let env = resolved_env(&properties());
    let names = top_level_type(&env, "names");
    assert_eq!(names.type_name().to_string(), "java.util.List<java.lang.String>");
    assert_eq!(names.nullability(), Nullability::NonNull);
    let arguments = names.type_arguments();
    assert_eq!(arguments.len(), 1);
    assert_eq!(arguments[0].nullability(), Nullability::Unknown);

    let integers = top_level_type(&env, "integers");
    assert_eq!(integers.type_name().to_string(), "java.util.List<java.lang.Integer>");
}

#[test]
fn test_unresolved_element_type() {
    let env = resolved_env(&properties());
    let broken = top_level_type(&env, "broken");
    assert!(!broken.is_error());
    let arguments = broken.type_arguments();
    assert_eq!(arguments.len(), 1);
    assert!(arguments[0].is_error());
    assert!(!arguments[0].is_none());
    assert_eq!(arguments[0].type_name(), &TypeName::class("", "IDontExist"));
}

#[test]
fn test_primitive_properties() {
    let env = resolved_env(&properties());
    let int = top_level_type(&env, "intProp");
    assert_eq!(int.type_name(), &TypeName::Primitive(PrimitiveKind::Int));
    assert_eq!(int.nullability(), Nullability::NonNull);

    let nullable_int = top_level_type(&env, "nullableIntProp");
    assert_eq!(nullable_int.type_name().to_string(), "java.lang.Integer");
    assert_eq!(nullable_int.nullability(), Nullability::Nullable);

    let string = top_level_type(&env, "stringProp");
    assert_eq!(string.nullability(), Nullability::NonNull);
    let nullable_string = top_level_type(&env, "nullableStringProp");
    assert_eq!(nullable_string.nullability(), Nullability::Nullable);
}

#[test]
fn test_raw_type_and_erasure() {
    let env = resolved_env(&properties());
    let map = top_level_type(&env, "map");
    assert_eq!(
        map.type_name().to_string(),
        "java.util.Map<java.lang.String, java.lang.Integer>"
    );

    let raw = map.raw_type();
    assert_ne!(raw, &map);
    assert!(raw.is_raw());
    assert!(raw.type_arguments().is_empty());
    assert_eq!(raw.type_name().to_string(), "java.util.Map");

    let erased = map.erasure();
    assert!(!erased.is_raw());
    assert_ne!(erased, raw);
    assert_eq!(erased.type_name().to_string(), "java.util.Map");
    assert_eq!(erased.erasure(), erased);
    assert_eq!(erased.nullability(), map.nullability());
}

#[test]
fn test_wildcard_arguments() {
    let env = resolved_env(&properties());
    let numbers = top_level_type(&env, "numbers");
    assert_eq!(
        numbers.type_name().to_string(),
        "java.util.List<? extends java.lang.Number>"
    );
    let bound = numbers.type_arguments()[0]
        .extends_bound()
        .expect("extends bound");
    assert_eq!(bound.type_name().to_string(), "java.lang.Number");

    let sinks = top_level_type(&env, "sinks");
    assert_eq!(sinks.type_name().to_string(), "java.util.List<? super java.lang.Integer>");
    assert!(sinks.type_arguments()[0].extends_bound().is_none());

    let stars = top_level_type(&env, "stars");
    assert_eq!(stars.type_name().to_string(), "java.util.List<?>");
    assert!(stars.type_arguments()[0].extends_bound().is_none());
}

#[test]
fn test_array_type() {
    let env = resolved_env(&properties());
    let array = top_level_type(&env, "array");
    assert_eq!(array.type_name().to_string(), "java.lang.Integer[]");
    assert!(array.type_arguments().is_empty());
    assert!(!array.is_type());
}

#[test]
fn test_type_variable_and_wildcard_self_type() {
    let env = resolved_env(&properties());
    let value = support::member_type(&env, "Box", "value");
    assert_eq!(value.type_name(), &TypeName::Variable("T".to_string()));

    let boxed = env.find_type("foo.Box").expect("Box");
    assert_eq!(boxed.type_name().to_string(), "foo.Box<?>");
    assert_eq!(boxed.erasure().type_name().to_string(), "foo.Box");
}

#[test]
fn test_alias_is_expanded() {
    let env = resolved_env(&properties());
    let aliased = top_level_type(&env, "aliased");
    assert_eq!(aliased.type_name().to_string(), "java.util.List<java.lang.String>");
}

#[test]
fn test_is_type_checks() {
    let env = resolved_env(&properties());
    let flags = |name: &str| {
        let ty = top_level_type(&env, name);
        [
            ("isInt", ty.is_int()),
            ("isLong", ty.is_long()),
            ("isByte", ty.is_byte()),
            ("isError", ty.is_error()),
            ("isNone", ty.is_none()),
        ]
        .into_iter()
        .filter(|(_, set)| *set)
        .map(|(flag, _)| flag)
        .collect::<Vec<_>>()
    };
    assert_eq!(flags("intProp"), ["isInt"]);
    assert_eq!(flags("nullableIntProp"), ["isInt"]);
    assert_eq!(flags("longProp"), ["isLong"]);
    assert_eq!(flags("nullableLongProp"), ["isLong"]);
    assert_eq!(flags("byteProp"), ["isByte"]);
    assert_eq!(flags("numberProp"), Vec::<&str>::new());
    assert_eq!(flags("errorProp"), ["isError"]);
    assert_eq!(flags("lambda"), ["isError"]);
    assert_eq!(flags("run"), ["isNone"]);
    assert_eq!(flags("unit"), ["isNone"]);
}

#[test]
fn test_unparseable_and_void_names() {
    let env = resolved_env(&properties());
    assert!(top_level_type(&env, "lambda").type_name().is_undefined());
    assert!(top_level_type(&env, "run").type_name().is_undefined());
}

#[test]
fn test_default_values() {
    let env = resolved_env(&properties());
    let cases = [
        ("intProp", "0"),
        ("nullableIntProp", "null"),
        ("longProp", "0"),
        ("byteProp", "0"),
        ("booleanProp", "false"),
        ("floatProp", "0f"),
        ("doubleProp", "0.0"),
        ("stringProp", "null"),
        ("errorProp", "null"),
        ("run", "null"),
    ];
    for (name, expected) in cases {
        assert_eq!(top_level_type(&env, name).default_value(), expected, "{name}");
    }
}

#[test]
fn test_assignability_boxes_and_widens() {
    let env = resolved_env(&properties());
    let int = top_level_type(&env, "intProp");
    let long = top_level_type(&env, "longProp");
    let boxed_int = top_level_type(&env, "nullableIntProp");
    let number = top_level_type(&env, "numberProp");
    let object = top_level_type(&env, "anyProp");
    let string = top_level_type(&env, "stringProp");

    assert_eq!(number.is_assignable_from(&int), Ok(true));
    assert_eq!(int.is_assignable_from(&number), Ok(false));
    assert_eq!(boxed_int.is_assignable_from(&int), Ok(true));
    assert_eq!(int.is_assignable_from(&boxed_int), Ok(true));
    assert_eq!(long.is_assignable_from(&int), Ok(true));
    assert_eq!(int.is_assignable_from(&long), Ok(false));
    assert_eq!(object.is_assignable_from(&string), Ok(true));
    assert_eq!(string.is_assignable_from(&object), Ok(false));
}

#[test]
fn test_wildcard_containment() {
    let env = resolved_env(&properties());
    let numbers = top_level_type(&env, "numbers");
    let integers = top_level_type(&env, "integers");
    let sinks = top_level_type(&env, "sinks");

    assert_eq!(numbers.is_assignable_from(&integers), Ok(true));
    assert_eq!(integers.is_assignable_from(&numbers), Ok(false));
    assert_eq!(sinks.is_assignable_from(&integers), Ok(true));
}

#[test]
fn test_error_and_void_operands_are_never_assignable() {
    let env = resolved_env(&properties());
    let error = top_level_type(&env, "errorProp");
    let object = top_level_type(&env, "anyProp");
    let void = top_level_type(&env, "run");

    assert_eq!(object.is_assignable_from(&error), Ok(false));
    assert_eq!(error.is_assignable_from(&object), Ok(false));
    assert_eq!(error.is_assignable_from(&error), Ok(false));
    assert_eq!(object.is_assignable_from(&void), Ok(false));
    assert_eq!(void.is_same_type(&void), Ok(false));
}

#[test]
fn test_error_arguments_are_never_assignable() {
    let env = resolved_env(&properties());
    let integers = top_level_type(&env, "integers");
    let numbers = top_level_type(&env, "numbers");
    let broken = top_level_type(&env, "broken");
    let broken_bound = top_level_type(&env, "brokenBound");
    let nested = top_level_type(&env, "nestedBroken");

    assert_eq!(integers.is_assignable_from(&broken), Ok(false));
    assert_eq!(broken.is_assignable_from(&integers), Ok(false));
    assert_eq!(numbers.is_assignable_from(&broken_bound), Ok(false));
    assert_eq!(broken_bound.is_assignable_from(&integers), Ok(false));
    assert_eq!(nested.is_assignable_from(&nested), Ok(false));
    assert_eq!(numbers.is_assignable_from(&integers), Ok(true));
}

#[test]
fn test_same_type_and_equality() {
    let env = resolved_env(&properties());
    let int = top_level_type(&env, "intProp");
    let found = env.find_type("int").expect("int");
    assert_eq!(int.is_same_type(&found), Ok(true));
    assert_eq!(int, found);

    let error = top_level_type(&env, "errorProp");
    let again = top_level_type(&env, "errorProp");
    let other = top_level_type(&env, "otherErrorProp");
    assert_eq!(error, again);
    assert_ne!(error, other);
    assert_eq!(error.is_same_type(&again), Ok(false));
    assert_eq!(error.is_same_type(&other), Ok(false));
}

#[test]
fn test_hashing_agrees_with_equality() {
    let env = resolved_env(&properties());
    let string = top_level_type(&env, "stringProp");
    let native = string.native().expect("native");

    let mut set = FxHashSet::default();
    set.insert(env.wrap(native).expect("resolved type"));
    set.insert(env.wrap(native).expect("resolved type"));
    set.insert(string);
    assert_eq!(set.len(), 1);

    let error = top_level_type(&env, "errorProp");
    let other = top_level_type(&env, "otherErrorProp");
    set.insert(error.clone());
    set.insert(top_level_type(&env, "errorProp"));
    set.insert(other);
    assert_eq!(set.len(), 3);
    assert!(set.contains(&error));
}

#[test]
fn test_conversions() {
    let env = resolved_env(&properties());
    let int = top_level_type(&env, "intProp");
    let boxed = int.boxed();
    assert_eq!(boxed.type_name().to_string(), "java.lang.Integer");
    assert!(boxed.is_int());
    assert!(!int.is_type());
    assert!(boxed.is_type_of("java.lang.Integer"));

    let string = top_level_type(&env, "stringProp");
    assert_eq!(string.boxed(), string);

    let names = top_level_type(&env, "names");
    assert!(names.is_type_of("java.util.List"));
    let declaration = names.as_declaration().expect("List element");
    assert_eq!(declaration.qualified_name(), Ok("java.util.List"));
    assert!(declaration.is_interface());
}
