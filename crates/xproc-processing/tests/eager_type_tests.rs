mod support;

use serde_json::json;
use rustc_hash::FxHashSet;
use support::{eager_env, single_file, top_level_type};
use xproc_common::TypeName;
use xproc_processing::{Backend, Nullability};
use xproc_symbols::eager::EagerDeclKind;

fn properties() -> xproc_symbols::Fixture {
    single_file(json!([
        { "kind": "property", "name": "names", "type": { "name": "List", "args": ["String?"] } },
        { "kind": "property", "name": "broken", "type": { "name": "List", "args": ["IDontExist"] } },
        { "kind": "property", "name": "strings", "type": { "name": "List", "args": ["String"] } },
        { "kind": "property", "name": "map", "type": { "name": "Map", "args": ["String", "Int"] } },
        { "kind": "property", "name": "stars", "type": { "name": "List", "args": ["*"] } },
        { "kind": "property", "name": "intProp", "type": "Int" },
        { "kind": "property", "name": "nullableIntProp", "type": "Int?" },
        { "kind": "property", "name": "longProp", "type": "Long" },
        { "kind": "property", "name": "nullableLongProp", "type": "Long?" },
        { "kind": "property", "name": "byteProp", "type": "Byte" },
        { "kind": "property", "name": "nullableByteProp", "type": "Byte?" },
        { "kind": "property", "name": "shortProp", "type": "Short" },
        { "kind": "property", "name": "charProp", "type": "Char" },
        { "kind": "property", "name": "booleanProp", "type": "Boolean" },
        { "kind": "property", "name": "nullableBooleanProp", "type": "Boolean?" },
        { "kind": "property", "name": "floatProp", "type": "Float" },
        { "kind": "property", "name": "doubleProp", "type": "Double" },
        { "kind": "property", "name": "stringProp", "type": "String" },
        { "kind": "property", "name": "nullableStringProp", "type": "String?" },
        { "kind": "property", "name": "numberProp", "type": "Number" },
        { "kind": "property", "name": "anyProp", "type": "Any?" },
        { "kind": "property", "name": "errorProp", "type": "IDontExist" },
        { "kind": "property", "name": "nullableErrorProp", "type": "IDontExist?" },
        { "kind": "property", "name": "otherErrorProp", "type": "IDontExist" },
        { "kind": "property", "name": "lambda", "type": { "raw": "(Int) -> Unit" } },
        { "kind": "type_alias", "name": "Names", "type": { "name": "List", "args": ["String"] } },
        { "kind": "property", "name": "aliased", "type": "Names" },
        { "kind": "type_alias", "name": "Pairs", "type": { "name": "Map", "args": ["Missing", "Missing"] } },
        { "kind": "property", "name": "pairs", "type": "Pairs" },
        { "kind": "property", "name": "writtenPairs", "type": { "name": "Map", "args": ["Missing", "Missing"] } },
        { "kind": "class", "name": "Box",
          "type_parameters": [{ "name": "T", "bounds": ["Number"] }],
          "members": [{ "kind": "property", "name": "value", "type": "T" }] }
    ]))
}

#[test]
fn test_generic_nullable_argument() {
    let env = eager_env(&properties());
    let names = top_level_type(&env, "names");
    assert_eq!(names.type_name().to_string(), "kotlin.collections.List<kotlin.String>");
    assert_eq!(names.nullability(), Nullability::NonNull);
    let arguments = names.type_arguments();
    assert_eq!(arguments.len(), 1);
    assert_eq!(arguments[0].nullability(), Nullability::Nullable);
    assert_eq!(arguments[0].type_name().to_string(), "kotlin.String");
}

#[test]
fn test_unresolved_element_type() {
    let env = eager_env(&properties());
    let broken = top_level_type(&env, "broken");
    assert!(!broken.is_error());
    let arguments = broken.type_arguments();
    assert_eq!(arguments.len(), 1);
    assert!(arguments[0].is_error());
    assert!(!arguments[0].is_none());
    assert_eq!(arguments[0].type_name(), &TypeName::class("", "IDontExist"));
    assert_eq!(arguments[0].nullability(), Nullability::Unknown);
}

#[test]
fn test_raw_type_distinctness() {
    let env = eager_env(&properties());
    let map = top_level_type(&env, "map");
    assert_eq!(
        map.type_name().to_string(),
        "kotlin.collections.Map<kotlin.String, kotlin.Int>"
    );
    let raw = map.raw_type();
    assert_ne!(raw, &map);
    assert!(raw.type_arguments().is_empty());
    assert_eq!(raw.type_name().to_string(), "kotlin.collections.Map");
    assert_eq!(raw.raw_type(), raw);
}

#[test]
fn test_non_generic_raw_type_is_self() {
    let env = eager_env(&properties());
    let string = top_level_type(&env, "stringProp");
    assert!(std::ptr::eq(string.raw_type(), &string));
    assert!(std::ptr::eq(string.erasure(), &string));
}

#[test]
fn test_erasure_is_idempotent() {
    let env = eager_env(&properties());
    let map = top_level_type(&env, "map");
    let erased = map.erasure();
    assert_ne!(erased, &map);
    assert!(erased.type_arguments().is_empty());
    assert_eq!(erased.type_name().to_string(), "kotlin.collections.Map");
    assert_eq!(erased.erasure(), erased);
    assert!(!erased.is_raw());
}

#[test]
fn test_type_parameter_and_star_projected_self_type() {
    let env = eager_env(&properties());
    let value = support::member_type(&env, "Box", "value");
    assert_eq!(value.type_name(), &TypeName::Variable("T".to_string()));
    assert!(value.type_arguments().is_empty());
    let boxed = env.find_type("foo.Box").expect("Box");
    assert_eq!(boxed.type_name().to_string(), "foo.Box<kotlin.Number>");
    assert_eq!(boxed.erasure().type_name().to_string(), "foo.Box");
}

#[test]
fn test_star_argument_is_its_bound() {
    let env = eager_env(&properties());
    let stars = top_level_type(&env, "stars");
    let arguments = stars.type_arguments();
    assert_eq!(arguments.len(), 1);
    assert_eq!(arguments[0].type_name().to_string(), "kotlin.Any");
    assert_eq!(arguments[0].nullability(), Nullability::Nullable);
}

#[test]
fn test_alias_uses_resolved_arguments() {
    let env = eager_env(&properties());
    let aliased = top_level_type(&env, "aliased");
    assert_eq!(aliased.type_name().to_string(), "kotlin.collections.List<kotlin.String>");
    let arguments = aliased.type_arguments();
    assert_eq!(arguments.len(), 1);
    assert_eq!(arguments[0].type_name().to_string(), "kotlin.String");
}

#[test]
fn test_is_type_checks() {
    let env = eager_env(&properties());
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
    assert_eq!(flags("nullableByteProp"), ["isByte"]);
    assert_eq!(flags("errorProp"), ["isError"]);
    assert_eq!(flags("nullableErrorProp"), ["isError"]);
    assert_eq!(flags("lambda"), ["isError", "isNone"]);
}

#[test]
fn test_default_values() {
    let env = eager_env(&properties());
    let cases = [
        ("intProp", "0"),
        ("nullableIntProp", "null"),
        ("longProp", "0"),
        ("nullableLongProp", "null"),
        ("byteProp", "0"),
        ("shortProp", "0"),
        ("charProp", "0"),
        ("booleanProp", "false"),
        ("nullableBooleanProp", "null"),
        ("floatProp", "0f"),
        ("doubleProp", "0.0"),
        ("stringProp", "null"),
        ("errorProp", "null"),
        ("lambda", "null"),
    ];
    for (name, expected) in cases {
        assert_eq!(top_level_type(&env, name).default_value(), expected, "{name}");
    }
}

#[test]
fn test_assignability() {
    let env = eager_env(&properties());
    let int = top_level_type(&env, "intProp");
    let nullable_int = top_level_type(&env, "nullableIntProp");
    let number = top_level_type(&env, "numberProp");
    let any = top_level_type(&env, "anyProp");
    let string = top_level_type(&env, "stringProp");
    let nullable_string = top_level_type(&env, "nullableStringProp");

    assert_eq!(number.is_assignable_from(&int), Ok(true));
    assert_eq!(int.is_assignable_from(&number), Ok(false));
    assert_eq!(nullable_int.is_assignable_from(&int), Ok(true));
    assert_eq!(int.is_assignable_from(&nullable_int), Ok(false));
    assert_eq!(any.is_assignable_from(&nullable_string), Ok(true));
    assert_eq!(string.is_assignable_from(&nullable_string), Ok(false));
}

#[test]
fn test_error_operands_are_never_assignable() {
    let env = eager_env(&properties());
    let error = top_level_type(&env, "errorProp");
    let any = top_level_type(&env, "anyProp");
    let int = top_level_type(&env, "intProp");
    let lambda = top_level_type(&env, "lambda");

    assert_eq!(any.is_assignable_from(&error), Ok(false));
    assert_eq!(error.is_assignable_from(&int), Ok(false));
    assert_eq!(error.is_assignable_from(&error), Ok(false));
    assert_eq!(any.is_assignable_from(&lambda), Ok(false));
}

#[test]
fn test_error_arguments_are_never_assignable() {
    let env = eager_env(&properties());
    let strings = top_level_type(&env, "strings");
    let broken = top_level_type(&env, "broken");

    assert_eq!(strings.is_assignable_from(&strings), Ok(true));
    assert_eq!(strings.is_assignable_from(&broken), Ok(false));
    assert_eq!(broken.is_assignable_from(&strings), Ok(false));
    assert_eq!(broken.is_assignable_from(&broken), Ok(false));
}

#[test]
fn test_same_type() {
    let env = eager_env(&properties());
    let string = top_level_type(&env, "stringProp");
    let again = top_level_type(&env, "stringProp");
    let nullable_string = top_level_type(&env, "nullableStringProp");
    let error = top_level_type(&env, "errorProp");
    let other_error = top_level_type(&env, "otherErrorProp");

    assert_eq!(string.is_same_type(&again), Ok(true));
    assert_eq!(string.is_same_type(&nullable_string), Ok(false));
    assert_eq!(error.is_same_type(&error), Ok(false));
    assert_eq!(error.is_same_type(&other_error), Ok(false));
}

#[test]
fn test_equality_follows_resolution() {
    let env = eager_env(&properties());
    let string = top_level_type(&env, "stringProp");
    let found = env.find_type("kotlin.String").expect("String");
    assert_eq!(string, found);

    let error = top_level_type(&env, "errorProp");
    let same_reference = top_level_type(&env, "errorProp");
    let other_error = top_level_type(&env, "otherErrorProp");
    assert_eq!(error, same_reference);
    assert_ne!(error, other_error);
    assert_eq!(error.type_name(), other_error.type_name());
}

#[test]
fn test_same_spelled_error_arguments_stay_distinct() {
    let env = eager_env(&properties());
    for name in ["pairs", "writtenPairs"] {
        let pairs = top_level_type(&env, name);
        let arguments = pairs.type_arguments();
        assert_eq!(arguments.len(), 2, "{name}");
        assert!(arguments[0].is_error() && arguments[1].is_error(), "{name}");
        assert_ne!(arguments[0], arguments[1], "{name}");
        assert_eq!(arguments[0].type_name(), arguments[1].type_name(), "{name}");

        let again = env.wrap(arguments[0].native().expect("native")).expect("eager type");
        assert_eq!(again, arguments[0], "{name}");

        let set: FxHashSet<_> = arguments.iter().cloned().collect();
        assert_eq!(set.len(), 2, "{name}");
    }
}

#[test]
fn test_hashing_agrees_with_equality() {
    let env = eager_env(&properties());
    let string = top_level_type(&env, "stringProp");
    let native = string.native().expect("native");
    let Backend::Eager(symbols) = env.backend() else {
        panic!("eager back end");
    };
    let id = symbols.find_declaration("foo.stringProp").expect("stringProp");
    let EagerDeclKind::Property { ty: Some(reference) } = &symbols.declaration(id).kind else {
        panic!("typed property");
    };

    let mut set = FxHashSet::default();
    set.insert(env.wrap(native).expect("eager type"));
    set.insert(env.wrap(native).expect("eager type"));
    set.insert(env.wrap_reference(*reference).expect("eager reference"));
    set.insert(string);
    assert_eq!(set.len(), 1);
}

#[test]
fn test_unparseable_reference() {
    let env = eager_env(&properties());
    let lambda = top_level_type(&env, "lambda");
    assert!(lambda.type_name().is_undefined());
    assert!(lambda.type_arguments().is_empty());
    assert_eq!(lambda.nullability(), Nullability::Unknown);
    assert!(!lambda.is_type());
}

#[test]
fn test_conversions() {
    let env = eager_env(&properties());
    let int = top_level_type(&env, "intProp");
    assert_eq!(int.boxed(), int);
    assert!(int.extends_bound().is_none());
    assert!(int.is_type());
    assert!(int.is_type_of("kotlin.Int"));

    let names = top_level_type(&env, "names");
    assert!(names.is_type_of("kotlin.collections.List"));
    let declaration = names.as_declaration().expect("List declaration");
    assert_eq!(declaration.qualified_name(), Ok("kotlin.collections.List"));
    assert!(declaration.is_interface());
}
