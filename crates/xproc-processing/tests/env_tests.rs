mod support;

use serde_json::json;
use support::{eager_env, resolved_env, single_file, top_level_type};
use xproc_common::diagnostics::{DiagnosticCategory, diagnostic_codes};
use xproc_common::{PrimitiveKind, TypeName};
use xproc_processing::{Backend, BackendKind, NativeType, ProcessingError};
use xproc_symbols::Fixture;
use xproc_symbols::eager::EagerDeclKind;

fn fixture() -> Fixture {
    Fixture::from_value(json!({
        "options": { "xproc.verbose": "true", "xproc.prefix": "Gen" },
        "files": [{
            "name": "Foo.kt",
            "package": "foo",
            "declarations": [
                { "kind": "class", "name": "Widget" },
                { "kind": "property", "name": "names", "type": { "name": "List", "args": ["String"] } },
                { "kind": "property", "name": "count", "type": "Int" }
            ]
        }]
    }))
    .expect("valid fixture")
}

#[test]
fn test_options_are_exposed() {
    let fixture = fixture();
    for env in support::both_envs(&fixture) {
        assert_eq!(env.options().get("xproc.prefix"), Some("Gen"));
        assert!(env.options().flag("xproc.verbose", false));
        assert!(!env.options().flag("xproc.missing", false));
    }
}

#[test]
fn test_eager_builtin_types() {
    let env = eager_env(&fixture());
    let builtins = env.builtin_types();
    assert_eq!(builtins.len(), 16);
    let names: Vec<&str> = builtins.keys().map(String::as_str).collect();
    assert_eq!(&names[..4], ["kotlin.Any", "kotlin.Nothing", "kotlin.Unit", "kotlin.Number"]);
    assert!(builtins.contains_key("kotlin.Int"));
    assert!(builtins.contains_key("kotlin.String"));
    assert!(builtins.contains_key("kotlin.collections.Iterable<kotlin.Any>"));
    assert!(builtins.values().all(|native| native.backend_kind() == BackendKind::Eager));
}

#[test]
fn test_resolved_builtin_types() {
    let env = resolved_env(&fixture());
    let names: Vec<&str> = env.builtin_types().keys().map(String::as_str).collect();
    assert_eq!(
        names,
        [
            "boolean",
            "byte",
            "short",
            "int",
            "long",
            "char",
            "float",
            "double",
            "java.lang.Object",
            "java.lang.String"
        ]
    );
}

#[test]
fn test_builtin_cache_is_built_once() {
    let env = eager_env(&fixture());
    let first = env.builtin_types();
    let second = env.builtin_types();
    assert!(std::ptr::eq(first, second));
}

#[test]
fn test_builtin_primitive() {
    let eager = eager_env(&fixture());
    let int = eager.builtin_primitive(PrimitiveKind::Int).expect("kotlin.Int");
    assert_eq!(int.type_name().to_string(), "kotlin.Int");
    assert_eq!(int, top_level_type(&eager, "count"));

    let resolved = resolved_env(&fixture());
    let int = resolved.builtin_primitive(PrimitiveKind::Int).expect("int");
    assert_eq!(int.type_name(), &TypeName::Primitive(PrimitiveKind::Int));
    assert_eq!(int, top_level_type(&resolved, "count"));
}

#[test]
fn test_find_type_prefers_builtins() {
    let eager = eager_env(&fixture());
    let string = eager.find_type("kotlin.String").expect("kotlin.String");
    assert_eq!(string.native(), Some(eager.builtin_types()["kotlin.String"]));

    let resolved = resolved_env(&fixture());
    let object = resolved.find_type("java.lang.Object").expect("Object");
    assert_eq!(object.native(), Some(resolved.builtin_types()["java.lang.Object"]));
}

#[test]
fn test_find_type_falls_back_to_declarations() {
    let fixture = fixture();
    for env in support::both_envs(&fixture) {
        let widget = env.find_type("foo.Widget").expect("Widget");
        assert_eq!(widget.type_name().to_string(), "foo.Widget");
        assert!(widget.is_type_of("foo.Widget"));
        assert!(env.find_type("foo.Missing").is_none());
    }

    let eager = eager_env(&fixture);
    assert!(eager.find_type("foo.names").is_none());
}

#[test]
fn test_unqualified_names_retry_in_builtins_package() {
    let eager = eager_env(&fixture());
    assert_eq!(
        eager.find_declaration("Int").map(|found| found.to_string()).as_deref(),
        Some("kotlin.Int")
    );
    assert_eq!(
        eager.find_declaration("int").map(|found| found.to_string()).as_deref(),
        Some("kotlin.Int")
    );
    let int = eager.find_type("int").expect("int");
    assert_eq!(Some(int), eager.builtin_primitive(PrimitiveKind::Int));
    assert!(eager.find_declaration("Widget").is_none());

    let resolved = resolved_env(&fixture());
    assert_eq!(
        resolved.find_declaration("String").map(|found| found.to_string()).as_deref(),
        Some("java.lang.String")
    );
    assert!(resolved.find_declaration("Widget").is_none());
}

#[test]
fn test_require_reports_not_found() {
    let fixture = fixture();
    for env in support::both_envs(&fixture) {
        let error = env.require_type("foo.Missing").expect_err("missing type");
        assert_eq!(error, ProcessingError::NotFound("foo.Missing".to_string()));
        let diagnostic = error.to_diagnostic();
        assert_eq!(diagnostic.code, diagnostic_codes::SYMBOL_NOT_FOUND);
        assert_eq!(diagnostic.category, DiagnosticCategory::Warning);
        assert_eq!(diagnostic.message_text, "Cannot find 'foo.Missing'.");

        assert!(env.require_declaration("foo.Missing").is_err());
        assert_eq!(
            env.require_declaration("foo.Widget").map(|found| found.to_string()),
            Ok("foo.Widget".to_string())
        );
    }
}

#[test]
fn test_mixing_back_ends_is_rejected() {
    let fixture = fixture();
    let eager = eager_env(&fixture);
    let resolved = resolved_env(&fixture);
    let eager_count = top_level_type(&eager, "count");
    let resolved_count = top_level_type(&resolved, "count");

    let error = eager_count
        .is_assignable_from(&resolved_count)
        .expect_err("mixed back ends");
    assert_eq!(
        error,
        ProcessingError::backend_mismatch("is_assignable_from", BackendKind::Eager, BackendKind::Resolved)
    );
    assert_eq!(
        error.to_diagnostic().message_text,
        "'is_assignable_from' cannot mix a eager type with a resolved type."
    );

    assert_eq!(
        resolved_count.is_same_type(&eager_count),
        Err(ProcessingError::backend_mismatch(
            "is_same_type",
            BackendKind::Resolved,
            BackendKind::Eager
        ))
    );
}

#[test]
fn test_wrapping_foreign_natives_is_rejected() {
    let fixture = fixture();
    let eager = eager_env(&fixture);
    let resolved = resolved_env(&fixture);
    let foreign: NativeType = top_level_type(&resolved, "count").native().expect("resolved native");

    assert_eq!(
        eager.wrap(foreign).map(|ty| ty.to_string()),
        Err(ProcessingError::backend_mismatch("wrap", BackendKind::Eager, BackendKind::Resolved))
    );
    assert!(resolved.wrap(foreign).is_ok());
}

#[test]
fn test_wrap_reference() {
    let eager = eager_env(&fixture());
    let Backend::Eager(symbols) = eager.backend() else {
        panic!("eager back end");
    };
    let id = symbols.find_declaration("foo.names").expect("names");
    let EagerDeclKind::Property { ty: Some(reference) } = &symbols.declaration(id).kind else {
        panic!("typed property");
    };
    let wrapped = eager.wrap_reference(*reference).expect("eager reference");
    assert_eq!(wrapped, top_level_type(&eager, "names"));
    assert_eq!(
        wrapped.type_name().to_string(),
        "kotlin.collections.List<kotlin.String>"
    );

    let resolved = resolved_env(&fixture());
    assert!(resolved.wrap_reference(*reference).is_err());
}
