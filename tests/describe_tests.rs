use clap::Parser;
use serde_json::json;
use std::ffi::OsString;
use std::io::Write;
use xproc::cli::{BackendArg, CliArgs, Format, read_fixture, render, run};
use xproc::describe::{DeclarationReport, default_queries, describe_round, render_text};
use xproc::tracing_config::LogFormat;
use xproc::{BackendKind, Fixture, ProcessingOptions, build_env};

fn fixture_value() -> serde_json::Value {
    json!({
        "options": { "xproc.prefix": "Gen" },
        "files": [{
            "name": "Foo.kt",
            "package": "foo",
            "declarations": [
                { "kind": "interface", "name": "Shape" },
                { "kind": "class", "name": "Base", "modifiers": ["abstract"] },
                { "kind": "class", "name": "Square", "super_types": ["Base", "Shape"] },
                { "kind": "property", "name": "count", "type": "Int" },
                { "kind": "function", "name": "build", "type": "Square",
                  "members": [{ "kind": "class", "name": "Local" }] }
            ]
        }]
    })
}

fn fixture() -> Fixture {
    Fixture::from_value(fixture_value()).expect("valid fixture")
}

fn fixture_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(fixture_value().to_string().as_bytes())
        .expect("write fixture");
    file
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

#[test]
fn test_default_queries_are_top_level_class_likes() {
    assert_eq!(default_queries(&fixture()), ["foo.Shape", "foo.Base", "foo.Square"]);
}

#[test]
fn test_build_env_layers_options() {
    let mut options = ProcessingOptions::new();
    options.insert("xproc.prefix", "Cli");
    options.insert("xproc.verbose", "true");
    let env = build_env(&fixture(), BackendKind::Resolved, &options);
    assert_eq!(env.backend_kind(), BackendKind::Resolved);
    assert_eq!(env.options().get("xproc.prefix"), Some("Cli"));
    assert!(env.options().flag("xproc.verbose", false));

    let env = build_env(&fixture(), BackendKind::Eager, &ProcessingOptions::new());
    assert_eq!(env.options().get("xproc.prefix"), Some("Gen"));
}

#[test]
fn test_describe_declarations() {
    let fixture = fixture();
    for backend in [BackendKind::Eager, BackendKind::Resolved] {
        let env = build_env(&fixture, backend, &ProcessingOptions::new());
        let report = describe_round(&env, &[], &names(&["foo.Square", "foo.Base"]));
        assert_eq!(report.backend, backend.as_str());

        let square: &DeclarationReport = report.declarations[0].report.as_ref().expect("Square");
        assert_eq!(square.name, "Square");
        assert_eq!(square.qualified_name.as_deref(), Some("foo.Square"));
        assert_eq!(square.package, "foo");
        assert_eq!(square.kind, "class");
        assert!(square.modifiers.contains(&"public"), "{backend}");
        assert!(square.modifiers.contains(&"final"), "{backend}");
        let super_type = square.super_type.as_ref().expect("super type");
        assert_eq!(super_type.name, "foo.Base");
        let self_type = square.self_type.as_ref().expect("self type");
        assert_eq!(self_type.declaration.as_deref(), Some("foo.Square"));
        assert!(square.diagnostics.is_empty());

        let base = report.declarations[1].report.as_ref().expect("Base");
        assert!(base.modifiers.contains(&"abstract"), "{backend}");
        assert!(!base.modifiers.contains(&"final"), "{backend}");
        assert_eq!(report.diagnostics().count(), 0);
    }
}

#[test]
fn test_describe_types() {
    let env = build_env(&fixture(), BackendKind::Eager, &ProcessingOptions::new());
    let report = describe_round(&env, &names(&["kotlin.String", "foo.Square"]), &[]);
    let string = report.types[0].report.as_ref().expect("String");
    assert_eq!(string.name, "kotlin.String");
    assert_eq!(string.raw_name, "kotlin.String");
    assert!(!string.is_error);
    assert!(!string.is_none);
    assert_eq!(string.default_value, "null");

    let square = report.types[1].report.as_ref().expect("Square");
    assert_eq!(square.declaration.as_deref(), Some("foo.Square"));
    assert!(square.arguments.is_empty());
}

#[test]
fn test_missing_names_become_diagnostics() {
    let fixture = fixture();
    for backend in [BackendKind::Eager, BackendKind::Resolved] {
        let env = build_env(&fixture, backend, &ProcessingOptions::new());
        let report = describe_round(
            &env,
            &names(&["foo.Missing"]),
            &names(&["foo.Gone", "foo.Square"]),
        );
        assert!(report.types[0].report.is_none());
        assert_eq!(
            report.types[0].diagnostic.as_deref(),
            Some("XP1003: Cannot find 'foo.Missing'.")
        );
        assert_eq!(
            report.declarations[0].diagnostic.as_deref(),
            Some("XP1003: Cannot find 'foo.Gone'.")
        );
        assert!(report.declarations[1].report.is_some());
        assert_eq!(report.diagnostics().count(), 2);
    }
}

#[test]
fn test_json_omits_empty_fields() {
    let env = build_env(&fixture(), BackendKind::Eager, &ProcessingOptions::new());
    let report = describe_round(&env, &[], &names(&["foo.Square", "foo.Nope"]));
    let value = serde_json::to_value(&report).expect("serializable");

    assert_eq!(value["backend"], "eager");
    let found = &value["declarations"][0];
    assert_eq!(found["query"], "foo.Square");
    assert_eq!(found["report"]["qualified_name"], "foo.Square");
    assert!(found.get("diagnostic").is_none());
    assert!(found["report"].get("diagnostics").is_none());
    assert!(found["report"].get("declared_type").is_none());

    let missing = &value["declarations"][1];
    assert!(missing.get("report").is_none());
    assert_eq!(missing["diagnostic"], "XP1003: Cannot find 'foo.Nope'.");
}

#[test]
fn test_render_text() {
    colored::control::set_override(false);
    let env = build_env(&fixture(), BackendKind::Eager, &ProcessingOptions::new());
    let report = describe_round(&env, &names(&["kotlin.Int"]), &names(&["foo.Square", "foo.Nope"]));
    let text = render_text(&report);

    assert!(text.starts_with("backend: eager\n"), "{text}");
    assert!(text.contains("type kotlin.Int\n"), "{text}");
    assert!(text.contains("declaration foo.Square\n  class foo.Square\n"), "{text}");
    assert!(text.contains("  super type:\n    foo.Base ("), "{text}");
    assert!(text.contains("declaration foo.Nope\n  XP1003: Cannot find 'foo.Nope'.\n"), "{text}");
}

#[test]
fn test_cli_arguments() {
    let args = CliArgs::try_parse_from([
        "xproc",
        "round.json",
        "--backend",
        "Resolved",
        "-t",
        "kotlin.String",
        "--declaration",
        "foo.Square",
        "-O",
        "xproc.prefix=A=B",
        "--format",
        "json",
    ])
    .expect("valid arguments");
    assert_eq!(args.backend, BackendArg::Resolved);
    assert_eq!(args.types, ["kotlin.String"]);
    assert_eq!(args.declarations, ["foo.Square"]);
    assert_eq!(args.options, [("xproc.prefix".to_string(), "A=B".to_string())]);
    assert_eq!(args.format, Format::Json);

    let defaults = CliArgs::try_parse_from(["xproc", "round.json"]).expect("defaults");
    assert_eq!(defaults.backend, BackendArg::Eager);
    assert_eq!(defaults.format, Format::Text);

    assert!(CliArgs::try_parse_from(["xproc", "round.json", "-O", "novalue"]).is_err());
    assert!(CliArgs::try_parse_from(["xproc", "round.json", "-O", "=value"]).is_err());
}

#[test]
fn test_cli_run_describes_defaults() {
    let file = fixture_file();
    let args = CliArgs::try_parse_from([
        OsString::from("xproc"),
        file.path().into(),
        "--backend".into(),
        "resolved".into(),
    ])
    .expect("valid arguments");
    let report = run(&args).expect("report");
    assert_eq!(report.backend, "resolved");
    assert!(report.types.is_empty());
    let queries: Vec<&str> = report.declarations.iter().map(|entry| entry.query.as_str()).collect();
    assert_eq!(queries, ["foo.Shape", "foo.Base", "foo.Square"]);

    let json = render(&report, Format::Json).expect("json");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["declarations"][2]["report"]["super_type"]["name"], "foo.Base");
}

#[test]
fn test_cli_run_with_explicit_queries_skips_defaults() {
    let file = fixture_file();
    let args = CliArgs::try_parse_from([
        OsString::from("xproc"),
        file.path().into(),
        "-t".into(),
        "kotlin.Int".into(),
    ])
    .expect("valid arguments");
    let report = run(&args).expect("report");
    assert_eq!(report.types.len(), 1);
    assert!(report.declarations.is_empty());
}

#[test]
fn test_read_fixture_errors_carry_the_path() {
    let missing = std::path::Path::new("/nonexistent/round.json");
    let error = read_fixture(missing).expect_err("missing file");
    assert!(error.to_string().contains("failed to read fixture"));

    let mut broken = tempfile::NamedTempFile::new().expect("temp file");
    broken.write_all(b"{ not json").expect("write");
    let error = read_fixture(broken.path()).expect_err("broken json");
    assert!(error.to_string().starts_with("failed to parse fixture"));
}

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
    assert_eq!(LogFormat::parse(" JSON "), LogFormat::Json);
    assert_eq!(LogFormat::parse("text"), LogFormat::Text);
    assert_eq!(LogFormat::parse("fancy"), LogFormat::Text);
}
