//! Shared fixtures for the processing integration tests.
#![allow(dead_code)]

use serde_json::{Value, json};
use xproc_processing::{Backend, BackendKind, Declaration, NativeDeclaration, ProcessingEnv, Type};
use xproc_symbols::{Fixture, load_eager, load_resolved};

pub const PACKAGE: &str = "foo";
pub const FILE: &str = "Foo.kt";

/// One `Foo.kt` file in package `foo`.
pub fn single_file(declarations: Value) -> Fixture {
    Fixture::from_value(json!({
        "files": [{
            "name": FILE,
            "package": PACKAGE,
            "declarations": declarations
        }]
    }))
    .expect("valid fixture")
}

pub fn eager_env(fixture: &Fixture) -> ProcessingEnv {
    ProcessingEnv::eager(load_eager(fixture), fixture.options.clone())
}

pub fn resolved_env(fixture: &Fixture) -> ProcessingEnv {
    ProcessingEnv::resolved(load_resolved(fixture), fixture.options.clone())
}

/// The same fixture loaded into each back end.
pub fn both_envs(fixture: &Fixture) -> [ProcessingEnv; 2] {
    [eager_env(fixture), resolved_env(fixture)]
}

/// A top-level declaration of `Foo.kt`. The resolved back end keeps
/// top-level members in the `FooKt` facade class.
pub fn top_level<'env>(env: &'env ProcessingEnv, name: &str) -> Declaration<'env> {
    let qualified = match env.backend_kind() {
        BackendKind::Eager => format!("{PACKAGE}.{name}"),
        BackendKind::Resolved => format!("{PACKAGE}.FooKt.{name}"),
    };
    env.find_declaration(&qualified)
        .unwrap_or_else(|| panic!("missing declaration {qualified}"))
}

/// Declared type of a top-level property or function of `Foo.kt`.
pub fn top_level_type<'env>(env: &'env ProcessingEnv, name: &str) -> Type<'env> {
    top_level(env, name)
        .declared_type()
        .cloned()
        .unwrap_or_else(|| panic!("{name} has no declared type"))
}

/// Declared type of a member of a class in package `foo`.
pub fn member_type<'env>(env: &'env ProcessingEnv, owner: &str, name: &str) -> Type<'env> {
    let qualified = format!("{PACKAGE}.{owner}.{name}");
    env.find_declaration(&qualified)
        .unwrap_or_else(|| panic!("missing declaration {qualified}"))
        .declared_type()
        .cloned()
        .unwrap_or_else(|| panic!("{qualified} has no declared type"))
}

/// First declaration with the given simple name, qualified or not. Local
/// and anonymous declarations can only be reached this way.
pub fn by_simple_name<'env>(env: &'env ProcessingEnv, name: &str) -> Declaration<'env> {
    let native = match env.backend() {
        Backend::Eager(symbols) => symbols
            .declarations()
            .find(|(_, declaration)| symbols.resolve_atom(declaration.simple_name) == name)
            .map(|(id, _)| NativeDeclaration::Eager(id)),
        Backend::Resolved(symbols) => symbols
            .elements()
            .find(|(_, element)| symbols.resolve_atom(element.simple_name) == name)
            .map(|(id, _)| NativeDeclaration::Resolved(id)),
    };
    let native = native.unwrap_or_else(|| panic!("no declaration named {name}"));
    env.wrap_declaration(native).expect("same back end")
}
