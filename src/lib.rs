//! xproc: one view of declarations and types over two symbol back ends.
//!
//! The eager back end models a source-level, lazily resolved symbol table;
//! the resolved back end models a fully attributed, JVM-shaped element
//! table. [`ProcessingEnv`] wraps either one and hands out [`Type`] and
//! [`Declaration`] values that answer the same questions the same way.
//!
//! ```no_run
//! use xproc::{Fixture, ProcessingEnv, load_eager};
//!
//! let fixture = Fixture::from_json(r#"{"files": []}"#).unwrap();
//! let env = ProcessingEnv::eager(load_eager(&fixture), fixture.options.clone());
//! assert!(env.find_type("kotlin.String").is_some());
//! ```
//!
//! The member crates:
//! - `xproc-common`: names, primitives, options, diagnostics, limits
//! - `xproc-symbols`: both back ends and the JSON fixture loader
//! - `xproc-processing`: the uniform wrappers

pub mod cli;
pub mod describe;
pub mod tracing_config;

pub use xproc_common::{
    ClassName, Diagnostic, DiagnosticCategory, PrimitiveKind, ProcessingOptions, TypeName,
};
pub use xproc_processing::{
    Backend, BackendKind, Declaration, DeclarationKind, NativeDeclaration, NativeType,
    Nullability, ProcessingEnv, ProcessingError, Type,
};
pub use xproc_symbols::{Fixture, load_eager, load_resolved};

/// Build an environment for `backend` from a fixture, with `options` layered
/// over the fixture's own options.
pub fn build_env(fixture: &Fixture, backend: BackendKind, options: &ProcessingOptions) -> ProcessingEnv {
    let mut merged = fixture.options.clone();
    merged.merge(options);
    match backend {
        BackendKind::Eager => ProcessingEnv::eager(load_eager(fixture), merged),
        BackendKind::Resolved => ProcessingEnv::resolved(load_resolved(fixture), merged),
    }
}
