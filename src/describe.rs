//! Serializable reports over processed types and declarations.
//!
//! The `xproc` binary prints these, either as JSON or as indented text. A
//! report is a snapshot: it owns plain strings and never borrows the round.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::debug;
use xproc_common::limits::MAX_NAME_DEPTH;
use xproc_common::Diagnostic;
use xproc_processing::{Declaration, ProcessingEnv, ProcessingError, Type};
use xproc_symbols::Fixture;
use xproc_symbols::fixture::DeclKindSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeReport {
    pub name: String,
    pub raw_name: String,
    pub nullability: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<TypeReport>,
    pub is_error: bool,
    pub is_none: bool,
    pub default_value: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declaration: Option<String>,
}

impl TypeReport {
    pub fn of(ty: &Type<'_>) -> Self {
        Self::with_depth(ty, 0)
    }

    fn with_depth(ty: &Type<'_>, depth: u32) -> Self {
        let arguments = if depth < MAX_NAME_DEPTH {
            ty.type_arguments()
                .iter()
                .map(|argument| Self::with_depth(argument, depth + 1))
                .collect()
        } else {
            Vec::new()
        };
        Self {
            name: ty.type_name().to_string(),
            raw_name: ty.raw_type().type_name().to_string(),
            nullability: ty.nullability().to_string(),
            arguments,
            is_error: ty.is_error(),
            is_none: ty.is_none(),
            default_value: ty.default_value(),
            declaration: ty.as_declaration().map(|declaration| declaration.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualified_name: Option<String>,
    pub package: String,
    pub kind: String,
    pub kind_name: String,
    pub modifiers: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enclosing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_type: Option<TypeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_type: Option<TypeReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<TypeReport>,
    pub annotations: Vec<String>,
    /// Per-declaration failures. The rest of the report is still filled in.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl DeclarationReport {
    pub fn of(declaration: &Declaration<'_>) -> Self {
        let mut diagnostics = Vec::new();
        let qualified_name = match declaration.qualified_name() {
            Ok(qualified_name) => Some(qualified_name.to_string()),
            Err(error) => {
                diagnostics.push(render_diagnostic(&error.to_diagnostic()));
                None
            }
        };
        let modifiers = [
            ("public", declaration.is_public()),
            ("protected", declaration.is_protected()),
            ("private", declaration.is_private()),
            ("abstract", declaration.is_abstract()),
            ("final", declaration.is_final()),
            ("static", declaration.is_static()),
            ("transient", declaration.is_transient()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect();

        Self {
            name: declaration.name().to_string(),
            qualified_name,
            package: declaration.package_name().to_string(),
            kind: declaration.kind().to_string(),
            kind_name: declaration.kind_name(),
            modifiers,
            enclosing: declaration
                .enclosing_declaration()
                .map(|enclosing| enclosing.to_string()),
            self_type: declaration.self_type().map(TypeReport::of),
            super_type: declaration.super_type().map(TypeReport::of),
            declared_type: declaration.declared_type().map(TypeReport::of),
            annotations: declaration
                .annotation_declarations()
                .iter()
                .map(ToString::to_string)
                .collect(),
            diagnostics,
        }
    }
}

/// One requested name and what it turned into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry<T> {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl<T> Entry<T> {
    fn from_result(query: &str, result: Result<T, ProcessingError>) -> Self {
        match result {
            Ok(report) => Self {
                query: query.to_string(),
                report: Some(report),
                diagnostic: None,
            },
            Err(error) => {
                debug!(query, %error, "query failed");
                Self {
                    query: query.to_string(),
                    report: None,
                    diagnostic: Some(render_diagnostic(&error.to_diagnostic())),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    pub backend: String,
    pub types: Vec<Entry<TypeReport>>,
    pub declarations: Vec<Entry<DeclarationReport>>,
}

impl RoundReport {
    /// Every diagnostic in the report, in output order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &str> {
        let types = self.types.iter().filter_map(|entry| entry.diagnostic.as_deref());
        let declarations = self.declarations.iter().flat_map(|entry| {
            entry.diagnostic.as_deref().into_iter().chain(
                entry
                    .report
                    .iter()
                    .flat_map(|report| report.diagnostics.iter().map(String::as_str)),
            )
        });
        types.chain(declarations)
    }
}

/// Look up each name and report on it. A name that is not found becomes a
/// diagnostic entry; the remaining names are still described.
pub fn describe_round(env: &ProcessingEnv, types: &[String], declarations: &[String]) -> RoundReport {
    RoundReport {
        backend: env.backend_kind().to_string(),
        types: types
            .iter()
            .map(|name| Entry::from_result(name, env.require_type(name).map(|ty| TypeReport::of(&ty))))
            .collect(),
        declarations: declarations
            .iter()
            .map(|name| {
                Entry::from_result(
                    name,
                    env.require_declaration(name)
                        .map(|declaration| DeclarationReport::of(&declaration)),
                )
            })
            .collect(),
    }
}

/// Qualified names of the top-level class-like declarations of a fixture,
/// described when no names are requested.
pub fn default_queries(fixture: &Fixture) -> Vec<String> {
    fixture
        .files
        .iter()
        .flat_map(|file| {
            file.declarations.iter().filter_map(move |declaration| {
                let class_like = matches!(
                    declaration.kind,
                    DeclKindSpec::Class
                        | DeclKindSpec::Interface
                        | DeclKindSpec::Object
                        | DeclKindSpec::EnumClass
                        | DeclKindSpec::AnnotationClass
                );
                let name = declaration.name.as_deref().filter(|_| class_like)?;
                Some(if file.package.is_empty() {
                    name.to_string()
                } else {
                    format!("{}.{name}", file.package)
                })
            })
        })
        .collect()
}

pub fn render_diagnostic(diagnostic: &Diagnostic) -> String {
    format!("XP{}: {}", diagnostic.code, diagnostic.message_text)
}

// =============================================================================
// Text rendering
// =============================================================================

/// Indented, optionally colored text. Color follows `colored`'s global
/// override.
pub fn render_text(report: &RoundReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", "backend:".bold(), report.backend);
    for entry in &report.types {
        let _ = writeln!(out, "{} {}", "type".cyan().bold(), entry.query);
        if let Some(ty) = &entry.report {
            write_type(&mut out, ty, 1);
        }
        if let Some(diagnostic) = &entry.diagnostic {
            let _ = writeln!(out, "  {}", diagnostic.yellow());
        }
    }
    for entry in &report.declarations {
        let _ = writeln!(out, "{} {}", "declaration".cyan().bold(), entry.query);
        if let Some(declaration) = &entry.report {
            write_declaration(&mut out, declaration);
        }
        if let Some(diagnostic) = &entry.diagnostic {
            let _ = writeln!(out, "  {}", diagnostic.yellow());
        }
    }
    out
}

fn write_type(out: &mut String, ty: &TypeReport, indent: usize) {
    let pad = "  ".repeat(indent);
    let mut flags = Vec::new();
    if ty.is_error {
        flags.push("error");
    }
    if ty.is_none {
        flags.push("none");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", ")).red().to_string()
    };
    let _ = writeln!(
        out,
        "{pad}{} ({}, default {}){flags}",
        ty.name.green(),
        ty.nullability,
        ty.default_value
    );
    for argument in &ty.arguments {
        write_type(out, argument, indent + 1);
    }
}

fn write_declaration(out: &mut String, declaration: &DeclarationReport) {
    let _ = writeln!(
        out,
        "  {} {}",
        declaration.kind,
        declaration
            .qualified_name
            .as_deref()
            .unwrap_or(&declaration.name)
            .green()
    );
    if !declaration.modifiers.is_empty() {
        let _ = writeln!(out, "  modifiers: {}", declaration.modifiers.join(" "));
    }
    if let Some(enclosing) = &declaration.enclosing {
        let _ = writeln!(out, "  enclosing: {enclosing}");
    }
    for (label, ty) in [
        ("self type", &declaration.self_type),
        ("super type", &declaration.super_type),
        ("declared type", &declaration.declared_type),
    ] {
        if let Some(ty) = ty {
            let _ = writeln!(out, "  {label}:");
            write_type(out, ty, 2);
        }
    }
    if !declaration.annotations.is_empty() {
        let _ = writeln!(out, "  annotations: {}", declaration.annotations.join(", "));
    }
    for diagnostic in &declaration.diagnostics {
        let _ = writeln!(out, "  {}", diagnostic.yellow());
    }
}
