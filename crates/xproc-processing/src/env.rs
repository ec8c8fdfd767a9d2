//! The per-round processing environment.
//!
//! `ProcessingEnv` owns the round's symbol back end and options, caches the
//! back end's built-in types by canonical name, and is the only factory for
//! [`Type`] and [`Declaration`] wrappers.

use crate::declaration::Declaration;
use crate::error::{ProcessingError, Result};
use crate::name_resolver::{EagerNameSource, resolve_eager_name, resolve_resolved_name};
use crate::nullability::Nullability;
use crate::ty::Type;
use indexmap::IndexMap;
use once_cell::unsync::OnceCell;
use std::fmt;
use tracing::{debug, trace};
use xproc_common::{PrimitiveKind, ProcessingOptions};
use xproc_symbols::eager::{EagerDeclId, EagerSymbols, EagerTypeId, TypeRefId};
use xproc_symbols::resolved::{ElementId, ResolvedSymbols, ResolvedTypeId};

/// The symbol table a round runs against.
pub enum Backend {
    Eager(EagerSymbols),
    Resolved(ResolvedSymbols),
}

impl Backend {
    pub fn kind(&self) -> BackendKind {
        match self {
            Backend::Eager(_) => BackendKind::Eager,
            Backend::Resolved(_) => BackendKind::Resolved,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Eager,
    Resolved,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BackendKind::Eager => "eager",
            BackendKind::Resolved => "resolved",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A back-end type id, tagged with the back end it belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NativeType {
    Eager(EagerTypeId),
    Resolved(ResolvedTypeId),
}

impl NativeType {
    pub fn backend_kind(self) -> BackendKind {
        match self {
            NativeType::Eager(_) => BackendKind::Eager,
            NativeType::Resolved(_) => BackendKind::Resolved,
        }
    }
}

/// A back-end declaration id, tagged with the back end it belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NativeDeclaration {
    Eager(EagerDeclId),
    Resolved(ElementId),
}

impl NativeDeclaration {
    pub fn backend_kind(self) -> BackendKind {
        match self {
            NativeDeclaration::Eager(_) => BackendKind::Eager,
            NativeDeclaration::Resolved(_) => BackendKind::Resolved,
        }
    }
}

pub struct ProcessingEnv {
    backend: Backend,
    options: ProcessingOptions,
    builtins: OnceCell<IndexMap<String, NativeType>>,
}

impl ProcessingEnv {
    pub fn new(backend: Backend, options: ProcessingOptions) -> Self {
        debug!(backend = %backend.kind(), options = options.len(), "opening processing round");
        Self {
            backend,
            options,
            builtins: OnceCell::new(),
        }
    }

    pub fn eager(symbols: EagerSymbols, options: ProcessingOptions) -> Self {
        Self::new(Backend::Eager(symbols), options)
    }

    pub fn resolved(symbols: ResolvedSymbols, options: ProcessingOptions) -> Self {
        Self::new(Backend::Resolved(symbols), options)
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn options(&self) -> &ProcessingOptions {
        &self.options
    }

    /// Every built-in type of the back end, keyed by canonical name. Built on
    /// first use and never changed afterwards.
    pub fn builtin_types(&self) -> &IndexMap<String, NativeType> {
        self.builtins.get_or_init(|| {
            let builtins: IndexMap<String, NativeType> = match &self.backend {
                Backend::Eager(symbols) => symbols
                    .builtin_types()
                    .into_iter()
                    .map(|ty| {
                        let name = resolve_eager_name(
                            symbols,
                            Some(EagerNameSource::Type {
                                ty,
                                reference: None,
                            }),
                        );
                        (name.to_string(), NativeType::Eager(ty))
                    })
                    .collect(),
                Backend::Resolved(symbols) => symbols
                    .builtin_types()
                    .into_iter()
                    .map(|ty| {
                        let name = resolve_resolved_name(symbols, Some(ty));
                        (name.to_string(), NativeType::Resolved(ty))
                    })
                    .collect(),
            };
            debug!(count = builtins.len(), "populated built-in type cache");
            builtins
        })
    }

    /// The built-in type standing for a primitive kind: `kotlin.Int` on the
    /// eager back end, `int` on the resolved one.
    pub fn builtin_primitive(&self, kind: PrimitiveKind) -> Option<Type<'_>> {
        let key = match self.backend {
            Backend::Eager(_) => kind.kotlin_name(),
            Backend::Resolved(_) => kind.keyword().to_string(),
        };
        let native = *self.builtin_types().get(&key)?;
        self.wrap(native).ok()
    }

    /// Built-ins first, then the declaration's star-projected self type.
    pub fn find_type(&self, qualified_name: &str) -> Option<Type<'_>> {
        if let Some(native) = self.builtin_types().get(qualified_name) {
            trace!(name = qualified_name, "built-in type cache hit");
            return self.wrap(*native).ok();
        }
        let declaration = self.find_declaration(qualified_name)?;
        declaration.self_type().cloned()
    }

    /// Exact lookup, then one retry in the implicit built-ins package for
    /// unqualified names.
    pub fn find_declaration(&self, qualified_name: &str) -> Option<Declaration<'_>> {
        let native = match &self.backend {
            Backend::Eager(symbols) => symbols
                .find_declaration(qualified_name)
                .or_else(|| {
                    let retry = implicit_name(qualified_name, "kotlin", true)?;
                    trace!(name = qualified_name, retry = %retry, "retrying in the built-ins package");
                    symbols.find_declaration(&retry)
                })
                .map(NativeDeclaration::Eager),
            Backend::Resolved(symbols) => symbols
                .find_element(qualified_name)
                .or_else(|| {
                    let retry = implicit_name(qualified_name, "java.lang", false)?;
                    trace!(name = qualified_name, retry = %retry, "retrying in the built-ins package");
                    symbols.find_element(&retry)
                })
                .map(NativeDeclaration::Resolved),
        };
        match native {
            Some(native) => self.wrap_declaration(native).ok(),
            None => {
                debug!(name = qualified_name, "declaration not found");
                None
            }
        }
    }

    pub fn require_type(&self, qualified_name: &str) -> Result<Type<'_>> {
        self.find_type(qualified_name)
            .ok_or_else(|| ProcessingError::NotFound(qualified_name.to_string()))
    }

    pub fn require_declaration(&self, qualified_name: &str) -> Result<Declaration<'_>> {
        self.find_declaration(qualified_name)
            .ok_or_else(|| ProcessingError::NotFound(qualified_name.to_string()))
    }

    // =========================================================================
    // Wrapping
    // =========================================================================

    pub fn wrap(&self, native: NativeType) -> Result<Type<'_>> {
        match (&self.backend, native) {
            (Backend::Eager(symbols), NativeType::Eager(ty)) => {
                Ok(Type::from_eager(self, symbols, None, Some(ty)))
            }
            (Backend::Resolved(symbols), NativeType::Resolved(ty)) => {
                Ok(Type::from_resolved(self, symbols, ty, Nullability::Unknown))
            }
            _ => Err(ProcessingError::backend_mismatch(
                "wrap",
                self.backend_kind(),
                native.backend_kind(),
            )),
        }
    }

    /// Wrap a written type reference. Resolution is deferred until a query
    /// needs it.
    pub fn wrap_reference(&self, reference: TypeRefId) -> Result<Type<'_>> {
        match &self.backend {
            Backend::Eager(symbols) => Ok(Type::from_eager(self, symbols, Some(reference), None)),
            Backend::Resolved(_) => Err(ProcessingError::backend_mismatch(
                "wrap_reference",
                BackendKind::Resolved,
                BackendKind::Eager,
            )),
        }
    }

    pub fn wrap_declaration(&self, native: NativeDeclaration) -> Result<Declaration<'_>> {
        match (&self.backend, native) {
            (Backend::Eager(symbols), NativeDeclaration::Eager(id)) => {
                Ok(Declaration::from_eager(self, symbols, id))
            }
            (Backend::Resolved(symbols), NativeDeclaration::Resolved(id)) => {
                Ok(Declaration::from_resolved(self, symbols, id))
            }
            _ => Err(ProcessingError::backend_mismatch(
                "wrap_declaration",
                self.backend_kind(),
                native.backend_kind(),
            )),
        }
    }
}

/// `int` becomes `kotlin.Int` (capitalized) or `java.lang.int`. `None` for
/// names that are already qualified.
fn implicit_name(name: &str, package: &str, capitalize: bool) -> Option<String> {
    if name.is_empty() || name.contains('.') {
        return None;
    }
    if !capitalize {
        return Some(format!("{package}.{name}"));
    }
    let mut chars = name.chars();
    let first = chars.next()?;
    Some(format!("{package}.{}{}", first.to_uppercase(), chars.as_str()))
}

#[cfg(test)]
#[path = "../tests/env_unit_tests.rs"]
mod tests;
