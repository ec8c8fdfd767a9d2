//! The uniform declaration wrapper.
//!
//! A [`Declaration`] wraps one native declaration (an eager declaration or a
//! resolved element). Equality and hashing follow the native identity, so two
//! wrappers created independently for the same symbol compare equal.

mod eager;
mod resolved;

use crate::env::{BackendKind, ProcessingEnv};
use crate::error::{ProcessingError, Result};
use crate::ty::Type;
use once_cell::unsync::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;
use xproc_common::ClassName;
use xproc_symbols::Modifiers;
use xproc_symbols::eager::{EagerDeclId, EagerSymbols};
use xproc_symbols::resolved::{ElementId, ResolvedSymbols};

/// What a declaration is, independent of back end.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Class,
    Interface,
    /// A singleton `object`.
    Object,
    TypeAlias,
    Property,
    Function,
    /// A native kind with no uniform counterpart, by its raw name.
    Other(String),
}

impl DeclarationKind {
    pub fn is_class_like(&self) -> bool {
        matches!(
            self,
            DeclarationKind::Class | DeclarationKind::Interface | DeclarationKind::Object
        )
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Interface => "interface",
            DeclarationKind::Object => "object",
            DeclarationKind::TypeAlias => "type alias",
            DeclarationKind::Property => "property",
            DeclarationKind::Function => "function",
            DeclarationKind::Other(name) => name,
        })
    }
}

#[derive(Copy, Clone)]
enum DeclarationRepr<'env> {
    Eager {
        symbols: &'env EagerSymbols,
        id: EagerDeclId,
    },
    Resolved {
        symbols: &'env ResolvedSymbols,
        id: ElementId,
    },
}

#[derive(Clone)]
pub struct Declaration<'env> {
    env: &'env ProcessingEnv,
    repr: DeclarationRepr<'env>,
    self_type: OnceCell<Option<Type<'env>>>,
    super_type: OnceCell<Option<Type<'env>>>,
    declared_type: OnceCell<Option<Type<'env>>>,
}

impl<'env> Declaration<'env> {
    pub(crate) fn from_eager(env: &'env ProcessingEnv, symbols: &'env EagerSymbols, id: EagerDeclId) -> Self {
        Self::with_repr(env, DeclarationRepr::Eager { symbols, id })
    }

    pub(crate) fn from_resolved(
        env: &'env ProcessingEnv,
        symbols: &'env ResolvedSymbols,
        id: ElementId,
    ) -> Self {
        Self::with_repr(env, DeclarationRepr::Resolved { symbols, id })
    }

    fn with_repr(env: &'env ProcessingEnv, repr: DeclarationRepr<'env>) -> Self {
        Self {
            env,
            repr,
            self_type: OnceCell::new(),
            super_type: OnceCell::new(),
            declared_type: OnceCell::new(),
        }
    }

    pub fn env(&self) -> &'env ProcessingEnv {
        self.env
    }

    pub fn backend_kind(&self) -> BackendKind {
        match self.repr {
            DeclarationRepr::Eager { .. } => BackendKind::Eager,
            DeclarationRepr::Resolved { .. } => BackendKind::Resolved,
        }
    }

    // =========================================================================
    // Naming
    // =========================================================================

    pub fn name(&self) -> &'env str {
        match self.repr {
            DeclarationRepr::Eager { symbols, id } => eager::name(symbols, id),
            DeclarationRepr::Resolved { symbols, id } => resolved::name(symbols, id),
        }
    }

    /// The declaring package; empty for the default package.
    pub fn package_name(&self) -> &'env str {
        match self.repr {
            DeclarationRepr::Eager { symbols, id } => eager::package_name(symbols, id),
            DeclarationRepr::Resolved { symbols, id } => resolved::package_name(symbols, id),
        }
    }

    /// Fails for local and anonymous declarations. The failure concerns this
    /// declaration only.
    pub fn qualified_name(&self) -> Result<&'env str> {
        self.try_qualified_name()
            .ok_or_else(|| self.missing_qualified_name())
    }

    fn try_qualified_name(&self) -> Option<&'env str> {
        match self.repr {
            DeclarationRepr::Eager { symbols, id } => eager::qualified_name(symbols, id),
            DeclarationRepr::Resolved { symbols, id } => resolved::qualified_name(symbols, id),
        }
    }

    /// Package plus the chain of enclosing class names.
    pub fn class_name(&self) -> Result<ClassName> {
        let class_name = match self.repr {
            DeclarationRepr::Eager { symbols, id } => eager::class_name(symbols, id),
            DeclarationRepr::Resolved { symbols, id } => resolved::class_name(symbols, id),
        };
        class_name.ok_or_else(|| self.missing_qualified_name())
    }

    fn missing_qualified_name(&self) -> ProcessingError {
        debug!(declaration = self.name(), "declaration has no qualified name");
        ProcessingError::missing_qualified_name(self.name())
    }

    // =========================================================================
    // Kind
    // =========================================================================

    pub fn kind(&self) -> DeclarationKind {
        match self.repr {
            DeclarationRepr::Eager { symbols, id } => eager::kind(symbols, id),
            DeclarationRepr::Resolved { symbols, id } => resolved::kind(symbols, id),
        }
    }

    /// The back end's own word for the kind (`"class"`, `"property"`,
    /// `"type alias"`, `"field"`, ...). Unknown kinds keep their raw name.
    pub fn kind_name(&self) -> String {
        match self.repr {
            DeclarationRepr::Eager { symbols, id } => eager::kind_name(symbols, id),
            DeclarationRepr::Resolved { symbols, id } => resolved::kind_name(symbols, id),
        }
    }

    pub fn is_class_like(&self) -> bool {
        self.kind().is_class_like()
    }

    pub fn is_interface(&self) -> bool {
        self.kind() == DeclarationKind::Interface
    }

    pub fn is_object(&self) -> bool {
        self.kind() == DeclarationKind::Object
    }

    // =========================================================================
    // Relations
    // =========================================================================

    /// The directly enclosing declaration when it is class-like. Files,
    /// functions and properties do not count.
    pub fn enclosing_declaration(&self) -> Option<Declaration<'env>> {
        match self.repr {
            DeclarationRepr::Eager { symbols, id } => {
                eager::enclosing(symbols, id).map(|id| Self::from_eager(self.env, symbols, id))
            }
            DeclarationRepr::Resolved { symbols, id } => resolved::enclosing(symbols, id)
                .map(|id| Self::from_resolved(self.env, symbols, id)),
        }
    }

    /// The declaration applied to star projections. `None` unless
    /// class-like.
    pub fn self_type(&self) -> Option<&Type<'env>> {
        self.self_type
            .get_or_init(|| {
                if !self.is_class_like() {
                    return None;
                }
                Some(match self.repr {
                    DeclarationRepr::Eager { symbols, id } => {
                        Type::from_eager(self.env, symbols, None, Some(symbols.star_projected_type(id)))
                    }
                    DeclarationRepr::Resolved { symbols, id } => resolved::self_type(self.env, symbols, id),
                })
            })
            .as_ref()
    }

    /// The first listed supertype. Interfaces and declarations without an
    /// explicit supertype have none.
    pub fn super_type(&self) -> Option<&Type<'env>> {
        self.super_type
            .get_or_init(|| {
                if !self.is_class_like() || self.is_interface() {
                    return None;
                }
                match self.repr {
                    DeclarationRepr::Eager { symbols, id } => eager::super_type(self.env, symbols, id),
                    DeclarationRepr::Resolved { symbols, id } => {
                        resolved::super_type(self.env, symbols, id)
                    }
                }
            })
            .as_ref()
    }

    /// A property's type or a function's return type.
    pub fn declared_type(&self) -> Option<&Type<'env>> {
        self.declared_type
            .get_or_init(|| match self.repr {
                DeclarationRepr::Eager { symbols, id } => eager::declared_type(self.env, symbols, id),
                DeclarationRepr::Resolved { symbols, id } => {
                    resolved::declared_type(self.env, symbols, id)
                }
            })
            .as_ref()
    }

    // =========================================================================
    // Modifiers
    // =========================================================================

    pub fn is_public(&self) -> bool {
        match self.repr {
            DeclarationRepr::Eager { symbols, id } => eager::is_public(symbols, id),
            DeclarationRepr::Resolved { symbols, id } => resolved::is_public(symbols, id),
        }
    }

    pub fn is_protected(&self) -> bool {
        self.modifiers().contains(Modifiers::PROTECTED)
    }

    pub fn is_private(&self) -> bool {
        self.modifiers().contains(Modifiers::PRIVATE)
    }

    pub fn is_abstract(&self) -> bool {
        match self.repr {
            DeclarationRepr::Eager { symbols, id } => eager::is_abstract(symbols, id),
            DeclarationRepr::Resolved { symbols, id } => resolved::is_abstract(symbols, id),
        }
    }

    pub fn is_final(&self) -> bool {
        match self.repr {
            DeclarationRepr::Eager { symbols, id } => eager::is_final(symbols, id),
            DeclarationRepr::Resolved { symbols, id } => resolved::is_final(symbols, id),
        }
    }

    pub fn is_static(&self) -> bool {
        self.modifiers().contains(Modifiers::STATIC)
    }

    pub fn is_transient(&self) -> bool {
        self.modifiers().contains(Modifiers::TRANSIENT)
    }

    fn modifiers(&self) -> Modifiers {
        match self.repr {
            DeclarationRepr::Eager { symbols, id } => symbols.declaration(id).modifiers,
            DeclarationRepr::Resolved { symbols, id } => symbols.element(id).modifiers,
        }
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    /// An annotation whose type resolves to `qualified_name` is present.
    pub fn has_annotation(&self, qualified_name: &str) -> bool {
        self.annotation_declarations()
            .iter()
            .any(|annotation| annotation.try_qualified_name() == Some(qualified_name))
    }

    /// An annotation declared in `package` is present.
    pub fn has_annotation_with_package(&self, package: &str) -> bool {
        self.annotation_declarations()
            .iter()
            .any(|annotation| annotation.package_name() == package)
    }

    /// Declarations of the annotations that resolve; unresolved ones are
    /// skipped.
    pub fn annotation_declarations(&self) -> Vec<Declaration<'env>> {
        match self.repr {
            DeclarationRepr::Eager { symbols, id } => eager::annotations(symbols, id)
                .into_iter()
                .map(|id| Self::from_eager(self.env, symbols, id))
                .collect(),
            DeclarationRepr::Resolved { symbols, id } => resolved::annotations(symbols, id)
                .into_iter()
                .map(|id| Self::from_resolved(self.env, symbols, id))
                .collect(),
        }
    }

    fn key(&self) -> (BackendKind, u32) {
        match self.repr {
            DeclarationRepr::Eager { id, .. } => (BackendKind::Eager, id.0),
            DeclarationRepr::Resolved { id, .. } => (BackendKind::Resolved, id.0),
        }
    }
}

impl PartialEq for Declaration<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Declaration<'_> {}

impl Hash for Declaration<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Declaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.try_qualified_name().unwrap_or_else(|| self.name()))
    }
}

impl fmt::Debug for Declaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declaration")
            .field("backend", &self.backend_kind())
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}
