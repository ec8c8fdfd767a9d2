use super::Type;
use crate::env::ProcessingEnv;
use crate::name_resolver::resolve_resolved_name;
use crate::nullability::Nullability;
use xproc_common::{PrimitiveKind, TypeName};
use xproc_symbols::resolved::{ElementId, ResolvedSymbols, ResolvedTypeData, ResolvedTypeId};

/// Resolved half of a [`Type`]. Resolved types carry no nullability of their
/// own; `nullability` comes from the annotation on the field or method the
/// type was read from.
#[derive(Clone)]
pub(super) struct ResolvedType<'env> {
    pub(super) symbols: &'env ResolvedSymbols,
    pub(super) native: ResolvedTypeId,
    nullability: Nullability,
}

impl<'env> ResolvedType<'env> {
    pub(super) fn new(
        symbols: &'env ResolvedSymbols,
        native: ResolvedTypeId,
        nullability: Nullability,
    ) -> Self {
        Self {
            symbols,
            native,
            nullability,
        }
    }

    fn data(&self) -> ResolvedTypeData {
        self.symbols.lookup(self.native)
    }

    pub(super) fn comparable(&self, raw: bool) -> Option<ResolvedTypeId> {
        match self.data() {
            ResolvedTypeData::Error { .. } | ResolvedTypeData::NoType => None,
            _ if raw => Some(self.symbols.erasure(self.native)),
            _ => Some(self.native),
        }
    }

    pub(super) fn type_name(&self) -> TypeName {
        resolve_resolved_name(self.symbols, Some(self.native))
    }

    pub(super) fn type_arguments(&self, env: &'env ProcessingEnv) -> Vec<Type<'env>> {
        self.data()
            .arguments()
            .iter()
            .map(|argument| Type::from_resolved(env, self.symbols, *argument, Nullability::Unknown))
            .collect()
    }

    pub(super) fn erasure(&self, env: &'env ProcessingEnv) -> Type<'env> {
        Type::from_resolved(
            env,
            self.symbols,
            self.symbols.erasure(self.native),
            self.nullability,
        )
    }

    pub(super) fn nullability(&self) -> Nullability {
        match self.data() {
            ResolvedTypeData::Primitive(_) => Nullability::NonNull,
            _ => self.nullability,
        }
    }

    pub(super) fn primitive_kind(&self) -> Option<PrimitiveKind> {
        match self.data() {
            ResolvedTypeData::Primitive(kind) => Some(kind),
            _ => None,
        }
    }

    /// The primitive kind of a primitive or of a box class.
    pub(super) fn unboxed_kind(&self) -> Option<PrimitiveKind> {
        match self.data() {
            ResolvedTypeData::Primitive(kind) => Some(kind),
            ResolvedTypeData::Declared { element, .. } => self.symbols.unboxed_kind(element),
            _ => None,
        }
    }

    pub(super) fn is_error(&self) -> bool {
        self.symbols.is_error(self.native)
    }

    pub(super) fn is_none(&self) -> bool {
        matches!(self.data(), ResolvedTypeData::NoType)
    }

    pub(super) fn boxed(&self, env: &'env ProcessingEnv) -> Option<Type<'env>> {
        let kind = self.primitive_kind()?;
        let boxed = self.symbols.boxed_type(kind)?;
        Some(Type::from_resolved(env, self.symbols, boxed, self.nullability))
    }

    pub(super) fn extends_bound(&self, env: &'env ProcessingEnv) -> Option<Type<'env>> {
        match self.data() {
            ResolvedTypeData::Wildcard {
                extends: Some(bound),
                ..
            } => Some(Type::from_resolved(env, self.symbols, bound, Nullability::Unknown)),
            _ => None,
        }
    }

    /// The class-like element a declared type denotes.
    pub(super) fn element(&self) -> Option<ElementId> {
        self.data()
            .element()
            .filter(|element| self.symbols.element(*element).kind.is_type_element())
    }
}
