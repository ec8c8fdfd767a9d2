//! The uniform type wrapper.
//!
//! A [`Type`] wraps either a native type or, on the eager back end, a written
//! type reference that is resolved the first time a query needs it. Derived
//! attributes (name, arguments, raw form, erasure) are computed once and
//! kept for the wrapper's lifetime.
//!
//! Two wrappers are equal when they stand for the same native type. An eager
//! reference that never resolves is only equal to wrappers of that same
//! reference.

mod eager;
mod resolved;

use crate::declaration::Declaration;
use crate::defaults;
use crate::env::{BackendKind, NativeType, ProcessingEnv};
use crate::error::{ProcessingError, Result};
use crate::nullability::Nullability;
use eager::EagerType;
use once_cell::unsync::OnceCell;
use resolved::ResolvedType;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::debug;
use xproc_common::limits::MAX_NAME_DEPTH;
use xproc_common::{PrimitiveKind, TypeName};
use xproc_symbols::eager::{EagerSymbols, EagerTypeId, TypeRefId};
use xproc_symbols::resolved::{ResolvedSymbols, ResolvedTypeId};

#[derive(Clone)]
pub struct Type<'env> {
    env: &'env ProcessingEnv,
    repr: TypeRepr<'env>,
    /// Raw view of the same native type: no arguments, unparameterized name.
    raw: bool,
    type_name: OnceCell<TypeName>,
    type_arguments: OnceCell<Vec<Type<'env>>>,
    raw_type: OnceCell<Box<Type<'env>>>,
    erasure: OnceCell<Box<Type<'env>>>,
}

#[derive(Clone)]
enum TypeRepr<'env> {
    Eager(EagerType<'env>),
    Resolved(ResolvedType<'env>),
}

/// What equality and hashing look at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
enum TypeKey {
    Eager(EagerTypeId),
    EagerReference(TypeRefId),
    Resolved(ResolvedTypeId),
    Absent,
}

impl<'env> Type<'env> {
    pub(crate) fn from_eager(
        env: &'env ProcessingEnv,
        symbols: &'env EagerSymbols,
        reference: Option<TypeRefId>,
        native: Option<EagerTypeId>,
    ) -> Self {
        Self::with_repr(env, TypeRepr::Eager(EagerType::new(symbols, reference, native)))
    }

    pub(crate) fn from_resolved(
        env: &'env ProcessingEnv,
        symbols: &'env ResolvedSymbols,
        native: ResolvedTypeId,
        nullability: Nullability,
    ) -> Self {
        Self::with_repr(
            env,
            TypeRepr::Resolved(ResolvedType::new(symbols, native, nullability)),
        )
    }

    fn with_repr(env: &'env ProcessingEnv, repr: TypeRepr<'env>) -> Self {
        Self {
            env,
            repr,
            raw: false,
            type_name: OnceCell::new(),
            type_arguments: OnceCell::new(),
            raw_type: OnceCell::new(),
            erasure: OnceCell::new(),
        }
    }

    fn raw_view(&self) -> Type<'env> {
        let mut view = Self::with_repr(self.env, self.repr.clone());
        view.raw = true;
        view
    }

    pub fn env(&self) -> &'env ProcessingEnv {
        self.env
    }

    pub fn backend_kind(&self) -> BackendKind {
        match self.repr {
            TypeRepr::Eager(_) => BackendKind::Eager,
            TypeRepr::Resolved(_) => BackendKind::Resolved,
        }
    }

    /// The native type, resolving a written reference if needed.
    pub fn native(&self) -> Option<NativeType> {
        match &self.repr {
            TypeRepr::Eager(ty) => ty.native().map(NativeType::Eager),
            TypeRepr::Resolved(ty) => Some(NativeType::Resolved(ty.native)),
        }
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    // =========================================================================
    // Shape
    // =========================================================================

    pub fn type_name(&self) -> &TypeName {
        self.type_name.get_or_init(|| {
            let name = match &self.repr {
                TypeRepr::Eager(ty) => ty.type_name(),
                TypeRepr::Resolved(ty) => ty.type_name(),
            };
            if self.raw { name.raw() } else { name }
        })
    }

    pub fn type_arguments(&self) -> &[Type<'env>] {
        if self.raw {
            return &[];
        }
        self.type_arguments.get_or_init(|| match &self.repr {
            TypeRepr::Eager(ty) => ty.type_arguments(self.env),
            TypeRepr::Resolved(ty) => ty.type_arguments(self.env),
        })
    }

    /// `self` without its generic arguments. A non-generic type is its own
    /// raw type.
    pub fn raw_type(&self) -> &Type<'env> {
        if self.raw || self.type_arguments().is_empty() {
            return self;
        }
        self.raw_type.get_or_init(|| Box::new(self.raw_view()))
    }

    /// The native erasure. Unlike [`Type::raw_type`] this is a different
    /// native type, and erasing it again returns it unchanged.
    pub fn erasure(&self) -> &Type<'env> {
        if self.type_arguments().is_empty() {
            return self;
        }
        self.erasure.get_or_init(|| {
            let erased = match &self.repr {
                TypeRepr::Eager(ty) => ty.erasure(self.env),
                TypeRepr::Resolved(ty) => Some(ty.erasure(self.env)),
            };
            Box::new(erased.unwrap_or_else(|| self.raw_view()))
        })
    }

    pub fn nullability(&self) -> Nullability {
        match &self.repr {
            TypeRepr::Eager(ty) => ty.nullability(),
            TypeRepr::Resolved(ty) => ty.nullability(),
        }
    }

    // =========================================================================
    // Comparison
    // =========================================================================

    /// Whether a value of `other` can be assigned to `self`. An error or
    /// absent operand on either side is never assignable, even though the
    /// back ends treat error types as compatible with everything. The same
    /// holds when an error hides in an operand's arguments.
    pub fn is_assignable_from(&self, other: &Type<'env>) -> Result<bool> {
        if self.backend_kind() != other.backend_kind() {
            return Err(self.mismatch("is_assignable_from", other));
        }
        if self.has_error_argument(0) || other.has_error_argument(0) {
            debug!(to = %self, from = %other, "error type argument, reporting not assignable");
            return Ok(false);
        }
        match (&self.repr, &other.repr) {
            (TypeRepr::Eager(to), TypeRepr::Eager(from)) => {
                match (to.comparable(self.raw), from.comparable(other.raw)) {
                    (Some(to_native), Some(from_native)) => {
                        Ok(to.symbols.is_assignable_from(to_native, from_native))
                    }
                    _ => Ok(self.unresolved_operand(other)),
                }
            }
            (TypeRepr::Resolved(to), TypeRepr::Resolved(from)) => {
                match (to.comparable(self.raw), from.comparable(other.raw)) {
                    (Some(to_native), Some(from_native)) => {
                        Ok(to.symbols.is_assignable(to_native, from_native))
                    }
                    _ => Ok(self.unresolved_operand(other)),
                }
            }
            _ => Err(self.mismatch("is_assignable_from", other)),
        }
    }

    /// Both operands resolve and denote the same native type. Unresolved
    /// operands are never the same type, not even as each other.
    pub fn is_same_type(&self, other: &Type<'env>) -> Result<bool> {
        match (&self.repr, &other.repr) {
            (TypeRepr::Eager(left), TypeRepr::Eager(right)) => {
                match (left.comparable(self.raw), right.comparable(other.raw)) {
                    (Some(left), Some(right)) => Ok(left == right),
                    _ => Ok(false),
                }
            }
            (TypeRepr::Resolved(left), TypeRepr::Resolved(right)) => {
                match (left.comparable(self.raw), right.comparable(other.raw)) {
                    (Some(left_native), Some(right_native)) => {
                        Ok(left.symbols.is_same_type(left_native, right_native))
                    }
                    _ => Ok(false),
                }
            }
            _ => Err(self.mismatch("is_same_type", other)),
        }
    }

    /// Some argument, at any depth, or a wildcard bound is an error type.
    /// Trees deeper than the name limit are not provably resolved.
    fn has_error_argument(&self, depth: u32) -> bool {
        if depth >= MAX_NAME_DEPTH {
            return true;
        }
        self.type_arguments().iter().any(|argument| {
            argument.is_error()
                || argument.has_error_argument(depth + 1)
                || argument
                    .extends_bound()
                    .is_some_and(|bound| bound.is_error() || bound.has_error_argument(depth + 1))
        })
    }

    fn unresolved_operand(&self, other: &Type<'env>) -> bool {
        debug!(to = %self, from = %other, "error operand, reporting not assignable");
        false
    }

    fn mismatch(&self, operation: &'static str, other: &Type<'env>) -> ProcessingError {
        ProcessingError::backend_mismatch(operation, self.backend_kind(), other.backend_kind())
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// The literal a generated field of this type is initialized with.
    pub fn default_value(&self) -> &'static str {
        let failed = self.is_error() || self.is_none();
        let kind = match &self.repr {
            TypeRepr::Eager(ty) => ty.primitive_kind(),
            TypeRepr::Resolved(ty) => ty.primitive_kind(),
        };
        defaults::default_value(self.nullability(), failed, kind)
    }

    pub fn is_int(&self) -> bool {
        self.is_primitive(PrimitiveKind::Int)
    }

    pub fn is_long(&self) -> bool {
        self.is_primitive(PrimitiveKind::Long)
    }

    pub fn is_byte(&self) -> bool {
        self.is_primitive(PrimitiveKind::Byte)
    }

    /// The eager back end asks whether the built-in primitive is assignable
    /// to `self`, so `Int?` counts as an int. The resolved back end compares
    /// kinds, so `long` is not an int but `java.lang.Integer` is.
    fn is_primitive(&self, kind: PrimitiveKind) -> bool {
        match &self.repr {
            TypeRepr::Eager(_) => self
                .env
                .builtin_primitive(kind)
                .is_some_and(|builtin| self.is_assignable_from(&builtin).unwrap_or(false)),
            TypeRepr::Resolved(ty) => ty.unboxed_kind() == Some(kind),
        }
    }

    /// The type did not resolve. On the eager back end this includes
    /// [`Type::is_none`].
    pub fn is_error(&self) -> bool {
        match &self.repr {
            TypeRepr::Eager(ty) => ty.is_error(),
            TypeRepr::Resolved(ty) => ty.is_error(),
        }
    }

    /// There is no native type at all.
    pub fn is_none(&self) -> bool {
        match &self.repr {
            TypeRepr::Eager(ty) => ty.is_none(),
            TypeRepr::Resolved(ty) => ty.is_none(),
        }
    }

    /// The type denotes a class-like declaration.
    pub fn is_type(&self) -> bool {
        self.as_declaration().is_some()
    }

    /// Compares the raw name with a qualified name.
    pub fn is_type_of(&self, qualified_name: &str) -> bool {
        self.raw_type().type_name().raw().to_string() == qualified_name
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Primitives become their box class on the resolved back end; every
    /// other type is returned as is.
    pub fn boxed(&self) -> Type<'env> {
        match &self.repr {
            TypeRepr::Eager(_) => self.clone(),
            TypeRepr::Resolved(ty) => ty.boxed(self.env).unwrap_or_else(|| self.clone()),
        }
    }

    /// The upper bound of a wildcard. The eager back end has no wildcard
    /// types and always answers `None`.
    pub fn extends_bound(&self) -> Option<Type<'env>> {
        match &self.repr {
            TypeRepr::Eager(_) => None,
            TypeRepr::Resolved(ty) => ty.extends_bound(self.env),
        }
    }

    pub fn as_declaration(&self) -> Option<Declaration<'env>> {
        match &self.repr {
            TypeRepr::Eager(ty) => ty
                .declaration()
                .map(|id| Declaration::from_eager(self.env, ty.symbols, id)),
            TypeRepr::Resolved(ty) => ty
                .element()
                .map(|id| Declaration::from_resolved(self.env, ty.symbols, id)),
        }
    }

    fn key(&self) -> (TypeKey, bool) {
        let key = match &self.repr {
            TypeRepr::Eager(ty) => ty.key(),
            TypeRepr::Resolved(ty) => TypeKey::Resolved(ty.native),
        };
        (key, self.raw)
    }
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Type<'_> {}

impl Hash for Type<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

impl fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type")
            .field("backend", &self.backend_kind())
            .field("name", &self.type_name().to_string())
            .field("raw", &self.raw)
            .finish()
    }
}
