use super::{Type, TypeKey};
use crate::env::ProcessingEnv;
use crate::name_resolver::{EagerNameSource, resolve_eager_name};
use crate::nullability::Nullability;
use once_cell::unsync::OnceCell;
use tracing::trace;
use xproc_common::PrimitiveKind;
use xproc_common::TypeName;
use xproc_symbols::eager::{
    EagerDeclId, EagerSymbols, EagerTypeId, NativeNullability, ReferenceArgument,
    ReferenceElement, TypeArgument, TypeRefId, Variance,
};

/// Eager half of a [`Type`]: the written reference, if any, and the native
/// type it resolves to.
#[derive(Clone)]
pub(super) struct EagerType<'env> {
    pub(super) symbols: &'env EagerSymbols,
    reference: Option<TypeRefId>,
    native: OnceCell<Option<EagerTypeId>>,
}

impl<'env> EagerType<'env> {
    pub(super) fn new(
        symbols: &'env EagerSymbols,
        reference: Option<TypeRefId>,
        native: Option<EagerTypeId>,
    ) -> Self {
        Self {
            symbols,
            reference,
            native: native.map_or_else(OnceCell::new, |ty| OnceCell::with_value(Some(ty))),
        }
    }

    /// Resolves the reference on first use. The outcome, failure included,
    /// is kept.
    pub(super) fn native(&self) -> Option<EagerTypeId> {
        *self.native.get_or_init(|| {
            let resolved = self
                .reference
                .and_then(|reference| self.symbols.resolve(reference));
            trace!(reference = ?self.reference, resolved = ?resolved, "resolved type reference");
            resolved
        })
    }

    /// The native type when it resolved to something other than an error.
    fn resolved(&self) -> Option<EagerTypeId> {
        self.native().filter(|ty| !self.symbols.is_error(*ty))
    }

    /// The native type used by comparisons; raw views compare as their
    /// erasure.
    pub(super) fn comparable(&self, raw: bool) -> Option<EagerTypeId> {
        let native = self.resolved()?;
        Some(if raw { self.symbols.erasure(native) } else { native })
    }

    pub(super) fn type_name(&self) -> TypeName {
        let source = match (self.native(), self.reference) {
            (Some(ty), reference) => Some(EagerNameSource::Type { ty, reference }),
            (None, Some(reference)) => Some(EagerNameSource::Reference(reference)),
            (None, None) => None,
        };
        resolve_eager_name(self.symbols, source)
    }

    fn written_arguments(&self) -> &'env [ReferenceArgument] {
        let Some(reference) = self.reference else {
            return &[];
        };
        match &self.symbols.reference_data(reference).element {
            ReferenceElement::Classifier { arguments, .. } => arguments,
            ReferenceElement::Unparseable { .. } => &[],
        }
    }

    /// Arguments as the user wrote them when the written list lines up with
    /// the resolved one (or nothing resolved), otherwise the resolved
    /// arguments. A written `*` becomes the type it projects to.
    pub(super) fn type_arguments(&self, env: &'env ProcessingEnv) -> Vec<Type<'env>> {
        let resolved: Vec<TypeArgument> = self
            .native()
            .map(|ty| self.symbols.lookup(ty).arguments().to_vec())
            .unwrap_or_default();
        let written = self.written_arguments();
        let use_written =
            !written.is_empty() && (resolved.is_empty() || written.len() == resolved.len());
        if !use_written {
            return resolved
                .iter()
                .map(|argument| Type::from_eager(env, self.symbols, None, Some(argument.ty)))
                .collect();
        }
        written
            .iter()
            .enumerate()
            .map(|(index, argument)| match argument.type_ref {
                Some(reference) if argument.variance != Variance::Star => {
                    Type::from_eager(env, self.symbols, Some(reference), None)
                }
                _ => {
                    let projected = resolved
                        .get(index)
                        .map(|argument| argument.ty)
                        .unwrap_or_else(|| self.symbols.any_type(NativeNullability::Nullable));
                    Type::from_eager(env, self.symbols, None, Some(projected))
                }
            })
            .collect()
    }

    pub(super) fn erasure(&self, env: &'env ProcessingEnv) -> Option<Type<'env>> {
        let native = self.resolved()?;
        Some(Type::from_eager(
            env,
            self.symbols,
            None,
            Some(self.symbols.erasure(native)),
        ))
    }

    pub(super) fn nullability(&self) -> Nullability {
        self.native()
            .and_then(|ty| self.symbols.lookup(ty).nullability())
            .map(Nullability::from)
            .unwrap_or(Nullability::Unknown)
    }

    pub(super) fn declaration(&self) -> Option<EagerDeclId> {
        self.native()
            .and_then(|ty| self.symbols.lookup(ty).declaration())
    }

    pub(super) fn primitive_kind(&self) -> Option<PrimitiveKind> {
        self.declaration()
            .and_then(|declaration| self.symbols.primitive_kind(declaration))
    }

    pub(super) fn is_error(&self) -> bool {
        self.native().is_none_or(|ty| self.symbols.is_error(ty))
    }

    pub(super) fn is_none(&self) -> bool {
        self.native().is_none()
    }

    /// Error types are distinct per written reference, so keying on the
    /// native type also keeps same-spelled unresolved references apart.
    pub(super) fn key(&self) -> TypeKey {
        match (self.native(), self.reference) {
            (Some(ty), _) => TypeKey::Eager(ty),
            (None, Some(reference)) => TypeKey::EagerReference(reference),
            (None, None) => TypeKey::Absent,
        }
    }
}
