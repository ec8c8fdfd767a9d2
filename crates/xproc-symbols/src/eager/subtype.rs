//! Native assignability, substitution and erasure for eager types.

use super::{EagerDeclId, EagerSymbols, EagerTypeData, EagerTypeId, NativeNullability, TypeArgument, Variance};
use smallvec::SmallVec;
use tracing::trace;
use xproc_common::limits::MAX_SUPERTYPE_DEPTH;

impl EagerSymbols {
    /// Whether a value of type `from` can be assigned to `to`.
    ///
    /// An error type on either side is assignable to and from anything; this
    /// matches the compiler's own type checker and is what callers must guard
    /// against.
    pub fn is_assignable_from(&self, to: EagerTypeId, from: EagerTypeId) -> bool {
        self.assignable(to, from, 0)
    }

    fn assignable(&self, to: EagerTypeId, from: EagerTypeId, depth: u32) -> bool {
        if to == from {
            return true;
        }
        if depth > MAX_SUPERTYPE_DEPTH {
            trace!(to = to.0, from = from.0, "supertype walk exceeded depth limit");
            return false;
        }
        let to_data = self.lookup(to);
        let from_data = self.lookup(from);
        if to_data.is_error() || from_data.is_error() {
            return true;
        }
        if from_data.nullability() == Some(NativeNullability::Nullable)
            && to_data.nullability() == Some(NativeNullability::NotNull)
        {
            return false;
        }

        match (&to_data, &from_data) {
            (_, EagerTypeData::Class { declaration, .. }) if self.is_nothing(*declaration) => true,
            (EagerTypeData::Class { declaration, .. }, _) if self.is_any(*declaration) => true,
            (
                EagerTypeData::Parameter {
                    owner: to_owner,
                    index: to_index,
                    ..
                },
                EagerTypeData::Parameter {
                    owner: from_owner,
                    index: from_index,
                    ..
                },
            ) if to_owner == from_owner && to_index == from_index => true,
            (_, EagerTypeData::Parameter { owner, index, .. }) => {
                let bounds = self
                    .declaration(*owner)
                    .type_parameters()
                    .get(*index as usize)
                    .map(|parameter| parameter.bounds.clone())
                    .unwrap_or_default();
                bounds
                    .into_iter()
                    .filter_map(|bound| self.resolve(bound))
                    .any(|bound| self.assignable(to, bound, depth + 1))
            }
            (
                EagerTypeData::Class {
                    declaration: target,
                    arguments: to_arguments,
                    ..
                },
                EagerTypeData::Class { .. },
            ) => {
                let Some(found) = self.find_supertype(from, *target, depth) else {
                    return false;
                };
                let found = self.lookup(found);
                self.arguments_compatible(*target, to_arguments, found.arguments(), depth)
            }
            _ => false,
        }
    }

    /// Walk `ty`'s supertypes (substituting type arguments as it goes) until
    /// one whose declaration is `target`.
    pub fn find_supertype(
        &self,
        ty: EagerTypeId,
        target: EagerDeclId,
        depth: u32,
    ) -> Option<EagerTypeId> {
        let EagerTypeData::Class {
            declaration,
            arguments,
            ..
        } = self.lookup(ty)
        else {
            return None;
        };
        if declaration == target {
            return Some(ty);
        }
        if depth > MAX_SUPERTYPE_DEPTH {
            return None;
        }
        for super_ref in self.declaration(declaration).super_types() {
            let Some(super_type) = self.resolve(*super_ref) else {
                continue;
            };
            let substituted = self.substitute(super_type, declaration, &arguments);
            if let Some(found) = self.find_supertype(substituted, target, depth + 1) {
                return Some(found);
            }
        }
        None
    }

    fn arguments_compatible(
        &self,
        target: EagerDeclId,
        to_arguments: &[TypeArgument],
        from_arguments: &[TypeArgument],
        depth: u32,
    ) -> bool {
        if to_arguments.is_empty() {
            return true;
        }
        if to_arguments.len() != from_arguments.len() {
            return false;
        }
        let parameters = self.declaration(target).type_parameters();
        to_arguments
            .iter()
            .zip(from_arguments)
            .enumerate()
            .all(|(index, (to, from))| {
                let declared = parameters
                    .get(index)
                    .map(|parameter| parameter.variance)
                    .unwrap_or(Variance::Invariant);
                let variance = match to.variance {
                    Variance::Invariant => declared,
                    use_site => use_site,
                };
                match variance {
                    Variance::Star => true,
                    Variance::Covariant => self.assignable(to.ty, from.ty, depth + 1),
                    Variance::Contravariant => self.assignable(from.ty, to.ty, depth + 1),
                    Variance::Invariant => to.ty == from.ty,
                }
            })
    }

    /// Replace `owner`'s type parameters in `ty` with `arguments`.
    pub fn substitute(
        &self,
        ty: EagerTypeId,
        owner: EagerDeclId,
        arguments: &[TypeArgument],
    ) -> EagerTypeId {
        match self.lookup(ty) {
            EagerTypeData::Parameter {
                owner: parameter_owner,
                index,
                nullability,
            } if parameter_owner == owner => match arguments.get(index as usize) {
                Some(argument) if nullability == NativeNullability::Nullable => {
                    self.with_nullability(argument.ty, NativeNullability::Nullable)
                }
                Some(argument) => argument.ty,
                None => ty,
            },
            EagerTypeData::Class {
                declaration,
                arguments: own_arguments,
                nullability,
            } if !own_arguments.is_empty() => {
                let substituted: SmallVec<[TypeArgument; 2]> = own_arguments
                    .iter()
                    .map(|argument| TypeArgument {
                        variance: argument.variance,
                        ty: self.substitute(argument.ty, owner, arguments),
                    })
                    .collect();
                self.intern_type(EagerTypeData::Class {
                    declaration,
                    arguments: substituted,
                    nullability,
                })
            }
            _ => ty,
        }
    }

    /// Drop type arguments; type parameters erase to their first bound.
    pub fn erasure(&self, ty: EagerTypeId) -> EagerTypeId {
        self.erasure_with_depth(ty, 0)
    }

    fn erasure_with_depth(&self, ty: EagerTypeId, depth: u32) -> EagerTypeId {
        if depth > MAX_SUPERTYPE_DEPTH {
            return self.any_type(NativeNullability::Nullable);
        }
        match self.lookup(ty) {
            EagerTypeData::Class {
                declaration,
                arguments,
                nullability,
            } if !arguments.is_empty() => self.intern_type(EagerTypeData::Class {
                declaration,
                arguments: SmallVec::new(),
                nullability,
            }),
            EagerTypeData::Parameter {
                owner,
                index,
                nullability,
            } => {
                let bound = self
                    .declaration(owner)
                    .type_parameters()
                    .get(index as usize)
                    .and_then(|parameter| parameter.bounds.first().copied())
                    .and_then(|bound| self.resolve(bound));
                match bound {
                    Some(bound) => {
                        let erased = self.erasure_with_depth(bound, depth + 1);
                        if nullability == NativeNullability::Nullable {
                            self.with_nullability(erased, nullability)
                        } else {
                            erased
                        }
                    }
                    None => self.any_type(nullability),
                }
            }
            _ => ty,
        }
    }
}
