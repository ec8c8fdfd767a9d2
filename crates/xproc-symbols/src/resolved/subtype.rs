//! Assignability, containment and erasure for resolved types.

use super::{ElementId, ResolvedSymbols, ResolvedTypeData, ResolvedTypeId};
use tracing::trace;
use xproc_common::PrimitiveKind;
use xproc_common::limits::MAX_SUPERTYPE_DEPTH;

/// Widening primitive conversions.
fn widens(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    use PrimitiveKind::*;
    if from == to {
        return true;
    }
    match from {
        Byte => matches!(to, Short | Int | Long | Float | Double),
        Short | Char => matches!(to, Int | Long | Float | Double),
        Int => matches!(to, Long | Float | Double),
        Long => matches!(to, Float | Double),
        Float => matches!(to, Double),
        Double | Boolean => false,
    }
}

impl ResolvedSymbols {
    /// Whether a value of type `from` can be assigned to `to`, allowing
    /// boxing, unboxing and widening.
    ///
    /// Error types are assignable to and from anything.
    pub fn is_assignable(&self, to: ResolvedTypeId, from: ResolvedTypeId) -> bool {
        self.assignable(to, from, 0)
    }

    /// Identity. Distinct error instances are never the same type.
    pub fn is_same_type(&self, left: ResolvedTypeId, right: ResolvedTypeId) -> bool {
        left == right
    }

    fn assignable(&self, to: ResolvedTypeId, from: ResolvedTypeId, depth: u32) -> bool {
        if to == from {
            return true;
        }
        if depth > MAX_SUPERTYPE_DEPTH {
            trace!(to = to.0, from = from.0, "supertype walk exceeded depth limit");
            return false;
        }
        let to_data = self.lookup(to);
        let from_data = self.lookup(from);
        match (&to_data, &from_data) {
            (ResolvedTypeData::Error { .. }, _) | (_, ResolvedTypeData::Error { .. }) => true,
            (ResolvedTypeData::NoType, _) | (_, ResolvedTypeData::NoType) => false,
            (ResolvedTypeData::Primitive(to_kind), ResolvedTypeData::Primitive(from_kind)) => {
                widens(*from_kind, *to_kind)
            }
            (ResolvedTypeData::Primitive(to_kind), ResolvedTypeData::Declared { element, .. }) => self
                .unboxed_kind(*element)
                .is_some_and(|from_kind| widens(from_kind, *to_kind)),
            (ResolvedTypeData::Declared { .. }, ResolvedTypeData::Primitive(kind)) => self
                .boxed_type(*kind)
                .is_some_and(|boxed| self.assignable(to, boxed, depth + 1)),
            (ResolvedTypeData::Declared { element, .. }, _) if Some(*element) == self.object_element() => {
                !matches!(from_data, ResolvedTypeData::Wildcard { .. })
            }
            (_, ResolvedTypeData::Wildcard { extends, .. }) => match extends {
                Some(extends) => self.assignable(to, *extends, depth + 1),
                None => false,
            },
            (_, ResolvedTypeData::TypeVariable { owner, index }) => {
                let bounds = self
                    .element(*owner)
                    .type_parameters
                    .get(*index as usize)
                    .map(|parameter| parameter.bounds.clone())
                    .unwrap_or_default();
                bounds
                    .into_iter()
                    .any(|bound| self.assignable(to, bound, depth + 1))
            }
            (ResolvedTypeData::Array(to_component), ResolvedTypeData::Array(from_component)) => {
                let to_primitive = matches!(self.lookup(*to_component), ResolvedTypeData::Primitive(_));
                let from_primitive = matches!(self.lookup(*from_component), ResolvedTypeData::Primitive(_));
                if to_primitive || from_primitive {
                    to_component == from_component
                } else {
                    self.assignable(*to_component, *from_component, depth + 1)
                }
            }
            (
                ResolvedTypeData::Declared {
                    element: target,
                    arguments: to_arguments,
                },
                ResolvedTypeData::Declared { .. },
            ) => {
                let Some(found) = self.find_supertype(from, *target, depth) else {
                    return false;
                };
                let found = self.lookup(found);
                self.arguments_contained(to_arguments, found.arguments(), depth)
            }
            _ => false,
        }
    }

    /// Raw types on either side skip the argument check (unchecked conversion).
    fn arguments_contained(
        &self,
        to_arguments: &[ResolvedTypeId],
        from_arguments: &[ResolvedTypeId],
        depth: u32,
    ) -> bool {
        if to_arguments.is_empty() || from_arguments.is_empty() {
            return true;
        }
        to_arguments.len() == from_arguments.len()
            && to_arguments
                .iter()
                .zip(from_arguments)
                .all(|(to, from)| self.contains(*to, *from, depth + 1))
    }

    /// Type-argument containment: `? extends U` contains anything assignable
    /// to `U`, `? super L` contains anything `L` is assignable to, and a
    /// plain argument contains only itself.
    fn contains(&self, to: ResolvedTypeId, from: ResolvedTypeId, depth: u32) -> bool {
        if to == from {
            return true;
        }
        match self.lookup(to) {
            ResolvedTypeData::Wildcard {
                extends: Some(upper),
                ..
            } => {
                let from_upper = match self.lookup(from) {
                    ResolvedTypeData::Wildcard { extends, .. } => extends.or_else(|| self.object_type()),
                    _ => Some(from),
                };
                from_upper.is_some_and(|from_upper| self.assignable(upper, from_upper, depth))
            }
            ResolvedTypeData::Wildcard {
                super_bound: Some(lower),
                ..
            } => match self.lookup(from) {
                ResolvedTypeData::Wildcard {
                    super_bound: Some(from_lower),
                    ..
                } => self.assignable(from_lower, lower, depth),
                ResolvedTypeData::Wildcard { .. } => false,
                _ => self.assignable(from, lower, depth),
            },
            ResolvedTypeData::Wildcard { .. } => true,
            ResolvedTypeData::Error { .. } => true,
            _ => self.is_error(from),
        }
    }

    /// Walk superclass and interfaces (substituting type arguments) until a
    /// type whose element is `target`.
    pub fn find_supertype(
        &self,
        ty: ResolvedTypeId,
        target: ElementId,
        depth: u32,
    ) -> Option<ResolvedTypeId> {
        let ResolvedTypeData::Declared { element, arguments } = self.lookup(ty) else {
            return None;
        };
        if element == target {
            return Some(ty);
        }
        if depth > MAX_SUPERTYPE_DEPTH {
            return None;
        }
        let declaration = self.element(element);
        let supertypes = declaration
            .superclass
            .iter()
            .chain(declaration.interfaces.iter())
            .copied()
            .collect::<Vec<_>>();
        for super_type in supertypes {
            let super_type = if arguments.is_empty() {
                self.erasure(super_type)
            } else {
                self.substitute(super_type, element, &arguments)
            };
            if let Some(found) = self.find_supertype(super_type, target, depth + 1) {
                return Some(found);
            }
        }
        None
    }

    /// Replace `owner`'s type variables in `ty` with `arguments`.
    pub fn substitute(
        &self,
        ty: ResolvedTypeId,
        owner: ElementId,
        arguments: &[ResolvedTypeId],
    ) -> ResolvedTypeId {
        match self.lookup(ty) {
            ResolvedTypeData::TypeVariable {
                owner: variable_owner,
                index,
            } if variable_owner == owner => arguments.get(index as usize).copied().unwrap_or(ty),
            ResolvedTypeData::Declared {
                element,
                arguments: own_arguments,
            } if !own_arguments.is_empty() => {
                let substituted = own_arguments
                    .iter()
                    .map(|argument| self.substitute(*argument, owner, arguments))
                    .collect();
                self.declared_type(element, substituted)
            }
            ResolvedTypeData::Array(component) => {
                let component = self.substitute(component, owner, arguments);
                self.array_type(component)
            }
            ResolvedTypeData::Wildcard {
                extends,
                super_bound,
            } => {
                let extends = extends.map(|bound| self.substitute(bound, owner, arguments));
                let super_bound = super_bound.map(|bound| self.substitute(bound, owner, arguments));
                self.wildcard(extends, super_bound)
            }
            _ => ty,
        }
    }

    /// Type-erase: drop arguments, replace type variables with the erasure
    /// of their first bound (or `Object`).
    pub fn erasure(&self, ty: ResolvedTypeId) -> ResolvedTypeId {
        self.erasure_with_depth(ty, 0)
    }

    fn erasure_with_depth(&self, ty: ResolvedTypeId, depth: u32) -> ResolvedTypeId {
        let object = || self.object_type().unwrap_or(ty);
        if depth > MAX_SUPERTYPE_DEPTH {
            return object();
        }
        match self.lookup(ty) {
            ResolvedTypeData::Declared { element, arguments } if !arguments.is_empty() => {
                self.declared_type(element, Vec::new())
            }
            ResolvedTypeData::TypeVariable { owner, index } => {
                let bound = self
                    .element(owner)
                    .type_parameters
                    .get(index as usize)
                    .and_then(|parameter| parameter.bounds.first().copied());
                match bound {
                    Some(bound) => self.erasure_with_depth(bound, depth + 1),
                    None => object(),
                }
            }
            ResolvedTypeData::Wildcard { extends, .. } => match extends {
                Some(bound) => self.erasure_with_depth(bound, depth + 1),
                None => object(),
            },
            ResolvedTypeData::Array(component) => {
                let component = self.erasure_with_depth(component, depth + 1);
                self.array_type(component)
            }
            _ => ty,
        }
    }
}
