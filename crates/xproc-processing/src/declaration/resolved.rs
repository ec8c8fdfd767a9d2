use super::DeclarationKind;
use crate::env::ProcessingEnv;
use crate::name_resolver::resolved_class_name;
use crate::nullability::Nullability;
use crate::ty::Type;
use xproc_common::ClassName;
use xproc_symbols::Modifiers;
use xproc_symbols::resolved::{ElementId, ElementKind, Enclosing, ResolvedSymbols, ResolvedTypeData};

/// Name of the static field holding a singleton object.
const INSTANCE_FIELD: &str = "INSTANCE";

pub(super) fn name(symbols: &ResolvedSymbols, id: ElementId) -> &str {
    symbols.resolve_atom(symbols.element(id).simple_name)
}

pub(super) fn package_name(symbols: &ResolvedSymbols, id: ElementId) -> &str {
    symbols.resolve_atom(symbols.element(id).package)
}

pub(super) fn qualified_name(symbols: &ResolvedSymbols, id: ElementId) -> Option<&str> {
    symbols
        .element(id)
        .qualified_name
        .map(|qualified| symbols.resolve_atom(qualified))
}

pub(super) fn class_name(symbols: &ResolvedSymbols, id: ElementId) -> Option<ClassName> {
    resolved_class_name(symbols, id)
}

pub(super) fn kind(symbols: &ResolvedSymbols, id: ElementId) -> DeclarationKind {
    match &symbols.element(id).kind {
        ElementKind::Class if is_singleton(symbols, id) => DeclarationKind::Object,
        ElementKind::Class | ElementKind::Enum => DeclarationKind::Class,
        ElementKind::Interface | ElementKind::Annotation => DeclarationKind::Interface,
        ElementKind::Field => DeclarationKind::Property,
        ElementKind::Method | ElementKind::Constructor => DeclarationKind::Function,
        ElementKind::Other(name) => DeclarationKind::Other(name.clone()),
    }
}

/// A compiled `object`: a class holding a static `INSTANCE` field of its
/// own type.
fn is_singleton(symbols: &ResolvedSymbols, id: ElementId) -> bool {
    let own_type = symbols.declared_type(id, Vec::new());
    symbols.elements().any(|(_, element)| {
        element.enclosing == Enclosing::Element(id)
            && element.kind == ElementKind::Field
            && element.modifiers.contains(Modifiers::STATIC)
            && element.ty == Some(own_type)
            && symbols.resolve_atom(element.simple_name) == INSTANCE_FIELD
    })
}

pub(super) fn kind_name(symbols: &ResolvedSymbols, id: ElementId) -> String {
    match &symbols.element(id).kind {
        ElementKind::Other(name) => name.clone(),
        kind => kind.name().to_lowercase(),
    }
}

pub(super) fn enclosing(symbols: &ResolvedSymbols, id: ElementId) -> Option<ElementId> {
    symbols
        .enclosing_element(id)
        .filter(|owner| symbols.element(*owner).kind.is_type_element())
}

/// Applied to unbounded wildcards, `List<?>`.
pub(super) fn self_type<'env>(
    env: &'env ProcessingEnv,
    symbols: &'env ResolvedSymbols,
    id: ElementId,
) -> Type<'env> {
    Type::from_resolved(env, symbols, symbols.wildcard_self_type(id), Nullability::Unknown)
}

/// The superclass, or the first interface when no superclass is listed.
pub(super) fn super_type<'env>(
    env: &'env ProcessingEnv,
    symbols: &'env ResolvedSymbols,
    id: ElementId,
) -> Option<Type<'env>> {
    let element = symbols.element(id);
    let super_type = element
        .superclass
        .or_else(|| element.interfaces.first().copied())
        .filter(|ty| !matches!(symbols.lookup(*ty), ResolvedTypeData::NoType))?;
    Some(Type::from_resolved(env, symbols, super_type, Nullability::Unknown))
}

pub(super) fn declared_type<'env>(
    env: &'env ProcessingEnv,
    symbols: &'env ResolvedSymbols,
    id: ElementId,
) -> Option<Type<'env>> {
    let element = symbols.element(id);
    if !matches!(
        element.kind,
        ElementKind::Field | ElementKind::Method | ElementKind::Constructor
    ) {
        return None;
    }
    let ty = element.ty?;
    Some(Type::from_resolved(env, symbols, ty, element.nullability.into()))
}

pub(super) fn is_public(symbols: &ResolvedSymbols, id: ElementId) -> bool {
    symbols.element(id).modifiers.contains(Modifiers::PUBLIC)
}

pub(super) fn is_abstract(symbols: &ResolvedSymbols, id: ElementId) -> bool {
    symbols.element(id).modifiers.contains(Modifiers::ABSTRACT)
}

pub(super) fn is_final(symbols: &ResolvedSymbols, id: ElementId) -> bool {
    symbols.element(id).modifiers.contains(Modifiers::FINAL)
}

pub(super) fn annotations(symbols: &ResolvedSymbols, id: ElementId) -> Vec<ElementId> {
    symbols
        .element(id)
        .annotations
        .iter()
        .filter_map(|ty| symbols.lookup(*ty).element())
        .collect()
}
