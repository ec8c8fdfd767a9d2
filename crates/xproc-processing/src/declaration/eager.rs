use super::DeclarationKind;
use crate::env::ProcessingEnv;
use crate::name_resolver::eager_class_name;
use crate::ty::Type;
use xproc_common::ClassName;
use xproc_symbols::Modifiers;
use xproc_symbols::eager::{ClassKind, EagerDeclId, EagerDeclKind, EagerSymbols};

pub(super) fn name(symbols: &EagerSymbols, id: EagerDeclId) -> &str {
    symbols.resolve_atom(symbols.declaration(id).simple_name)
}

pub(super) fn package_name(symbols: &EagerSymbols, id: EagerDeclId) -> &str {
    symbols.resolve_atom(symbols.declaration(id).package)
}

pub(super) fn qualified_name(symbols: &EagerSymbols, id: EagerDeclId) -> Option<&str> {
    symbols
        .declaration(id)
        .qualified_name
        .map(|qualified| symbols.resolve_atom(qualified))
}

pub(super) fn class_name(symbols: &EagerSymbols, id: EagerDeclId) -> Option<ClassName> {
    eager_class_name(symbols, id)
}

pub(super) fn kind(symbols: &EagerSymbols, id: EagerDeclId) -> DeclarationKind {
    match &symbols.declaration(id).kind {
        EagerDeclKind::Class { class_kind, .. } => match class_kind {
            ClassKind::Class | ClassKind::EnumClass => DeclarationKind::Class,
            ClassKind::Interface | ClassKind::AnnotationClass => DeclarationKind::Interface,
            ClassKind::Object | ClassKind::EnumEntry => DeclarationKind::Object,
        },
        EagerDeclKind::Property { .. } => DeclarationKind::Property,
        EagerDeclKind::Function { .. } => DeclarationKind::Function,
        EagerDeclKind::TypeAlias { .. } => DeclarationKind::TypeAlias,
        EagerDeclKind::Other { kind_name } => DeclarationKind::Other(kind_name.clone()),
    }
}

pub(super) fn kind_name(symbols: &EagerSymbols, id: EagerDeclId) -> String {
    match &symbols.declaration(id).kind {
        EagerDeclKind::Class { .. } => "class".to_string(),
        EagerDeclKind::Property { .. } => "property".to_string(),
        EagerDeclKind::Function { .. } => "function".to_string(),
        EagerDeclKind::TypeAlias { .. } => "type alias".to_string(),
        EagerDeclKind::Other { kind_name } => kind_name.clone(),
    }
}

/// The direct parent, when it is class-like.
pub(super) fn enclosing(symbols: &EagerSymbols, id: EagerDeclId) -> Option<EagerDeclId> {
    symbols
        .parent_declaration(id)
        .filter(|parent| symbols.declaration(*parent).is_class_like())
}

pub(super) fn super_type<'env>(
    env: &'env ProcessingEnv,
    symbols: &'env EagerSymbols,
    id: EagerDeclId,
) -> Option<Type<'env>> {
    let first = *symbols.declaration(id).super_types().first()?;
    Some(Type::from_eager(env, symbols, Some(first), None))
}

pub(super) fn declared_type<'env>(
    env: &'env ProcessingEnv,
    symbols: &'env EagerSymbols,
    id: EagerDeclId,
) -> Option<Type<'env>> {
    let reference = match &symbols.declaration(id).kind {
        EagerDeclKind::Property { ty } => *ty,
        EagerDeclKind::Function { return_type, .. } => *return_type,
        _ => None,
    }?;
    Some(Type::from_eager(env, symbols, Some(reference), None))
}

/// Public unless another visibility is written. Local declarations are
/// never public.
pub(super) fn is_public(symbols: &EagerSymbols, id: EagerDeclId) -> bool {
    let declaration = symbols.declaration(id);
    if declaration.modifiers.contains(Modifiers::PUBLIC) {
        return true;
    }
    declaration.qualified_name.is_some()
        && !declaration
            .modifiers
            .intersects(Modifiers::PRIVATE | Modifiers::PROTECTED | Modifiers::INTERNAL)
}

pub(super) fn is_abstract(symbols: &EagerSymbols, id: EagerDeclId) -> bool {
    symbols.declaration(id).modifiers.contains(Modifiers::ABSTRACT)
}

/// Declarations are closed unless marked `open` or `abstract`, declared in
/// an interface, or overriding without `final`.
pub(super) fn is_final(symbols: &EagerSymbols, id: EagerDeclId) -> bool {
    let declaration = symbols.declaration(id);
    let modifiers = declaration.modifiers;
    let interface = declaration.class_kind() == Some(ClassKind::Interface);
    let in_interface = enclosing(symbols, id)
        .is_some_and(|owner| symbols.declaration(owner).class_kind() == Some(ClassKind::Interface));
    let open = modifiers.intersects(Modifiers::OPEN | Modifiers::ABSTRACT)
        || interface
        || in_interface
        || (modifiers.contains(Modifiers::OVERRIDE) && !modifiers.contains(Modifiers::FINAL));
    !open
}

/// Declarations of the annotations whose type resolves.
pub(super) fn annotations(symbols: &EagerSymbols, id: EagerDeclId) -> Vec<EagerDeclId> {
    symbols
        .declaration(id)
        .annotations
        .iter()
        .filter_map(|reference| symbols.resolve(*reference))
        .filter_map(|ty| symbols.lookup(ty).declaration())
        .collect()
}
