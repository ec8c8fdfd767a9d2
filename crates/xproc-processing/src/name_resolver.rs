//! Canonical names for native types and type references.
//!
//! Naming never fails. Each entry point tries, in order:
//!
//! 1. the resolved type's declaration name, parameterized by the names of its
//!    arguments;
//! 2. a best guess from the identifier the user wrote;
//! 3. [`TypeName::undefined`].
//!
//! The same input always yields the same name.

use tracing::trace;
use xproc_common::limits::MAX_NAME_DEPTH;
use xproc_common::naming::leading_identifier;
use xproc_common::{ClassName, TypeName};
use xproc_symbols::eager::{
    EagerDeclId, EagerSymbols, EagerTypeData, EagerTypeId, ReferenceElement, TypeRefId,
};
use xproc_symbols::resolved::{ElementId, ResolvedSymbols, ResolvedTypeData, ResolvedTypeId};

/// Guess a class name from written text: a dotted best guess when the text
/// looks qualified, otherwise its leading identifier in the default package.
pub fn guess_class_name(text: &str) -> Option<ClassName> {
    ClassName::best_guess(text)
        .or_else(|| leading_identifier(text).map(|identifier| ClassName::new("", identifier)))
}

// =============================================================================
// Eager back end
// =============================================================================

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EagerNameSource {
    /// A resolved type, with the reference it was written as when known.
    Type {
        ty: EagerTypeId,
        reference: Option<TypeRefId>,
    },
    /// A bare reference that may or may not resolve.
    Reference(TypeRefId),
}

pub fn resolve_eager_name(symbols: &EagerSymbols, source: Option<EagerNameSource>) -> TypeName {
    let (ty, reference) = match source {
        None => return TypeName::undefined(),
        Some(EagerNameSource::Type { ty, reference }) => (Some(ty), reference),
        Some(EagerNameSource::Reference(reference)) => (symbols.resolve(reference), Some(reference)),
    };
    if let Some(name) = ty.and_then(|ty| eager_type_name(symbols, ty, 0)) {
        return name;
    }
    let fallback = reference.and_then(|reference| reference_guess(symbols, reference));
    match fallback {
        Some(class) => {
            trace!(name = %class, "naming from the written reference");
            TypeName::Class(class)
        }
        None => TypeName::undefined(),
    }
}

fn reference_guess(symbols: &EagerSymbols, reference: TypeRefId) -> Option<ClassName> {
    match &symbols.reference_data(reference).element {
        ReferenceElement::Classifier {
            referenced_name, ..
        } => guess_class_name(symbols.resolve_atom(*referenced_name)),
        ReferenceElement::Unparseable { .. } => None,
    }
}

/// `None` when the type's declaration has no qualified name.
fn eager_type_name(symbols: &EagerSymbols, ty: EagerTypeId, depth: u32) -> Option<TypeName> {
    if depth > MAX_NAME_DEPTH {
        return Some(TypeName::undefined());
    }
    match symbols.lookup(ty) {
        EagerTypeData::Class {
            declaration,
            arguments,
            ..
        } => {
            let class = eager_class_name(symbols, declaration)?;
            if arguments.is_empty() {
                return Some(TypeName::Class(class));
            }
            let arguments = arguments
                .iter()
                .map(|argument| {
                    eager_type_name(symbols, argument.ty, depth + 1).unwrap_or_else(TypeName::undefined)
                })
                .collect();
            Some(TypeName::Parameterized {
                raw: class,
                arguments,
            })
        }
        EagerTypeData::Parameter { owner, index, .. } => symbols
            .declaration(owner)
            .type_parameters()
            .get(index as usize)
            .map(|parameter| TypeName::Variable(symbols.resolve_atom(parameter.name).to_string())),
        EagerTypeData::Error { name, .. } => {
            guess_class_name(symbols.resolve_atom(name)).map(TypeName::Class)
        }
    }
}

/// Package plus the chain of enclosing class simple names.
pub fn eager_class_name(symbols: &EagerSymbols, declaration: EagerDeclId) -> Option<ClassName> {
    let data = symbols.declaration(declaration);
    data.qualified_name?;
    let mut simple_names = vec![symbols.resolve_atom(data.simple_name)];
    let mut current = symbols.parent_declaration(declaration);
    while let Some(parent) = current {
        let parent_data = symbols.declaration(parent);
        if !parent_data.is_class_like() {
            break;
        }
        simple_names.push(symbols.resolve_atom(parent_data.simple_name));
        current = symbols.parent_declaration(parent);
    }
    Some(nest(symbols.resolve_atom(data.package), simple_names))
}

fn nest(package: &str, mut innermost_first: Vec<&str>) -> ClassName {
    let outermost = innermost_first.pop().unwrap_or_default();
    let mut class = ClassName::new(package, outermost);
    while let Some(simple_name) = innermost_first.pop() {
        class = class.nested(simple_name);
    }
    class
}

// =============================================================================
// Resolved back end
// =============================================================================

pub fn resolve_resolved_name(symbols: &ResolvedSymbols, source: Option<ResolvedTypeId>) -> TypeName {
    source
        .and_then(|ty| resolved_type_name(symbols, ty, 0))
        .unwrap_or_else(TypeName::undefined)
}

fn resolved_type_name(symbols: &ResolvedSymbols, ty: ResolvedTypeId, depth: u32) -> Option<TypeName> {
    if depth > MAX_NAME_DEPTH {
        return Some(TypeName::undefined());
    }
    let nested = |ty| resolved_type_name(symbols, ty, depth + 1).unwrap_or_else(TypeName::undefined);
    match symbols.lookup(ty) {
        ResolvedTypeData::Declared { element, arguments } => {
            let class = resolved_class_name(symbols, element)?;
            if arguments.is_empty() {
                return Some(TypeName::Class(class));
            }
            Some(TypeName::Parameterized {
                raw: class,
                arguments: arguments.iter().map(|argument| nested(*argument)).collect(),
            })
        }
        ResolvedTypeData::Primitive(kind) => Some(TypeName::Primitive(kind)),
        ResolvedTypeData::Array(component) => Some(TypeName::Array(Box::new(nested(component)))),
        ResolvedTypeData::TypeVariable { owner, index } => symbols
            .element(owner)
            .type_parameters
            .get(index as usize)
            .map(|parameter| TypeName::Variable(symbols.resolve_atom(parameter.name).to_string())),
        ResolvedTypeData::Wildcard {
            extends,
            super_bound,
        } => Some(TypeName::Wildcard {
            upper: extends.map(|bound| Box::new(nested(bound))),
            lower: super_bound.map(|bound| Box::new(nested(bound))),
        }),
        ResolvedTypeData::Error { spelling, .. } => {
            guess_class_name(symbols.resolve_atom(spelling)).map(TypeName::Class)
        }
        ResolvedTypeData::NoType => None,
    }
}

pub fn resolved_class_name(symbols: &ResolvedSymbols, element: ElementId) -> Option<ClassName> {
    let data = symbols.element(element);
    data.qualified_name?;
    let mut simple_names = vec![symbols.resolve_atom(data.simple_name)];
    let mut current = symbols.enclosing_element(element);
    while let Some(parent) = current {
        let parent_data = symbols.element(parent);
        if !parent_data.kind.is_type_element() {
            break;
        }
        simple_names.push(symbols.resolve_atom(parent_data.simple_name));
        current = symbols.enclosing_element(parent);
    }
    Some(nest(symbols.resolve_atom(data.package), simple_names))
}

#[cfg(test)]
#[path = "../tests/name_resolver_tests.rs"]
mod tests;
