//! On-demand binding of type references.

use super::{
    EagerDeclId, EagerDeclKind, EagerSymbols, EagerTypeData, EagerTypeId, NativeNullability,
    ReferenceArgument, ReferenceElement, Scope, TypeArgument, TypeRefId, Variance,
};
use smallvec::SmallVec;
use tracing::{debug, trace};
use xproc_common::limits::MAX_ALIAS_EXPANSION_DEPTH;

/// Packages whose classifiers are visible without an import.
const DEFAULT_IMPORTS: &[&str] = &["kotlin", "kotlin.collections"];

impl EagerSymbols {
    /// Bind a reference. Returns `None` when the reference element is not a
    /// classifier, an error type when the classifier name binds to nothing.
    pub fn resolve(&self, reference: TypeRefId) -> Option<EagerTypeId> {
        self.resolve_cached(reference, 0)
    }

    fn resolve_cached(&self, reference: TypeRefId, depth: u32) -> Option<EagerTypeId> {
        if let Some(cached) = self.resolutions.borrow().get(&reference).copied() {
            return cached;
        }
        let resolved = self.resolve_uncached(reference, depth);
        self.resolutions.borrow_mut().insert(reference, resolved);
        resolved
    }

    fn resolve_uncached(&self, reference: TypeRefId, depth: u32) -> Option<EagerTypeId> {
        let data = self.reference_data(reference);
        let ReferenceElement::Classifier {
            referenced_name,
            arguments,
        } = &data.element
        else {
            trace!(reference = reference.0, "reference has no classifier element");
            return None;
        };
        if depth > MAX_ALIAS_EXPANSION_DEPTH {
            debug!(
                name = self.resolve_atom(*referenced_name),
                "type reference nested too deeply"
            );
            return Some(self.error_type(*referenced_name, reference));
        }
        let nullability = if data.nullable {
            NativeNullability::Nullable
        } else {
            NativeNullability::NotNull
        };
        let name = self.resolve_atom(*referenced_name);

        if arguments.is_empty() {
            if let Some((owner, index)) = self.find_type_parameter(data.scope, name) {
                return Some(self.intern_type(EagerTypeData::Parameter {
                    owner,
                    index,
                    nullability,
                }));
            }
        }

        let Some(declaration) = self.lookup_classifier(name, data.scope) else {
            debug!(name, "unresolved type reference");
            return Some(self.error_type(*referenced_name, reference));
        };
        let arguments = self.resolve_arguments(declaration, arguments, depth);

        match &self.declaration(declaration).kind {
            EagerDeclKind::Class { .. } => Some(self.intern_type(EagerTypeData::Class {
                declaration,
                arguments,
                nullability,
            })),
            EagerDeclKind::TypeAlias {
                target: Some(target),
                ..
            } => {
                let target = *target;
                let expanded = self.resolve_cached(target, depth + 1)?;
                let substituted = self.substitute(expanded, declaration, &arguments);
                Some(if data.nullable {
                    self.with_nullability(substituted, NativeNullability::Nullable)
                } else {
                    substituted
                })
            }
            _ => Some(self.error_type(*referenced_name, reference)),
        }
    }

    fn resolve_arguments(
        &self,
        declaration: EagerDeclId,
        arguments: &[ReferenceArgument],
        depth: u32,
    ) -> SmallVec<[TypeArgument; 2]> {
        arguments
            .iter()
            .enumerate()
            .map(|(index, argument)| match (argument.variance, argument.type_ref) {
                (Variance::Star, _) | (_, None) => TypeArgument {
                    variance: Variance::Star,
                    ty: self.star_argument(declaration, index, depth),
                },
                (variance, Some(type_ref)) => TypeArgument {
                    variance,
                    ty: self
                        .resolve_cached(type_ref, depth + 1)
                        .unwrap_or_else(|| self.error_type(xproc_common::Atom::NONE, type_ref)),
                },
            })
            .collect()
    }

    /// What a `*` in position `index` of `declaration` stands for: the first
    /// upper bound of the type parameter, or `Any?` when it has none.
    fn star_argument(&self, declaration: EagerDeclId, index: usize, depth: u32) -> EagerTypeId {
        self.declaration(declaration)
            .type_parameters()
            .get(index)
            .and_then(|parameter| parameter.bounds.first().copied())
            .and_then(|bound| self.resolve_cached(bound, depth + 1))
            .unwrap_or_else(|| self.any_type(NativeNullability::Nullable))
    }

    /// The declaration's type with every type parameter replaced by a star
    /// projection.
    pub fn star_projected_type(&self, declaration: EagerDeclId) -> EagerTypeId {
        let arguments = (0..self.declaration(declaration).type_parameters().len())
            .map(|index| TypeArgument {
                variance: Variance::Star,
                ty: self.star_argument(declaration, index, 0),
            })
            .collect();
        self.intern_type(EagerTypeData::Class {
            declaration,
            arguments,
            nullability: NativeNullability::NotNull,
        })
    }

    /// Type parameters are visible from their owner and everything nested in it.
    fn find_type_parameter(&self, scope: Scope, name: &str) -> Option<(EagerDeclId, u32)> {
        let mut scope = scope;
        loop {
            let Scope::Declaration(id) = scope else {
                return None;
            };
            let declaration = self.declaration(id);
            if let Some(index) = declaration
                .type_parameters()
                .iter()
                .position(|parameter| self.resolve_atom(parameter.name) == name)
            {
                return Some((id, index as u32));
            }
            scope = declaration.parent;
        }
    }

    /// Lookup order: enclosing classes (nested names), explicit imports, the
    /// file's own package, then the default imports. Dotted names are tried
    /// as written first.
    pub(crate) fn lookup_classifier(&self, name: &str, scope: Scope) -> Option<EagerDeclId> {
        if name.contains('.') {
            if let Some(found) = self.find_type_declaration(name) {
                return Some(found);
            }
        }

        let mut enclosing = scope;
        while let Scope::Declaration(id) = enclosing {
            let declaration = self.declaration(id);
            if declaration.is_class_like() {
                if let Some(qualified) = declaration.qualified_name {
                    let candidate = format!("{}.{name}", self.resolve_atom(qualified));
                    if let Some(found) = self.find_type_declaration(&candidate) {
                        return Some(found);
                    }
                }
            } else if let Some(found) = self.find_local_classifier(id, name) {
                return Some(found);
            }
            enclosing = declaration.parent;
        }

        let file = self.file(self.file_of(scope)?);
        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };
        for import in &file.imports {
            let import = self.resolve_atom(*import);
            let imported_name = import.rsplit('.').next().unwrap_or(import);
            if imported_name == head {
                let candidate = match rest {
                    Some(rest) => format!("{import}.{rest}"),
                    None => import.to_string(),
                };
                if let Some(found) = self.find_type_declaration(&candidate) {
                    return Some(found);
                }
            }
        }

        let package = self.resolve_atom(file.package);
        let packages = std::iter::once(package).chain(DEFAULT_IMPORTS.iter().copied());
        for package in packages {
            let candidate = if package.is_empty() {
                name.to_string()
            } else {
                format!("{package}.{name}")
            };
            if let Some(found) = self.find_type_declaration(&candidate) {
                return Some(found);
            }
        }
        None
    }

    /// Local classes have no qualified name; they are found by scanning the
    /// children of the function or property declaring them.
    fn find_local_classifier(&self, owner: EagerDeclId, name: &str) -> Option<EagerDeclId> {
        self.declarations()
            .find(|(_, declaration)| {
                declaration.parent == Scope::Declaration(owner)
                    && declaration.is_class_like()
                    && self.resolve_atom(declaration.simple_name) == name
            })
            .map(|(id, _)| id)
    }

    fn find_type_declaration(&self, qualified_name: &str) -> Option<EagerDeclId> {
        self.find_declaration(qualified_name).filter(|id| {
            matches!(
                self.declaration(*id).kind,
                EagerDeclKind::Class { .. } | EagerDeclKind::TypeAlias { .. }
            )
        })
    }
}
