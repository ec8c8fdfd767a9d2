//! Eager symbol model.
//!
//! Declarations are available before semantic resolution. Every type
//! position is a [`TypeReference`]: the syntax the user wrote plus the scope
//! it was written in. [`EagerSymbols::resolve`] binds a reference on demand
//! and memoizes the outcome, which is one of
//!
//! - a class or type-parameter type,
//! - an error type (the classifier name is known but binds to nothing),
//! - nothing at all (the element is not a classifier reference).
//!
//! Types carry a native three-valued nullability marker and are interned, so
//! two references to `List<String?>` resolve to the same [`EagerTypeId`].

mod builtins;
mod resolve;
mod subtype;

use crate::modifiers::Modifiers;
use builtins::BuiltinDecls;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use xproc_common::{Atom, Interner, PrimitiveKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EagerDeclId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EagerTypeId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRefId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ClassKind {
    Class,
    Interface,
    Object,
    EnumClass,
    EnumEntry,
    AnnotationClass,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Variance {
    Invariant,
    /// `out T`
    Covariant,
    /// `in T`
    Contravariant,
    /// `*`
    Star,
}

/// Native null-safety marker. `Platform` is used for types whose
/// nullability the compiler cannot tell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NativeNullability {
    Nullable,
    NotNull,
    Platform,
}

#[derive(Clone, Debug)]
pub struct TypeParameter {
    pub name: Atom,
    pub variance: Variance,
    pub bounds: Vec<TypeRefId>,
}

#[derive(Clone, Debug)]
pub enum EagerDeclKind {
    Class {
        class_kind: ClassKind,
        type_parameters: Vec<TypeParameter>,
        super_types: Vec<TypeRefId>,
    },
    Property {
        ty: Option<TypeRefId>,
    },
    Function {
        type_parameters: Vec<TypeParameter>,
        return_type: Option<TypeRefId>,
    },
    TypeAlias {
        type_parameters: Vec<TypeParameter>,
        target: Option<TypeRefId>,
    },
    /// A declaration kind this model does not classify; `kind_name` is the
    /// raw name reported by the front end.
    Other {
        kind_name: String,
    },
}

/// Where a declaration or reference lives.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    File(FileId),
    Declaration(EagerDeclId),
}

#[derive(Clone, Debug)]
pub struct SourceFile {
    pub name: Atom,
    pub package: Atom,
    pub imports: Vec<Atom>,
}

#[derive(Clone, Debug)]
pub struct EagerDeclaration {
    pub simple_name: Atom,
    pub package: Atom,
    /// `None` for local and anonymous declarations.
    pub qualified_name: Option<Atom>,
    pub kind: EagerDeclKind,
    pub parent: Scope,
    pub modifiers: Modifiers,
    pub annotations: Vec<TypeRefId>,
}

impl EagerDeclaration {
    pub fn class_kind(&self) -> Option<ClassKind> {
        match &self.kind {
            EagerDeclKind::Class { class_kind, .. } => Some(*class_kind),
            _ => None,
        }
    }

    pub fn is_class_like(&self) -> bool {
        matches!(self.kind, EagerDeclKind::Class { .. })
    }

    pub fn type_parameters(&self) -> &[TypeParameter] {
        match &self.kind {
            EagerDeclKind::Class {
                type_parameters, ..
            }
            | EagerDeclKind::Function {
                type_parameters, ..
            }
            | EagerDeclKind::TypeAlias {
                type_parameters, ..
            } => type_parameters,
            _ => &[],
        }
    }

    pub fn super_types(&self) -> &[TypeRefId] {
        match &self.kind {
            EagerDeclKind::Class { super_types, .. } => super_types,
            _ => &[],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceArgument {
    pub variance: Variance,
    /// `None` for `*`.
    pub type_ref: Option<TypeRefId>,
}

impl ReferenceArgument {
    pub fn invariant(type_ref: TypeRefId) -> Self {
        Self {
            variance: Variance::Invariant,
            type_ref: Some(type_ref),
        }
    }

    pub fn star() -> Self {
        Self {
            variance: Variance::Star,
            type_ref: None,
        }
    }
}

/// The syntactic part of a type reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferenceElement {
    /// `Name<Args>` as written. `referenced_name` may be qualified.
    Classifier {
        referenced_name: Atom,
        arguments: Vec<ReferenceArgument>,
    },
    /// Function types, dynamic types and anything else without a classifier.
    Unparseable { text: String },
}

#[derive(Clone, Debug)]
pub struct TypeReference {
    pub element: ReferenceElement,
    /// Written with a trailing `?`.
    pub nullable: bool,
    pub scope: Scope,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeArgument {
    pub variance: Variance,
    /// For star projections, the bound the projection stands for.
    pub ty: EagerTypeId,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum EagerTypeData {
    Class {
        declaration: EagerDeclId,
        arguments: SmallVec<[TypeArgument; 2]>,
        nullability: NativeNullability,
    },
    Parameter {
        owner: EagerDeclId,
        index: u32,
        nullability: NativeNullability,
    },
    /// A classifier name that binds to nothing. Each written reference gets
    /// its own instance, even when two are spelled the same.
    Error { name: Atom, origin: TypeRefId },
}

impl EagerTypeData {
    pub fn nullability(&self) -> Option<NativeNullability> {
        match self {
            EagerTypeData::Class { nullability, .. }
            | EagerTypeData::Parameter { nullability, .. } => Some(*nullability),
            EagerTypeData::Error { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EagerTypeData::Error { .. })
    }

    pub fn declaration(&self) -> Option<EagerDeclId> {
        match self {
            EagerTypeData::Class { declaration, .. } => Some(*declaration),
            _ => None,
        }
    }

    pub fn arguments(&self) -> &[TypeArgument] {
        match self {
            EagerTypeData::Class { arguments, .. } => arguments,
            _ => &[],
        }
    }
}

#[derive(Default)]
struct TypeTable {
    types: Vec<EagerTypeData>,
    index: FxHashMap<EagerTypeData, EagerTypeId>,
}

impl TypeTable {
    fn intern(&mut self, data: EagerTypeData) -> EagerTypeId {
        if let Some(&id) = self.index.get(&data) {
            return id;
        }
        let id = EagerTypeId(self.types.len() as u32);
        self.types.push(data.clone());
        self.index.insert(data, id);
        id
    }
}

/// The eager back end's symbol table for one round.
pub struct EagerSymbols {
    interner: Interner,
    files: Vec<SourceFile>,
    declarations: Vec<EagerDeclaration>,
    references: Vec<TypeReference>,
    by_qualified_name: FxHashMap<Atom, EagerDeclId>,
    builtins: BuiltinDecls,
    types: RefCell<TypeTable>,
    resolutions: RefCell<FxHashMap<TypeRefId, Option<EagerTypeId>>>,
}

impl EagerSymbols {
    /// An empty table pre-populated with the built-in `kotlin` declarations.
    pub fn new() -> Self {
        let mut interner = Interner::new();
        interner.intern_common();
        let mut symbols = Self {
            interner,
            files: Vec::new(),
            declarations: Vec::new(),
            references: Vec::new(),
            by_qualified_name: FxHashMap::default(),
            builtins: BuiltinDecls::default(),
            types: RefCell::new(TypeTable::default()),
            resolutions: RefCell::new(FxHashMap::default()),
        };
        symbols.builtins = symbols.declare_builtins();
        symbols
    }

    // =========================================================================
    // Building
    // =========================================================================

    pub fn intern(&mut self, text: &str) -> Atom {
        self.interner.intern(text)
    }

    pub fn add_file(&mut self, name: &str, package: &str) -> FileId {
        let id = FileId(self.files.len() as u32);
        let file = SourceFile {
            name: self.interner.intern(name),
            package: self.interner.intern(package),
            imports: Vec::new(),
        };
        self.files.push(file);
        id
    }

    pub fn add_import(&mut self, file: FileId, qualified_name: &str) {
        let atom = self.interner.intern(qualified_name);
        self.files[file.0 as usize].imports.push(atom);
    }

    /// Declare a named declaration. The qualified name is derived from the
    /// file package and the chain of enclosing class-likes; declarations
    /// nested in functions or properties are local and get none.
    pub fn declare(
        &mut self,
        parent: Scope,
        name: &str,
        kind: EagerDeclKind,
        modifiers: Modifiers,
    ) -> EagerDeclId {
        let (package, qualifier) = match parent {
            Scope::File(file) => {
                let package = self.files[file.0 as usize].package;
                (package, Some(package))
            }
            Scope::Declaration(owner) => {
                let owner = &self.declarations[owner.0 as usize];
                let qualifier = if owner.is_class_like() {
                    owner.qualified_name
                } else {
                    None
                };
                (owner.package, qualifier)
            }
        };
        let qualified_name = qualifier.map(|qualifier| {
            let qualifier = self.interner.resolve(qualifier);
            let joined = if qualifier.is_empty() {
                name.to_string()
            } else {
                format!("{qualifier}.{name}")
            };
            self.interner.intern(&joined)
        });
        let simple_name = self.interner.intern(name);
        self.push_declaration(EagerDeclaration {
            simple_name,
            package,
            qualified_name,
            kind,
            parent,
            modifiers,
            annotations: Vec::new(),
        })
    }

    /// Declare an anonymous declaration (an object expression, for instance).
    /// It has a simple name for display but no qualified name.
    pub fn declare_anonymous(
        &mut self,
        parent: Scope,
        display_name: &str,
        kind: EagerDeclKind,
        modifiers: Modifiers,
    ) -> EagerDeclId {
        let package = match parent {
            Scope::File(file) => self.files[file.0 as usize].package,
            Scope::Declaration(owner) => self.declarations[owner.0 as usize].package,
        };
        let simple_name = self.interner.intern(display_name);
        self.push_declaration(EagerDeclaration {
            simple_name,
            package,
            qualified_name: None,
            kind,
            parent,
            modifiers,
            annotations: Vec::new(),
        })
    }

    pub fn declare_class(
        &mut self,
        parent: Scope,
        name: &str,
        class_kind: ClassKind,
        modifiers: Modifiers,
    ) -> EagerDeclId {
        let kind = EagerDeclKind::Class {
            class_kind,
            type_parameters: Vec::new(),
            super_types: Vec::new(),
        };
        self.declare(parent, name, kind, modifiers)
    }

    fn push_declaration(&mut self, declaration: EagerDeclaration) -> EagerDeclId {
        let id = EagerDeclId(self.declarations.len() as u32);
        if let Some(qualified_name) = declaration.qualified_name {
            let names_type = matches!(
                declaration.kind,
                EagerDeclKind::Class { .. } | EagerDeclKind::TypeAlias { .. }
            );
            // Types win over values sharing a qualified name.
            if names_type || !self.by_qualified_name.contains_key(&qualified_name) {
                self.by_qualified_name.insert(qualified_name, id);
            }
        }
        self.declarations.push(declaration);
        id
    }

    /// Add a type parameter to a class, function or type alias; returns its
    /// index.
    pub fn add_type_parameter(
        &mut self,
        declaration: EagerDeclId,
        name: &str,
        variance: Variance,
    ) -> u32 {
        let name = self.interner.intern(name);
        match &mut self.declarations[declaration.0 as usize].kind {
            EagerDeclKind::Class {
                type_parameters, ..
            }
            | EagerDeclKind::Function {
                type_parameters, ..
            }
            | EagerDeclKind::TypeAlias {
                type_parameters, ..
            } => {
                type_parameters.push(TypeParameter {
                    name,
                    variance,
                    bounds: Vec::new(),
                });
                (type_parameters.len() - 1) as u32
            }
            _ => u32::MAX,
        }
    }

    pub fn add_type_parameter_bound(&mut self, declaration: EagerDeclId, index: u32, bound: TypeRefId) {
        if let EagerDeclKind::Class {
            type_parameters, ..
        }
        | EagerDeclKind::Function {
            type_parameters, ..
        }
        | EagerDeclKind::TypeAlias {
            type_parameters, ..
        } = &mut self.declarations[declaration.0 as usize].kind
        {
            if let Some(parameter) = type_parameters.get_mut(index as usize) {
                parameter.bounds.push(bound);
            }
        }
    }

    pub fn add_super_type(&mut self, declaration: EagerDeclId, super_type: TypeRefId) {
        if let EagerDeclKind::Class { super_types, .. } =
            &mut self.declarations[declaration.0 as usize].kind
        {
            super_types.push(super_type);
        }
    }

    /// Set a property's type, a function's return type or an alias target.
    pub fn set_type(&mut self, declaration: EagerDeclId, reference: TypeRefId) {
        match &mut self.declarations[declaration.0 as usize].kind {
            EagerDeclKind::Property { ty } => *ty = Some(reference),
            EagerDeclKind::Function { return_type, .. } => *return_type = Some(reference),
            EagerDeclKind::TypeAlias { target, .. } => *target = Some(reference),
            _ => {}
        }
    }

    pub fn add_annotation(&mut self, declaration: EagerDeclId, annotation: TypeRefId) {
        self.declarations[declaration.0 as usize]
            .annotations
            .push(annotation);
    }

    /// Record a classifier reference as written in `scope`.
    pub fn reference(
        &mut self,
        scope: Scope,
        referenced_name: &str,
        arguments: Vec<ReferenceArgument>,
        nullable: bool,
    ) -> TypeRefId {
        let referenced_name = self.interner.intern(referenced_name);
        self.push_reference(TypeReference {
            element: ReferenceElement::Classifier {
                referenced_name,
                arguments,
            },
            nullable,
            scope,
        })
    }

    /// Record a reference whose element is not a classifier.
    pub fn unparseable_reference(&mut self, scope: Scope, text: &str, nullable: bool) -> TypeRefId {
        self.push_reference(TypeReference {
            element: ReferenceElement::Unparseable {
                text: text.to_string(),
            },
            nullable,
            scope,
        })
    }

    fn push_reference(&mut self, reference: TypeReference) -> TypeRefId {
        let id = TypeRefId(self.references.len() as u32);
        self.references.push(reference);
        id
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn resolve_atom(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    pub fn file(&self, id: FileId) -> &SourceFile {
        &self.files[id.0 as usize]
    }

    pub fn declaration(&self, id: EagerDeclId) -> &EagerDeclaration {
        &self.declarations[id.0 as usize]
    }

    pub fn declarations(&self) -> impl Iterator<Item = (EagerDeclId, &EagerDeclaration)> {
        self.declarations
            .iter()
            .enumerate()
            .map(|(i, d)| (EagerDeclId(i as u32), d))
    }

    pub fn reference_data(&self, id: TypeRefId) -> &TypeReference {
        &self.references[id.0 as usize]
    }

    /// The interned data behind a type id.
    pub fn lookup(&self, id: EagerTypeId) -> EagerTypeData {
        self.types.borrow().types[id.0 as usize].clone()
    }

    pub fn is_error(&self, id: EagerTypeId) -> bool {
        self.types.borrow().types[id.0 as usize].is_error()
    }

    /// Exact lookup by qualified name.
    pub fn find_declaration(&self, qualified_name: &str) -> Option<EagerDeclId> {
        let atom = self.interner.get(qualified_name)?;
        self.by_qualified_name.get(&atom).copied()
    }

    /// The nearest enclosing declaration, skipping nothing.
    pub fn parent_declaration(&self, id: EagerDeclId) -> Option<EagerDeclId> {
        match self.declaration(id).parent {
            Scope::Declaration(parent) => Some(parent),
            Scope::File(_) => None,
        }
    }

    /// The file a scope ultimately belongs to.
    pub fn file_of(&self, scope: Scope) -> Option<FileId> {
        let mut scope = scope;
        for _ in 0..self.declarations.len() + 1 {
            match scope {
                Scope::File(file) => return Some(file),
                Scope::Declaration(id) => scope = self.declaration(id).parent,
            }
        }
        None
    }

    pub(crate) fn intern_type(&self, data: EagerTypeData) -> EagerTypeId {
        self.types.borrow_mut().intern(data)
    }

    /// The error type for `origin`, which failed to bind under `name`.
    pub fn error_type(&self, name: Atom, origin: TypeRefId) -> EagerTypeId {
        self.intern_type(EagerTypeData::Error { name, origin })
    }

    /// `kotlin.Any` with the given nullability.
    pub fn any_type(&self, nullability: NativeNullability) -> EagerTypeId {
        self.intern_type(EagerTypeData::Class {
            declaration: self.builtins.any,
            arguments: SmallVec::new(),
            nullability,
        })
    }

    /// The non-null built-in type for a primitive kind (`kotlin.Int`, ...).
    pub fn primitive_type(&self, kind: PrimitiveKind) -> EagerTypeId {
        self.intern_type(EagerTypeData::Class {
            declaration: self.builtins.primitive(kind),
            arguments: SmallVec::new(),
            nullability: NativeNullability::NotNull,
        })
    }

    /// Same type with a different nullability. Error types are returned unchanged.
    pub fn with_nullability(&self, id: EagerTypeId, nullability: NativeNullability) -> EagerTypeId {
        match self.lookup(id) {
            EagerTypeData::Class {
                declaration,
                arguments,
                ..
            } => self.intern_type(EagerTypeData::Class {
                declaration,
                arguments,
                nullability,
            }),
            EagerTypeData::Parameter { owner, index, .. } => {
                self.intern_type(EagerTypeData::Parameter {
                    owner,
                    index,
                    nullability,
                })
            }
            EagerTypeData::Error { .. } => id,
        }
    }

    /// Every built-in type the resolver exposes, in declaration order.
    pub fn builtin_types(&self) -> Vec<EagerTypeId> {
        self.builtins.exposed_types(self)
    }

    pub fn is_nothing(&self, declaration: EagerDeclId) -> bool {
        declaration == self.builtins.nothing
    }

    pub fn is_any(&self, declaration: EagerDeclId) -> bool {
        declaration == self.builtins.any
    }

    /// The primitive kind a built-in declaration stands for (`kotlin.Int` is
    /// `int`), if any.
    pub fn primitive_kind(&self, declaration: EagerDeclId) -> Option<PrimitiveKind> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| self.builtins.primitive(*kind) == declaration)
    }
}

impl Default for EagerSymbols {
    fn default() -> Self {
        Self::new()
    }
}
