//! JSON descriptions of one round's sources.
//!
//! A [`Fixture`] is written once in source-language terms and can be
//! materialised into either back end:
//!
//! ```json
//! {
//!   "options": { "xproc.verbose": "true" },
//!   "files": [{
//!     "name": "Foo.kt",
//!     "package": "foo.bar",
//!     "imports": ["other.Thing"],
//!     "declarations": [
//!       { "kind": "class", "name": "Baz", "super_types": ["AbstractClass"],
//!         "members": [
//!           { "kind": "property", "name": "names",
//!             "type": { "name": "List", "args": ["String?"] } }
//!         ] }
//!     ]
//!   }]
//! }
//! ```
//!
//! Type specs are either a shorthand string (`"String"`, `"Int?"`, `"*"` in
//! argument position), `{ "name", "nullable", "args" }`, or `{ "raw" }` for
//! a reference with no classifier. Arguments may be a plain type spec or
//! `{ "variance": "out" | "in" | "invariant" | "star", "type": ... }`.

use crate::eager::{
    ClassKind, EagerDeclId, EagerDeclKind, EagerSymbols, ReferenceArgument, Scope, TypeRefId,
    Variance,
};
use crate::modifiers::Modifiers;
use crate::resolved::{
    AnnotatedNullability, ElementId, ElementKind, Enclosing, ResolvedSymbols, ResolvedTypeData,
    ResolvedTypeId,
};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use xproc_common::limits::MAX_ALIAS_EXPANSION_DEPTH;
use xproc_common::naming::is_identifier;
use xproc_common::{PrimitiveKind, ProcessingOptions};

/// Display name given to declarations without a name.
pub const ANONYMOUS_NAME: &str = "<anonymous>";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub options: ProcessingOptions,
    #[serde(default)]
    pub files: Vec<FileSpec>,
}

impl Fixture {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileSpec {
    pub name: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub declarations: Vec<DeclSpec>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclKindSpec {
    Class,
    Interface,
    Object,
    EnumClass,
    EnumEntry,
    AnnotationClass,
    Property,
    Function,
    TypeAlias,
    Other,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeclSpec {
    pub kind: DeclKindSpec,
    /// Absent for anonymous declarations.
    #[serde(default)]
    pub name: Option<String>,
    /// Raw kind name for `"other"` declarations.
    #[serde(default)]
    pub kind_name: Option<String>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterSpec>,
    #[serde(default)]
    pub super_types: Vec<TypeSpec>,
    /// Property type, function return type or alias target.
    #[serde(default, rename = "type")]
    pub ty: Option<TypeSpec>,
    #[serde(default)]
    pub annotations: Vec<TypeSpec>,
    #[serde(default)]
    pub members: Vec<DeclSpec>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeParameterSpec {
    pub name: String,
    #[serde(default)]
    pub variance: VarianceSpec,
    #[serde(default)]
    pub bounds: Vec<TypeSpec>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceSpec {
    #[default]
    Invariant,
    Out,
    In,
    Star,
}

impl From<VarianceSpec> for Variance {
    fn from(variance: VarianceSpec) -> Self {
        match variance {
            VarianceSpec::Invariant => Variance::Invariant,
            VarianceSpec::Out => Variance::Covariant,
            VarianceSpec::In => Variance::Contravariant,
            VarianceSpec::Star => Variance::Star,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSpec {
    Shorthand(String),
    Raw {
        raw: String,
        #[serde(default)]
        nullable: bool,
    },
    Named {
        name: String,
        #[serde(default)]
        nullable: bool,
        #[serde(default)]
        args: Vec<ArgSpec>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgSpec {
    Projected {
        variance: VarianceSpec,
        #[serde(default, rename = "type")]
        ty: Option<TypeSpec>,
    },
    Plain(TypeSpec),
}

impl ArgSpec {
    fn is_star(&self) -> bool {
        match self {
            ArgSpec::Plain(spec) => spec.is_star(),
            ArgSpec::Projected { variance, ty } => *variance == VarianceSpec::Star || ty.is_none(),
        }
    }
}

enum Written<'a> {
    Classifier {
        name: &'a str,
        nullable: bool,
        args: &'a [ArgSpec],
    },
    Unparseable {
        text: &'a str,
        nullable: bool,
    },
}

impl TypeSpec {
    pub fn is_star(&self) -> bool {
        matches!(self, TypeSpec::Shorthand(text) if text == "*")
    }

    fn written(&self) -> Written<'_> {
        match self {
            TypeSpec::Shorthand(text) => {
                let (name, nullable) = match text.strip_suffix('?') {
                    Some(name) => (name, true),
                    None => (text.as_str(), false),
                };
                if !name.is_empty() && name.split('.').all(is_identifier) {
                    Written::Classifier {
                        name,
                        nullable,
                        args: &[],
                    }
                } else {
                    Written::Unparseable {
                        text: name,
                        nullable,
                    }
                }
            }
            TypeSpec::Raw { raw, nullable } => Written::Unparseable {
                text: raw,
                nullable: *nullable,
            },
            TypeSpec::Named {
                name,
                nullable,
                args,
            } => Written::Classifier {
                name,
                nullable: *nullable,
                args,
            },
        }
    }

    fn as_nullable(&self) -> TypeSpec {
        match self {
            TypeSpec::Shorthand(text) if text.ends_with('?') => self.clone(),
            TypeSpec::Shorthand(text) => TypeSpec::Shorthand(format!("{text}?")),
            TypeSpec::Raw { raw, .. } => TypeSpec::Raw {
                raw: raw.clone(),
                nullable: true,
            },
            TypeSpec::Named { name, args, .. } => TypeSpec::Named {
                name: name.clone(),
                nullable: true,
                args: args.clone(),
            },
        }
    }

    /// Replace bare references to alias parameters with the bound specs.
    fn substitute(&self, bindings: &FxHashMap<&str, TypeSpec>) -> TypeSpec {
        match self.written() {
            Written::Classifier {
                name,
                nullable,
                args,
            } if args.is_empty() => match bindings.get(name) {
                Some(bound) if nullable => bound.as_nullable(),
                Some(bound) => bound.clone(),
                None => self.clone(),
            },
            Written::Classifier {
                name,
                nullable,
                args,
            } => TypeSpec::Named {
                name: name.to_string(),
                nullable,
                args: args
                    .iter()
                    .map(|arg| match arg {
                        ArgSpec::Plain(spec) => ArgSpec::Plain(spec.substitute(bindings)),
                        ArgSpec::Projected { variance, ty } => ArgSpec::Projected {
                            variance: *variance,
                            ty: ty.as_ref().map(|spec| spec.substitute(bindings)),
                        },
                    })
                    .collect(),
            },
            Written::Unparseable { .. } => self.clone(),
        }
    }
}

fn parse_modifiers(words: &[String]) -> Modifiers {
    words.iter().fold(Modifiers::empty(), |modifiers, word| {
        match Modifiers::from_keyword(word) {
            Some(modifier) => modifiers | modifier,
            None => {
                debug!(modifier = %word, "ignoring unknown modifier");
                modifiers
            }
        }
    })
}

// =============================================================================
// Eager back end
// =============================================================================

/// Build an eager symbol table. References are recorded as written and bind
/// lazily, so declaration order does not matter.
pub fn load_eager(fixture: &Fixture) -> EagerSymbols {
    let mut symbols = EagerSymbols::new();
    for file in &fixture.files {
        let id = symbols.add_file(&file.name, &file.package);
        for import in &file.imports {
            symbols.add_import(id, import);
        }
        for declaration in &file.declarations {
            declare_eager(&mut symbols, Scope::File(id), declaration);
        }
    }
    debug!(files = fixture.files.len(), "loaded eager fixture");
    symbols
}

fn declare_eager(symbols: &mut EagerSymbols, parent: Scope, spec: &DeclSpec) -> EagerDeclId {
    let class = |class_kind| EagerDeclKind::Class {
        class_kind,
        type_parameters: Vec::new(),
        super_types: Vec::new(),
    };
    let kind = match spec.kind {
        DeclKindSpec::Class => class(ClassKind::Class),
        DeclKindSpec::Interface => class(ClassKind::Interface),
        DeclKindSpec::Object => class(ClassKind::Object),
        DeclKindSpec::EnumClass => class(ClassKind::EnumClass),
        DeclKindSpec::EnumEntry => class(ClassKind::EnumEntry),
        DeclKindSpec::AnnotationClass => class(ClassKind::AnnotationClass),
        DeclKindSpec::Property => EagerDeclKind::Property { ty: None },
        DeclKindSpec::Function => EagerDeclKind::Function {
            type_parameters: Vec::new(),
            return_type: None,
        },
        DeclKindSpec::TypeAlias => EagerDeclKind::TypeAlias {
            type_parameters: Vec::new(),
            target: None,
        },
        DeclKindSpec::Other => EagerDeclKind::Other {
            kind_name: spec.kind_name.clone().unwrap_or_else(|| "other".to_string()),
        },
    };
    let modifiers = parse_modifiers(&spec.modifiers);
    let id = match &spec.name {
        Some(name) => symbols.declare(parent, name, kind, modifiers),
        None => symbols.declare_anonymous(parent, ANONYMOUS_NAME, kind, modifiers),
    };
    let scope = Scope::Declaration(id);

    for parameter in &spec.type_parameters {
        let index = symbols.add_type_parameter(id, &parameter.name, parameter.variance.into());
        for bound in &parameter.bounds {
            let bound = eager_reference(symbols, scope, bound);
            symbols.add_type_parameter_bound(id, index, bound);
        }
    }
    for super_type in &spec.super_types {
        let super_type = eager_reference(symbols, scope, super_type);
        symbols.add_super_type(id, super_type);
    }
    if let Some(ty) = &spec.ty {
        let ty = eager_reference(symbols, scope, ty);
        symbols.set_type(id, ty);
    }
    for annotation in &spec.annotations {
        let annotation = eager_reference(symbols, scope, annotation);
        symbols.add_annotation(id, annotation);
    }
    for member in &spec.members {
        declare_eager(symbols, scope, member);
    }
    id
}

fn eager_reference(symbols: &mut EagerSymbols, scope: Scope, spec: &TypeSpec) -> TypeRefId {
    match spec.written() {
        Written::Unparseable { text, nullable } => symbols.unparseable_reference(scope, text, nullable),
        Written::Classifier {
            name,
            nullable,
            args,
        } => {
            let arguments = args
                .iter()
                .map(|arg| eager_argument(symbols, scope, arg))
                .collect();
            symbols.reference(scope, name, arguments, nullable)
        }
    }
}

fn eager_argument(symbols: &mut EagerSymbols, scope: Scope, arg: &ArgSpec) -> ReferenceArgument {
    if arg.is_star() {
        return ReferenceArgument::star();
    }
    match arg {
        ArgSpec::Plain(spec) => ReferenceArgument::invariant(eager_reference(symbols, scope, spec)),
        ArgSpec::Projected { variance, ty } => ReferenceArgument {
            variance: (*variance).into(),
            type_ref: ty.as_ref().map(|spec| eager_reference(symbols, scope, spec)),
        },
    }
}

// =============================================================================
// Resolved back end
// =============================================================================

/// Build a resolved symbol table. Names are bound while loading; a name that
/// binds to nothing becomes a fresh error type.
///
/// Source-language constructs are lowered the way the compiler lowers them:
/// objects get a static `INSTANCE` field, top-level functions and properties
/// live in a `<File>Kt` facade class, aliases are expanded in place and
/// nullable declarations record a nullability annotation.
pub fn load_resolved(fixture: &Fixture) -> ResolvedSymbols {
    let mut loader = ResolvedLoader::new();
    for (index, file) in fixture.files.iter().enumerate() {
        for declaration in &file.declarations {
            loader.declare(index, file, Enclosing::Package, declaration);
        }
    }
    let mut cursor = 0;
    for file in &fixture.files {
        let mut scopes = Vec::new();
        for declaration in &file.declarations {
            loader.populate(file, &mut scopes, declaration, &mut cursor);
        }
    }
    debug!(
        files = fixture.files.len(),
        aliases = loader.aliases.len(),
        "loaded resolved fixture"
    );
    loader.symbols
}

#[derive(Clone)]
struct AliasSpec {
    parameters: Vec<String>,
    target: TypeSpec,
}

enum Target {
    Element(ElementId),
    Variable(ElementId, u32),
    Primitive(PrimitiveKind),
    Array,
    NoType,
    Alias(AliasSpec),
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Position {
    /// Field type or method return type: non-null primitives stay primitive.
    Value,
    /// Everywhere else primitives are boxed.
    Argument,
}

struct ResolvedLoader {
    symbols: ResolvedSymbols,
    aliases: FxHashMap<String, AliasSpec>,
    /// Elements created by the first pass, in declaration pre-order. Aliases
    /// leave a `None`.
    declared: Vec<Option<ElementId>>,
    facades: FxHashMap<usize, ElementId>,
}

fn qualify(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}.{name}")
    }
}

fn facade_name(file_name: &str) -> String {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    let stem = base.strip_suffix(".kt").unwrap_or(base);
    let mut chars = stem.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("{capitalized}Kt")
}

impl ResolvedLoader {
    fn new() -> Self {
        Self {
            symbols: ResolvedSymbols::new(),
            aliases: FxHashMap::default(),
            declared: Vec::new(),
            facades: FxHashMap::default(),
        }
    }

    fn facade(&mut self, index: usize, file: &FileSpec) -> ElementId {
        if let Some(facade) = self.facades.get(&index) {
            return *facade;
        }
        let facade = self.symbols.declare_type(
            Enclosing::Package,
            &file.package,
            &facade_name(&file.name),
            ElementKind::Class,
            Modifiers::PUBLIC | Modifiers::FINAL,
        );
        self.facades.insert(index, facade);
        facade
    }

    /// First pass: create every element so forward references bind.
    fn declare(&mut self, file_index: usize, file: &FileSpec, enclosing: Enclosing, spec: &DeclSpec) {
        let written = parse_modifiers(&spec.modifiers);
        let mut modifiers = written - Modifiers::VISIBILITY - Modifiers::OPEN;
        modifiers |= if written.intersects(Modifiers::PRIVATE) {
            Modifiers::PRIVATE
        } else if written.intersects(Modifiers::PROTECTED) {
            Modifiers::PROTECTED
        } else {
            Modifiers::PUBLIC
        };
        let closed = !written.intersects(Modifiers::OPEN | Modifiers::ABSTRACT);

        let kind = match spec.kind {
            DeclKindSpec::TypeAlias => {
                if let (Some(name), Some(target)) = (&spec.name, &spec.ty) {
                    let alias = AliasSpec {
                        parameters: spec.type_parameters.iter().map(|p| p.name.clone()).collect(),
                        target: target.clone(),
                    };
                    self.aliases.insert(qualify(&file.package, name), alias);
                }
                self.declared.push(None);
                return;
            }
            DeclKindSpec::Class => {
                if closed {
                    modifiers |= Modifiers::FINAL;
                }
                ElementKind::Class
            }
            DeclKindSpec::Object => {
                modifiers |= Modifiers::FINAL;
                ElementKind::Class
            }
            DeclKindSpec::Interface => {
                modifiers |= Modifiers::ABSTRACT;
                ElementKind::Interface
            }
            DeclKindSpec::EnumClass => {
                modifiers |= Modifiers::FINAL;
                ElementKind::Enum
            }
            DeclKindSpec::AnnotationClass => ElementKind::Annotation,
            DeclKindSpec::EnumEntry => {
                modifiers |= Modifiers::STATIC | Modifiers::FINAL;
                ElementKind::Field
            }
            DeclKindSpec::Property => {
                if closed {
                    modifiers |= Modifiers::FINAL;
                }
                ElementKind::Field
            }
            DeclKindSpec::Function => {
                if closed {
                    modifiers |= Modifiers::FINAL;
                }
                ElementKind::Method
            }
            DeclKindSpec::Other => {
                ElementKind::Other(spec.kind_name.clone().unwrap_or_else(|| "OTHER".to_string()))
            }
        };

        let id = match (&spec.name, enclosing) {
            (None, _) => self.symbols.declare_anonymous(
                enclosing,
                &file.package,
                ANONYMOUS_NAME,
                kind,
                modifiers,
            ),
            (Some(name), _) if kind.is_type_element() => {
                self.symbols
                    .declare_type(enclosing, &file.package, name, kind, modifiers)
            }
            (Some(name), Enclosing::Element(owner)) => {
                self.symbols.declare_member(owner, name, kind, modifiers)
            }
            (Some(name), Enclosing::Package) => {
                let facade = self.facade(file_index, file);
                self.symbols
                    .declare_member(facade, name, kind, modifiers | Modifiers::STATIC)
            }
        };
        if spec.kind == DeclKindSpec::Object {
            let instance = self.symbols.declare_member(
                id,
                "INSTANCE",
                ElementKind::Field,
                Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL,
            );
            let self_type = self.symbols.declared_type(id, Vec::new());
            self.symbols.set_type(instance, self_type);
        }
        for parameter in &spec.type_parameters {
            self.symbols.add_type_parameter(id, &parameter.name);
        }
        self.declared.push(Some(id));
        for member in &spec.members {
            self.declare(file_index, file, Enclosing::Element(id), member);
        }
    }

    /// Second pass: bind every type position.
    fn populate(
        &mut self,
        file: &FileSpec,
        scopes: &mut Vec<ElementId>,
        spec: &DeclSpec,
        cursor: &mut usize,
    ) {
        let slot = self.declared.get(*cursor).copied().flatten();
        *cursor += 1;
        let Some(id) = slot else {
            return;
        };
        scopes.push(id);

        for (index, parameter) in spec.type_parameters.iter().enumerate() {
            for bound in &parameter.bounds {
                let bound = self.resolve_spec(file, scopes, bound, Position::Argument, 0);
                self.symbols.add_type_parameter_bound(id, index as u32, bound);
            }
        }

        let is_interface = self.symbols.element(id).kind == ElementKind::Interface;
        for super_type in &spec.super_types {
            let super_type = self.resolve_spec(file, scopes, super_type, Position::Argument, 0);
            let names_interface = match self.symbols.lookup(super_type) {
                ResolvedTypeData::Declared { element, .. } => {
                    self.symbols.element(element).kind == ElementKind::Interface
                }
                _ => false,
            };
            if is_interface || names_interface || self.symbols.element(id).superclass.is_some() {
                self.symbols.add_interface(id, super_type);
            } else {
                self.symbols.set_superclass(id, super_type);
            }
        }

        match spec.kind {
            DeclKindSpec::EnumEntry => {
                if let Some(owner) = self.symbols.enclosing_element(id) {
                    let owner_type = self.symbols.declared_type(owner, Vec::new());
                    self.symbols.set_type(id, owner_type);
                }
            }
            DeclKindSpec::Property | DeclKindSpec::Function => match &spec.ty {
                Some(ty) => {
                    let resolved = self.resolve_spec(file, scopes, ty, Position::Value, 0);
                    self.symbols.set_type(id, resolved);
                    let nullable = matches!(
                        ty.written(),
                        Written::Classifier { nullable: true, .. }
                            | Written::Unparseable { nullable: true, .. }
                    );
                    if nullable {
                        self.symbols.set_nullability(id, AnnotatedNullability::Nullable);
                    } else if !matches!(
                        self.symbols.lookup(resolved),
                        ResolvedTypeData::Primitive(_) | ResolvedTypeData::NoType
                    ) {
                        self.symbols.set_nullability(id, AnnotatedNullability::NonNull);
                    }
                }
                None if spec.kind == DeclKindSpec::Function => {
                    let void = self.symbols.no_type();
                    self.symbols.set_type(id, void);
                }
                None => {}
            },
            _ => {}
        }

        for annotation in &spec.annotations {
            let annotation = self.resolve_spec(file, scopes, annotation, Position::Argument, 0);
            self.symbols.add_annotation(id, annotation);
        }
        for member in &spec.members {
            self.populate(file, scopes, member, cursor);
        }
        scopes.pop();
    }

    fn resolve_spec(
        &mut self,
        file: &FileSpec,
        scopes: &[ElementId],
        spec: &TypeSpec,
        position: Position,
        depth: u32,
    ) -> ResolvedTypeId {
        let (name, nullable, args) = match spec.written() {
            Written::Unparseable { text, .. } => return self.symbols.error_type(text),
            Written::Classifier {
                name,
                nullable,
                args,
            } => (name, nullable, args),
        };
        if depth > MAX_ALIAS_EXPANSION_DEPTH {
            debug!(name, "alias expansion too deep");
            return self.symbols.error_type(name);
        }
        let Some(target) = self.lookup_name(file, scopes, name, args.is_empty()) else {
            debug!(name, "unresolved name in fixture");
            return self.symbols.error_type(name);
        };
        match target {
            Target::Variable(owner, index) => self.symbols.type_variable(owner, index),
            Target::Element(element) => {
                let arguments = args
                    .iter()
                    .map(|arg| self.resolve_argument(file, scopes, arg, depth))
                    .collect();
                self.symbols.declared_type(element, arguments)
            }
            Target::Primitive(kind) => {
                if position == Position::Value && !nullable {
                    self.symbols.primitive_type(kind)
                } else {
                    self.symbols
                        .boxed_type(kind)
                        .unwrap_or_else(|| self.symbols.primitive_type(kind))
                }
            }
            Target::Array => {
                let component = match args.first() {
                    Some(arg) => self.resolve_argument(file, scopes, arg, depth),
                    None => self.symbols.error_type(name),
                };
                self.symbols.array_type(component)
            }
            Target::NoType => self.symbols.no_type(),
            Target::Alias(alias) => {
                let bindings: FxHashMap<&str, TypeSpec> = alias
                    .parameters
                    .iter()
                    .zip(args)
                    .map(|(parameter, arg)| {
                        let bound = match arg {
                            ArgSpec::Plain(spec) => spec.clone(),
                            ArgSpec::Projected { ty: Some(spec), .. } => spec.clone(),
                            ArgSpec::Projected { ty: None, .. } => TypeSpec::Shorthand("Any?".to_string()),
                        };
                        (parameter.as_str(), bound)
                    })
                    .collect();
                let expanded = alias.target.substitute(&bindings);
                let expanded = if nullable { expanded.as_nullable() } else { expanded };
                trace!(name, "expanding type alias");
                self.resolve_spec(file, scopes, &expanded, position, depth + 1)
            }
        }
    }

    fn resolve_argument(
        &mut self,
        file: &FileSpec,
        scopes: &[ElementId],
        arg: &ArgSpec,
        depth: u32,
    ) -> ResolvedTypeId {
        if arg.is_star() {
            return self.symbols.wildcard(None, None);
        }
        match arg {
            ArgSpec::Plain(spec) => self.resolve_spec(file, scopes, spec, Position::Argument, depth),
            ArgSpec::Projected { variance, ty } => {
                let Some(spec) = ty else {
                    return self.symbols.wildcard(None, None);
                };
                let bound = self.resolve_spec(file, scopes, spec, Position::Argument, depth);
                match variance {
                    VarianceSpec::Out => self.symbols.wildcard(Some(bound), None),
                    VarianceSpec::In => self.symbols.wildcard(None, Some(bound)),
                    VarianceSpec::Invariant | VarianceSpec::Star => bound,
                }
            }
        }
    }

    /// Type variables, nested types, imports, the file's package, built-in
    /// names, `java.lang`, then the name as a qualified name.
    fn lookup_name(&self, file: &FileSpec, scopes: &[ElementId], name: &str, bare: bool) -> Option<Target> {
        if bare {
            for &scope in scopes.iter().rev() {
                let parameters = &self.symbols.element(scope).type_parameters;
                if let Some(index) = parameters
                    .iter()
                    .position(|parameter| self.symbols.resolve_atom(parameter.name) == name)
                {
                    return Some(Target::Variable(scope, index as u32));
                }
            }
        }

        for &scope in scopes.iter().rev() {
            let element = self.symbols.element(scope);
            if !element.kind.is_type_element() {
                continue;
            }
            if let Some(qualified) = element.qualified_name {
                let candidate = format!("{}.{name}", self.symbols.resolve_atom(qualified));
                if let Some(found) = self.qualified_target(&candidate) {
                    return Some(found);
                }
            }
        }

        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };
        for import in &file.imports {
            if import.rsplit('.').next() == Some(head) {
                let candidate = match rest {
                    Some(rest) => format!("{import}.{rest}"),
                    None => import.clone(),
                };
                if let Some(found) = self.qualified_target(&candidate) {
                    return Some(found);
                }
            }
        }

        self.qualified_target(&qualify(&file.package, name))
            .or_else(|| builtin_target(&self.symbols, name))
            .or_else(|| self.qualified_target(&format!("java.lang.{name}")))
            .or_else(|| self.qualified_target(name))
    }

    fn qualified_target(&self, candidate: &str) -> Option<Target> {
        if let Some(alias) = self.aliases.get(candidate) {
            return Some(Target::Alias(alias.clone()));
        }
        if let Some(element) = self
            .symbols
            .find_element(candidate)
            .filter(|element| self.symbols.element(*element).kind.is_type_element())
        {
            return Some(Target::Element(element));
        }
        builtin_target(&self.symbols, candidate)
    }
}

/// Source-language built-in names and Java keywords.
fn builtin_target(symbols: &ResolvedSymbols, name: &str) -> Option<Target> {
    if let Some(kind) = PrimitiveKind::from_keyword(name) {
        return Some(Target::Primitive(kind));
    }
    let simple = name
        .strip_prefix("kotlin.collections.")
        .or_else(|| name.strip_prefix("kotlin."))
        .unwrap_or(name);
    if let Some(kind) = PrimitiveKind::ALL
        .into_iter()
        .find(|kind| kind.kotlin_simple_name() == simple)
    {
        return Some(Target::Primitive(kind));
    }
    let platform = match simple {
        "Unit" | "Nothing" => return Some(Target::NoType),
        "Array" => return Some(Target::Array),
        "Any" => "java.lang.Object",
        "String" => "java.lang.String",
        "Number" => "java.lang.Number",
        "Iterable" | "MutableIterable" => "java.lang.Iterable",
        "Collection" | "MutableCollection" => "java.util.Collection",
        "List" | "MutableList" => "java.util.List",
        "Set" | "MutableSet" => "java.util.Set",
        "Map" | "MutableMap" => "java.util.Map",
        "ArrayList" => "java.util.ArrayList",
        _ => return None,
    };
    symbols.find_element(platform).map(Target::Element)
}
