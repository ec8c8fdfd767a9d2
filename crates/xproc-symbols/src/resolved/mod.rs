//! Resolved symbol model.
//!
//! Every element is bound up front. A name that failed to bind shows up as an
//! explicit [`ResolvedTypeData::Error`] type; each failure is its own
//! instance, so two error types are never identical even when spelled the
//! same. Types have no nullability; fields and methods may carry a recorded
//! nullability annotation instead.

mod subtype;

use crate::modifiers::Modifiers;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::cell::RefCell;
use xproc_common::{Atom, Interner, PrimitiveKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolvedTypeId(pub u32);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Class,
    Interface,
    Enum,
    Annotation,
    Field,
    Method,
    Constructor,
    Other(String),
}

impl ElementKind {
    pub fn is_type_element(&self) -> bool {
        matches!(
            self,
            ElementKind::Class | ElementKind::Interface | ElementKind::Enum | ElementKind::Annotation
        )
    }

    pub fn name(&self) -> &str {
        match self {
            ElementKind::Class => "CLASS",
            ElementKind::Interface => "INTERFACE",
            ElementKind::Enum => "ENUM",
            ElementKind::Annotation => "ANNOTATION_TYPE",
            ElementKind::Field => "FIELD",
            ElementKind::Method => "METHOD",
            ElementKind::Constructor => "CONSTRUCTOR",
            ElementKind::Other(name) => name,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Enclosing {
    Package,
    Element(ElementId),
}

/// A `@Nullable` / `@NonNull` style annotation recorded on a field or method.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnnotatedNullability {
    Nullable,
    NonNull,
}

#[derive(Clone, Debug)]
pub struct ResolvedTypeParameter {
    pub name: Atom,
    pub bounds: Vec<ResolvedTypeId>,
}

#[derive(Clone, Debug)]
pub struct ResolvedElement {
    pub simple_name: Atom,
    /// `None` for local and anonymous elements.
    pub qualified_name: Option<Atom>,
    pub package: Atom,
    pub kind: ElementKind,
    pub enclosing: Enclosing,
    pub modifiers: Modifiers,
    pub annotations: Vec<ResolvedTypeId>,
    pub type_parameters: Vec<ResolvedTypeParameter>,
    pub superclass: Option<ResolvedTypeId>,
    pub interfaces: Vec<ResolvedTypeId>,
    /// Field type or method return type.
    pub ty: Option<ResolvedTypeId>,
    pub nullability: Option<AnnotatedNullability>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResolvedTypeData {
    Declared {
        element: ElementId,
        arguments: SmallVec<[ResolvedTypeId; 2]>,
    },
    Primitive(PrimitiveKind),
    Array(ResolvedTypeId),
    TypeVariable {
        owner: ElementId,
        index: u32,
    },
    Wildcard {
        extends: Option<ResolvedTypeId>,
        super_bound: Option<ResolvedTypeId>,
    },
    Error {
        spelling: Atom,
        serial: u32,
    },
    /// `void` and the absence of a type.
    NoType,
}

impl ResolvedTypeData {
    pub fn is_error(&self) -> bool {
        matches!(self, ResolvedTypeData::Error { .. })
    }

    pub fn element(&self) -> Option<ElementId> {
        match self {
            ResolvedTypeData::Declared { element, .. } => Some(*element),
            _ => None,
        }
    }

    pub fn arguments(&self) -> &[ResolvedTypeId] {
        match self {
            ResolvedTypeData::Declared { arguments, .. } => arguments,
            _ => &[],
        }
    }
}

#[derive(Default)]
struct TypeTable {
    types: Vec<ResolvedTypeData>,
    index: FxHashMap<ResolvedTypeData, ResolvedTypeId>,
    error_serial: u32,
}

impl TypeTable {
    fn intern(&mut self, data: ResolvedTypeData) -> ResolvedTypeId {
        if let Some(&id) = self.index.get(&data) {
            return id;
        }
        let id = ResolvedTypeId(self.types.len() as u32);
        self.types.push(data.clone());
        self.index.insert(data, id);
        id
    }
}

#[derive(Default)]
struct WellKnown {
    object: Option<ElementId>,
    string: Option<ElementId>,
    boxes: [Option<ElementId>; 8],
}

/// The resolved back end's symbol table for one round.
pub struct ResolvedSymbols {
    interner: Interner,
    elements: Vec<ResolvedElement>,
    by_qualified_name: FxHashMap<Atom, ElementId>,
    well_known: WellKnown,
    types: RefCell<TypeTable>,
}

impl ResolvedSymbols {
    /// An empty table pre-populated with `java.lang` and `java.util` basics.
    pub fn new() -> Self {
        let mut interner = Interner::new();
        interner.intern_common();
        let mut symbols = Self {
            interner,
            elements: Vec::new(),
            by_qualified_name: FxHashMap::default(),
            well_known: WellKnown::default(),
            types: RefCell::new(TypeTable::default()),
        };
        symbols.declare_platform();
        symbols
    }

    fn declare_platform(&mut self) {
        let public = Modifiers::PUBLIC;
        let final_ = Modifiers::PUBLIC | Modifiers::FINAL;
        let object = self.declare_type(Enclosing::Package, "java.lang", "Object", ElementKind::Class, public);
        self.well_known.object = Some(object);
        let object_type = self.declared_type(object, Vec::new());

        let string = self.declare_type(Enclosing::Package, "java.lang", "String", ElementKind::Class, final_);
        self.set_superclass(string, object_type);
        self.well_known.string = Some(string);

        let number = self.declare_type(
            Enclosing::Package,
            "java.lang",
            "Number",
            ElementKind::Class,
            public | Modifiers::ABSTRACT,
        );
        self.set_superclass(number, object_type);
        let number_type = self.declared_type(number, Vec::new());

        for (slot, kind) in PrimitiveKind::ALL.iter().enumerate() {
            let boxed = self.declare_type(
                Enclosing::Package,
                "java.lang",
                kind.box_simple_name(),
                ElementKind::Class,
                final_,
            );
            let superclass = if kind.is_numeric() { number_type } else { object_type };
            self.set_superclass(boxed, superclass);
            self.well_known.boxes[slot] = Some(boxed);
        }

        let iterable = self.declare_generic(Enclosing::Package, "java.lang", "Iterable", ElementKind::Interface, &["T"], &[]);
        let collection =
            self.declare_generic(Enclosing::Package, "java.util", "Collection", ElementKind::Interface, &["E"], &[iterable]);
        let list = self.declare_generic(Enclosing::Package, "java.util", "List", ElementKind::Interface, &["E"], &[collection]);
        self.declare_generic(Enclosing::Package, "java.util", "Set", ElementKind::Interface, &["E"], &[collection]);
        self.declare_generic(Enclosing::Package, "java.util", "Map", ElementKind::Interface, &["K", "V"], &[]);
        let array_list = self.declare_generic(Enclosing::Package, "java.util", "ArrayList", ElementKind::Class, &["E"], &[list]);
        self.set_superclass(array_list, object_type);
    }

    /// Declare `Name<P...>` implementing each of `interfaces` parameterized
    /// by its first type parameter.
    fn declare_generic(
        &mut self,
        enclosing: Enclosing,
        package: &str,
        name: &str,
        kind: ElementKind,
        parameters: &[&str],
        interfaces: &[ElementId],
    ) -> ElementId {
        let id = self.declare_type(enclosing, package, name, kind, Modifiers::PUBLIC);
        for parameter in parameters {
            self.add_type_parameter(id, parameter);
        }
        for interface in interfaces {
            let first = self.type_variable(id, 0);
            let super_interface = self.declared_type(*interface, vec![first]);
            self.add_interface(id, super_interface);
        }
        id
    }

    // =========================================================================
    // Building
    // =========================================================================

    pub fn intern(&mut self, text: &str) -> Atom {
        self.interner.intern(text)
    }

    /// Declare a class, interface, enum or annotation type. Top-level types
    /// are qualified by `package`; nested ones by their enclosing type.
    pub fn declare_type(
        &mut self,
        enclosing: Enclosing,
        package: &str,
        name: &str,
        kind: ElementKind,
        modifiers: Modifiers,
    ) -> ElementId {
        let (package, qualifier) = match enclosing {
            Enclosing::Package => (self.interner.intern(package), Some(package.to_string())),
            Enclosing::Element(owner) => {
                let owner = &self.elements[owner.0 as usize];
                let qualifier = if owner.kind.is_type_element() {
                    owner
                        .qualified_name
                        .map(|q| self.interner.resolve(q).to_string())
                } else {
                    None
                };
                (owner.package, qualifier)
            }
        };
        let qualified_name = qualifier.map(|qualifier| {
            if qualifier.is_empty() {
                self.interner.intern(name)
            } else {
                self.interner.intern(&format!("{qualifier}.{name}"))
            }
        });
        let simple_name = self.interner.intern(name);
        self.push_element(simple_name, qualified_name, package, kind, enclosing, modifiers)
    }

    /// Declare a field, method or constructor of `owner`.
    pub fn declare_member(
        &mut self,
        owner: ElementId,
        name: &str,
        kind: ElementKind,
        modifiers: Modifiers,
    ) -> ElementId {
        let owner_element = &self.elements[owner.0 as usize];
        let package = owner_element.package;
        let qualified_name = owner_element
            .qualified_name
            .map(|q| format!("{}.{name}", self.interner.resolve(q)));
        let qualified_name = qualified_name.map(|q| self.interner.intern(&q));
        let simple_name = self.interner.intern(name);
        self.push_element(
            simple_name,
            qualified_name,
            package,
            kind,
            Enclosing::Element(owner),
            modifiers,
        )
    }

    /// Declare an element without a qualified name.
    pub fn declare_anonymous(
        &mut self,
        enclosing: Enclosing,
        package: &str,
        display_name: &str,
        kind: ElementKind,
        modifiers: Modifiers,
    ) -> ElementId {
        let package = match enclosing {
            Enclosing::Package => self.interner.intern(package),
            Enclosing::Element(owner) => self.elements[owner.0 as usize].package,
        };
        let simple_name = self.interner.intern(display_name);
        self.push_element(simple_name, None, package, kind, enclosing, modifiers)
    }

    fn push_element(
        &mut self,
        simple_name: Atom,
        qualified_name: Option<Atom>,
        package: Atom,
        kind: ElementKind,
        enclosing: Enclosing,
        modifiers: Modifiers,
    ) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        if let Some(qualified_name) = qualified_name {
            if kind.is_type_element() || !self.by_qualified_name.contains_key(&qualified_name) {
                self.by_qualified_name.insert(qualified_name, id);
            }
        }
        self.elements.push(ResolvedElement {
            simple_name,
            qualified_name,
            package,
            kind,
            enclosing,
            modifiers,
            annotations: Vec::new(),
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            ty: None,
            nullability: None,
        });
        id
    }

    pub fn add_type_parameter(&mut self, element: ElementId, name: &str) -> u32 {
        let name = self.interner.intern(name);
        let parameters = &mut self.elements[element.0 as usize].type_parameters;
        parameters.push(ResolvedTypeParameter {
            name,
            bounds: Vec::new(),
        });
        (parameters.len() - 1) as u32
    }

    pub fn add_type_parameter_bound(&mut self, element: ElementId, index: u32, bound: ResolvedTypeId) {
        if let Some(parameter) = self.elements[element.0 as usize]
            .type_parameters
            .get_mut(index as usize)
        {
            parameter.bounds.push(bound);
        }
    }

    pub fn set_superclass(&mut self, element: ElementId, superclass: ResolvedTypeId) {
        self.elements[element.0 as usize].superclass = Some(superclass);
    }

    pub fn add_interface(&mut self, element: ElementId, interface: ResolvedTypeId) {
        self.elements[element.0 as usize].interfaces.push(interface);
    }

    /// Set a field's type or a method's return type.
    pub fn set_type(&mut self, element: ElementId, ty: ResolvedTypeId) {
        self.elements[element.0 as usize].ty = Some(ty);
    }

    pub fn set_nullability(&mut self, element: ElementId, nullability: AnnotatedNullability) {
        self.elements[element.0 as usize].nullability = Some(nullability);
    }

    pub fn add_annotation(&mut self, element: ElementId, annotation: ResolvedTypeId) {
        self.elements[element.0 as usize].annotations.push(annotation);
    }

    // =========================================================================
    // Type construction
    // =========================================================================

    fn intern_type(&self, data: ResolvedTypeData) -> ResolvedTypeId {
        self.types.borrow_mut().intern(data)
    }

    pub fn declared_type(&self, element: ElementId, arguments: Vec<ResolvedTypeId>) -> ResolvedTypeId {
        self.intern_type(ResolvedTypeData::Declared {
            element,
            arguments: arguments.into(),
        })
    }

    pub fn primitive_type(&self, kind: PrimitiveKind) -> ResolvedTypeId {
        self.intern_type(ResolvedTypeData::Primitive(kind))
    }

    pub fn array_type(&self, component: ResolvedTypeId) -> ResolvedTypeId {
        self.intern_type(ResolvedTypeData::Array(component))
    }

    pub fn type_variable(&self, owner: ElementId, index: u32) -> ResolvedTypeId {
        self.intern_type(ResolvedTypeData::TypeVariable { owner, index })
    }

    pub fn wildcard(
        &self,
        extends: Option<ResolvedTypeId>,
        super_bound: Option<ResolvedTypeId>,
    ) -> ResolvedTypeId {
        self.intern_type(ResolvedTypeData::Wildcard {
            extends,
            super_bound,
        })
    }

    pub fn no_type(&self) -> ResolvedTypeId {
        self.intern_type(ResolvedTypeData::NoType)
    }

    /// A fresh error type. Every call yields a distinct type.
    pub fn error_type(&mut self, spelling: &str) -> ResolvedTypeId {
        let spelling = self.interner.intern(spelling);
        let mut table = self.types.borrow_mut();
        table.error_serial += 1;
        let serial = table.error_serial;
        table.intern(ResolvedTypeData::Error { spelling, serial })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn resolve_atom(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    pub fn element(&self, id: ElementId) -> &ResolvedElement {
        &self.elements[id.0 as usize]
    }

    pub fn elements(&self) -> impl Iterator<Item = (ElementId, &ResolvedElement)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(i, e)| (ElementId(i as u32), e))
    }

    pub fn lookup(&self, id: ResolvedTypeId) -> ResolvedTypeData {
        self.types.borrow().types[id.0 as usize].clone()
    }

    pub fn is_error(&self, id: ResolvedTypeId) -> bool {
        self.types.borrow().types[id.0 as usize].is_error()
    }

    pub fn find_element(&self, qualified_name: &str) -> Option<ElementId> {
        let atom = self.interner.get(qualified_name)?;
        self.by_qualified_name.get(&atom).copied()
    }

    pub fn enclosing_element(&self, id: ElementId) -> Option<ElementId> {
        match self.element(id).enclosing {
            Enclosing::Element(owner) => Some(owner),
            Enclosing::Package => None,
        }
    }

    pub fn object_element(&self) -> Option<ElementId> {
        self.well_known.object
    }

    pub fn object_type(&self) -> Option<ResolvedTypeId> {
        self.well_known
            .object
            .map(|object| self.declared_type(object, Vec::new()))
    }

    pub fn boxed_element(&self, kind: PrimitiveKind) -> Option<ElementId> {
        let slot = PrimitiveKind::ALL.iter().position(|k| *k == kind)?;
        self.well_known.boxes[slot]
    }

    /// The primitive a box class unboxes to.
    pub fn unboxed_kind(&self, element: ElementId) -> Option<PrimitiveKind> {
        let slot = self
            .well_known
            .boxes
            .iter()
            .position(|boxed| *boxed == Some(element))?;
        Some(PrimitiveKind::ALL[slot])
    }

    /// `boxedClass(primitive).asType()`.
    pub fn boxed_type(&self, kind: PrimitiveKind) -> Option<ResolvedTypeId> {
        self.boxed_element(kind)
            .map(|boxed| self.declared_type(boxed, Vec::new()))
    }

    /// The eight primitives plus `java.lang.Object` and `java.lang.String`.
    pub fn builtin_types(&self) -> Vec<ResolvedTypeId> {
        let mut types: Vec<_> = PrimitiveKind::ALL
            .iter()
            .map(|kind| self.primitive_type(*kind))
            .collect();
        types.extend(self.object_type());
        if let Some(string) = self.well_known.string {
            types.push(self.declared_type(string, Vec::new()));
        }
        types
    }

    /// The element's type with every type parameter replaced by `?`.
    pub fn wildcard_self_type(&self, element: ElementId) -> ResolvedTypeId {
        let arguments = (0..self.element(element).type_parameters.len())
            .map(|_| self.wildcard(None, None))
            .collect();
        self.declared_type(element, arguments)
    }

    /// The element's type parameterized by its own type variables.
    pub fn generic_self_type(&self, element: ElementId) -> ResolvedTypeId {
        let arguments = (0..self.element(element).type_parameters.len())
            .map(|index| self.type_variable(element, index as u32))
            .collect();
        self.declared_type(element, arguments)
    }
}

impl Default for ResolvedSymbols {
    fn default() -> Self {
        Self::new()
    }
}
