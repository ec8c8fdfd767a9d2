//! Built-in `kotlin` declarations every eager symbol table starts with.

use super::{
    ClassKind, EagerDeclId, EagerSymbols, EagerTypeData, EagerTypeId, NativeNullability,
    ReferenceArgument, Scope, Variance,
};
use crate::modifiers::Modifiers;
use smallvec::SmallVec;
use xproc_common::PrimitiveKind;

#[derive(Default)]
pub(crate) struct BuiltinDecls {
    pub any: EagerDeclId,
    pub nothing: EagerDeclId,
    pub unit: EagerDeclId,
    pub number: EagerDeclId,
    pub string: EagerDeclId,
    pub annotation: EagerDeclId,
    pub array: EagerDeclId,
    pub iterable: EagerDeclId,
    pub primitives: [EagerDeclId; 8],
}

impl Default for EagerDeclId {
    fn default() -> Self {
        EagerDeclId(u32::MAX)
    }
}

impl BuiltinDecls {
    pub fn primitive(&self, kind: PrimitiveKind) -> EagerDeclId {
        let index = PrimitiveKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        self.primitives[index]
    }

    /// `Any, Nothing, Unit, Number, Byte, ..., Boolean, String, Iterable<*>,
    /// Annotation, Array<*>`.
    pub fn exposed_types(&self, symbols: &EagerSymbols) -> Vec<EagerTypeId> {
        let plain = |declaration| {
            symbols.intern_type(EagerTypeData::Class {
                declaration,
                arguments: SmallVec::new(),
                nullability: NativeNullability::NotNull,
            })
        };
        let mut types = vec![
            plain(self.any),
            plain(self.nothing),
            plain(self.unit),
            plain(self.number),
        ];
        for kind in [
            PrimitiveKind::Byte,
            PrimitiveKind::Short,
            PrimitiveKind::Int,
            PrimitiveKind::Long,
            PrimitiveKind::Float,
            PrimitiveKind::Double,
            PrimitiveKind::Char,
            PrimitiveKind::Boolean,
        ] {
            types.push(plain(self.primitive(kind)));
        }
        types.push(plain(self.string));
        types.push(symbols.star_projected_type(self.iterable));
        types.push(plain(self.annotation));
        types.push(symbols.star_projected_type(self.array));
        types
    }
}

impl EagerSymbols {
    pub(super) fn declare_builtins(&mut self) -> BuiltinDecls {
        let kotlin = self.add_file("Builtins.kt", "kotlin");
        let kotlin_scope = Scope::File(kotlin);
        let open = Modifiers::PUBLIC | Modifiers::OPEN;
        let closed = Modifiers::PUBLIC | Modifiers::FINAL;

        let any = self.declare_class(kotlin_scope, "Any", ClassKind::Class, open);
        let nothing = self.declare_class(kotlin_scope, "Nothing", ClassKind::Class, closed);
        let unit = self.declare_class(kotlin_scope, "Unit", ClassKind::Object, closed);
        let number = self.declare_class(
            kotlin_scope,
            "Number",
            ClassKind::Class,
            Modifiers::PUBLIC | Modifiers::ABSTRACT,
        );
        let mut primitives = [EagerDeclId::default(); 8];
        for (slot, kind) in primitives.iter_mut().zip(PrimitiveKind::ALL) {
            let id = self.declare_class(kotlin_scope, kind.kotlin_simple_name(), ClassKind::Class, closed);
            if kind.is_numeric() {
                let number_ref = self.reference(Scope::Declaration(id), "Number", Vec::new(), false);
                self.add_super_type(id, number_ref);
            }
            *slot = id;
        }
        let string = self.declare_class(kotlin_scope, "String", ClassKind::Class, closed);
        let annotation =
            self.declare_class(kotlin_scope, "Annotation", ClassKind::Interface, Modifiers::PUBLIC);
        let array = self.declare_class(kotlin_scope, "Array", ClassKind::Class, closed);
        self.add_type_parameter(array, "T", Variance::Invariant);

        let collections = self.add_file("Collections.kt", "kotlin.collections");
        let scope = Scope::File(collections);
        let iterable = self.declare_generic_interface(scope, "Iterable", &[("T", Variance::Covariant)], None);
        self.declare_generic_interface(scope, "Collection", &[("E", Variance::Covariant)], Some("Iterable"));
        self.declare_generic_interface(scope, "List", &[("E", Variance::Covariant)], Some("Collection"));
        self.declare_generic_interface(scope, "Set", &[("E", Variance::Covariant)], Some("Collection"));
        self.declare_generic_interface(
            scope,
            "Map",
            &[("K", Variance::Invariant), ("V", Variance::Covariant)],
            None,
        );
        self.declare_generic_interface(scope, "MutableList", &[("E", Variance::Invariant)], Some("List"));

        BuiltinDecls {
            any,
            nothing,
            unit,
            number,
            string,
            annotation,
            array,
            iterable,
            primitives,
        }
    }

    /// Declare `interface Name<P...> : Super<P0>`.
    fn declare_generic_interface(
        &mut self,
        scope: Scope,
        name: &str,
        parameters: &[(&str, Variance)],
        super_type: Option<&str>,
    ) -> EagerDeclId {
        let id = self.declare_class(scope, name, ClassKind::Interface, Modifiers::PUBLIC);
        for (parameter, variance) in parameters {
            self.add_type_parameter(id, parameter, *variance);
        }
        if let (Some(super_name), Some((first, _))) = (super_type, parameters.first()) {
            let inner = Scope::Declaration(id);
            let argument = self.reference(inner, first, Vec::new(), false);
            let super_ref = self.reference(
                inner,
                super_name,
                vec![ReferenceArgument::invariant(argument)],
                false,
            );
            self.add_super_type(id, super_ref);
        }
        id
    }
}
