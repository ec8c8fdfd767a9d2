//! The fixed table of primitive kinds.
//!
//! Both back ends expose the same eight primitive kinds under different
//! spellings: the eager back end as `kotlin.*` classes, the resolved back end
//! as keyword primitives with `java.lang.*` box classes.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 8] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Char,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// Java keyword spelling (`int`, `boolean`, ...).
    pub const fn keyword(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Char => "char",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    /// Simple name of the eager back end's built-in class (`Int`, `Boolean`, ...).
    pub const fn kotlin_simple_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Int => "Int",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
        }
    }

    /// Fully qualified eager built-in name (`kotlin.Int`).
    pub fn kotlin_name(self) -> String {
        format!("kotlin.{}", self.kotlin_simple_name())
    }

    /// Simple name of the resolved back end's box class (`Integer`, `Character`, ...).
    pub const fn box_simple_name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Byte => "Byte",
            PrimitiveKind::Short => "Short",
            PrimitiveKind::Int => "Integer",
            PrimitiveKind::Long => "Long",
            PrimitiveKind::Char => "Character",
            PrimitiveKind::Float => "Float",
            PrimitiveKind::Double => "Double",
        }
    }

    /// Fully qualified box class name (`java.lang.Integer`).
    pub fn box_name(self) -> String {
        format!("java.lang.{}", self.box_simple_name())
    }

    pub const fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveKind::Boolean | PrimitiveKind::Char)
    }

    pub fn from_keyword(keyword: &str) -> Option<PrimitiveKind> {
        PrimitiveKind::ALL
            .into_iter()
            .find(|kind| kind.keyword() == keyword)
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
