//! Canonical type names.
//!
//! `TypeName` is the rendering handed to code generators: a class name, a
//! parameterized class name, a primitive keyword, a type variable, a wildcard
//! or an array. Nullability is not part of a name.
//!
//! Name resolution never fails. When nothing better is known the reserved
//! [`TypeName::undefined`] name is used, so generated code referencing an
//! unresolved symbol stays syntactically valid and easy to spot.

use crate::primitive::PrimitiveKind;
use std::fmt;

/// Package of the reserved name reported for unresolvable types.
pub const UNDEFINED_PACKAGE: &str = "xproc.processing.error";
/// Simple name of the reserved name reported for unresolvable types.
pub const UNDEFINED_SIMPLE_NAME: &str = "Undefined";

/// A fully qualified class name: a package plus one or more simple names
/// (more than one for nested classes).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName {
    package: String,
    simple_names: Vec<String>,
}

impl ClassName {
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            simple_names: vec![simple_name.into()],
        }
    }

    /// The reserved name for types that cannot be named.
    pub fn undefined() -> Self {
        Self::new(UNDEFINED_PACKAGE, UNDEFINED_SIMPLE_NAME)
    }

    /// A class nested directly inside `self`.
    pub fn nested(&self, simple_name: impl Into<String>) -> Self {
        let mut simple_names = self.simple_names.clone();
        simple_names.push(simple_name.into());
        Self {
            package: self.package.clone(),
            simple_names,
        }
    }

    /// Guess a class name from a dotted string.
    ///
    /// Leading segments that start with a lowercase letter are the package;
    /// the first capitalized segment and everything after it are simple names.
    /// Returns `None` when no capitalized segment exists or a segment is not
    /// an identifier.
    pub fn best_guess(text: &str) -> Option<Self> {
        let segments: Vec<&str> = text.split('.').collect();
        if segments.iter().any(|segment| !is_identifier(segment)) {
            return None;
        }
        let first_type = segments
            .iter()
            .position(|segment| segment.starts_with(|c: char| c.is_ascii_uppercase()))?;
        Some(Self {
            package: segments[..first_type].join("."),
            simple_names: segments[first_type..]
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        })
    }

    pub fn package_name(&self) -> &str {
        &self.package
    }

    pub fn simple_name(&self) -> &str {
        self.simple_names.last().map(String::as_str).unwrap_or("")
    }

    pub fn simple_names(&self) -> &[String] {
        &self.simple_names
    }

    /// `package.Outer.Inner`, or `Outer.Inner` in the default package.
    pub fn canonical_name(&self) -> String {
        let names = self.simple_names.join(".");
        if self.package.is_empty() {
            names
        } else {
            format!("{}.{}", self.package, names)
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.package == UNDEFINED_PACKAGE
            && self.simple_names.len() == 1
            && self.simple_names[0] == UNDEFINED_SIMPLE_NAME
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

/// Any renderable type name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeName {
    Class(ClassName),
    Parameterized {
        raw: ClassName,
        arguments: Vec<TypeName>,
    },
    Primitive(PrimitiveKind),
    Variable(String),
    Wildcard {
        upper: Option<Box<TypeName>>,
        lower: Option<Box<TypeName>>,
    },
    Array(Box<TypeName>),
}

impl TypeName {
    pub fn undefined() -> Self {
        TypeName::Class(ClassName::undefined())
    }

    pub fn class(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        TypeName::Class(ClassName::new(package, simple_name))
    }

    /// The unbounded wildcard `?`.
    pub fn wildcard() -> Self {
        TypeName::Wildcard {
            upper: None,
            lower: None,
        }
    }

    /// Same name with its parameterization removed.
    pub fn raw(&self) -> TypeName {
        match self {
            TypeName::Parameterized { raw, .. } => TypeName::Class(raw.clone()),
            other => other.clone(),
        }
    }

    /// The class part of a class or parameterized name.
    pub fn class_name(&self) -> Option<&ClassName> {
        match self {
            TypeName::Class(class) | TypeName::Parameterized { raw: class, .. } => Some(class),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, TypeName::Class(class) if class.is_undefined())
    }
}

impl From<ClassName> for TypeName {
    fn from(class: ClassName) -> Self {
        TypeName::Class(class)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Class(class) => write!(f, "{class}"),
            TypeName::Parameterized { raw, arguments } => {
                write!(f, "{raw}<")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{argument}")?;
                }
                f.write_str(">")
            }
            TypeName::Primitive(kind) => write!(f, "{kind}"),
            TypeName::Variable(name) => f.write_str(name),
            TypeName::Wildcard { upper, lower } => match (upper, lower) {
                (Some(upper), _) => write!(f, "? extends {upper}"),
                (None, Some(lower)) => write!(f, "? super {lower}"),
                (None, None) => f.write_str("?"),
            },
            TypeName::Array(component) => write!(f, "{component}[]"),
        }
    }
}

/// `true` if `text` is a non-empty identifier (`[A-Za-z_$][A-Za-z0-9_$]*`).
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// The leading identifier token of `text`, e.g. `List` for `List<Foo>?`.
pub fn leading_identifier(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|&(_, c)| !(c.is_alphanumeric() || c == '_' || c == '$' || c == '.'))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let token = text[..end].trim_end_matches('.');
    if token.split('.').all(is_identifier) {
        return Some(token);
    }
    token.split('.').next().filter(|segment| is_identifier(segment))
}

#[cfg(test)]
#[path = "../tests/naming_tests.rs"]
mod tests;
