//! Default-value literals shared by both back ends.

use crate::nullability::Nullability;
use xproc_common::PrimitiveKind;

pub const NULL_LITERAL: &str = "null";

/// The literal a generated field of this type starts out with.
///
/// Nullability is consulted before the kind: a nullable `Int` defaults to
/// `null`, not `0`. `failed` covers both error and absent types.
pub fn default_value(nullability: Nullability, failed: bool, kind: Option<PrimitiveKind>) -> &'static str {
    if failed || nullability == Nullability::Nullable {
        return NULL_LITERAL;
    }
    match kind {
        Some(kind) => primitive_default(kind),
        None => NULL_LITERAL,
    }
}

/// Zero value of a primitive kind.
pub fn primitive_default(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Boolean => "false",
        PrimitiveKind::Byte
        | PrimitiveKind::Short
        | PrimitiveKind::Int
        | PrimitiveKind::Long
        | PrimitiveKind::Char => "0",
        PrimitiveKind::Float => "0f",
        PrimitiveKind::Double => "0.0",
    }
}

#[cfg(test)]
#[path = "../tests/defaults_tests.rs"]
mod tests;
