//! Centralized limits for recursive symbol walks.
//!
//! Symbol models handed to a round are not trusted to be well formed: a type
//! alias may expand to itself, a class may list itself as a supertype. These
//! guards turn such input into an error or undefined result instead of a
//! stack overflow.

/// Maximum nesting depth when rendering a type name.
///
/// Generic arguments are named recursively; beyond this depth the argument
/// is rendered as the reserved undefined name.
pub const MAX_NAME_DEPTH: u32 = 64;

/// Maximum depth of a supertype walk during assignability checks.
///
/// Cyclic hierarchies (`class A : B`, `class B : A`) stop here and report
/// "not assignable".
pub const MAX_SUPERTYPE_DEPTH: u32 = 128;

/// Maximum number of nested type-alias expansions while resolving a
/// reference. An alias chain deeper than this resolves to an error type.
pub const MAX_ALIAS_EXPANSION_DEPTH: u32 = 32;
