//! Common types and utilities for the xproc processing toolchain.
//!
//! This crate provides foundational types used across all xproc crates:
//! - String interning (`Atom`, `Interner`)
//! - Canonical type naming (`ClassName`, `TypeName`, the reserved undefined name)
//! - The fixed table of primitive kinds shared by both back ends
//! - Round-scoped processing options
//! - Diagnostics reported to drivers
//! - Recursion limits

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Canonical qualified and parameterized names
pub mod naming;
pub use naming::{ClassName, TypeName};

// Primitive kinds (boolean, byte, ..., double)
pub mod primitive;
pub use primitive::PrimitiveKind;

// Round-scoped string options
pub mod options;
pub use options::{OptionParseError, ProcessingOptions};

// Structured diagnostics handed to drivers
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;
