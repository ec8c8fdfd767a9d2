//! Uniform declaration and type views over two symbol back ends.
//!
//! A code generator opens one [`ProcessingEnv`] per round over either an
//! eager or a resolved symbol table, looks up types and declarations by
//! qualified name, and walks the returned [`Type`] and [`Declaration`] graph.
//! Every query answers the same way regardless of which back end supplied
//! the symbols:
//!
//! - names come from the [`name_resolver`], which never fails and falls back
//!   to a best guess or the reserved undefined name;
//! - nullability is three-valued ([`Nullability`]);
//! - unresolved and error types are data (`is_error`, `is_none`), never
//!   failures;
//! - only contract violations surface as [`ProcessingError`].
//!
//! Wrappers borrow the environment and memoize derived attributes. A round is
//! single threaded; nothing here is `Sync`.

pub mod declaration;
pub mod defaults;
pub mod env;
pub mod error;
pub mod name_resolver;
pub mod nullability;
pub mod ty;

pub use declaration::{Declaration, DeclarationKind};
pub use env::{Backend, BackendKind, NativeDeclaration, NativeType, ProcessingEnv};
pub use error::{ProcessingError, Result};
pub use nullability::Nullability;
pub use ty::Type;
