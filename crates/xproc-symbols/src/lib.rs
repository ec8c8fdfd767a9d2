//! Native symbol models.
//!
//! Two independent back ends supply declarations and types to a processing
//! round:
//!
//! - [`eager`]: symbols are exposed before semantic resolution. Types are
//!   reached through syntactic [`eager::TypeReference`]s that are resolved on
//!   demand and may stay unresolved. Types carry a native nullability marker.
//! - [`resolved`]: every symbol is fully resolved up front. Binding failures
//!   appear as explicit error types. There is no null-safety dimension apart
//!   from annotations recorded on fields and methods.
//!
//! Both models are arena-backed: declarations, references and types are
//! addressed by `u32` ids, and types are interned so structurally identical
//! types share one id.
//!
//! [`fixture`] builds either model from a single JSON description.

pub mod eager;
pub mod fixture;
pub mod modifiers;
pub mod resolved;

pub use eager::{EagerDeclId, EagerSymbols, EagerTypeId, TypeRefId};
pub use fixture::{Fixture, load_eager, load_resolved};
pub use modifiers::Modifiers;
pub use resolved::{ElementId, ResolvedSymbols, ResolvedTypeId};
