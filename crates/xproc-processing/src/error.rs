//! Contract violations surfaced to the driver.
//!
//! Unresolved and erroneous symbols are not errors here; they are reported as
//! data through `Type::is_error` and `Type::is_none`. Only the wrappers' own
//! contracts fail.

use crate::env::BackendKind;
use thiserror::Error;
use xproc_common::Diagnostic;
use xproc_common::diagnostics::diagnostic_codes;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// A declaration without a qualified name was asked for one. Fatal for
    /// that declaration only.
    #[error("missing qualified name for declaration `{declaration}`")]
    MissingQualifiedName { declaration: String },

    /// Wrappers from different back ends were combined in one query.
    #[error("`{operation}` expected a {expected} symbol, found a {found} symbol")]
    BackendMismatch {
        operation: &'static str,
        expected: BackendKind,
        found: BackendKind,
    },

    /// A `require_*` lookup found nothing.
    #[error("cannot find `{0}`")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, ProcessingError>;

impl ProcessingError {
    pub fn missing_qualified_name(declaration: impl Into<String>) -> Self {
        ProcessingError::MissingQualifiedName {
            declaration: declaration.into(),
        }
    }

    pub fn backend_mismatch(operation: &'static str, expected: BackendKind, found: BackendKind) -> Self {
        ProcessingError::BackendMismatch {
            operation,
            expected,
            found,
        }
    }

    /// A structured diagnostic a driver can log before moving on to the next
    /// symbol.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ProcessingError::MissingQualifiedName { declaration } => Diagnostic::from_code(
                diagnostic_codes::MISSING_QUALIFIED_NAME,
                declaration.as_str(),
                &[declaration.as_str()],
            ),
            ProcessingError::BackendMismatch {
                operation,
                expected,
                found,
            } => Diagnostic::from_code(
                diagnostic_codes::BACKEND_MISMATCH,
                *operation,
                &[*operation, expected.as_str(), found.as_str()],
            ),
            ProcessingError::NotFound(name) => {
                Diagnostic::from_code(diagnostic_codes::SYMBOL_NOT_FOUND, name.as_str(), &[name.as_str()])
            }
        }
    }
}
