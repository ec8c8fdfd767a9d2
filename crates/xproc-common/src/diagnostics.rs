#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Message,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

pub mod diagnostic_codes {
    pub const MISSING_QUALIFIED_NAME: u32 = 1001;
    pub const BACKEND_MISMATCH: u32 = 1002;
    pub const SYMBOL_NOT_FOUND: u32 = 1003;
}

pub const DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::MISSING_QUALIFIED_NAME,
        category: DiagnosticCategory::Error,
        message: "Missing qualified name for declaration '{0}'.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::BACKEND_MISMATCH,
        category: DiagnosticCategory::Error,
        message: "'{0}' cannot mix a {1} type with a {2} type.",
    },
    DiagnosticMessage {
        code: diagnostic_codes::SYMBOL_NOT_FOUND,
        category: DiagnosticCategory::Warning,
        message: "Cannot find '{0}'.",
    },
];

/// A structured, driver-facing report about one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    /// The symbol the diagnostic is about (a qualified name or display string).
    pub symbol: String,
    pub message_text: String,
}

impl Diagnostic {
    pub fn error(symbol: impl Into<String>, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            symbol: symbol.into(),
            message_text: message.into(),
        }
    }

    pub fn warning(symbol: impl Into<String>, message: impl Into<String>, code: u32) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            ..Self::error(symbol, message, code)
        }
    }

    /// Build a diagnostic from a registered message template.
    pub fn from_code(code: u32, symbol: impl Into<String>, args: &[&str]) -> Self {
        let (category, template) = DIAGNOSTIC_MESSAGES
            .iter()
            .find(|m| m.code == code)
            .map(|m| (m.category, m.message))
            .unwrap_or((DiagnosticCategory::Error, "{0}"));
        Self {
            category,
            code,
            symbol: symbol.into(),
            message_text: format_message(template, args),
        }
    }
}

pub fn get_message_template(code: u32) -> Option<&'static str> {
    DIAGNOSTIC_MESSAGES
        .iter()
        .find(|m| m.code == code)
        .map(|m| m.message)
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}
