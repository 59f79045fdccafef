use crate::prelude::*;
use std::fmt;

///
/// Severity
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[display("warning")]
    Warning,

    #[display("error")]
    Error,
}

///
/// DiagnosticCode
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum DiagnosticCode {
    AccessibilityNotAllowed,
    DuplicateEventCall,
    DuplicatePropertyName,
    IllegalBase,
    NestedType,
    NotPartial,
    UnknownAlsoNotifyTarget,
}

impl DiagnosticCode {
    /// Stable identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotPartial => "BND001",
            Self::NestedType => "BND002",
            Self::AccessibilityNotAllowed => "BND003",
            Self::IllegalBase => "BND004",
            Self::UnknownAlsoNotifyTarget => "BND005",
            Self::DuplicatePropertyName => "BND006",
            Self::DuplicateEventCall => "BND007",
        }
    }

    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            Self::NotPartial | Self::NestedType | Self::AccessibilityNotAllowed | Self::IllegalBase => {
                Severity::Error
            }
            Self::UnknownAlsoNotifyTarget
            | Self::DuplicatePropertyName
            | Self::DuplicateEventCall => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// Diagnostic
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,

    /// Full name of the type the diagnostic is about.
    pub type_name: String,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(code: DiagnosticCode, type_name: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            type_name: type_name.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}] {}: {}",
            self.severity, self.code, self.type_name, self.message
        )
    }
}

///
/// DiagnosticSink
///
/// Where the compiler reports problems. The host decides how to surface them.
///

pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

///
/// Diagnostics
/// collecting sink
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<Diagnostic> {
        self.items
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Diagnostics carrying `code`.
    pub fn with_code(&self, code: DiagnosticCode) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.code == code)
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => tracing::debug!(%diagnostic, "rejected type"),
            Severity::Warning => tracing::debug!(%diagnostic, "diagnostic"),
        }

        self.items.push(diagnostic);
    }
}
