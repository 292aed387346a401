//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single error or warning with an optional
//! error code, labeled source locations and help text.

use std::fmt;

use tessera_core::location::SourceLineNumber;

use crate::error::{Severity, error_code::ErrorCode, label::Label};

/// A diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E101]: action `MyAction` is already scheduled in `InstallExecuteSequence`
///   --> product.wxs(42)  duplicate action
///   --> product.wxs(17)  first scheduled here
///   = help: mark one of the actions overridable or rename it
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use tessera_compiler::error::{Diagnostic, ErrorCode};
    /// # use tessera_core::location::SourceLineNumber;
    ///
    /// let diag = Diagnostic::error("the Id attribute has an illegal value `1st`")
    ///     .with_code(ErrorCode::E002)
    ///     .with_label(SourceLineNumber::new("product.wxs", 3), "illegal identifier")
    ///     .with_help("identifiers must start with a letter or underscore");
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the location of the first primary label, if any.
    pub fn location(&self) -> Option<&SourceLineNumber> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .map(Label::location)
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, location: SourceLineNumber, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(location, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(
        mut self,
        location: SourceLineNumber,
        message: impl Into<String>,
    ) -> Self {
        self.labels.push(Label::secondary(location, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Returns a copy of this diagnostic promoted to error severity.
    pub fn into_error(mut self) -> Self {
        self.severity = Severity::Error;
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}
