//! Source locations attached to diagnostic messages.

use tessera_core::location::SourceLineNumber;

/// A message attached to a source location.
///
/// Primary labels mark where the problem is. Secondary labels add context,
/// such as where a conflicting symbol was first defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    location: SourceLineNumber,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(location: SourceLineNumber, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(location: SourceLineNumber, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the location this label applies to.
    pub fn location(&self) -> &SourceLineNumber {
        &self.location
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
