//! Source locations attached to symbols and diagnostics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A source file and optional line number.
///
/// The front end attaches one to every element so that any symbol or
/// diagnostic created while analyzing the element points back at the author's
/// text.
///
/// # Examples
///
/// ```
/// use tessera_core::location::SourceLineNumber;
///
/// let location = SourceLineNumber::new("product.wxs", 12);
/// assert_eq!(location.to_string(), "product.wxs(12)");
///
/// let whole_file = SourceLineNumber::file_only("product.wxs");
/// assert_eq!(whole_file.to_string(), "product.wxs");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLineNumber {
    file: String,
    line: Option<u32>,
}

impl SourceLineNumber {
    /// Creates a location for a line inside a file.
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
        }
    }

    /// Creates a location that covers a whole file.
    pub fn file_only(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
        }
    }

    /// Returns the file name.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Returns the line number, if known.
    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

impl fmt::Display for SourceLineNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}({})", self.file, line),
            None => f.write_str(&self.file),
        }
    }
}
