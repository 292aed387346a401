//! The analysis context shared by every builder operation.
//!
//! An [`Analyzer`] owns the diagnostics of one source unit and the symbol
//! definitions it may instantiate. Builder operations are methods on it; they
//! take the [`Section`](tessera_core::section::Section) being built as an
//! explicit argument, record problems as diagnostics and always return a
//! well-typed result so the tree walk can continue.

mod actions;
mod coerce;
mod directory;
mod extension;
mod references;
mod search;
mod symbols;
mod text;

pub use actions::{ActionSchedule, is_standard_action};
pub use coerce::{
    BundleVariableNameRule, Coerced, EmptyRule, ILLEGAL_INTEGER, ILLEGAL_LONG, INTEGER_NOT_SET,
    LONG_NOT_SET, MAX_IDENTIFIER_LEN, VersionValue, YesNo, YesNoDefault,
};
pub use directory::{DirectoryNames, InlineDirectoryCache};
pub use references::ComplexReference;
pub use search::{SearchEntry, SearchRelationFlags};
pub use symbols::{DefinitionRef, RegistryEntry};
pub use text::{condition_inner_text, source_line_numbers, trimmed_inner_text};

use log::info;

use tessera_core::{location::SourceLineNumber, symbol::SymbolDefinitionRegistry, xml::XmlAttribute};

use crate::error::{CompileError, Diagnostic, DiagnosticCollector, ErrorCode};

/// Builds the IR of one source unit and collects its diagnostics.
///
/// # Examples
///
/// ```
/// use tessera_compiler::Analyzer;
/// use tessera_core::{location::SourceLineNumber, section::Section};
///
/// let mut analyzer = Analyzer::default();
/// let mut section = Section::new("Product", None);
/// let here = SourceLineNumber::new("product.wxs", 1);
///
/// analyzer.ensure_table(&mut section, &here, "Shortcut");
/// analyzer.ensure_table(&mut section, &here, "Shortcut");
/// assert_eq!(section.symbols_of("WixEnsureTable").count(), 1);
///
/// let warnings = analyzer.finish().expect("no errors");
/// assert!(warnings.is_empty());
/// ```
#[derive(Debug)]
pub struct Analyzer {
    diagnostics: DiagnosticCollector,
    definitions: SymbolDefinitionRegistry,
}

impl Analyzer {
    /// Creates an analyzer that resolves symbols against `definitions`.
    pub fn new(definitions: SymbolDefinitionRegistry) -> Self {
        Self {
            diagnostics: DiagnosticCollector::new(),
            definitions,
        }
    }

    /// Returns the symbol definitions known to this analyzer.
    pub fn definitions(&self) -> &SymbolDefinitionRegistry {
        &self.definitions
    }

    /// Returns the symbol definitions for registration by extensions.
    pub fn definitions_mut(&mut self) -> &mut SymbolDefinitionRegistry {
        &mut self.definitions
    }

    /// Records a diagnostic.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.emit(diagnostic);
    }

    /// Returns every diagnostic recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.diagnostics.diagnostics()
    }

    /// Returns `true` if an error-class diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }

    /// Finishes the source unit.
    ///
    /// # Errors
    ///
    /// Returns a [`CompileError`] carrying every diagnostic when at least one
    /// error was recorded; otherwise returns the warnings.
    pub fn finish(self) -> Result<Vec<Diagnostic>, CompileError> {
        info!(
            diagnostics = self.diagnostics.diagnostics().len(),
            errors = self.diagnostics.error_count();
            "Finished analysis"
        );
        self.diagnostics.finish()
    }

    fn error_at(
        &mut self,
        location: &SourceLineNumber,
        code: ErrorCode,
        message: impl Into<String>,
        label: impl Into<String>,
    ) {
        self.emit(
            Diagnostic::error(message)
                .with_code(code)
                .with_label(location.clone(), label),
        );
    }

    fn warning_at(
        &mut self,
        location: &SourceLineNumber,
        code: ErrorCode,
        message: impl Into<String>,
        label: impl Into<String>,
    ) {
        self.emit(
            Diagnostic::warning(message)
                .with_code(code)
                .with_label(location.clone(), label),
        );
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(SymbolDefinitionRegistry::with_builtins())
    }
}

/// Renders an attribute as `Element/@Attribute` for messages.
fn attribute_path(attribute: &XmlAttribute) -> String {
    format!("{}/@{}", attribute.element_name(), attribute.name())
}
