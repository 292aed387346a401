//! Collector for accumulating diagnostics while analyzing one source unit.

use log::debug;

use crate::error::{CompileError, Diagnostic};

/// Accumulates the diagnostics of one source unit.
///
/// Builders emit into the collector and keep going, so a single pass surfaces
/// as many problems as possible.
///
/// # Example
///
/// ```
/// # use tessera_compiler::error::{Diagnostic, DiagnosticCollector, ErrorCode};
/// let mut collector = DiagnosticCollector::new();
///
/// collector.emit(Diagnostic::warning("identifier is longer than 72 characters"));
/// assert!(!collector.has_errors());
///
/// collector.emit(Diagnostic::error("illegal GUID `xyz`").with_code(ErrorCode::E006));
/// assert!(collector.has_errors());
///
/// let err = collector.finish().unwrap_err();
/// assert_eq!(err.diagnostics().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    ///
    /// The diagnostic is added to the collection and if it's an error,
    /// the collector is marked as having errors.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        debug!(
            severity:% = diagnostic.severity(),
            code:? = diagnostic.code(),
            message = diagnostic.message();
            "Diagnostic emitted"
        );
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Returns `true` if any error-class diagnostic was emitted.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Returns every diagnostic emitted so far, in emission order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the number of error-class diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity().is_error())
            .count()
    }

    /// Finish collection and return a result.
    ///
    /// - If there are errors, returns `Err(CompileError)` with all diagnostics.
    /// - If there are no errors, returns `Ok` with the warnings.
    pub fn finish(self) -> Result<Vec<Diagnostic>, CompileError> {
        if self.has_errors {
            Err(CompileError::new(self.diagnostics))
        } else {
            Ok(self.diagnostics)
        }
    }
}
