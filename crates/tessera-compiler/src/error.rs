//! Diagnostics for the Tessera semantic-analysis layer.
//!
//! Analysis never stops at the first problem. Every value error, structural
//! conflict and unrecognized construct becomes a [`Diagnostic`] that is
//! accumulated for the source unit, and the builder carries on with a safe
//! result. A unit is only usable when no error-class diagnostic was recorded.
//!
//! # Example
//!
//! ```
//! # use tessera_compiler::error::{Diagnostic, ErrorCode};
//! # use tessera_core::location::SourceLineNumber;
//!
//! let here = SourceLineNumber::new("product.wxs", 20);
//! let first = SourceLineNumber::new("product.wxs", 8);
//!
//! let diag = Diagnostic::error("duplicate symbol `INSTALLFOLDER` in table `Directory`")
//!     .with_code(ErrorCode::E100)
//!     .with_label(here, "duplicate definition")
//!     .with_secondary_label(first, "first defined here")
//!     .with_help("use a different identifier or remove one of the definitions");
//! assert_eq!(diag.labels().len(), 2);
//! ```

mod collector;
mod compile_error;
mod diagnostic;
mod error_code;
mod label;
mod severity;

pub use collector::DiagnosticCollector;
pub use compile_error::CompileError;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
