//! # Tessera Compiler
//!
//! Semantic analysis for the Tessera installer compiler. The enclosing
//! compiler walks a validated XML tree and calls into an [`Analyzer`] to read
//! attributes, record symbols, build the grouping, search and action graphs,
//! and route unrecognized constructs to extensions.
//!
//! ## Usage
//!
//! ```
//! use tessera_compiler::{Analyzer, analyzer::ActionSchedule};
//! use tessera_core::{
//!     location::SourceLineNumber, section::Section, sequence::SequenceTable, xml::XmlElement,
//! };
//!
//! let mut analyzer = Analyzer::default();
//! let mut section = Section::new("Product", None);
//!
//! let element = XmlElement::new("Custom", SourceLineNumber::new("product.wxs", 12))
//!     .with_attribute("Action", "LaunchApp")
//!     .with_attribute("After", "InstallFinalize");
//! let here = element.location().clone();
//!
//! let name = element.attribute("Action").expect("Action attribute");
//! let name = analyzer.attribute_identifier_value(&here, name).into_inner();
//! let after = element.attribute("After").map(|a| a.value().to_string());
//!
//! let mut action = ActionSchedule::new(SequenceTable::InstallExecuteSequence, name);
//! if let Some(after) = after {
//!     action = action.after(after);
//! }
//! analyzer.schedule_action(&mut section, &here, &action);
//!
//! assert!(analyzer.finish().is_ok());
//! assert_eq!(section.actions_in(SequenceTable::InstallExecuteSequence).count(), 1);
//! ```
//!
//! Problems never abort analysis: each one becomes a
//! [`Diagnostic`](error::Diagnostic) and the operation returns a safe result.

pub mod analyzer;
pub mod error;
pub mod extension;
pub mod identifiers;
mod syntax;
pub mod validate;
pub mod views;

pub use analyzer::Analyzer;
pub use error::{CompileError, Diagnostic, ErrorCode, Severity};
pub use extension::{Claim, CompilerExtension, ComponentKeyPath, KeyPathKind, ParseContext};
