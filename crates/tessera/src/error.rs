//! Error types for Tessera operations.
//!
//! This module provides the main error type [`TesseraError`] which wraps the
//! error conditions of configuring and finishing a compilation.

use std::io;

use thiserror::Error;

use tessera_compiler::CompileError;

/// The main error type for Tessera operations.
///
/// # Diagnostic Variants
///
/// The `Compile` variant carries every diagnostic recorded for the source
/// units that failed, warnings included, in the order they were reported.
#[derive(Debug, Error)]
pub enum TesseraError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TesseraError {
    /// Returns the compile error, if this is one.
    pub fn as_compile_error(&self) -> Option<&CompileError> {
        match self {
            Self::Compile(err) => Some(err),
            _ => None,
        }
    }
}
