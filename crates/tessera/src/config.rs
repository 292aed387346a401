//! Configuration for a Tessera compilation.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a configuration file only names what it changes.
//!
//! # Overview
//!
//! - [`CompilerConfig`] - Top-level configuration: build platform, warning policy and extra tables.
//! - [`TableConfig`] - A symbol definition owned by the linker schema, registered before analysis.
//! - [`FieldConfig`] - One typed column of a [`TableConfig`].
//!
//! # Example
//!
//! ```
//! # use tessera::config::CompilerConfig;
//! # use tessera_core::platform::Platform;
//! let config = CompilerConfig::from_toml_str(
//!     r#"
//!     platform = "x64"
//!     warnings_as_errors = true
//!
//!     [[extra_tables]]
//!     name = "WixFirewallException"
//!     fields = [{ name = "Port", kind = "string" }]
//!     "#,
//! )
//! .expect("valid configuration");
//!
//! assert_eq!(config.platform(), Platform::X64);
//! assert!(config.warnings_as_errors());
//! assert_eq!(config.extra_tables()[0].name(), "WixFirewallException");
//! ```

use std::{fs, path::Path};

use log::debug;
use serde::Deserialize;

use tessera_core::{
    platform::Platform,
    symbol::{FieldDefinition, FieldKind, SymbolDefinition},
};

use crate::TesseraError;

/// Top-level compilation configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompilerConfig {
    /// Platform the package is built for.
    #[serde(default)]
    platform: Platform,

    /// Promote warnings to errors when a source unit finishes.
    #[serde(default)]
    warnings_as_errors: bool,

    /// Drop warnings from the report.
    #[serde(default)]
    suppress_warnings: bool,

    /// Additional symbol definitions.
    #[serde(default)]
    extra_tables: Vec<TableConfig>,
}

impl CompilerConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Config`] if the text is not valid TOML or does
    /// not describe a configuration.
    pub fn from_toml_str(content: &str) -> Result<Self, TesseraError> {
        toml::from_str(content).map_err(|err| TesseraError::Config(err.to_string()))
    }

    /// Loads a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Io`] if the file cannot be read and
    /// [`TesseraError::Config`] if its content is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TesseraError> {
        let path = path.as_ref();
        debug!(path:? = path; "Loading configuration");
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Sets the build platform.
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Sets whether warnings are promoted to errors.
    pub fn with_warnings_as_errors(mut self, enabled: bool) -> Self {
        self.warnings_as_errors = enabled;
        self
    }

    /// Sets whether warnings are dropped from the report.
    pub fn with_suppress_warnings(mut self, enabled: bool) -> Self {
        self.suppress_warnings = enabled;
        self
    }

    /// Adds a symbol definition to register before analysis.
    pub fn with_extra_table(mut self, table: TableConfig) -> Self {
        self.extra_tables.push(table);
        self
    }

    /// Returns the build platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Returns `true` if warnings are promoted to errors.
    pub fn warnings_as_errors(&self) -> bool {
        self.warnings_as_errors
    }

    /// Returns `true` if warnings are dropped from the report.
    ///
    /// Ignored when [`warnings_as_errors`](Self::warnings_as_errors) is set.
    pub fn suppress_warnings(&self) -> bool {
        self.suppress_warnings
    }

    /// Returns the additional symbol definitions.
    pub fn extra_tables(&self) -> &[TableConfig] {
        &self.extra_tables
    }
}

/// A symbol definition supplied by configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    name: String,

    #[serde(default)]
    fields: Vec<FieldConfig>,
}

impl TableConfig {
    pub fn new(name: impl Into<String>, fields: Vec<FieldConfig>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[FieldConfig] {
        &self.fields
    }

    /// Builds the symbol definition this table describes.
    pub fn to_definition(&self) -> SymbolDefinition {
        let fields = self
            .fields
            .iter()
            .map(|field| FieldDefinition::new(field.name.clone(), field.kind))
            .collect();
        SymbolDefinition::new(self.name.clone(), fields)
    }
}

/// A typed column of a [`TableConfig`].
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldConfig {
    name: String,
    kind: FieldKind,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }
}
