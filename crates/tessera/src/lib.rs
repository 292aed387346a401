//! Tessera - A compiler for declarative installer sources.
//!
//! Configures the semantic analyzer, drives one [`SourceUnit`] per compiled
//! source file and collects the resulting sections into an
//! [`Intermediate`] that is only handed out when no source unit failed.

pub mod config;

mod error;

pub use tessera_compiler::{
    Analyzer, Claim, CompileError, CompilerExtension, ComponentKeyPath, Diagnostic, ErrorCode,
    KeyPathKind, ParseContext, Severity, analyzer, extension, identifiers, validate, views,
};
pub use tessera_core::{identifier, location, platform, section, sequence, symbol, xml};

pub use error::TesseraError;

use log::{debug, info, trace, warn};

use tessera_compiler::analyzer::InlineDirectoryCache;
use tessera_core::{
    location::SourceLineNumber,
    platform::Platform,
    section::{Intermediate, Section},
    symbol::SymbolDefinitionRegistry,
};

use config::CompilerConfig;

/// A compilation of one or more source units into an intermediate.
///
/// # Examples
///
/// ```
/// use tessera::{Compilation, config::CompilerConfig};
/// use tessera::location::SourceLineNumber;
///
/// let mut compilation = Compilation::new("Setup", CompilerConfig::default())
///     .expect("valid configuration");
///
/// let mut unit = compilation.unit("Product", None);
/// let here = SourceLineNumber::new("product.wxs", 4);
/// let (analyzer, section, _) = unit.parts_mut();
/// analyzer.ensure_table(section, &here, "Shortcut");
///
/// assert!(compilation.add_unit(unit));
///
/// let output = compilation.finish().expect("no errors");
/// assert_eq!(output.intermediate().sections().len(), 1);
/// ```
pub struct Compilation {
    config: CompilerConfig,
    definitions: SymbolDefinitionRegistry,
    extensions: Vec<Box<dyn CompilerExtension>>,
    intermediate: Intermediate,
    warnings: Vec<Diagnostic>,
    failures: Vec<Diagnostic>,
}

impl Compilation {
    /// Create a compilation with the given configuration.
    ///
    /// The configured extra tables are registered next to the built-in
    /// symbol definitions.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Config`] if an extra table repeats the name of
    /// a built-in or another extra table.
    pub fn new(id: impl Into<String>, config: CompilerConfig) -> Result<Self, TesseraError> {
        let mut definitions = SymbolDefinitionRegistry::with_builtins();
        for table in config.extra_tables() {
            definitions
                .register(table.to_definition())
                .map_err(|err| TesseraError::Config(err.to_string()))?;
        }

        let intermediate = Intermediate::new(id);
        info!(
            intermediate = intermediate.id(),
            platform:% = config.platform(),
            definitions = definitions.len();
            "Starting compilation"
        );

        Ok(Self {
            config,
            definitions,
            extensions: Vec::new(),
            intermediate,
            warnings: Vec::new(),
            failures: Vec::new(),
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Returns the symbol definitions every new source unit starts from.
    pub fn definitions(&self) -> &SymbolDefinitionRegistry {
        &self.definitions
    }

    /// Registers an extension. Extensions are consulted in registration order.
    pub fn register_extension(&mut self, extension: Box<dyn CompilerExtension>) {
        debug!(namespace = extension.namespace(); "Registered extension");
        self.extensions.push(extension);
    }

    /// Returns what extension dispatch needs: the sections accepted so far
    /// and the registered extensions.
    pub fn extension_context(&mut self) -> (&Intermediate, &mut [Box<dyn CompilerExtension>]) {
        (&self.intermediate, &mut self.extensions)
    }

    /// Begins a source unit with a fresh analyzer, section and inline
    /// directory cache.
    pub fn unit(
        &self,
        section_id: impl Into<String>,
        location: Option<SourceLineNumber>,
    ) -> SourceUnit {
        let section = Section::new(section_id, location);
        info!(section = section.id(); "Beginning source unit");
        SourceUnit {
            analyzer: Analyzer::new(self.definitions.clone()),
            section,
            directories: InlineDirectoryCache::new(),
            platform: self.config.platform(),
        }
    }

    /// Finishes a source unit and returns `true` if its section was accepted.
    ///
    /// The section of a unit that recorded an error is dropped; its
    /// diagnostics are kept for [`finish`](Self::finish). Other units are
    /// unaffected.
    pub fn add_unit(&mut self, unit: SourceUnit) -> bool {
        let SourceUnit {
            analyzer, section, ..
        } = unit;

        let result = analyzer.finish().map_err(CompileError::into_diagnostics);
        let result = match result {
            Ok(warnings) if self.config.warnings_as_errors() && !warnings.is_empty() => {
                Err(warnings)
            }
            other => other,
        };

        match result {
            Ok(warnings) => {
                info!(
                    section = section.id(),
                    symbols = section.len(),
                    warnings = warnings.len();
                    "Accepted source unit"
                );
                if !self.config.suppress_warnings() {
                    self.warnings.extend(warnings);
                }
                self.intermediate.add_section(section);
                true
            }
            Err(diagnostics) => {
                warn!(
                    section = section.id(),
                    diagnostics = diagnostics.len();
                    "Rejected source unit"
                );
                trace!(diagnostics:?; "Source unit diagnostics");
                let promote = self.config.warnings_as_errors();
                let suppress = self.config.suppress_warnings() && !promote;
                self.failures.extend(
                    diagnostics
                        .into_iter()
                        .filter(|diagnostic| !(suppress && diagnostic.severity().is_warning()))
                        .map(|diagnostic| {
                            if promote {
                                diagnostic.into_error()
                            } else {
                                diagnostic
                            }
                        }),
                );
                false
            }
        }
    }

    /// Finishes the compilation.
    ///
    /// # Errors
    ///
    /// Returns [`TesseraError::Compile`] carrying the diagnostics of every
    /// rejected source unit when at least one unit was rejected.
    pub fn finish(self) -> Result<CompiledOutput, TesseraError> {
        info!(
            intermediate = self.intermediate.id(),
            sections = self.intermediate.sections().len(),
            warnings = self.warnings.len(),
            errors = self.failures.iter().filter(|d| d.severity().is_error()).count();
            "Finished compilation"
        );

        if !self.failures.is_empty() {
            return Err(CompileError::new(self.failures).into());
        }

        Ok(CompiledOutput {
            intermediate: self.intermediate,
            warnings: self.warnings,
        })
    }
}

/// The state of one source unit while it is being analyzed.
#[derive(Debug)]
pub struct SourceUnit {
    analyzer: Analyzer,
    section: Section,
    directories: InlineDirectoryCache,
    platform: Platform,
}

impl SourceUnit {
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    /// Returns the platform custom-action references are specialized for.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Borrows the analyzer, the section and the unit's inline directory
    /// cache together, as builder operations need them.
    pub fn parts_mut(&mut self) -> (&mut Analyzer, &mut Section, &mut InlineDirectoryCache) {
        (&mut self.analyzer, &mut self.section, &mut self.directories)
    }
}

/// A successfully compiled intermediate and the warnings reported for it.
#[derive(Debug)]
pub struct CompiledOutput {
    intermediate: Intermediate,
    warnings: Vec<Diagnostic>,
}

impl CompiledOutput {
    pub fn intermediate(&self) -> &Intermediate {
        &self.intermediate
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    pub fn into_intermediate(self) -> Intermediate {
        self.intermediate
    }
}
