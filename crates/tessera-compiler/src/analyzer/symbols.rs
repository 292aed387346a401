//! Symbol allocation, table markers and registry rows.

use std::sync::Arc;

use log::{debug, trace};

use tessera_core::{
    identifier::Identifier,
    location::SourceLineNumber,
    registry::{RegistryRootType, RegistryValueActionType, RegistryValueType},
    section::{Section, SectionError},
    symbol::{
        Symbol, SymbolDefinition,
        definitions::{registry, wix_ensure_table},
    },
};

use crate::{
    analyzer::Analyzer,
    error::{Diagnostic, ErrorCode},
    identifiers::generate_identifier,
};

/// A symbol definition given either by table name or directly.
#[derive(Debug, Clone)]
pub enum DefinitionRef<'a> {
    /// Resolved against the analyzer's definition registry.
    Name(&'a str),
    Definition(Arc<SymbolDefinition>),
}

impl DefinitionRef<'_> {
    pub(crate) fn table_name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Definition(definition) => definition.name(),
        }
    }
}

impl<'a> From<&'a str> for DefinitionRef<'a> {
    fn from(name: &'a str) -> Self {
        Self::Name(name)
    }
}

impl From<Arc<SymbolDefinition>> for DefinitionRef<'_> {
    fn from(definition: Arc<SymbolDefinition>) -> Self {
        Self::Definition(definition)
    }
}

/// The contents of one registry row.
///
/// Defaults to a string value written by the `Write` action.
///
/// # Examples
///
/// ```
/// use tessera_compiler::analyzer::RegistryEntry;
/// use tessera_core::registry::{RegistryRootType, RegistryValueType};
///
/// let key = "Software\\Vendor";
/// let entry = RegistryEntry::new(RegistryRootType::LocalMachine, key, "MainComponent")
///     .with_name("InstallDir")
///     .with_value("[INSTALLFOLDER]");
/// assert_eq!(entry.value_type(), RegistryValueType::String);
///
/// let count = RegistryEntry::new(RegistryRootType::CurrentUser, key, "MainComponent")
///     .with_integer_value(3);
/// assert_eq!(count.value(), Some("3"));
/// assert_eq!(count.value_type(), RegistryValueType::Integer);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    root: RegistryRootType,
    key: String,
    component_id: String,
    name: Option<String>,
    value: Option<String>,
    value_type: RegistryValueType,
    action: RegistryValueActionType,
}

impl RegistryEntry {
    pub fn new(
        root: RegistryRootType,
        key: impl Into<String>,
        component_id: impl Into<String>,
    ) -> Self {
        Self {
            root,
            key: key.into(),
            component_id: component_id.into(),
            name: None,
            value: None,
            value_type: RegistryValueType::default(),
            action: RegistryValueActionType::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Stores a numeric value and switches the value type to integer.
    pub fn with_integer_value(mut self, value: i64) -> Self {
        self.value = Some(value.to_string());
        self.value_type = RegistryValueType::Integer;
        self
    }

    pub fn with_value_type(mut self, value_type: RegistryValueType) -> Self {
        self.value_type = value_type;
        self
    }

    pub fn with_action(mut self, action: RegistryValueActionType) -> Self {
        self.action = action;
        self
    }

    pub fn root(&self) -> RegistryRootType {
        self.root
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn value_type(&self) -> RegistryValueType {
        self.value_type
    }

    pub fn action(&self) -> RegistryValueActionType {
        self.action
    }
}

impl Analyzer {
    /// Allocates a symbol in `section`.
    ///
    /// Without `id` the symbol is anonymous. Returns `None` after reporting an
    /// error when the definition name is unknown or the (table, id) pair is
    /// already taken; the section is unchanged in both cases.
    pub fn create_symbol<'s, 'd>(
        &mut self,
        section: &'s mut Section,
        location: &SourceLineNumber,
        definition: impl Into<DefinitionRef<'d>>,
        id: Option<Identifier>,
    ) -> Option<&'s mut Symbol> {
        let definition = match definition.into() {
            DefinitionRef::Definition(definition) => definition,
            DefinitionRef::Name(name) => match self.definitions.resolve(name) {
                Ok(definition) => definition,
                Err(err) => {
                    self.emit(
                        Diagnostic::error(err.to_string())
                            .with_code(ErrorCode::E300)
                            .with_label(location.clone(), "unknown table")
                            .with_help("register the table's definition before creating its symbols"),
                    );
                    return None;
                }
            },
        };

        let symbol = Symbol::new(definition, Some(location.clone()), id);
        match section.add_symbol(symbol) {
            Ok(symbol) => {
                debug!(
                    table = symbol.definition().name(),
                    id:? = symbol.id().map(Identifier::id);
                    "Created symbol"
                );
                Some(symbol)
            }
            Err(SectionError::Duplicate { table, id, first }) => {
                let mut diagnostic = Diagnostic::error(format!(
                    "the `{table}` symbol `{id}` is defined more than once"
                ))
                .with_code(ErrorCode::E100)
                .with_label(location.clone(), "duplicate definition")
                .with_help("every identifier must be unique within its table");
                if let Some(first) = first {
                    diagnostic = diagnostic.with_secondary_label(first, "first defined here");
                }
                self.emit(diagnostic);
                None
            }
        }
    }

    /// Marks a table as required even when no symbol populates it.
    ///
    /// Calling it again for the same table does nothing.
    pub fn ensure_table<'d>(
        &mut self,
        section: &mut Section,
        location: &SourceLineNumber,
        table: impl Into<DefinitionRef<'d>>,
    ) {
        let table = table.into();
        let name = table.table_name();
        if section.is_table_ensured(name) {
            trace!(table = name; "Table already ensured");
            return;
        }

        let id = Identifier::private(name);
        if let Some(symbol) =
            self.create_symbol(section, location, wix_ensure_table::definition(), Some(id))
        {
            symbol.set(wix_ensure_table::TABLE_NAME, name.to_string());
            debug!(table = name; "Ensured table");
        }
    }

    /// Creates a registry row owned by a component and returns its identifier.
    ///
    /// The identifier is derived from the component, root, key and name, so
    /// recompiling yields the same identifier. Returns `None` after reporting
    /// an error when the key is empty or the row already exists.
    pub fn create_registry_symbol(
        &mut self,
        section: &mut Section,
        location: &SourceLineNumber,
        entry: &RegistryEntry,
    ) -> Option<Identifier> {
        if entry.key.is_empty() {
            self.error_at(
                location,
                ErrorCode::E001,
                "a registry value requires a non-empty key",
                "empty key",
            );
            return None;
        }

        let id = generate_identifier(
            "reg",
            [
                entry.component_id.clone(),
                entry.root.code().to_string(),
                entry.key.to_lowercase(),
                entry.name.as_deref().unwrap_or_default().to_lowercase(),
            ],
        );

        let symbol =
            self.create_symbol(section, location, registry::definition(), Some(id.clone()))?;
        symbol
            .set(registry::ROOT, entry.root.code())
            .set(registry::KEY, entry.key.clone())
            .set(registry::NAME, entry.name.clone())
            .set(registry::VALUE, entry.value.clone())
            .set(registry::VALUE_TYPE, entry.value_type.code())
            .set(registry::VALUE_ACTION, entry.action.code())
            .set(registry::COMPONENT_REF, entry.component_id.clone());
        Some(id)
    }
}
