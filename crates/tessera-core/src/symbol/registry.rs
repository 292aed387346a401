//! Lookup of symbol definitions by table name.

use std::sync::Arc;

use indexmap::IndexMap;
use log::debug;

use crate::symbol::{SymbolDefinition, SymbolError, definitions};

/// The set of symbol definitions known to one compilation.
///
/// Starts with the built-in definitions; extensions and the linker schema add
/// their own through [`SymbolDefinitionRegistry::register`]. Each compilation
/// owns its registry, so independent sections never share one.
#[derive(Debug, Clone)]
pub struct SymbolDefinitionRegistry {
    definitions: IndexMap<String, Arc<SymbolDefinition>>,
}

impl SymbolDefinitionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            definitions: IndexMap::new(),
        }
    }

    /// Creates a registry preloaded with the built-in definitions.
    pub fn with_builtins() -> Self {
        let definitions = definitions::all()
            .into_iter()
            .map(|definition| (definition.name().to_string(), definition))
            .collect();
        Self { definitions }
    }

    /// Registers a definition.
    ///
    /// # Errors
    ///
    /// Returns [`SymbolError::DuplicateDefinition`] if a definition with the
    /// same name is already registered.
    pub fn register(
        &mut self,
        definition: SymbolDefinition,
    ) -> Result<Arc<SymbolDefinition>, SymbolError> {
        if self.definitions.contains_key(definition.name()) {
            return Err(SymbolError::DuplicateDefinition(definition.name().to_string()));
        }
        debug!(
            table = definition.name(),
            fields = definition.fields().len();
            "Registered symbol definition"
        );
        let definition = Arc::new(definition);
        self.definitions
            .insert(definition.name().to_string(), Arc::clone(&definition));
        Ok(definition)
    }

    /// Resolves a definition by table name.
    pub fn get(&self, name: &str) -> Option<&Arc<SymbolDefinition>> {
        self.definitions.get(name)
    }

    /// Resolves a definition by table name or reports it as unknown.
    pub fn resolve(&self, name: &str) -> Result<Arc<SymbolDefinition>, SymbolError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| SymbolError::UnknownDefinition(name.to_string()))
    }

    /// Iterates the definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<SymbolDefinition>> {
        self.definitions.values()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for SymbolDefinitionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
