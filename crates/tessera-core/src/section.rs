//! Sections and the intermediate they are collected into.
//!
//! A [`Section`] is the append-only symbol store for one compiled source unit.
//! Grouping edges, searches and scheduled actions are ordinary symbols in the
//! section, so every graph over them is a view computed from
//! [`Section::symbols`].

use indexmap::IndexMap;
use log::trace;
use thiserror::Error;

use crate::{
    location::SourceLineNumber,
    sequence::SequenceTable,
    symbol::{Symbol, definitions::wix_action, definitions::wix_ensure_table},
};

/// Errors raised when a symbol cannot be added to a section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    #[error("duplicate symbol `{id}` in table `{table}`")]
    Duplicate {
        table: String,
        id: String,
        first: Option<SourceLineNumber>,
    },
}

/// The symbols produced by one source unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: String,
    location: Option<SourceLineNumber>,
    symbols: Vec<Symbol>,
    keys: IndexMap<(String, String), usize>,
}

impl Section {
    pub fn new(id: impl Into<String>, location: Option<SourceLineNumber>) -> Self {
        Self {
            id: id.into(),
            location,
            symbols: Vec::new(),
            keys: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn location(&self) -> Option<&SourceLineNumber> {
        self.location.as_ref()
    }

    /// Appends a symbol, rejecting a second symbol with the same table and id.
    ///
    /// Anonymous symbols are always accepted. The returned reference lets the
    /// caller fill in fields after the key has been claimed.
    ///
    /// # Errors
    ///
    /// Returns [`SectionError::Duplicate`] carrying the location of the symbol
    /// that already holds the key. The section is left unchanged.
    pub fn add_symbol(&mut self, symbol: Symbol) -> Result<&mut Symbol, SectionError> {
        if let Some(id) = symbol.id() {
            let key = (symbol.definition().name().to_string(), id.id().to_string());
            if let Some(&existing) = self.keys.get(&key) {
                return Err(SectionError::Duplicate {
                    table: key.0,
                    id: key.1,
                    first: self.symbols[existing].location().cloned(),
                });
            }
            self.keys.insert(key, self.symbols.len());
        }
        Ok(self.push_symbol(symbol))
    }

    /// Appends a symbol without checking for an existing key.
    ///
    /// Reserved for rows whose identity is not unique by construction, such as
    /// the overriding action rows that share a key with the action they
    /// override.
    pub fn push_symbol(&mut self, symbol: Symbol) -> &mut Symbol {
        trace!(
            section = self.id.as_str(),
            table = symbol.definition().name(),
            id:? = symbol.id().map(|id| id.id());
            "Appended symbol"
        );
        let index = self.symbols.len();
        self.symbols.push(symbol);
        &mut self.symbols[index]
    }

    /// Returns every symbol in insertion order.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Returns the symbols of one table in insertion order.
    pub fn symbols_of<'s, 't>(&'s self, table: &'t str) -> impl Iterator<Item = &'s Symbol> {
        self.symbols
            .iter()
            .filter(move |symbol| symbol.definition().name() == table)
    }

    /// Finds the first symbol of `table` with the given id.
    pub fn find(&self, table: &str, id: &str) -> Option<&Symbol> {
        match self.keys.get(&(table.to_string(), id.to_string())) {
            Some(&index) => Some(&self.symbols[index]),
            None => self.symbols.iter().find(|symbol| {
                symbol.definition().name() == table && symbol.id().is_some_and(|sid| sid == id)
            }),
        }
    }

    /// Returns `true` if the table was already marked as required.
    pub fn is_table_ensured(&self, table: &str) -> bool {
        self.symbols_of(wix_ensure_table::TABLE)
            .any(|symbol| symbol.string(wix_ensure_table::TABLE_NAME) == Some(table))
    }

    /// Returns the actions scheduled in `sequence`, in declaration order.
    pub fn actions_in(&self, sequence: SequenceTable) -> impl Iterator<Item = &Symbol> + '_ {
        self.symbols_of(wix_action::TABLE).filter(move |symbol| {
            symbol.number(wix_action::SEQUENCE_TABLE) == Some(sequence.code())
        })
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The output of compiling a set of source units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Intermediate {
    id: String,
    sections: Vec<Section>,
}

impl Intermediate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sections: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}
