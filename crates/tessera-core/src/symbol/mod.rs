//! Typed IR records and their schemas.
//!
//! A [`Symbol`] is one row destined for an output table. Its shape is fixed by
//! a [`SymbolDefinition`]: a table name plus an ordered list of typed fields.
//! Built-in definitions live in [`definitions`]; a [`SymbolDefinitionRegistry`]
//! resolves definitions by name, including ones registered by extensions.
//!
//! Built-in fields are addressed through typed [`Field`] handles so that
//! builders cannot store a number in a string column. Extensions that only know
//! field names go through [`Symbol::set_by_name`], which validates at runtime.

pub mod definitions;
mod registry;

use std::{borrow::Cow, fmt, marker::PhantomData, sync::Arc};

use serde::Deserialize;
use thiserror::Error;

use crate::{identifier::Identifier, location::SourceLineNumber};

pub use registry::SymbolDefinitionRegistry;

/// Errors raised when a symbol is used against its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("symbol definition `{0}` is not registered")]
    UnknownDefinition(String),

    #[error("symbol definition `{0}` is already registered")]
    DuplicateDefinition(String),

    #[error("table `{table}` has no field named `{field}`")]
    UnknownField { table: String, field: String },

    #[error("field `{table}.{field}` expects a {expected} value, got {actual}")]
    FieldType {
        table: String,
        field: String,
        expected: FieldKind,
        actual: FieldKind,
    },
}

/// The storage type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Bool,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Number => write!(f, "number"),
            Self::Bool => write!(f, "bool"),
        }
    }
}

/// A stored field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    String(String),
    Number(i64),
    Bool(bool),
}

impl FieldValue {
    /// Returns the storage type of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::String(_) => FieldKind::String,
            Self::Number(_) => FieldKind::Number,
            Self::Bool(_) => FieldKind::Bool,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Rust types that map onto a [`FieldKind`].
pub trait FieldType: Into<FieldValue> {
    const KIND: FieldKind;
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::String;
}

impl FieldType for i64 {
    const KIND: FieldKind = FieldKind::Number;
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;
}

/// A typed handle to a field of a built-in definition.
#[derive(Debug)]
pub struct Field<T> {
    table: &'static str,
    name: &'static str,
    index: usize,
    _kind: PhantomData<fn() -> T>,
}

impl<T> Clone for Field<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Field<T> {}

impl<T: FieldType> Field<T> {
    pub const fn new(table: &'static str, name: &'static str, index: usize) -> Self {
        Self {
            table,
            name,
            index,
            _kind: PhantomData,
        }
    }

    /// Returns the field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the schema entry describing this field.
    pub fn definition(&self) -> FieldDefinition {
        FieldDefinition::new(self.name, T::KIND)
    }
}

/// One column of a [`SymbolDefinition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    name: Cow<'static, str>,
    kind: FieldKind,
}

impl FieldDefinition {
    pub fn new(name: impl Into<Cow<'static, str>>, kind: FieldKind) -> Self {
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

/// The schema of a symbol: a table name plus typed fields.
///
/// # Examples
///
/// ```
/// use tessera_core::symbol::{FieldDefinition, FieldKind, SymbolDefinition};
///
/// let definition = SymbolDefinition::new(
///     "UtilUser",
///     vec![
///         FieldDefinition::new("Name", FieldKind::String),
///         FieldDefinition::new("Attributes", FieldKind::Number),
///     ],
/// );
/// assert_eq!(definition.name(), "UtilUser");
/// assert_eq!(definition.field_index("Attributes"), Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolDefinition {
    name: Cow<'static, str>,
    fields: Vec<FieldDefinition>,
}

impl SymbolDefinition {
    pub fn new(name: impl Into<Cow<'static, str>>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Returns the table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields in column order.
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Returns the column index of the named field.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }
}

/// A typed row inside a section.
///
/// Fields start unset. A symbol without an identifier is anonymous: it becomes
/// a table row but cannot be the target of a cross-reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    definition: Arc<SymbolDefinition>,
    id: Option<Identifier>,
    location: Option<SourceLineNumber>,
    fields: Vec<Option<FieldValue>>,
}

impl Symbol {
    pub fn new(
        definition: Arc<SymbolDefinition>,
        location: Option<SourceLineNumber>,
        id: Option<Identifier>,
    ) -> Self {
        let fields = vec![None; definition.fields().len()];
        Self {
            definition,
            id,
            location,
            fields,
        }
    }

    pub fn definition(&self) -> &SymbolDefinition {
        &self.definition
    }

    /// Returns the shared handle to the definition.
    pub fn definition_arc(&self) -> &Arc<SymbolDefinition> {
        &self.definition
    }

    pub fn id(&self) -> Option<&Identifier> {
        self.id.as_ref()
    }

    pub fn location(&self) -> Option<&SourceLineNumber> {
        self.location.as_ref()
    }

    /// Stores a value in a built-in field. `None` clears the field.
    ///
    /// The handle must belong to this symbol's definition.
    pub fn set<T: FieldType>(&mut self, field: Field<T>, value: impl Into<Option<T>>) -> &mut Self {
        debug_assert_eq!(
            field.table,
            self.definition.name(),
            "field handle applied to a symbol of another table"
        );
        if let Some(slot) = self.fields.get_mut(field.index) {
            *slot = value.into().map(Into::into);
        }
        self
    }

    /// Stores a value in a field resolved by name, checking its type.
    pub fn set_by_name(
        &mut self,
        name: &str,
        value: impl Into<FieldValue>,
    ) -> Result<&mut Self, SymbolError> {
        let value = value.into();
        let index = self
            .definition
            .field_index(name)
            .ok_or_else(|| SymbolError::UnknownField {
                table: self.definition.name().to_string(),
                field: name.to_string(),
            })?;
        let expected = self.definition.fields()[index].kind();
        if expected != value.kind() {
            return Err(SymbolError::FieldType {
                table: self.definition.name().to_string(),
                field: name.to_string(),
                expected,
                actual: value.kind(),
            });
        }
        self.fields[index] = Some(value);
        Ok(self)
    }

    /// Returns the raw value of a field resolved by name.
    pub fn get_by_name(&self, name: &str) -> Option<&FieldValue> {
        self.definition
            .field_index(name)
            .and_then(|index| self.fields[index].as_ref())
    }

    pub fn string(&self, field: Field<String>) -> Option<&str> {
        self.slot(field.index).and_then(FieldValue::as_str)
    }

    pub fn number(&self, field: Field<i64>) -> Option<i64> {
        self.slot(field.index).and_then(FieldValue::as_number)
    }

    pub fn flag(&self, field: Field<bool>) -> Option<bool> {
        self.slot(field.index).and_then(FieldValue::as_bool)
    }

    fn slot(&self, index: usize) -> Option<&FieldValue> {
        self.fields.get(index).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_definition() -> Arc<SymbolDefinition> {
        Arc::new(SymbolDefinition::new(
            "UtilUser",
            vec![
                FieldDefinition::new("Name", FieldKind::String),
                FieldDefinition::new("Attributes", FieldKind::Number),
            ],
        ))
    }

    #[test]
    fn test_new_symbol_has_unset_fields() {
        let symbol = Symbol::new(user_definition(), None, None);
        assert!(symbol.get_by_name("Name").is_none());
        assert!(symbol.id().is_none());
    }

    #[test]
    fn test_set_by_name() {
        let mut symbol = Symbol::new(user_definition(), None, Some(Identifier::private("U1")));
        symbol
            .set_by_name("Name", "admin")
            .expect("field exists")
            .set_by_name("Attributes", 3_i64)
            .expect("field exists");

        assert_eq!(
            symbol.get_by_name("Name"),
            Some(&FieldValue::String("admin".to_string()))
        );
        assert_eq!(symbol.get_by_name("Attributes").and_then(FieldValue::as_number), Some(3));
    }

    #[test]
    fn test_set_by_name_unknown_field() {
        let mut symbol = Symbol::new(user_definition(), None, None);
        let err = symbol.set_by_name("Password", "x").unwrap_err();
        assert_eq!(
            err,
            SymbolError::UnknownField {
                table: "UtilUser".to_string(),
                field: "Password".to_string()
            }
        );
    }

    #[test]
    fn test_set_by_name_type_mismatch() {
        let mut symbol = Symbol::new(user_definition(), None, None);
        let err = symbol.set_by_name("Attributes", "three").unwrap_err();
        assert_eq!(
            err.to_string(),
            "field `UtilUser.Attributes` expects a number value, got string"
        );
    }

    #[test]
    fn test_typed_set_and_clear() {
        let mut symbol = Symbol::new(definitions::directory::definition(), None, None);
        symbol.set(definitions::directory::NAME, "App".to_string());
        assert_eq!(symbol.string(definitions::directory::NAME), Some("App"));

        symbol.set(definitions::directory::NAME, None);
        assert_eq!(symbol.string(definitions::directory::NAME), None);
    }
}
