//! Simple and complex references between symbols.

use log::debug;

use tessera_core::{
    identifier::Identifier,
    location::SourceLineNumber,
    platform::{Platform, PlatformSet},
    reference::{ComplexReferenceChildType, ComplexReferenceParentType},
    section::Section,
    symbol::definitions::{custom_action, wix_complex_reference, wix_group, wix_simple_reference},
};

use crate::{
    analyzer::{Analyzer, DefinitionRef},
    identifiers::generate_platform_identifier,
};

/// Separator between the primary keys of a simple reference.
const PRIMARY_KEY_SEPARATOR: &str = "/";

/// A structural parent/child edge.
///
/// # Examples
///
/// ```
/// use tessera_compiler::analyzer::ComplexReference;
/// use tessera_core::reference::{ComplexReferenceChildType, ComplexReferenceParentType};
///
/// let edge = ComplexReference::new(
///     ComplexReferenceParentType::Feature,
///     "MainFeature",
///     ComplexReferenceChildType::Component,
///     "MainComponent",
/// )
/// .primary(true);
///
/// assert!(edge.is_primary());
/// assert_eq!(edge.parent_language(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexReference {
    parent_type: ComplexReferenceParentType,
    parent_id: String,
    parent_language: Option<String>,
    child_type: ComplexReferenceChildType,
    child_id: String,
    is_primary: bool,
}

impl ComplexReference {
    pub fn new(
        parent_type: ComplexReferenceParentType,
        parent_id: impl Into<String>,
        child_type: ComplexReferenceChildType,
        child_id: impl Into<String>,
    ) -> Self {
        Self {
            parent_type,
            parent_id: parent_id.into(),
            parent_language: None,
            child_type,
            child_id: child_id.into(),
            is_primary: false,
        }
    }

    /// Qualifies the parent with a language, as merge modules are.
    pub fn with_parent_language(mut self, language: impl Into<String>) -> Self {
        self.parent_language = Some(language.into());
        self
    }

    pub fn primary(mut self, is_primary: bool) -> Self {
        self.is_primary = is_primary;
        self
    }

    pub fn parent_type(&self) -> ComplexReferenceParentType {
        self.parent_type
    }

    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }

    pub fn parent_language(&self) -> Option<&str> {
        self.parent_language.as_deref()
    }

    pub fn child_type(&self) -> ComplexReferenceChildType {
        self.child_type
    }

    pub fn child_id(&self) -> &str {
        &self.child_id
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }
}

impl Analyzer {
    /// Records that the section depends on a row defined elsewhere.
    ///
    /// The table is named, not resolved: the referenced row may live in a
    /// table owned by a later stage.
    pub fn create_simple_reference<'d>(
        &mut self,
        section: &mut Section,
        location: &SourceLineNumber,
        table: impl Into<DefinitionRef<'d>>,
        primary_keys: &[&str],
    ) {
        let table = table.into();
        let table_name = table.table_name().to_string();
        let keys = primary_keys.join(PRIMARY_KEY_SEPARATOR);

        if let Some(symbol) =
            self.create_symbol(section, location, wix_simple_reference::definition(), None)
        {
            debug!(table = table_name.as_str(), keys = keys.as_str(); "Created simple reference");
            symbol
                .set(wix_simple_reference::TABLE_NAME, table_name)
                .set(wix_simple_reference::PRIMARY_KEYS, keys);
        }
    }

    /// Records a structural parent/child edge together with its group entry.
    pub fn create_complex_reference(
        &mut self,
        section: &mut Section,
        location: &SourceLineNumber,
        reference: &ComplexReference,
    ) {
        if let Some(symbol) =
            self.create_symbol(section, location, wix_complex_reference::definition(), None)
        {
            debug!(
                parent = reference.parent_id.as_str(),
                parent_type:% = reference.parent_type,
                child = reference.child_id.as_str(),
                child_type:% = reference.child_type,
                primary = reference.is_primary;
                "Created complex reference"
            );
            symbol
                .set(wix_complex_reference::PARENT, reference.parent_id.clone())
                .set(wix_complex_reference::PARENT_TYPE, reference.parent_type.code())
                .set(
                    wix_complex_reference::PARENT_LANGUAGE,
                    reference.parent_language.clone(),
                )
                .set(wix_complex_reference::CHILD, reference.child_id.clone())
                .set(wix_complex_reference::CHILD_TYPE, reference.child_type.code())
                .set(wix_complex_reference::IS_PRIMARY, reference.is_primary);
        }

        self.create_group_symbol(
            section,
            location,
            reference.parent_type,
            &reference.parent_id,
            reference.child_type,
            &reference.child_id,
        );
    }

    /// Records a table-level group entry.
    ///
    /// Nothing is recorded for a parent of unknown type or without an id.
    pub fn create_group_symbol(
        &mut self,
        section: &mut Section,
        location: &SourceLineNumber,
        parent_type: ComplexReferenceParentType,
        parent_id: &str,
        child_type: ComplexReferenceChildType,
        child_id: &str,
    ) {
        if parent_type == ComplexReferenceParentType::Unknown || parent_id.is_empty() {
            debug!(
                parent_type:% = parent_type,
                child = child_id;
                "Skipped group entry without parent"
            );
            return;
        }

        if let Some(symbol) = self.create_symbol(section, location, wix_group::definition(), None) {
            symbol
                .set(wix_group::PARENT_ID, parent_id.to_string())
                .set(wix_group::PARENT_TYPE, parent_type.code())
                .set(wix_group::CHILD_ID, child_id.to_string())
                .set(wix_group::CHILD_TYPE, child_type.code());
        }
    }

    /// References the custom action specialized for `platform`.
    ///
    /// Returns the referenced identifier, or `None` without a diagnostic
    /// when the platform has no specialization.
    pub fn create_custom_action_reference(
        &mut self,
        location: &SourceLineNumber,
        section: &mut Section,
        base_name: &str,
        platform: Platform,
        supported: PlatformSet,
    ) -> Option<Identifier> {
        let Some(id) = generate_platform_identifier(base_name, platform, supported) else {
            debug!(
                custom_action = base_name,
                platform:% = platform;
                "No custom action for platform"
            );
            return None;
        };

        self.create_simple_reference(section, location, custom_action::TABLE, &[id.id()]);
        Some(id)
    }
}
