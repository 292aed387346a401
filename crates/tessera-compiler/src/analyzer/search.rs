//! Search entries and the ordering edges between them.

use std::ops::BitOr;

use log::debug;

use tessera_core::{
    identifier::Identifier,
    location::SourceLineNumber,
    section::Section,
    symbol::definitions::{wix_bundle_extension, wix_search, wix_search_relation},
};

use crate::{
    analyzer::Analyzer,
    error::{Diagnostic, ErrorCode},
};

/// The nature of a search relation, stored as bit flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SearchRelationFlags(u32);

impl SearchRelationFlags {
    pub const NONE: Self = Self(0);

    /// The child only depends on the parent's result.
    pub const DEPENDENCY: Self = Self(1);

    /// The child is evaluated strictly after the parent. Stored as `2`, the
    /// value authored `After` attributes compile to.
    pub const AFTER: Self = Self(2);

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for SearchRelationFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A discovery operation bound to an output variable.
///
/// # Examples
///
/// ```
/// use tessera_compiler::analyzer::SearchEntry;
/// use tessera_core::identifier::Identifier;
///
/// let id = Identifier::private("NetFx48");
/// let search = SearchEntry::new("RegistrySearch", id, "NetFx48Release")
///     .with_condition("VersionNT >= v6.1")
///     .after("OsInfo");
/// assert_eq!(search.after_id(), Some("OsInfo"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchEntry {
    element_name: String,
    id: Identifier,
    variable: String,
    condition: Option<String>,
    after: Option<String>,
    extension_id: Option<String>,
}

impl SearchEntry {
    pub fn new(
        element_name: impl Into<String>,
        id: Identifier,
        variable: impl Into<String>,
    ) -> Self {
        Self {
            element_name: element_name.into(),
            id,
            variable: variable.into(),
            condition: None,
            after: None,
            extension_id: None,
        }
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    /// Orders this search strictly after another one.
    pub fn after(mut self, search_id: impl Into<String>) -> Self {
        self.after = Some(search_id.into());
        self
    }

    /// Assigns this search to a bundle extension.
    pub fn with_extension(mut self, extension_id: impl Into<String>) -> Self {
        self.extension_id = Some(extension_id.into());
        self
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn id(&self) -> &Identifier {
        &self.id
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn after_id(&self) -> Option<&str> {
        self.after.as_deref()
    }

    pub fn extension_id(&self) -> Option<&str> {
        self.extension_id.as_deref()
    }
}

impl Analyzer {
    /// Creates a search entry.
    ///
    /// An `after` predecessor also gets a simple reference and an `AFTER`
    /// relation; an extension id gets a simple reference to the extension.
    /// A search whose id is already taken records nothing.
    ///
    /// Returns `true` when the search was created.
    pub fn create_search_symbol(
        &mut self,
        section: &mut Section,
        location: &SourceLineNumber,
        search: &SearchEntry,
    ) -> bool {
        let Some(symbol) = self.create_symbol(
            section,
            location,
            wix_search::definition(),
            Some(search.id.clone()),
        ) else {
            return false;
        };
        symbol
            .set(wix_search::ELEMENT_NAME, search.element_name.clone())
            .set(wix_search::VARIABLE, search.variable.clone())
            .set(wix_search::CONDITION, search.condition.clone())
            .set(wix_search::BUNDLE_EXTENSION_REF, search.extension_id.clone());
        debug!(
            search = search.id.id(),
            element = search.element_name.as_str(),
            variable = search.variable.as_str();
            "Created search"
        );

        if let Some(after) = search.after.as_deref() {
            self.create_simple_reference(section, location, wix_search::TABLE, &[after]);
            self.create_search_relation_symbol(
                section,
                location,
                &search.id,
                after,
                SearchRelationFlags::AFTER,
            );
        }

        if let Some(extension_id) = search.extension_id.as_deref() {
            self.create_simple_reference(
                section,
                location,
                wix_bundle_extension::TABLE,
                &[extension_id],
            );
        }

        true
    }

    /// Records that search `id` is ordered relative to `parent_id`.
    ///
    /// A relation from a search to itself is rejected with an error and no
    /// edge is recorded. Longer cycles are not detected here; see
    /// [`SearchGraph::evaluation_order`](crate::views::SearchGraph::evaluation_order).
    ///
    /// Returns `true` when the edge was recorded.
    pub fn create_search_relation_symbol(
        &mut self,
        section: &mut Section,
        location: &SourceLineNumber,
        id: &Identifier,
        parent_id: &str,
        flags: SearchRelationFlags,
    ) -> bool {
        if id.id() == parent_id {
            self.emit(
                Diagnostic::error(format!(
                    "the search `{parent_id}` cannot be ordered after itself"
                ))
                .with_code(ErrorCode::E102)
                .with_label(location.clone(), "self-referencing search")
                .with_help("order the search after a different search, or remove the relation"),
            );
            return false;
        }

        let Some(symbol) = self.create_symbol(
            section,
            location,
            wix_search_relation::definition(),
            Some(id.clone()),
        ) else {
            return false;
        };
        debug!(
            search = id.id(),
            parent = parent_id,
            flags = flags.bits();
            "Created search relation"
        );
        symbol
            .set(wix_search_relation::PARENT_SEARCH_REF, parent_id.to_string())
            .set(wix_search_relation::ATTRIBUTES, i64::from(flags.bits()));
        true
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::symbol::definitions::wix_simple_reference;

    use super::*;

    fn here() -> SourceLineNumber {
        SourceLineNumber::new("bundle.wxs", 30)
    }

    #[test]
    fn test_self_relation_rejected() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Bundle", None);
        let id = Identifier::private("A");

        let recorded = analyzer.create_search_relation_symbol(
            &mut section,
            &here(),
            &id,
            "A",
            SearchRelationFlags::AFTER,
        );

        assert!(!recorded);
        assert!(section.is_empty());
        let diagnostic = &analyzer.diagnostics()[0];
        assert_eq!(diagnostic.code(), Some(ErrorCode::E102));
        assert_eq!(diagnostic.location(), Some(&here()));
    }

    #[test]
    fn test_search_after_predecessor() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Bundle", None);

        analyzer.create_search_symbol(
            &mut section,
            &here(),
            &SearchEntry::new("FileSearch", Identifier::private("B"), "BVersion").after("A"),
        );

        let relation = section
            .find(wix_search_relation::TABLE, "B")
            .expect("relation row");
        assert_eq!(relation.string(wix_search_relation::PARENT_SEARCH_REF), Some("A"));
        assert_eq!(
            relation.number(wix_search_relation::ATTRIBUTES),
            Some(i64::from(SearchRelationFlags::AFTER.bits()))
        );

        let reference = section
            .symbols_of(wix_simple_reference::TABLE)
            .next()
            .expect("predecessor reference");
        assert_eq!(reference.string(wix_simple_reference::TABLE_NAME), Some(wix_search::TABLE));

        let search = section.find(wix_search::TABLE, "B").expect("search row");
        assert_eq!(search.string(wix_search::VARIABLE), Some("BVersion"));
    }

    #[test]
    fn test_search_self_after_keeps_entry() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Bundle", None);

        analyzer.create_search_symbol(
            &mut section,
            &here(),
            &SearchEntry::new("FileSearch", Identifier::private("A"), "AVersion").after("A"),
        );

        assert!(section.find(wix_search::TABLE, "A").is_some());
        assert_eq!(section.symbols_of(wix_search_relation::TABLE).count(), 0);
        assert!(analyzer.has_errors());
    }

    #[test]
    fn test_duplicate_search_records_nothing() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Bundle", None);
        let entry = |id: &str| SearchEntry::new("FileSearch", Identifier::private(id), "Found");

        assert!(analyzer.create_search_symbol(&mut section, &here(), &entry("A")));
        assert!(analyzer.create_search_symbol(&mut section, &here(), &entry("B")));
        assert!(!analyzer.create_search_symbol(
            &mut section,
            &here(),
            &entry("B").after("A").with_extension("MyExtension")
        ));

        assert_eq!(section.symbols_of(wix_search::TABLE).count(), 2);
        assert_eq!(section.symbols_of(wix_search_relation::TABLE).count(), 0);
        assert_eq!(section.symbols_of(wix_simple_reference::TABLE).count(), 0);
        assert!(
            crate::views::SearchGraph::from_section(&section)
                .parents_of("B")
                .is_empty()
        );

        let codes: Vec<_> = analyzer.diagnostics().iter().map(|d| d.code()).collect();
        assert_eq!(codes, [Some(ErrorCode::E100)]);
    }

    #[test]
    fn test_relation_flag_values() {
        assert_eq!(SearchRelationFlags::DEPENDENCY.bits(), 1);
        assert_eq!(SearchRelationFlags::AFTER.bits(), 2);
    }

    #[test]
    fn test_search_extension_reference() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Bundle", None);

        analyzer.create_search_symbol(
            &mut section,
            &here(),
            &SearchEntry::new("CustomSearch", Identifier::private("Ext"), "Found")
                .with_extension("MyExtension"),
        );

        let reference = section
            .symbols_of(wix_simple_reference::TABLE)
            .next()
            .expect("extension reference");
        assert_eq!(
            reference.string(wix_simple_reference::TABLE_NAME),
            Some(wix_bundle_extension::TABLE)
        );
        let search = section.find(wix_search::TABLE, "Ext").expect("search row");
        assert_eq!(search.string(wix_search::BUNDLE_EXTENSION_REF), Some("MyExtension"));
    }

    #[test]
    fn test_flags() {
        let both = SearchRelationFlags::AFTER | SearchRelationFlags::DEPENDENCY;
        assert!(both.contains(SearchRelationFlags::AFTER));
        assert!(both.contains(SearchRelationFlags::DEPENDENCY));
        assert!(!SearchRelationFlags::NONE.contains(SearchRelationFlags::AFTER));
        assert_eq!(SearchRelationFlags::from_bits(both.bits()), both);
    }
}
