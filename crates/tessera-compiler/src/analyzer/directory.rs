//! Directory symbols and the inline `Parent:\A\B` directory syntax.

use indexmap::IndexMap;
use log::{debug, trace};

use tessera_core::{
    identifier::Identifier,
    location::SourceLineNumber,
    section::Section,
    symbol::definitions::directory,
    xml::XmlAttribute,
};

use crate::{
    analyzer::{Analyzer, Coerced, EmptyRule, attribute_path},
    error::{Diagnostic, ErrorCode},
    identifiers::{generate_identifier, generate_short_name},
    validate,
};

/// Names of one directory.
///
/// Missing short names are synthesized when the long name is not already a
/// legal 8.3 name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryNames {
    name: Option<String>,
    short_name: Option<String>,
    source_name: Option<String>,
    short_source_name: Option<String>,
}

impl DirectoryNames {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    pub fn with_source_name(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self
    }

    pub fn with_short_source_name(mut self, short_source_name: impl Into<String>) -> Self {
        self.short_source_name = Some(short_source_name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn short_name(&self) -> Option<&str> {
        self.short_name.as_deref()
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source_name.as_deref()
    }

    pub fn short_source_name(&self) -> Option<&str> {
        self.short_source_name.as_deref()
    }
}

/// Directory chains already created from inline syntax in one section.
///
/// Keys are canonical path prefixes (`Parent:\A\B`); values are the
/// identifier of the prefix's last directory. A cache belongs to exactly one
/// section build.
#[derive(Debug, Clone, Default)]
pub struct InlineDirectoryCache {
    ids: IndexMap<String, String>,
}

impl InlineDirectoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the directory identifier cached for a canonical path prefix.
    pub fn get(&self, path: &str) -> Option<&str> {
        self.ids.get(path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Synthesizes a short name when `name` cannot serve as one.
fn short_name_for(name: &str, parent_id: Option<&str>) -> Option<String> {
    if validate::is_valid_short_filename(name, false) || validate::is_valid_loc_identifier(name) {
        return None;
    }
    Some(generate_short_name(
        name,
        false,
        false,
        ["Directory", parent_id.unwrap_or_default()],
    ))
}

impl Analyzer {
    /// Creates a directory symbol and returns its identifier.
    ///
    /// Without `id`, the identifier is derived from the parent and the names.
    /// The identifier is returned even when the symbol could not be added,
    /// so callers can keep wiring children to it.
    pub fn create_directory_symbol(
        &mut self,
        section: &mut Section,
        location: &SourceLineNumber,
        id: Option<Identifier>,
        parent_id: Option<&str>,
        names: &DirectoryNames,
    ) -> Identifier {
        let mut short_name = names.short_name.clone();
        if short_name.is_none() {
            short_name = names
                .name
                .as_deref()
                .and_then(|name| short_name_for(name, parent_id));
        }

        let mut short_source_name = names.short_source_name.clone();
        if short_source_name.is_none() {
            short_source_name = names
                .source_name
                .as_deref()
                .and_then(|name| short_name_for(name, parent_id));
        }

        let id = id.unwrap_or_else(|| {
            generate_identifier(
                "d",
                [
                    parent_id.unwrap_or_default(),
                    names.name.as_deref().unwrap_or_default(),
                    short_name.as_deref().unwrap_or_default(),
                    names.source_name.as_deref().unwrap_or_default(),
                    short_source_name.as_deref().unwrap_or_default(),
                ],
            )
        });

        if let Some(symbol) =
            self.create_symbol(section, location, directory::definition(), Some(id.clone()))
        {
            symbol
                .set(directory::PARENT_DIRECTORY_REF, parent_id.map(str::to_string))
                .set(directory::NAME, names.name.clone())
                .set(directory::SHORT_NAME, short_name)
                .set(directory::SOURCE_NAME, names.source_name.clone())
                .set(directory::SOURCE_SHORT_NAME, short_source_name);
        }
        id
    }

    /// Resolves inline directory syntax to the identifier of its last
    /// directory, creating the directories that do not exist yet.
    ///
    /// The syntax is `inline_syntax`, or the attribute's value when
    /// `inline_syntax` is empty. Segments are separated by `\` or `/`. A first
    /// segment ending in `:` names the parent directory explicitly; otherwise
    /// the parent is `parent_id` or, when that is absent, the first segment.
    /// A parent taken from the syntax gets a simple reference.
    ///
    /// Returns `None` after reporting an error for malformed syntax.
    pub fn create_directory_reference_from_inline_syntax(
        &mut self,
        section: &mut Section,
        location: &SourceLineNumber,
        attribute: Option<&XmlAttribute>,
        parent_id: Option<&str>,
        inline_syntax: &str,
        cache: &mut InlineDirectoryCache,
    ) -> Option<String> {
        let syntax = if inline_syntax.is_empty() {
            match attribute {
                Some(attribute) => {
                    match self.attribute_value(location, attribute, EmptyRule::DisallowEmpty) {
                        Coerced::Valid(value) => value,
                        Coerced::Sentinel(_) => return None,
                    }
                }
                None => String::new(),
            }
        } else {
            inline_syntax.to_string()
        };

        let subject = attribute.map_or_else(|| "inline directory".to_string(), attribute_path);
        let trimmed = syntax.trim_end_matches(['\\', '/']);
        if trimmed.is_empty() {
            self.illegal_inline_syntax(location, &subject, &syntax, "empty directory path");
            return None;
        }

        let mut segments: Vec<&str> = trimmed.split(['\\', '/']).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            self.illegal_inline_syntax(location, &subject, &syntax, "empty path segment");
            return None;
        }

        let explicit_parent = segments[0].strip_suffix(':');
        let (root, referenced) = match (explicit_parent, parent_id) {
            (Some(parent), _) => {
                segments.remove(0);
                (parent.to_string(), true)
            }
            (None, Some(parent)) => (parent.to_string(), false),
            (None, None) => (segments.remove(0).to_string(), true),
        };

        if !validate::is_valid_identifier(&root) {
            self.illegal_inline_syntax(
                location,
                &subject,
                &syntax,
                "parent is not a directory identifier",
            );
            return None;
        }

        let mut key = format!("{root}:");
        if referenced && cache.get(&key).is_none() {
            self.create_simple_reference(section, location, directory::TABLE, &[&root]);
            cache.ids.insert(key.clone(), root.clone());
        }

        let mut current = root;
        for segment in segments {
            key.push('\\');
            key.push_str(segment);

            if let Some(id) = cache.get(&key) {
                trace!(path = key.as_str(), id; "Inline directory cache hit");
                current = id.to_string();
                continue;
            }

            if !validate::is_valid_long_filename(segment, false, false) {
                self.emit(
                    Diagnostic::error(format!(
                        "the {subject} `{syntax}` contains the illegal directory name `{segment}`"
                    ))
                    .with_code(ErrorCode::E007)
                    .with_label(location.clone(), "illegal directory name"),
                );
                return None;
            }

            let id = self
                .create_directory_symbol(
                    section,
                    location,
                    None,
                    Some(&current),
                    &DirectoryNames::new(segment),
                )
                .into_id();
            debug!(path = key.as_str(), id = id.as_str(); "Created inline directory");
            cache.ids.insert(key.clone(), id.clone());
            current = id;
        }

        Some(current)
    }

    fn illegal_inline_syntax(
        &mut self,
        location: &SourceLineNumber,
        subject: &str,
        syntax: &str,
        label: &str,
    ) {
        self.emit(
            Diagnostic::error(format!(
                "the {subject} `{syntax}` is not legal inline directory syntax"
            ))
                .with_code(ErrorCode::E014)
                .with_label(location.clone(), label)
                .with_help("use `Parent:\\Child\\Grandchild` or `Child\\Grandchild`"),
        );
    }
}

#[cfg(test)]
mod tests {
    use tessera_core::symbol::definitions::wix_simple_reference;

    use super::*;

    fn here() -> SourceLineNumber {
        SourceLineNumber::new("product.wxs", 14)
    }

    fn directories(section: &Section) -> usize {
        section.symbols_of(directory::TABLE).count()
    }

    #[test]
    fn test_directory_symbol_with_explicit_id() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Product", None);

        let id = analyzer.create_directory_symbol(
            &mut section,
            &here(),
            Some(Identifier::private("INSTALLFOLDER")),
            Some("ProgramFilesFolder"),
            &DirectoryNames::new("Acme Application"),
        );
        assert_eq!(id, "INSTALLFOLDER");

        let row = section.find(directory::TABLE, "INSTALLFOLDER").expect("directory row");
        assert_eq!(row.string(directory::PARENT_DIRECTORY_REF), Some("ProgramFilesFolder"));
        assert_eq!(row.string(directory::NAME), Some("Acme Application"));
        let short = row.string(directory::SHORT_NAME).expect("synthesized short name");
        assert!(validate::is_valid_short_filename(short, false));
    }

    #[test]
    fn test_directory_symbol_keeps_legal_short_names() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Product", None);

        let id = analyzer.create_directory_symbol(
            &mut section,
            &here(),
            None,
            Some("TARGETDIR"),
            &DirectoryNames::new("bin").with_source_name("Binaries Folder"),
        );
        assert!(id.id().starts_with('d'));

        let row = section.find(directory::TABLE, id.id()).expect("directory row");
        assert_eq!(row.string(directory::SHORT_NAME), None);
        assert!(row.string(directory::SOURCE_SHORT_NAME).is_some());
    }

    #[test]
    fn test_directory_duplicate_still_returns_id() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Product", None);
        let names = DirectoryNames::new("bin");

        let parent = Some("TARGETDIR");
        let first = analyzer.create_directory_symbol(&mut section, &here(), None, parent, &names);
        let second = analyzer.create_directory_symbol(&mut section, &here(), None, parent, &names);

        assert_eq!(first, second);
        assert_eq!(directories(&section), 1);
        assert_eq!(analyzer.diagnostics()[0].code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_inline_syntax_uses_cache() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Product", None);
        let mut cache = InlineDirectoryCache::new();

        let first = analyzer.create_directory_reference_from_inline_syntax(
            &mut section,
            &here(),
            None,
            None,
            "ProgramFilesFolder\\Vendor\\App",
            &mut cache,
        );
        let second = analyzer.create_directory_reference_from_inline_syntax(
            &mut section,
            &here(),
            None,
            None,
            "ProgramFilesFolder\\Vendor\\App",
            &mut cache,
        );

        assert!(first.is_some());
        assert_eq!(first, second);
        assert_eq!(directories(&section), 2);
        assert_eq!(section.symbols_of(wix_simple_reference::TABLE).count(), 1);
        assert!(analyzer.diagnostics().is_empty());
    }

    #[test]
    fn test_inline_syntax_shares_prefixes() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Product", None);
        let mut cache = InlineDirectoryCache::new();

        let app = analyzer
            .create_directory_reference_from_inline_syntax(
                &mut section,
                &here(),
                None,
                Some("INSTALLFOLDER"),
                "Vendor/App",
                &mut cache,
            )
            .expect("app");
        let tools = analyzer
            .create_directory_reference_from_inline_syntax(
                &mut section,
                &here(),
                None,
                Some("INSTALLFOLDER"),
                "Vendor/Tools/",
                &mut cache,
            )
            .expect("tools");

        assert_ne!(app, tools);
        assert_eq!(directories(&section), 3);
        assert_eq!(section.symbols_of(wix_simple_reference::TABLE).count(), 0);

        let vendor = cache.get("INSTALLFOLDER:\\Vendor").expect("cached prefix");
        let tools_row = section.find(directory::TABLE, &tools).expect("tools row");
        assert_eq!(tools_row.string(directory::PARENT_DIRECTORY_REF), Some(vendor));
    }

    #[test]
    fn test_inline_syntax_explicit_parent_wins() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Product", None);
        let mut cache = InlineDirectoryCache::new();

        let id = analyzer
            .create_directory_reference_from_inline_syntax(
                &mut section,
                &here(),
                None,
                Some("INSTALLFOLDER"),
                "CommonAppDataFolder:\\Vendor",
                &mut cache,
            )
            .expect("leaf");

        let row = section.find(directory::TABLE, &id).expect("leaf row");
        assert_eq!(row.string(directory::PARENT_DIRECTORY_REF), Some("CommonAppDataFolder"));
        let reference = section
            .symbols_of(wix_simple_reference::TABLE)
            .next()
            .expect("parent reference");
        assert_eq!(
            reference.string(wix_simple_reference::PRIMARY_KEYS),
            Some("CommonAppDataFolder")
        );
    }

    #[test]
    fn test_inline_syntax_from_attribute() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Product", None);
        let mut cache = InlineDirectoryCache::new();
        let attribute = XmlAttribute::new("Component", "Subdirectory", "logs");

        let id = analyzer.create_directory_reference_from_inline_syntax(
            &mut section,
            &here(),
            Some(&attribute),
            Some("INSTALLFOLDER"),
            "",
            &mut cache,
        );
        assert!(id.is_some());
        assert_eq!(directories(&section), 1);
    }

    #[test]
    fn test_inline_syntax_errors() {
        let mut analyzer = Analyzer::default();
        let mut section = Section::new("Product", None);
        let mut cache = InlineDirectoryCache::new();

        for syntax in ["A\\\\B", "\\", "1Root:\\B"] {
            assert!(
                analyzer
                    .create_directory_reference_from_inline_syntax(
                        &mut section,
                        &here(),
                        None,
                        None,
                        syntax,
                        &mut cache,
                    )
                    .is_none()
            );
        }
        assert!(
            analyzer
                .create_directory_reference_from_inline_syntax(
                    &mut section,
                    &here(),
                    None,
                    Some("INSTALLFOLDER"),
                    "bad|name",
                    &mut cache,
                )
                .is_none()
        );

        let codes: Vec<_> = analyzer.diagnostics().iter().filter_map(|d| d.code()).collect();
        assert_eq!(
            codes,
            [ErrorCode::E014, ErrorCode::E014, ErrorCode::E014, ErrorCode::E007]
        );
        assert_eq!(directories(&section), 0);
    }
}
