//! Symbol identifiers with access scoping.
//!
//! This module provides the [`Identifier`] type that keys a symbol inside its
//! section, together with the [`AccessModifier`] that controls how far the
//! identifier is visible once sections are linked together.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value carried by the placeholder identifier returned for invalid input.
///
/// It deliberately violates the identifier grammar so it can never collide
/// with an identifier written by an author.
const INVALID_IDENTIFIER_VALUE: &str = "!InvalidIdentifier";

/// Visibility of an identifier across linked sections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessModifier {
    /// Visible everywhere, including across package boundaries.
    Global,

    /// Visible to every section of the same library or package.
    Public,

    /// Visible only inside the section that declares it.
    #[default]
    Private,
}

impl AccessModifier {
    /// Resolves an access keyword written in front of an identifier value.
    ///
    /// Accepts the modern keywords and the legacy aliases:
    ///
    /// * `global`, `package` map to [`AccessModifier::Global`]
    /// * `public`, `internal`, `library` map to [`AccessModifier::Public`]
    /// * `private`, `protected`, `file`, `fragment`, `section` map to [`AccessModifier::Private`]
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::identifier::AccessModifier;
    ///
    /// assert_eq!(AccessModifier::from_keyword("package"), Some(AccessModifier::Global));
    /// assert_eq!(AccessModifier::from_keyword("fragment"), Some(AccessModifier::Private));
    /// assert_eq!(AccessModifier::from_keyword("nope"), None);
    /// ```
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "global" | "package" => Some(Self::Global),
            "public" | "internal" | "library" => Some(Self::Public),
            "private" | "protected" | "file" | "fragment" | "section" => Some(Self::Private),
            _ => None,
        }
    }

    /// Returns the canonical keyword for this modifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A symbol identifier: an access modifier plus a value unique in its section.
///
/// Identifiers are immutable once created. Two identifiers compare equal only
/// when both the access modifier and the value match; sections key their
/// symbols by value alone.
///
/// # Examples
///
/// ```
/// use tessera_core::identifier::{AccessModifier, Identifier};
///
/// let id = Identifier::new(AccessModifier::Public, "MainComponent");
/// assert_eq!(id.id(), "MainComponent");
/// assert_eq!(id, "MainComponent");
/// assert_eq!(id.access(), AccessModifier::Public);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    access: AccessModifier,
    id: String,
}

impl Identifier {
    /// Creates an identifier with an explicit access modifier.
    pub fn new(access: AccessModifier, id: impl Into<String>) -> Self {
        Self {
            access,
            id: id.into(),
        }
    }

    /// Creates a section-private identifier.
    pub fn private(id: impl Into<String>) -> Self {
        Self::new(AccessModifier::Private, id)
    }

    /// Creates the placeholder identifier returned when author input is invalid.
    ///
    /// # Examples
    ///
    /// ```
    /// use tessera_core::identifier::Identifier;
    ///
    /// let placeholder = Identifier::invalid();
    /// assert!(placeholder.is_invalid());
    /// assert!(!Identifier::private("Valid").is_invalid());
    /// ```
    pub fn invalid() -> Self {
        Self::private(INVALID_IDENTIFIER_VALUE)
    }

    /// Returns `true` if this is the placeholder created by [`Identifier::invalid`].
    pub fn is_invalid(&self) -> bool {
        self.id == INVALID_IDENTIFIER_VALUE
    }

    /// Returns the access modifier.
    pub fn access(&self) -> AccessModifier {
        self.access
    }

    /// Returns the identifier value.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Consumes the identifier and returns its value.
    pub fn into_id(self) -> String {
        self.id
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl From<&str> for Identifier {
    /// Creates a section-private identifier from a string slice.
    fn from(id: &str) -> Self {
        Self::private(id)
    }
}

impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.id == other
    }
}

impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.id == *other
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_new() {
        let id1 = Identifier::new(AccessModifier::Global, "ProductFeature");
        let id2 = Identifier::new(AccessModifier::Global, "ProductFeature");
        let id3 = Identifier::new(AccessModifier::Private, "ProductFeature");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "ProductFeature");
    }

    #[test]
    fn test_default_access_is_private() {
        assert_eq!(AccessModifier::default(), AccessModifier::Private);
        assert_eq!(Identifier::from("Foo").access(), AccessModifier::Private);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            AccessModifier::from_keyword("global"),
            Some(AccessModifier::Global)
        );
        assert_eq!(
            AccessModifier::from_keyword("library"),
            Some(AccessModifier::Public)
        );
        assert_eq!(
            AccessModifier::from_keyword("protected"),
            Some(AccessModifier::Private)
        );
        assert_eq!(AccessModifier::from_keyword("Global"), None);
    }

    #[test]
    fn test_invalid_placeholder() {
        let placeholder = Identifier::invalid();
        assert!(placeholder.is_invalid());
        assert_eq!(placeholder.access(), AccessModifier::Private);
    }

    #[test]
    fn test_display_trait() {
        let id = Identifier::new(AccessModifier::Public, "INSTALLFOLDER");
        assert_eq!(format!("{id}"), "INSTALLFOLDER");
        assert_eq!(AccessModifier::Public.to_string(), "public");
    }

    #[test]
    fn test_hash_and_eq() {
        let id1 = Identifier::private("key1");
        let id2 = Identifier::private("key1");
        let id3 = Identifier::private("key2");

        let mut map = HashMap::new();
        map.insert(id1, "value1");
        map.insert(id3, "value2");

        assert_eq!(map.get(&id2), Some(&"value1"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_into_id() {
        let id = Identifier::private("TARGETDIR");
        assert_eq!(id.into_id(), "TARGETDIR");
    }
}
