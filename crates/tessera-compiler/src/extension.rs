//! The contract between the analyzer and compiler extensions.
//!
//! Extensions claim attributes and elements the core language does not
//! recognize. The analyzer offers each construct to the registered extensions
//! of its namespace in registration order and stops at the first claim; see
//! [`Analyzer::parse_extension_attribute`] and friends.

use indexmap::IndexMap;

use tessera_core::{
    section::{Intermediate, Section},
    xml::{XmlAttribute, XmlElement},
};

use crate::Analyzer;

/// Caller-supplied facts about the enclosing construct, such as the id of
/// the component being parsed.
pub type ParseContext = IndexMap<String, String>;

/// An extension's answer to an offered construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim<T> {
    /// Not handled; the next extension is asked.
    Declined,

    /// Handled; dispatch stops.
    Claimed(T),
}

impl<T> Claim<T> {
    pub fn is_claimed(&self) -> bool {
        matches!(self, Self::Claimed(_))
    }
}

/// What a component's key path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPathKind {
    File,
    Directory,
    Registry,
}

/// A key path contributed by an extension element.
///
/// The caller merges it into the enclosing component, which has at most one
/// key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentKeyPath {
    id: String,
    kind: KeyPathKind,
    explicit: bool,
}

impl ComponentKeyPath {
    /// Creates a key path. `explicit` marks a key path the author asked for,
    /// which wins over implicit candidates.
    pub fn new(id: impl Into<String>, kind: KeyPathKind, explicit: bool) -> Self {
        Self {
            id: id.into(),
            kind,
            explicit,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> KeyPathKind {
        self.kind
    }

    pub fn is_explicit(&self) -> bool {
        self.explicit
    }
}

/// A plugin that parses constructs of one XML namespace.
///
/// Every hook declines by default, so an extension implements only what it
/// handles. Hooks report problems through the analyzer and add their symbols
/// to the section like the core builders do.
pub trait CompilerExtension {
    /// The XML namespace this extension owns.
    fn namespace(&self) -> &str;

    fn try_parse_attribute(
        &mut self,
        _analyzer: &mut Analyzer,
        _intermediate: &Intermediate,
        _section: &mut Section,
        _element: &XmlElement,
        _attribute: &XmlAttribute,
        _context: &ParseContext,
    ) -> Claim<()> {
        Claim::Declined
    }

    fn try_parse_element(
        &mut self,
        _analyzer: &mut Analyzer,
        _intermediate: &Intermediate,
        _section: &mut Section,
        _parent: &XmlElement,
        _element: &XmlElement,
        _context: &ParseContext,
    ) -> Claim<()> {
        Claim::Declined
    }

    /// Like [`try_parse_element`](Self::try_parse_element), for elements
    /// nested in a component that may supply its key path.
    fn try_parse_key_path_element(
        &mut self,
        _analyzer: &mut Analyzer,
        _intermediate: &Intermediate,
        _section: &mut Section,
        _parent: &XmlElement,
        _element: &XmlElement,
        _context: &ParseContext,
    ) -> Claim<Option<ComponentKeyPath>> {
        Claim::Declined
    }
}
