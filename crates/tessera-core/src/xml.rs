//! The element/attribute tree consumed from the XML front end.
//!
//! The front end tokenizes and validates source documents; the analysis layer
//! only needs names, attribute text, inner text, children and the location of
//! each element. Attributes remember the name of the element that owns them so
//! diagnostics about an attribute can name its element.

use std::fmt;

use crate::location::SourceLineNumber;

/// A namespace-qualified XML name.
///
/// # Examples
///
/// ```
/// use tessera_core::xml::QualifiedName;
///
/// let plain = QualifiedName::from("Component");
/// assert_eq!(plain.namespace(), None);
///
/// let ext = QualifiedName::with_namespace("http://example.com/util", "User");
/// assert_eq!(ext.local_name(), "User");
/// assert_eq!(ext.to_string(), "{http://example.com/util}User");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    namespace: Option<String>,
    local: String,
}

impl QualifiedName {
    /// Creates a name without a namespace.
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// Creates a name inside a namespace.
    pub fn with_namespace(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    /// Returns the namespace URI, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the local part of the name.
    pub fn local_name(&self) -> &str {
        &self.local
    }
}

impl From<&str> for QualifiedName {
    fn from(local: &str) -> Self {
        Self::new(local)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// An attribute together with the name of its owning element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    element: QualifiedName,
    name: QualifiedName,
    value: String,
}

impl XmlAttribute {
    /// Creates an attribute owned by the element named `element`.
    pub fn new(
        element: impl Into<QualifiedName>,
        name: impl Into<QualifiedName>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            element: element.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the owning element's name.
    pub fn element_name(&self) -> &QualifiedName {
        &self.element
    }

    /// Returns the attribute name.
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Returns the raw attribute text.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An element with its attributes, children and location.
///
/// # Examples
///
/// ```
/// use tessera_core::{location::SourceLineNumber, xml::XmlElement};
///
/// let element = XmlElement::new("Directory", SourceLineNumber::new("product.wxs", 3))
///     .with_attribute("Id", "INSTALLFOLDER")
///     .with_child(XmlElement::new("Component", SourceLineNumber::new("product.wxs", 4)));
///
/// assert_eq!(element.attribute("Id").map(|a| a.value()), Some("INSTALLFOLDER"));
/// assert_eq!(element.attributes()[0].element_name().local_name(), "Directory");
/// assert_eq!(element.children().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: QualifiedName,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlElement>,
    text: Option<String>,
    location: SourceLineNumber,
}

impl XmlElement {
    /// Creates an element with no attributes, children or text.
    pub fn new(name: impl Into<QualifiedName>, location: SourceLineNumber) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
            location,
        }
    }

    /// Appends an attribute; its owning element is set to this element.
    pub fn with_attribute(
        mut self,
        name: impl Into<QualifiedName>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes
            .push(XmlAttribute::new(self.name.clone(), name, value));
        self
    }

    /// Appends a child element.
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the inner text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Returns the element name.
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    /// Returns the attributes in document order.
    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Finds a namespace-less attribute by local name.
    pub fn attribute(&self, local_name: &str) -> Option<&XmlAttribute> {
        self.attributes
            .iter()
            .find(|a| a.name.namespace.is_none() && a.name.local == local_name)
    }

    /// Returns the child elements in document order.
    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Returns the inner text, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the element's source location.
    pub fn location(&self) -> &SourceLineNumber {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_lookup_ignores_namespaced() {
        let element = XmlElement::new("File", SourceLineNumber::new("a.wxs", 1))
            .with_attribute(QualifiedName::with_namespace("urn:ext", "Id"), "ext")
            .with_attribute("Id", "core");

        assert_eq!(element.attribute("Id").map(|a| a.value()), Some("core"));
        assert_eq!(element.attributes().len(), 2);
    }

    #[test]
    fn test_text() {
        let element = XmlElement::new("Condition", SourceLineNumber::file_only("a.wxs"))
            .with_text(" VersionNT ");
        assert_eq!(element.text(), Some(" VersionNT "));
    }
}
