//! Routing unrecognized constructs to extensions.

use std::sync::LazyLock;

use log::{debug, trace};

use tessera_core::{
    section::{Intermediate, Section},
    xml::{QualifiedName, XmlAttribute, XmlElement},
};

use crate::{
    analyzer::Analyzer,
    error::{Diagnostic, ErrorCode},
    extension::{Claim, CompilerExtension, ComponentKeyPath, ParseContext},
};

const W3C_NAMESPACE_PREFIX: &str = "http://www.w3.org/";

static EMPTY_CONTEXT: LazyLock<ParseContext> = LazyLock::new(ParseContext::new);

/// Returns `true` for namespace declarations and attributes in a W3C
/// namespace, which are never author data.
fn is_ignorable_attribute(name: &QualifiedName) -> bool {
    match name.namespace() {
        Some(namespace) => namespace.starts_with(W3C_NAMESPACE_PREFIX),
        None => name.local_name() == "xmlns" || name.local_name().starts_with("xmlns:"),
    }
}

/// The extensions registered for `namespace`, in registration order.
fn extensions_for<'a>(
    extensions: &'a mut [Box<dyn CompilerExtension>],
    namespace: Option<&'a str>,
) -> impl Iterator<Item = &'a mut Box<dyn CompilerExtension>> + 'a {
    extensions
        .iter_mut()
        .filter(move |extension| namespace == Some(extension.namespace()))
}

impl Analyzer {
    /// Offers an attribute to the extensions of its namespace.
    ///
    /// An attribute no extension claims is reported as unexpected.
    /// Namespace declarations and W3C attributes are skipped.
    pub fn parse_extension_attribute(
        &mut self,
        extensions: &mut [Box<dyn CompilerExtension>],
        intermediate: &Intermediate,
        section: &mut Section,
        element: &XmlElement,
        attribute: &XmlAttribute,
        context: Option<&ParseContext>,
    ) {
        if is_ignorable_attribute(attribute.name()) {
            return;
        }

        let context = context.unwrap_or(&EMPTY_CONTEXT);
        let namespace = attribute.name().namespace();
        for extension in extensions_for(extensions, namespace) {
            if extension
                .try_parse_attribute(self, intermediate, section, element, attribute, context)
                .is_claimed()
            {
                trace!(
                    attribute:% = attribute.name(),
                    extension = extension.namespace();
                    "Extension claimed attribute"
                );
                return;
            }
        }

        self.unexpected_attribute(element, attribute);
    }

    /// Offers an element to the extensions of its namespace.
    ///
    /// An element no extension claims is reported as unhandled.
    pub fn parse_extension_element(
        &mut self,
        extensions: &mut [Box<dyn CompilerExtension>],
        intermediate: &Intermediate,
        section: &mut Section,
        parent: &XmlElement,
        element: &XmlElement,
        context: Option<&ParseContext>,
    ) {
        let context = context.unwrap_or(&EMPTY_CONTEXT);
        let namespace = element.name().namespace();
        for extension in extensions_for(extensions, namespace) {
            if extension
                .try_parse_element(self, intermediate, section, parent, element, context)
                .is_claimed()
            {
                trace!(
                    element:% = element.name(),
                    extension = extension.namespace();
                    "Extension claimed element"
                );
                return;
            }
        }

        self.unhandled_extension_element(parent, element);
    }

    /// Offers an element nested in a component to the extensions of its
    /// namespace and returns the key path the claiming extension supplied.
    pub fn parse_possible_key_path_extension_element(
        &mut self,
        extensions: &mut [Box<dyn CompilerExtension>],
        intermediate: &Intermediate,
        section: &mut Section,
        parent: &XmlElement,
        element: &XmlElement,
        context: Option<&ParseContext>,
    ) -> Option<ComponentKeyPath> {
        let context = context.unwrap_or(&EMPTY_CONTEXT);
        let namespace = element.name().namespace();
        for extension in extensions_for(extensions, namespace) {
            if let Claim::Claimed(key_path) = extension
                .try_parse_key_path_element(self, intermediate, section, parent, element, context)
            {
                debug!(
                    element:% = element.name(),
                    key_path:? = key_path.as_ref().map(ComponentKeyPath::id);
                    "Extension claimed key path element"
                );
                return key_path;
            }
        }

        self.unhandled_extension_element(parent, element);
        None
    }

    /// Dispatches every child of `element` to extensions.
    ///
    /// Children in the element's own namespace are core constructs nobody
    /// consumed and are reported as unexpected.
    pub fn parse_for_extension_elements(
        &mut self,
        extensions: &mut [Box<dyn CompilerExtension>],
        intermediate: &Intermediate,
        section: &mut Section,
        element: &XmlElement,
        context: Option<&ParseContext>,
    ) {
        for child in element.children() {
            if child.name().namespace() == element.name().namespace() {
                self.unexpected_element(element, child);
            } else {
                self.parse_extension_element(
                    extensions,
                    intermediate,
                    section,
                    element,
                    child,
                    context,
                );
            }
        }
    }

    /// Reports an attribute that nothing consumed, at its element's location.
    pub fn unexpected_attribute(&mut self, element: &XmlElement, attribute: &XmlAttribute) {
        if is_ignorable_attribute(attribute.name()) {
            return;
        }
        self.emit(
            Diagnostic::error(format!(
                "the `{}` element contains an unexpected attribute `{}`",
                element.name(),
                attribute.name()
            ))
            .with_code(ErrorCode::E200)
            .with_label(element.location().clone(), "unexpected attribute"),
        );
    }

    /// Reports a child element that nothing consumed, at the child's location.
    pub fn unexpected_element(&mut self, parent: &XmlElement, child: &XmlElement) {
        self.emit(
            Diagnostic::error(format!(
                "the `{}` element contains an unexpected child element `{}`",
                parent.name(),
                child.name()
            ))
            .with_code(ErrorCode::E201)
            .with_label(child.location().clone(), "unexpected element"),
        );
    }

    fn unhandled_extension_element(&mut self, parent: &XmlElement, element: &XmlElement) {
        let help = match element.name().namespace() {
            Some(namespace) => format!("register an extension for the namespace `{namespace}`"),
            None => "core elements are not handled by extensions".to_string(),
        };
        self.emit(
            Diagnostic::error(format!(
                "the `{}` element contains an extension element `{}` that no extension handled",
                parent.name(),
                element.name()
            ))
            .with_code(ErrorCode::E202)
            .with_label(element.location().clone(), "unhandled extension element")
            .with_help(help),
        );
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use tessera_core::{
        identifier::Identifier, location::SourceLineNumber, symbol::definitions::property,
    };

    use super::*;
    use crate::extension::KeyPathKind;

    const UTIL: &str = "http://example.com/schemas/util";

    /// Claims `util:Flag` attributes and `util:User` elements.
    struct UtilExtension;

    impl CompilerExtension for UtilExtension {
        fn namespace(&self) -> &str {
            UTIL
        }

        fn try_parse_attribute(
            &mut self,
            _analyzer: &mut Analyzer,
            _intermediate: &Intermediate,
            _section: &mut Section,
            _element: &XmlElement,
            attribute: &XmlAttribute,
            _context: &ParseContext,
        ) -> Claim<()> {
            if attribute.name().local_name() == "Flag" {
                Claim::Claimed(())
            } else {
                Claim::Declined
            }
        }

        fn try_parse_element(
            &mut self,
            analyzer: &mut Analyzer,
            _intermediate: &Intermediate,
            section: &mut Section,
            _parent: &XmlElement,
            element: &XmlElement,
            context: &ParseContext,
        ) -> Claim<()> {
            if element.name().local_name() != "User" {
                return Claim::Declined;
            }
            let id = context.get("ComponentId").cloned().unwrap_or_default();
            analyzer.create_symbol(
                section,
                element.location(),
                property::definition(),
                Some(Identifier::private(format!("User_{id}"))),
            );
            Claim::Claimed(())
        }

        fn try_parse_key_path_element(
            &mut self,
            _analyzer: &mut Analyzer,
            _intermediate: &Intermediate,
            _section: &mut Section,
            _parent: &XmlElement,
            element: &XmlElement,
            _context: &ParseContext,
        ) -> Claim<Option<ComponentKeyPath>> {
            match element.name().local_name() {
                "XmlFile" => Claim::Claimed(Some(ComponentKeyPath::new(
                    "XmlFile1",
                    KeyPathKind::File,
                    true,
                ))),
                "Group" => Claim::Claimed(None),
                _ => Claim::Declined,
            }
        }
    }

    fn line(n: u32) -> SourceLineNumber {
        SourceLineNumber::new("product.wxs", n)
    }

    fn util(local: &str) -> QualifiedName {
        QualifiedName::with_namespace(UTIL, local)
    }

    fn extensions() -> Vec<Box<dyn CompilerExtension>> {
        vec![Box::new(UtilExtension)]
    }

    #[test]
    fn test_claimed_attribute() {
        let mut analyzer = Analyzer::default();
        let mut extensions = extensions();
        let intermediate = Intermediate::new("Product");
        let mut section = Section::new("Product", None);
        let element = XmlElement::new("Component", line(4)).with_attribute(util("Flag"), "on");

        analyzer.parse_extension_attribute(
            &mut extensions,
            &intermediate,
            &mut section,
            &element,
            &element.attributes()[0],
            None,
        );
        assert!(analyzer.diagnostics().is_empty());
    }

    #[test]
    fn test_unclaimed_attribute_reported_once() {
        let mut analyzer = Analyzer::default();
        let mut extensions = extensions();
        let intermediate = Intermediate::new("Product");
        let mut section = Section::new("Product", None);
        let element = XmlElement::new("Component", line(4))
            .with_attribute(util("Unknown"), "x")
            .with_attribute(QualifiedName::with_namespace("urn:other", "Thing"), "y");

        for attribute in element.attributes() {
            analyzer.parse_extension_attribute(
                &mut extensions,
                &intermediate,
                &mut section,
                &element,
                attribute,
                None,
            );
        }

        let diagnostics = analyzer.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics
            .iter()
            .all(|d| d.code() == Some(ErrorCode::E200) && d.location() == Some(&line(4))));
    }

    #[test]
    fn test_namespace_declarations_ignored() {
        let mut analyzer = Analyzer::default();
        let mut extensions = extensions();
        let intermediate = Intermediate::new("Product");
        let mut section = Section::new("Product", None);
        let element = XmlElement::new("Wix", line(1))
            .with_attribute("xmlns", "http://wixtoolset.org/schemas/v4/wxs")
            .with_attribute(
                QualifiedName::with_namespace(
                    "http://www.w3.org/2001/XMLSchema-instance",
                    "schemaLocation",
                ),
                "x",
            );

        for attribute in element.attributes() {
            analyzer.parse_extension_attribute(
                &mut extensions,
                &intermediate,
                &mut section,
                &element,
                attribute,
                None,
            );
            analyzer.unexpected_attribute(&element, attribute);
        }
        assert!(analyzer.diagnostics().is_empty());
    }

    #[test]
    fn test_for_extension_elements() {
        let mut analyzer = Analyzer::default();
        let mut extensions = extensions();
        let intermediate = Intermediate::new("Product");
        let mut section = Section::new("Product", None);
        let component = XmlElement::new("Component", line(10))
            .with_child(XmlElement::new(util("User"), line(11)))
            .with_child(XmlElement::new("Bogus", line(12)))
            .with_child(XmlElement::new(util("Missing"), line(13)));

        let mut context = ParseContext::new();
        context.insert("ComponentId".to_string(), "Main".to_string());
        analyzer.parse_for_extension_elements(
            &mut extensions,
            &intermediate,
            &mut section,
            &component,
            Some(&context),
        );

        assert!(section.find(property::TABLE, "User_Main").is_some());
        let found: Vec<_> = analyzer
            .diagnostics()
            .iter()
            .map(|d| (d.code(), d.location().cloned()))
            .collect();
        assert_eq!(
            found,
            [
                (Some(ErrorCode::E201), Some(line(12))),
                (Some(ErrorCode::E202), Some(line(13))),
            ]
        );
    }

    #[test]
    fn test_key_path_element() {
        let mut analyzer = Analyzer::default();
        let mut extensions = extensions();
        let intermediate = Intermediate::new("Product");
        let mut section = Section::new("Product", None);
        let component = XmlElement::new("Component", line(10));

        let key_path = analyzer.parse_possible_key_path_extension_element(
            &mut extensions,
            &intermediate,
            &mut section,
            &component,
            &XmlElement::new(util("XmlFile"), line(11)),
            None,
        );
        assert_eq!(key_path, Some(ComponentKeyPath::new("XmlFile1", KeyPathKind::File, true)));

        let none = analyzer.parse_possible_key_path_extension_element(
            &mut extensions,
            &intermediate,
            &mut section,
            &component,
            &XmlElement::new(util("Group"), line(12)),
            None,
        );
        assert!(none.is_none());
        assert!(analyzer.diagnostics().is_empty());
    }

    /// Records every attribute it is offered under its own name.
    struct Recording {
        name: &'static str,
        claims: bool,
        calls: Rc<RefCell<Vec<&'static str>>>,
    }

    impl CompilerExtension for Recording {
        fn namespace(&self) -> &str {
            UTIL
        }

        fn try_parse_attribute(
            &mut self,
            _analyzer: &mut Analyzer,
            _intermediate: &Intermediate,
            _section: &mut Section,
            _element: &XmlElement,
            _attribute: &XmlAttribute,
            _context: &ParseContext,
        ) -> Claim<()> {
            self.calls.borrow_mut().push(self.name);
            if self.claims {
                Claim::Claimed(())
            } else {
                Claim::Declined
            }
        }
    }

    fn dispatch_flag(first_claims: bool) -> (Analyzer, Vec<&'static str>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut extensions: Vec<Box<dyn CompilerExtension>> = vec![
            Box::new(Recording {
                name: "first",
                claims: first_claims,
                calls: Rc::clone(&calls),
            }),
            Box::new(Recording {
                name: "second",
                claims: true,
                calls: Rc::clone(&calls),
            }),
        ];

        let mut analyzer = Analyzer::default();
        let intermediate = Intermediate::new("Product");
        let mut section = Section::new("Product", None);
        let element = XmlElement::new("Component", line(4)).with_attribute(util("Flag"), "on");

        analyzer.parse_extension_attribute(
            &mut extensions,
            &intermediate,
            &mut section,
            &element,
            &element.attributes()[0],
            None,
        );
        let calls = calls.borrow().clone();
        (analyzer, calls)
    }

    #[test]
    fn test_first_claim_wins() {
        let (analyzer, calls) = dispatch_flag(true);

        assert_eq!(calls, ["first"]);
        assert!(analyzer.diagnostics().is_empty());
    }

    #[test]
    fn test_declined_attribute_offered_to_next() {
        let (analyzer, calls) = dispatch_flag(false);

        assert_eq!(calls, ["first", "second"]);
        assert!(analyzer.diagnostics().is_empty());
    }
}
