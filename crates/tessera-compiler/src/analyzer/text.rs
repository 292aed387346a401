//! Element text helpers.

use tessera_core::{location::SourceLineNumber, xml::XmlElement};

use crate::{
    analyzer::Analyzer,
    error::{Diagnostic, ErrorCode},
};

/// Returns the element's location for diagnostics.
pub fn source_line_numbers(element: &XmlElement) -> SourceLineNumber {
    element.location().clone()
}

/// Returns the inner text with surrounding whitespace removed, or `None` when
/// nothing remains.
///
/// # Examples
///
/// ```
/// use tessera_compiler::analyzer::trimmed_inner_text;
/// use tessera_core::{location::SourceLineNumber, xml::XmlElement};
///
/// let here = SourceLineNumber::new("product.wxs", 1);
/// let element = XmlElement::new("Condition", here.clone()).with_text("  Installed  ");
/// assert_eq!(trimmed_inner_text(&element).as_deref(), Some("Installed"));
///
/// let blank = XmlElement::new("Condition", here).with_text(" \n ");
/// assert_eq!(trimmed_inner_text(&blank), None);
/// ```
pub fn trimmed_inner_text(element: &XmlElement) -> Option<String> {
    element
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Returns the inner text as a condition: trimmed, with every whitespace run
/// folded to a single space.
///
/// # Examples
///
/// ```
/// use tessera_compiler::analyzer::condition_inner_text;
/// use tessera_core::{location::SourceLineNumber, xml::XmlElement};
///
/// let element = XmlElement::new("Condition", SourceLineNumber::new("product.wxs", 1))
///     .with_text("\n   NOT Installed\n   AND VersionNT >= 601\n");
/// assert_eq!(
///     condition_inner_text(&element).as_deref(),
///     Some("NOT Installed AND VersionNT >= 601")
/// );
/// ```
pub fn condition_inner_text(element: &XmlElement) -> Option<String> {
    let text = element.text()?;
    let folded = text.split_whitespace().collect::<Vec<_>>().join(" ");
    (!folded.is_empty()).then_some(folded)
}

impl Analyzer {
    /// Reports an error when the element carries non-whitespace inner text.
    ///
    /// `attribute_suggestion` names the attribute the author probably meant
    /// to use instead.
    pub fn inner_text_disallowed(
        &mut self,
        element: &XmlElement,
        attribute_suggestion: Option<&str>,
    ) {
        if trimmed_inner_text(element).is_none() {
            return;
        }

        let mut diagnostic = Diagnostic::error(format!(
            "the `{}` element does not accept inner text",
            element.name()
        ))
        .with_code(ErrorCode::E013)
        .with_label(source_line_numbers(element), "unexpected text");
        if let Some(attribute) = attribute_suggestion {
            diagnostic = diagnostic.with_help(format!("use the `{attribute}` attribute instead"));
        }
        self.emit(diagnostic);
    }
}
