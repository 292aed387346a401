//! Error codes for the Tessera diagnostic system.
//!
//! Error codes are organized by category:
//! - `E0xx` - Value errors in attribute text
//! - `E1xx` - Structural conflicts
//! - `E2xx` - Unrecognized constructs
//! - `E3xx` - Schema and definition errors
//! - `W0xx` - Warnings

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Value Errors (E0xx)
    // =========================================================================
    /// Empty attribute value.
    ///
    /// The attribute is present but its value is empty or whitespace where the
    /// accessor's empty rule does not allow it.
    E001,

    /// Illegal identifier.
    ///
    /// Identifiers start with a letter or underscore and contain only letters,
    /// digits, underscores and periods, optionally preceded by an access
    /// keyword such as `public`.
    E002,

    /// Illegal integer value.
    ///
    /// The value is not a decimal integer.
    E003,

    /// Integer out of range.
    ///
    /// The value parsed but lies outside the accessor's inclusive range.
    E004,

    /// Reserved integer value.
    ///
    /// The value equals one of the sentinels used to signal unset or illegal
    /// integers and cannot be written literally.
    E005,

    /// Illegal GUID.
    ///
    /// The value is not a GUID, nor `*` where generation is allowed.
    E006,

    /// Illegal long filename.
    ///
    /// The name is too long, consists only of periods or contains a reserved
    /// character.
    E007,

    /// Relative path escapes its root.
    ///
    /// A `..` segment climbs above the start of the path.
    E008,

    /// Illegal registry root.
    ///
    /// The value is not one of `HKCR`, `HKCU`, `HKLM`, `HKU`, or `HKMU` where
    /// that is allowed.
    E009,

    /// Illegal version.
    ///
    /// The value is neither a dotted version of up to four parts nor a binder
    /// variable reference.
    E010,

    /// Illegal yes/no value.
    ///
    /// The value is not `yes` or `no` (or `default` where allowed).
    E011,

    /// Illegal bundle variable name.
    ///
    /// The name is malformed, or it is a well-known or reserved name in a
    /// position that does not allow one.
    E012,

    /// Inner text not allowed.
    ///
    /// The element carries text content but takes none.
    E013,

    /// Illegal inline directory syntax.
    ///
    /// An inline directory path contains an empty segment or an illegal name.
    E014,

    // =========================================================================
    // Structural Conflicts (E1xx)
    // =========================================================================
    /// Duplicate symbol.
    ///
    /// A symbol with the same table and identifier already exists in the
    /// section.
    E100,

    /// Duplicate action.
    ///
    /// An action with the same name is already scheduled in the sequence table
    /// and neither entry is overridable.
    E101,

    /// Search relation refers to itself.
    ///
    /// A search cannot be ordered relative to itself.
    E102,

    // =========================================================================
    // Unrecognized Constructs (E2xx)
    // =========================================================================
    /// Unexpected attribute.
    ///
    /// No core rule and no extension accepts the attribute on this element.
    E200,

    /// Unexpected element.
    ///
    /// The element is not allowed as a child of its parent.
    E201,

    /// Unhandled extension element.
    ///
    /// No registered extension accepts an element from a foreign namespace.
    E202,

    // =========================================================================
    // Schema Errors (E3xx)
    // =========================================================================
    /// Unknown symbol definition.
    ///
    /// A symbol was requested for a table that no registered definition
    /// describes.
    E300,

    /// Invalid field.
    ///
    /// A field was set that the definition does not declare, or with a value
    /// of the wrong type.
    E301,

    // =========================================================================
    // Warnings (W0xx)
    // =========================================================================
    /// Identifier too long.
    ///
    /// Identifiers longer than 72 characters are accepted but may be rejected
    /// by older installer engines.
    W001,

    /// Possibly ambiguous short filename.
    ///
    /// The long filename looks like a generated short name (`NAME~1`) and may
    /// collide with the short name of another file.
    W002,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Value errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E007 => "E007",
            ErrorCode::E008 => "E008",
            ErrorCode::E009 => "E009",
            ErrorCode::E010 => "E010",
            ErrorCode::E011 => "E011",
            ErrorCode::E012 => "E012",
            ErrorCode::E013 => "E013",
            ErrorCode::E014 => "E014",
            // Structural conflicts
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            // Unrecognized constructs
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            // Schema errors
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            // Warnings
            ErrorCode::W001 => "W001",
            ErrorCode::W002 => "W002",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Value errors
            ErrorCode::E001 => "empty attribute value",
            ErrorCode::E002 => "illegal identifier",
            ErrorCode::E003 => "illegal integer value",
            ErrorCode::E004 => "integer out of range",
            ErrorCode::E005 => "reserved integer value",
            ErrorCode::E006 => "illegal GUID",
            ErrorCode::E007 => "illegal long filename",
            ErrorCode::E008 => "relative path escapes its root",
            ErrorCode::E009 => "illegal registry root",
            ErrorCode::E010 => "illegal version",
            ErrorCode::E011 => "illegal yes/no value",
            ErrorCode::E012 => "illegal bundle variable name",
            ErrorCode::E013 => "inner text not allowed",
            ErrorCode::E014 => "illegal inline directory syntax",
            // Structural conflicts
            ErrorCode::E100 => "duplicate symbol",
            ErrorCode::E101 => "duplicate action",
            ErrorCode::E102 => "search relation refers to itself",
            // Unrecognized constructs
            ErrorCode::E200 => "unexpected attribute",
            ErrorCode::E201 => "unexpected element",
            ErrorCode::E202 => "unhandled extension element",
            // Schema errors
            ErrorCode::E300 => "unknown symbol definition",
            ErrorCode::E301 => "invalid field",
            // Warnings
            ErrorCode::W001 => "identifier too long",
            ErrorCode::W002 => "possibly ambiguous short filename",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
