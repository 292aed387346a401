//! Parent and child kinds for structural grouping references.
//!
//! A complex reference ties a child (for example a component) to the parent
//! that groups it (for example a feature). The numeric codes are the values
//! stored in symbol fields.

use std::fmt;

/// The kind of the grouping parent in a complex reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplexReferenceParentType {
    Unknown,
    Feature,
    ComponentGroup,
    FeatureGroup,
    Module,
    Product,
    PatchFamilyGroup,
    Patch,
    Container,
    Layout,
    PackageGroup,
}

impl ComplexReferenceParentType {
    /// Returns the numeric code stored in symbol fields.
    pub fn code(&self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Feature => 1,
            Self::ComponentGroup => 2,
            Self::FeatureGroup => 3,
            Self::Module => 4,
            Self::Product => 5,
            Self::PatchFamilyGroup => 6,
            Self::Patch => 7,
            Self::Container => 8,
            Self::Layout => 9,
            Self::PackageGroup => 10,
        }
    }

    /// Resolves a numeric code back to its kind.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Unknown,
            1 => Self::Feature,
            2 => Self::ComponentGroup,
            3 => Self::FeatureGroup,
            4 => Self::Module,
            5 => Self::Product,
            6 => Self::PatchFamilyGroup,
            7 => Self::Patch,
            8 => Self::Container,
            9 => Self::Layout,
            10 => Self::PackageGroup,
            _ => return None,
        })
    }
}

impl fmt::Display for ComplexReferenceParentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The kind of the grouped child in a complex reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComplexReferenceChildType {
    Unknown,
    Feature,
    Component,
    ComponentGroup,
    FeatureGroup,
    Module,
    PatchFamily,
    PatchFamilyGroup,
    Package,
    PackageGroup,
    Payload,
    PayloadGroup,
}

impl ComplexReferenceChildType {
    /// Returns the numeric code stored in symbol fields.
    pub fn code(&self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Feature => 1,
            Self::Component => 2,
            Self::ComponentGroup => 3,
            Self::FeatureGroup => 4,
            Self::Module => 5,
            Self::PatchFamily => 6,
            Self::PatchFamilyGroup => 7,
            Self::Package => 8,
            Self::PackageGroup => 9,
            Self::Payload => 10,
            Self::PayloadGroup => 11,
        }
    }

    /// Resolves a numeric code back to its kind.
    pub fn from_code(code: i64) -> Option<Self> {
        Some(match code {
            0 => Self::Unknown,
            1 => Self::Feature,
            2 => Self::Component,
            3 => Self::ComponentGroup,
            4 => Self::FeatureGroup,
            5 => Self::Module,
            6 => Self::PatchFamily,
            7 => Self::PatchFamilyGroup,
            8 => Self::Package,
            9 => Self::PackageGroup,
            10 => Self::Payload,
            11 => Self::PayloadGroup,
            _ => return None,
        })
    }
}

impl fmt::Display for ComplexReferenceChildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
