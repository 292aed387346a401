//! Typed, validating reads of attribute text.
//!
//! Every accessor either returns [`Coerced::Valid`] or reports exactly one
//! error and returns [`Coerced::Sentinel`] holding the accessor's documented
//! placeholder. Warnings never turn a value into a sentinel.

use std::ops::BitOr;

use log::trace;
use uuid::Uuid;

use tessera_core::{
    identifier::{AccessModifier, Identifier},
    location::SourceLineNumber,
    registry::RegistryRootType,
    xml::XmlAttribute,
};

use crate::{
    analyzer::{Analyzer, attribute_path},
    error::{Diagnostic, ErrorCode},
    syntax, validate,
};

/// Marks an integer that was never set.
pub const INTEGER_NOT_SET: i32 = i32::MIN;

/// Returned by integer accessors for illegal input.
pub const ILLEGAL_INTEGER: i32 = i32::MIN + 1;

/// Marks a long that was never set.
pub const LONG_NOT_SET: i64 = i64::MIN;

/// Returned by long accessors for illegal input.
pub const ILLEGAL_LONG: i64 = i64::MIN + 1;

/// Identifiers longer than this produce a warning.
pub const MAX_IDENTIFIER_LEN: usize = 72;

/// The outcome of reading an attribute.
///
/// A sentinel means a diagnostic has already been recorded; the held value is
/// a safe placeholder that keeps the caller's object graph well-formed.
///
/// # Examples
///
/// ```
/// use tessera_compiler::analyzer::Coerced;
///
/// let valid = Coerced::Valid(5);
/// let sentinel = Coerced::Sentinel(i32::MIN + 1);
///
/// assert_eq!(valid.ok(), Some(5));
/// assert!(sentinel.is_sentinel());
/// assert_eq!(sentinel.into_inner(), i32::MIN + 1);
/// ```
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced<T> {
    Valid(T),
    Sentinel(T),
}

impl<T> Coerced<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Self::Sentinel(_))
    }

    /// Returns the held value, valid or not.
    pub fn value(&self) -> &T {
        match self {
            Self::Valid(value) | Self::Sentinel(value) => value,
        }
    }

    /// Consumes the outcome and returns the held value, valid or not.
    pub fn into_inner(self) -> T {
        match self {
            Self::Valid(value) | Self::Sentinel(value) => value,
        }
    }

    /// Returns the value only if it is valid.
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            Self::Sentinel(_) => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Coerced<U> {
        match self {
            Self::Valid(value) => Coerced::Valid(f(value)),
            Self::Sentinel(value) => Coerced::Sentinel(f(value)),
        }
    }
}

/// How an accessor treats empty or blank text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyRule {
    /// Empty and whitespace-only values are errors.
    DisallowEmpty,

    /// Whitespace-only values are accepted; the empty string is an error.
    #[default]
    WhitespaceOnlyOk,

    /// Any value is accepted.
    AllowEmpty,
}

/// A two-state attribute value. Illegal text yields [`YesNo::No`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    No,
    Yes,
}

impl YesNo {
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// A three-state attribute value. Illegal text yields [`YesNoDefault::Default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNoDefault {
    Default,
    No,
    Yes,
}

/// A version attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionValue {
    /// One to four dot-separated parts, each at most 65535.
    Numeric(String),

    /// A value supplied by the binder, such as `!(bind.fileVersion.App)`.
    BindVariable(String),
}

impl VersionValue {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Numeric(text) | Self::BindVariable(text) => text,
        }
    }
}

/// Which kinds of bundle variable names an attribute accepts.
///
/// # Examples
///
/// ```
/// use tessera_compiler::analyzer::BundleVariableNameRule;
///
/// let rule = BundleVariableNameRule::default();
/// assert!(rule.contains(BundleVariableNameRule::CAN_BE_WELL_KNOWN));
/// let none = BundleVariableNameRule::NONE;
/// assert!(!none.contains(BundleVariableNameRule::CAN_HAVE_RESERVED_PREFIX));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleVariableNameRule(u8);

impl BundleVariableNameRule {
    pub const NONE: Self = Self(0);
    pub const CAN_BE_WELL_KNOWN: Self = Self(0b01);
    pub const CAN_HAVE_RESERVED_PREFIX: Self = Self(0b10);

    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl Default for BundleVariableNameRule {
    fn default() -> Self {
        Self::CAN_BE_WELL_KNOWN | Self::CAN_HAVE_RESERVED_PREFIX
    }
}

impl BitOr for BundleVariableNameRule {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

const RESERVED_BUNDLE_VARIABLE_PREFIX: &str = "Wix";

/// Variables the bundle engine defines itself.
const WELL_KNOWN_BUNDLE_VARIABLES: &[&str] = &[
    "AdminToolsFolder",
    "AppDataFolder",
    "CommonAppDataFolder",
    "CommonFiles64Folder",
    "CommonFiles6432Folder",
    "CommonFilesFolder",
    "CompatibilityMode",
    "ComputerName",
    "Date",
    "DesktopFolder",
    "FavoritesFolder",
    "FontsFolder",
    "InstallerName",
    "InstallerVersion",
    "LocalAppDataFolder",
    "LogonUser",
    "MyPicturesFolder",
    "NativeMachine",
    "NTProductType",
    "NTSuiteBackOffice",
    "NTSuiteDataCenter",
    "NTSuiteEnterprise",
    "NTSuitePersonal",
    "NTSuiteSmallBusiness",
    "NTSuiteSmallBusinessRestricted",
    "NTSuiteWebServer",
    "PersonalFolder",
    "Privileged",
    "ProcessorArchitecture",
    "ProgramFiles64Folder",
    "ProgramFiles6432Folder",
    "ProgramFilesFolder",
    "ProgramMenuFolder",
    "RebootPending",
    "SendToFolder",
    "ServicePackLevel",
    "StartMenuFolder",
    "StartupFolder",
    "System64Folder",
    "SystemFolder",
    "SystemLanguageID",
    "TempFolder",
    "TemplateFolder",
    "TerminalServer",
    "UserLanguageID",
    "UserUILanguageID",
    "VersionMsi",
    "VersionNT",
    "VersionNT64",
    "WindowsBuildNumber",
    "WindowsFolder",
    "WindowsVolume",
    "WixBundleAction",
    "WixBundleActiveParent",
    "WixBundleCommandLineAction",
    "WixBundleElevated",
    "WixBundleExecutePackageAction",
    "WixBundleExecutePackageCacheFolder",
    "WixBundleForcedRestartPackage",
    "WixBundleInstalled",
    "WixBundleLastUsedSource",
    "WixBundleLayoutDirectory",
    "WixBundleLog",
    "WixBundleManufacturer",
    "WixBundleName",
    "WixBundleOriginalSource",
    "WixBundleOriginalSourceFolder",
    "WixBundleProviderKey",
    "WixBundleSourceProcessFolder",
    "WixBundleSourceProcessPath",
    "WixBundleTag",
    "WixBundleUILevel",
    "WixBundleVersion",
];

/// Returns `true` if `name` is defined by the bundle engine.
pub(crate) fn is_well_known_bundle_variable(name: &str) -> bool {
    WELL_KNOWN_BUNDLE_VARIABLES.contains(&name)
}

impl Analyzer {
    /// Reads an attribute as text under an empty rule.
    ///
    /// Sentinel: the empty string.
    pub fn attribute_value(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
        rule: EmptyRule,
    ) -> Coerced<String> {
        let value = attribute.value();
        let rejected = match rule {
            EmptyRule::DisallowEmpty => value.trim().is_empty(),
            EmptyRule::WhitespaceOnlyOk => value.is_empty(),
            EmptyRule::AllowEmpty => false,
        };
        if rejected {
            self.error_at(
                location,
                ErrorCode::E001,
                format!("the `{}` attribute cannot be empty", attribute_path(attribute)),
                "empty value",
            );
            return Coerced::Sentinel(String::new());
        }
        trace!(attribute:% = attribute_path(attribute), value; "Read attribute");
        Coerced::Valid(value.to_string())
    }

    /// Reads an identifier, with an optional access keyword prefix.
    ///
    /// `public Foo` yields a public `Foo`. Identifiers longer than 72
    /// characters are kept but produce a warning.
    ///
    /// Sentinel: [`Identifier::invalid`].
    pub fn attribute_identifier(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
    ) -> Coerced<Identifier> {
        let Coerced::Valid(text) =
            self.attribute_value(location, attribute, EmptyRule::DisallowEmpty)
        else {
            return Coerced::Sentinel(Identifier::invalid());
        };

        let (access, value) = match text.split_once(' ') {
            Some((keyword, rest)) => match AccessModifier::from_keyword(keyword) {
                Some(access) => (access, rest.trim()),
                None => {
                    self.emit(
                        Diagnostic::error(format!(
                            "the `{}` attribute has an unknown access modifier `{keyword}`",
                            attribute_path(attribute)
                        ))
                        .with_code(ErrorCode::E002)
                        .with_label(location.clone(), "illegal identifier")
                        .with_help("use `global`, `public` or `private` before the identifier"),
                    );
                    return Coerced::Sentinel(Identifier::invalid());
                }
            },
            None => (AccessModifier::default(), text.as_str()),
        };

        if !validate::is_valid_identifier(value) {
            self.emit(
                Diagnostic::error(format!(
                    "the `{}` attribute has an illegal identifier `{value}`",
                    attribute_path(attribute)
                ))
                .with_code(ErrorCode::E002)
                .with_label(location.clone(), "illegal identifier")
                .with_help(
                    "identifiers start with a letter or underscore and contain only letters, digits, underscores and periods",
                ),
            );
            return Coerced::Sentinel(Identifier::invalid());
        }

        if value.len() > MAX_IDENTIFIER_LEN {
            self.warning_at(
                location,
                ErrorCode::W001,
                format!(
                    "the `{}` identifier is {} characters long; identifiers longer than {MAX_IDENTIFIER_LEN} characters may not be supported",
                    value,
                    value.len()
                ),
                "long identifier",
            );
        }

        Coerced::Valid(Identifier::new(access, value))
    }

    /// Reads an identifier and returns only its value.
    ///
    /// Sentinel: the value of [`Identifier::invalid`].
    pub fn attribute_identifier_value(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
    ) -> Coerced<String> {
        self.attribute_identifier(location, attribute)
            .map(Identifier::into_id)
    }

    /// Reads an integer within `[minimum, maximum]`.
    ///
    /// Sentinel: [`ILLEGAL_INTEGER`].
    pub fn attribute_integer(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
        minimum: i32,
        maximum: i32,
    ) -> Coerced<i32> {
        debug_assert!(
            minimum > ILLEGAL_INTEGER && minimum <= maximum,
            "integer range must exclude the sentinels"
        );
        self.attribute_number(
            location,
            attribute,
            i64::from(minimum),
            i64::from(maximum),
            [i64::from(INTEGER_NOT_SET), i64::from(ILLEGAL_INTEGER)],
        )
        .ok()
        .and_then(|value| i32::try_from(value).ok())
        .map_or(Coerced::Sentinel(ILLEGAL_INTEGER), Coerced::Valid)
    }

    /// Reads a long within `[minimum, maximum]`.
    ///
    /// Sentinel: [`ILLEGAL_LONG`].
    pub fn attribute_long(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
        minimum: i64,
        maximum: i64,
    ) -> Coerced<i64> {
        debug_assert!(
            minimum > ILLEGAL_LONG && minimum <= maximum,
            "long range must exclude the sentinels"
        );
        match self.attribute_number(
            location,
            attribute,
            minimum,
            maximum,
            [LONG_NOT_SET, ILLEGAL_LONG],
        ) {
            Coerced::Valid(value) => Coerced::Valid(value),
            Coerced::Sentinel(_) => Coerced::Sentinel(ILLEGAL_LONG),
        }
    }

    fn attribute_number(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
        minimum: i64,
        maximum: i64,
        reserved: [i64; 2],
    ) -> Coerced<i64> {
        let Coerced::Valid(text) =
            self.attribute_value(location, attribute, EmptyRule::DisallowEmpty)
        else {
            return Coerced::Sentinel(ILLEGAL_LONG);
        };

        let Ok(value) = text.trim().parse::<i64>() else {
            self.error_at(
                location,
                ErrorCode::E003,
                format!(
                    "the `{}` attribute's value `{text}` is not a legal integer",
                    attribute_path(attribute)
                ),
                "not an integer",
            );
            return Coerced::Sentinel(ILLEGAL_LONG);
        };

        if reserved.contains(&value) {
            self.error_at(
                location,
                ErrorCode::E005,
                format!(
                    "the `{}` attribute's value `{value}` is reserved",
                    attribute_path(attribute)
                ),
                "reserved value",
            );
            return Coerced::Sentinel(ILLEGAL_LONG);
        }

        if !(minimum..=maximum).contains(&value) {
            self.error_at(
                location,
                ErrorCode::E004,
                format!(
                    "the `{}` attribute's value `{value}` is not in the range {minimum} to {maximum}",
                    attribute_path(attribute)
                ),
                "out of range",
            );
            return Coerced::Sentinel(ILLEGAL_LONG);
        }

        Coerced::Valid(value)
    }

    /// Reads a GUID and normalizes it to upper-case braced form.
    ///
    /// `*` is accepted when `generatable`. Localization and wix variable
    /// references pass through unchanged. A blank value is accepted as the
    /// empty string when `can_be_empty`.
    ///
    /// Sentinel: the empty string.
    pub fn attribute_guid(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
        generatable: bool,
        can_be_empty: bool,
    ) -> Coerced<String> {
        let value = attribute.value().trim();

        if value.is_empty() {
            if can_be_empty {
                return Coerced::Valid(String::new());
            }
            self.error_at(
                location,
                ErrorCode::E001,
                format!("the `{}` attribute cannot be empty", attribute_path(attribute)),
                "empty value",
            );
            return Coerced::Sentinel(String::new());
        }

        if generatable && value == "*" {
            return Coerced::Valid(value.to_string());
        }

        if validate::is_deferred_reference(value) {
            return Coerced::Valid(value.to_string());
        }

        match Uuid::try_parse(value) {
            Ok(guid) => Coerced::Valid(guid.braced().to_string().to_ascii_uppercase()),
            Err(_) => {
                let mut diagnostic = Diagnostic::error(format!(
                    "the `{}` attribute's value `{value}` is not a legal GUID",
                    attribute_path(attribute)
                ))
                .with_code(ErrorCode::E006)
                .with_label(location.clone(), "illegal GUID");
                if value == "*" {
                    diagnostic = diagnostic
                        .with_help("`*` is only allowed where the GUID can be generated");
                }
                self.emit(diagnostic);
                Coerced::Sentinel(String::new())
            }
        }
    }

    /// Reads a long filename.
    ///
    /// With `allow_relative`, the value is a path: `.` segments are dropped,
    /// `..` pops the previous segment and the result is joined with `\`.
    /// Localization references pass through. Names that look like generated
    /// short names (`NAME~1`) produce a warning.
    ///
    /// Sentinel: the empty string.
    pub fn attribute_long_filename(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
        allow_wildcards: bool,
        allow_relative: bool,
    ) -> Coerced<String> {
        let Coerced::Valid(value) =
            self.attribute_value(location, attribute, EmptyRule::DisallowEmpty)
        else {
            return Coerced::Sentinel(String::new());
        };

        if validate::is_valid_loc_identifier(&value) {
            return Coerced::Valid(value);
        }

        let normalized = if allow_relative {
            let mut segments: Vec<&str> = Vec::new();
            for segment in value.split(['\\', '/']) {
                match segment {
                    "" | "." => {}
                    ".." => {
                        if segments.pop().is_none() {
                            self.error_at(
                                location,
                                ErrorCode::E008,
                                format!(
                                    "the `{}` attribute's path `{value}` climbs above its root",
                                    attribute_path(attribute)
                                ),
                                "path escapes its root",
                            );
                            return Coerced::Sentinel(String::new());
                        }
                    }
                    name => segments.push(name),
                }
            }
            segments.join("\\")
        } else {
            value.clone()
        };

        if !validate::is_valid_long_filename(&normalized, allow_wildcards, allow_relative) {
            self.error_at(
                location,
                ErrorCode::E007,
                format!(
                    "the `{}` attribute's value `{value}` is not a legal long filename",
                    attribute_path(attribute)
                ),
                "illegal long filename",
            );
            return Coerced::Sentinel(String::new());
        }

        if validate::looks_like_short_name_alias(&normalized) {
            self.warning_at(
                location,
                ErrorCode::W002,
                format!(
                    "the `{}` attribute's value `{value}` looks like a generated short name and may be ambiguous",
                    attribute_path(attribute)
                ),
                "possibly ambiguous",
            );
        }

        Coerced::Valid(normalized)
    }

    /// Reads a registry root. `HKMU` is accepted only when `allow_hkmu`.
    ///
    /// Sentinel: `None`.
    pub fn attribute_registry_root(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
        allow_hkmu: bool,
    ) -> Coerced<Option<RegistryRootType>> {
        let Coerced::Valid(value) =
            self.attribute_value(location, attribute, EmptyRule::DisallowEmpty)
        else {
            return Coerced::Sentinel(None);
        };

        let root = match value.as_str() {
            "HKCR" => Some(RegistryRootType::ClassesRoot),
            "HKCU" => Some(RegistryRootType::CurrentUser),
            "HKLM" => Some(RegistryRootType::LocalMachine),
            "HKU" => Some(RegistryRootType::Users),
            "HKMU" if allow_hkmu => Some(RegistryRootType::MachineUser),
            _ => None,
        };

        match root {
            Some(root) => Coerced::Valid(Some(root)),
            None => {
                let allowed = if allow_hkmu {
                    "`HKMU`, `HKCR`, `HKCU`, `HKLM` or `HKU`"
                } else {
                    "`HKCR`, `HKCU`, `HKLM` or `HKU`"
                };
                self.emit(
                    Diagnostic::error(format!(
                        "the `{}` attribute's value `{value}` is not a registry root",
                        attribute_path(attribute)
                    ))
                    .with_code(ErrorCode::E009)
                    .with_label(location.clone(), "illegal registry root")
                    .with_help(format!("use {allowed}")),
                );
                Coerced::Sentinel(None)
            }
        }
    }

    /// Reads a version or a binder variable reference.
    ///
    /// Sentinel: `None`.
    pub fn attribute_version(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
    ) -> Coerced<Option<VersionValue>> {
        let Coerced::Valid(value) =
            self.attribute_value(location, attribute, EmptyRule::DisallowEmpty)
        else {
            return Coerced::Sentinel(None);
        };

        if syntax::parse_version(&value).is_some() {
            return Coerced::Valid(Some(VersionValue::Numeric(value)));
        }
        if validate::is_binder_variable(&value) {
            return Coerced::Valid(Some(VersionValue::BindVariable(value)));
        }

        self.emit(
            Diagnostic::error(format!(
                "the `{}` attribute's value `{value}` is not a legal version",
                attribute_path(attribute)
            ))
            .with_code(ErrorCode::E010)
            .with_label(location.clone(), "illegal version")
            .with_help(format!(
                "use up to four dot-separated integers no larger than {}, or a binder variable such as `!(bind.fileVersion.FileId)`",
                syntax::MAX_VERSION_PART
            )),
        );
        Coerced::Sentinel(None)
    }

    /// Reads `yes` or `no`.
    ///
    /// Sentinel: [`YesNo::No`].
    pub fn attribute_yes_no(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
    ) -> Coerced<YesNo> {
        let Coerced::Valid(value) =
            self.attribute_value(location, attribute, EmptyRule::DisallowEmpty)
        else {
            return Coerced::Sentinel(YesNo::No);
        };
        match value.as_str() {
            "yes" => Coerced::Valid(YesNo::Yes),
            "no" => Coerced::Valid(YesNo::No),
            _ => {
                self.illegal_yes_no(location, attribute, &value, "`yes` or `no`");
                Coerced::Sentinel(YesNo::No)
            }
        }
    }

    /// Reads `yes`, `no` or `default`.
    ///
    /// Sentinel: [`YesNoDefault::Default`].
    pub fn attribute_yes_no_default(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
    ) -> Coerced<YesNoDefault> {
        let Coerced::Valid(value) =
            self.attribute_value(location, attribute, EmptyRule::DisallowEmpty)
        else {
            return Coerced::Sentinel(YesNoDefault::Default);
        };
        match value.as_str() {
            "yes" => Coerced::Valid(YesNoDefault::Yes),
            "no" => Coerced::Valid(YesNoDefault::No),
            "default" => Coerced::Valid(YesNoDefault::Default),
            _ => {
                self.illegal_yes_no(location, attribute, &value, "`yes`, `no` or `default`");
                Coerced::Sentinel(YesNoDefault::Default)
            }
        }
    }

    fn illegal_yes_no(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
        value: &str,
        allowed: &str,
    ) {
        self.emit(
            Diagnostic::error(format!(
                "the `{}` attribute's value `{value}` is not a legal choice",
                attribute_path(attribute)
            ))
            .with_code(ErrorCode::E011)
            .with_label(location.clone(), "illegal value")
            .with_help(format!("use {allowed}")),
        );
    }

    /// Reads a bundle variable name under `rule`.
    ///
    /// Sentinel: the value of [`Identifier::invalid`].
    pub fn attribute_bundle_variable_name(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
        rule: BundleVariableNameRule,
    ) -> Coerced<String> {
        let Coerced::Valid(value) =
            self.attribute_value(location, attribute, EmptyRule::DisallowEmpty)
        else {
            return Coerced::Sentinel(Identifier::invalid().into_id());
        };

        if !validate::is_valid_identifier(&value) {
            self.illegal_bundle_variable_name(
                location,
                attribute,
                &value,
                "bundle variable names follow the identifier grammar",
            );
            return Coerced::Sentinel(Identifier::invalid().into_id());
        }

        if self.check_bundle_variable_rule(location, attribute, &value, rule) {
            Coerced::Valid(value)
        } else {
            Coerced::Sentinel(Identifier::invalid().into_id())
        }
    }

    /// Reads a bundle variable name as an identifier.
    ///
    /// Well-known and reserved names are accepted.
    ///
    /// Sentinel: [`Identifier::invalid`].
    pub fn attribute_bundle_variable_name_identifier(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
    ) -> Coerced<Identifier> {
        match self.attribute_identifier(location, attribute) {
            Coerced::Valid(id) => {
                if self.check_bundle_variable_rule(
                    location,
                    attribute,
                    id.id(),
                    BundleVariableNameRule::default(),
                ) {
                    Coerced::Valid(id)
                } else {
                    Coerced::Sentinel(Identifier::invalid())
                }
            }
            sentinel => sentinel,
        }
    }

    fn check_bundle_variable_rule(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
        name: &str,
        rule: BundleVariableNameRule,
    ) -> bool {
        if !rule.contains(BundleVariableNameRule::CAN_BE_WELL_KNOWN)
            && is_well_known_bundle_variable(name)
        {
            self.illegal_bundle_variable_name(
                location,
                attribute,
                name,
                "the name is defined by the bundle engine; choose another name",
            );
            return false;
        }
        if !rule.contains(BundleVariableNameRule::CAN_HAVE_RESERVED_PREFIX)
            && name.starts_with(RESERVED_BUNDLE_VARIABLE_PREFIX)
        {
            self.illegal_bundle_variable_name(
                location,
                attribute,
                name,
                format!("names starting with `{RESERVED_BUNDLE_VARIABLE_PREFIX}` are reserved"),
            );
            return false;
        }
        true
    }

    fn illegal_bundle_variable_name(
        &mut self,
        location: &SourceLineNumber,
        attribute: &XmlAttribute,
        name: &str,
        help: impl Into<String>,
    ) {
        self.emit(
            Diagnostic::error(format!(
                "the `{}` attribute's value `{name}` is not a legal bundle variable name",
                attribute_path(attribute)
            ))
            .with_code(ErrorCode::E012)
            .with_label(location.clone(), "illegal bundle variable name")
            .with_help(help),
        );
    }
}
