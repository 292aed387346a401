//! Registry roots, value types and value actions.

use std::fmt;

/// A registry hive.
///
/// [`RegistryRootType::MachineUser`] is resolved at install time to the
/// per-user or per-machine hive depending on the installation scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryRootType {
    /// `HKMU`: current user or local machine depending on install scope.
    MachineUser,
    /// `HKCR`
    ClassesRoot,
    /// `HKCU`
    CurrentUser,
    /// `HKLM`
    LocalMachine,
    /// `HKU`
    Users,
}

impl RegistryRootType {
    /// Returns the numeric root stored in symbol fields.
    ///
    /// `HKMU` is encoded as `-1`.
    pub fn code(&self) -> i64 {
        match self {
            Self::MachineUser => -1,
            Self::ClassesRoot => 0,
            Self::CurrentUser => 1,
            Self::LocalMachine => 2,
            Self::Users => 3,
        }
    }

    /// Returns the abbreviated hive name used in source text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MachineUser => "HKMU",
            Self::ClassesRoot => "HKCR",
            Self::CurrentUser => "HKCU",
            Self::LocalMachine => "HKLM",
            Self::Users => "HKU",
        }
    }
}

impl fmt::Display for RegistryRootType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a registry value is typed when written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RegistryValueType {
    #[default]
    String,
    Binary,
    Expandable,
    Integer,
    MultiString,
}

impl RegistryValueType {
    /// Returns the numeric code stored in symbol fields.
    pub fn code(&self) -> i64 {
        match self {
            Self::String => 0,
            Self::Binary => 1,
            Self::Expandable => 2,
            Self::Integer => 3,
            Self::MultiString => 4,
        }
    }
}

/// What happens to an existing registry value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RegistryValueActionType {
    #[default]
    Write,
    Append,
    Prepend,
}

impl RegistryValueActionType {
    /// Returns the numeric code stored in symbol fields.
    pub fn code(&self) -> i64 {
        match self {
            Self::Write => 0,
            Self::Append => 1,
            Self::Prepend => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_user_is_negative_one() {
        assert_eq!(RegistryRootType::MachineUser.code(), -1);
        assert_eq!(RegistryRootType::MachineUser.to_string(), "HKMU");
    }

    #[test]
    fn test_defaults() {
        assert_eq!(RegistryValueType::default(), RegistryValueType::String);
        assert_eq!(
            RegistryValueActionType::default(),
            RegistryValueActionType::Write
        );
    }
}
