//! Target platforms and platform sets.

use std::{fmt, ops::BitOr};

use serde::{Deserialize, Serialize};

/// A processor architecture a package can be compiled for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    X86,
    X64,
    Arm64,
}

impl Platform {
    /// All platforms, in declaration order.
    pub const ALL: [Platform; 3] = [Platform::X86, Platform::X64, Platform::Arm64];

    /// Suffix appended to names specialized for this platform.
    pub fn identifier_suffix(&self) -> &'static str {
        match self {
            Self::X86 => "_X86",
            Self::X64 => "_X64",
            Self::Arm64 => "_A64",
        }
    }

    fn bit(&self) -> u8 {
        match self {
            Self::X86 => 0b001,
            Self::X64 => 0b010,
            Self::Arm64 => 0b100,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::X86 => write!(f, "x86"),
            Self::X64 => write!(f, "x64"),
            Self::Arm64 => write!(f, "arm64"),
        }
    }
}

/// A set of platforms for which specialized implementations exist.
///
/// # Examples
///
/// ```
/// use tessera_core::platform::{Platform, PlatformSet};
///
/// let supported = PlatformSet::X86 | PlatformSet::X64;
/// assert!(supported.contains(Platform::X64));
/// assert!(!supported.contains(Platform::Arm64));
///
/// let from_list: PlatformSet = [Platform::X86, Platform::X64].into_iter().collect();
/// assert_eq!(from_list, supported);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PlatformSet(u8);

impl PlatformSet {
    pub const NONE: PlatformSet = PlatformSet(0);
    pub const X86: PlatformSet = PlatformSet(0b001);
    pub const X64: PlatformSet = PlatformSet(0b010);
    pub const ARM64: PlatformSet = PlatformSet(0b100);
    pub const ALL: PlatformSet = PlatformSet(0b111);

    /// Returns `true` if `platform` is a member of this set.
    pub fn contains(&self, platform: Platform) -> bool {
        self.0 & platform.bit() != 0
    }

    /// Returns `true` if the set has no members.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterates the members in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Platform> + '_ {
        Platform::ALL.into_iter().filter(|p| self.contains(*p))
    }
}

impl From<Platform> for PlatformSet {
    fn from(platform: Platform) -> Self {
        PlatformSet(platform.bit())
    }
}

impl BitOr for PlatformSet {
    type Output = PlatformSet;

    fn bitor(self, rhs: Self) -> Self::Output {
        PlatformSet(self.0 | rhs.0)
    }
}

impl FromIterator<Platform> for PlatformSet {
    fn from_iter<T: IntoIterator<Item = Platform>>(iter: T) -> Self {
        iter.into_iter()
            .fold(PlatformSet::NONE, |set, p| set | PlatformSet::from(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffixes() {
        assert_eq!(Platform::X86.identifier_suffix(), "_X86");
        assert_eq!(Platform::X64.identifier_suffix(), "_X64");
        assert_eq!(Platform::Arm64.identifier_suffix(), "_A64");
    }

    #[test]
    fn test_set_membership() {
        let set = PlatformSet::X86 | PlatformSet::ARM64;
        assert!(set.contains(Platform::X86));
        assert!(!set.contains(Platform::X64));
        assert!(set.contains(Platform::Arm64));
        assert_eq!(set.iter().collect::<Vec<_>>(), [Platform::X86, Platform::Arm64]);
    }

    #[test]
    fn test_empty_and_all() {
        assert!(PlatformSet::NONE.is_empty());
        assert!(Platform::ALL.iter().all(|p| PlatformSet::ALL.contains(*p)));
    }
}
