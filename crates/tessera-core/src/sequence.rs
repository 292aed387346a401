//! Installer sequence tables.

use std::fmt;

/// A table that orders installer actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceTable {
    AdminUISequence,
    AdminExecuteSequence,
    AdvertiseExecuteSequence,
    InstallUISequence,
    InstallExecuteSequence,
}

impl SequenceTable {
    /// All sequence tables in declaration order.
    pub const ALL: [SequenceTable; 5] = [
        SequenceTable::AdminUISequence,
        SequenceTable::AdminExecuteSequence,
        SequenceTable::AdvertiseExecuteSequence,
        SequenceTable::InstallUISequence,
        SequenceTable::InstallExecuteSequence,
    ];

    /// Returns the table name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AdminUISequence => "AdminUISequence",
            Self::AdminExecuteSequence => "AdminExecuteSequence",
            Self::AdvertiseExecuteSequence => "AdvertiseExecuteSequence",
            Self::InstallUISequence => "InstallUISequence",
            Self::InstallExecuteSequence => "InstallExecuteSequence",
        }
    }

    /// Returns the numeric code stored in symbol fields.
    pub fn code(&self) -> i64 {
        match self {
            Self::AdminUISequence => 0,
            Self::AdminExecuteSequence => 1,
            Self::AdvertiseExecuteSequence => 2,
            Self::InstallUISequence => 3,
            Self::InstallExecuteSequence => 4,
        }
    }

    /// Resolves a numeric code back to its table.
    pub fn from_code(code: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|table| table.code() == code)
    }
}

impl fmt::Display for SequenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
