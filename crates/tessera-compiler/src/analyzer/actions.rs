//! Scheduling actions into sequence tables.

use log::debug;

use tessera_core::{
    identifier::{AccessModifier, Identifier},
    location::SourceLineNumber,
    section::Section,
    sequence::SequenceTable,
    symbol::{
        Symbol,
        definitions::{custom_action, wix_action},
    },
};

use crate::{
    analyzer::Analyzer,
    error::{Diagnostic, ErrorCode},
};

/// Actions built into the installer engine.
const STANDARD_ACTIONS: &[&str] = &[
    "AllocateRegistrySpace",
    "AppSearch",
    "BindImage",
    "CCPSearch",
    "CostFinalize",
    "CostInitialize",
    "CreateFolders",
    "CreateShortcuts",
    "DeleteServices",
    "DisableRollback",
    "DuplicateFiles",
    "ExecuteAction",
    "FileCost",
    "FindRelatedProducts",
    "ForceReboot",
    "InstallAdminPackage",
    "InstallExecute",
    "InstallExecuteAgain",
    "InstallFiles",
    "InstallFinalize",
    "InstallInitialize",
    "InstallODBC",
    "InstallServices",
    "InstallSFPCatalogFile",
    "InstallValidate",
    "IsolateComponents",
    "LaunchConditions",
    "MigrateFeatureStates",
    "MoveFiles",
    "MsiConfigureServices",
    "MsiPublishAssemblies",
    "MsiUnpublishAssemblies",
    "PatchFiles",
    "ProcessComponents",
    "PublishComponents",
    "PublishFeatures",
    "PublishProduct",
    "RegisterClassInfo",
    "RegisterComPlus",
    "RegisterExtensionInfo",
    "RegisterFonts",
    "RegisterMIMEInfo",
    "RegisterProduct",
    "RegisterProgIdInfo",
    "RegisterTypeLibraries",
    "RegisterUser",
    "RemoveDuplicateFiles",
    "RemoveEnvironmentStrings",
    "RemoveExistingProducts",
    "RemoveFiles",
    "RemoveFolders",
    "RemoveIniValues",
    "RemoveODBC",
    "RemoveRegistryValues",
    "RemoveShortcuts",
    "ResolveSource",
    "RMCCPSearch",
    "ScheduleReboot",
    "SelfRegModules",
    "SelfUnregModules",
    "SetODBCFolders",
    "StartServices",
    "StopServices",
    "UnpublishComponents",
    "UnpublishFeatures",
    "UnregisterClassInfo",
    "UnregisterComPlus",
    "UnregisterExtensionInfo",
    "UnregisterFonts",
    "UnregisterMIMEInfo",
    "UnregisterProgIdInfo",
    "UnregisterTypeLibraries",
    "ValidateProductID",
    "WriteEnvironmentStrings",
    "WriteIniValues",
    "WriteRegistryValues",
];

/// Returns `true` if `action` is built into the installer engine.
///
/// # Examples
///
/// ```
/// use tessera_compiler::analyzer::is_standard_action;
///
/// assert!(is_standard_action("InstallFiles"));
/// assert!(!is_standard_action("MyCustomAction"));
/// ```
pub fn is_standard_action(action: &str) -> bool {
    STANDARD_ACTIONS.contains(&action)
}

/// An action to place in a sequence table.
///
/// `before` and `after` may both be given; both are recorded as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSchedule {
    access: AccessModifier,
    sequence: SequenceTable,
    name: String,
    condition: Option<String>,
    before: Option<String>,
    after: Option<String>,
    overridable: bool,
}

impl ActionSchedule {
    pub fn new(sequence: SequenceTable, name: impl Into<String>) -> Self {
        Self {
            access: AccessModifier::default(),
            sequence,
            name: name.into(),
            condition: None,
            before: None,
            after: None,
            overridable: false,
        }
    }

    pub fn with_access(mut self, access: AccessModifier) -> Self {
        self.access = access;
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn before(mut self, action: impl Into<String>) -> Self {
        self.before = Some(action.into());
        self
    }

    pub fn after(mut self, action: impl Into<String>) -> Self {
        self.after = Some(action.into());
        self
    }

    pub fn overridable(mut self, overridable: bool) -> Self {
        self.overridable = overridable;
        self
    }

    pub fn sequence(&self) -> SequenceTable {
        self.sequence
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn before_action(&self) -> Option<&str> {
        self.before.as_deref()
    }

    pub fn after_action(&self) -> Option<&str> {
        self.after.as_deref()
    }

    pub fn is_overridable(&self) -> bool {
        self.overridable
    }

    /// The action's key: `Table/Name`.
    fn key(&self) -> String {
        format!("{}/{}", self.sequence.as_str(), self.name)
    }

    fn fill(&self, symbol: &mut Symbol) {
        symbol
            .set(wix_action::SEQUENCE_TABLE, self.sequence.code())
            .set(wix_action::ACTION, self.name.clone())
            .set(wix_action::CONDITION, self.condition.clone())
            .set(wix_action::BEFORE, self.before.clone())
            .set(wix_action::AFTER, self.after.clone())
            .set(wix_action::OVERRIDABLE, self.overridable);
    }
}

impl Analyzer {
    /// Schedules an action and returns its `Table/Name` identifier.
    ///
    /// An action with the same name in the same table is an error and is
    /// dropped when both it and any earlier row are non-overridable. Rows that
    /// involve an overridable action are kept for the linker to resolve.
    /// Returns `None` when the action was dropped.
    pub fn schedule_action(
        &mut self,
        section: &mut Section,
        location: &SourceLineNumber,
        action: &ActionSchedule,
    ) -> Option<Identifier> {
        let id = Identifier::new(action.access, action.key());

        let mut existing = section
            .actions_in(action.sequence)
            .filter(|symbol| symbol.string(wix_action::ACTION) == Some(action.name.as_str()))
            .map(|symbol| {
                (
                    symbol.flag(wix_action::OVERRIDABLE).unwrap_or(false),
                    symbol.location().cloned(),
                )
            })
            .peekable();
        let scheduled = existing.peek().is_some();
        let conflict = existing.find(|(overridable, _)| !overridable && !action.overridable);
        drop(existing);

        match (scheduled, conflict) {
            (_, Some((_, first))) => {
                let mut diagnostic = Diagnostic::error(format!(
                    "the action `{}` is scheduled more than once in `{}`",
                    action.name, action.sequence
                ))
                .with_code(ErrorCode::E101)
                .with_label(location.clone(), "duplicate action")
                .with_help("mark one of the actions overridable, or remove the duplicate");
                if let Some(first) = first {
                    diagnostic = diagnostic.with_secondary_label(first, "first scheduled here");
                }
                self.emit(diagnostic);
                return None;
            }
            (true, None) => {
                let symbol = section.push_symbol(Symbol::new(
                    wix_action::definition(),
                    Some(location.clone()),
                    Some(id.clone()),
                ));
                action.fill(symbol);
                debug!(
                    sequence:% = action.sequence,
                    action = action.name.as_str(),
                    overridable = action.overridable;
                    "Recorded action override"
                );
            }
            (false, None) => {
                let symbol = self.create_symbol(
                    section,
                    location,
                    wix_action::definition(),
                    Some(id.clone()),
                )?;
                action.fill(symbol);
                debug!(
                    sequence:% = action.sequence,
                    action = action.name.as_str();
                    "Scheduled action"
                );
            }
        }

        for target in [action.before.as_deref(), action.after.as_deref()]
            .into_iter()
            .flatten()
        {
            self.reference_action(section, location, action.sequence, target);
        }

        Some(id)
    }

    fn reference_action(
        &mut self,
        section: &mut Section,
        location: &SourceLineNumber,
        sequence: SequenceTable,
        target: &str,
    ) {
        if is_standard_action(target) {
            self.create_simple_reference(
                section,
                location,
                wix_action::TABLE,
                &[sequence.as_str(), target],
            );
        } else {
            self.create_simple_reference(section, location, custom_action::TABLE, &[target]);
        }
    }
}
