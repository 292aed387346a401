//! Integration tests for the Compilation API
//!
//! These tests drive source units through the facade the way the enclosing
//! compiler does and check what reaches the intermediate.

use proptest::prelude::*;

use tessera::{
    Analyzer, Claim, Compilation, CompilerExtension, ErrorCode, ParseContext, TesseraError,
    analyzer::{ActionSchedule, ILLEGAL_INTEGER, SearchEntry, SearchRelationFlags},
    config::{CompilerConfig, FieldConfig, TableConfig},
    identifier::Identifier,
    identifiers::{generate_guid, generate_identifier, generate_platform_identifier},
    location::SourceLineNumber,
    platform::{Platform, PlatformSet},
    section::{Intermediate, Section},
    sequence::SequenceTable,
    symbol::{
        FieldKind,
        definitions::{custom_action, directory, wix_action, wix_ensure_table, wix_simple_reference},
    },
    validate::is_valid_identifier,
    views::SearchGraph,
    xml::{QualifiedName, XmlAttribute, XmlElement},
};

const UTIL: &str = "http://example.com/schemas/util";

fn line(n: u32) -> SourceLineNumber {
    SourceLineNumber::new("product.wxs", n)
}

fn compilation(config: CompilerConfig) -> Compilation {
    Compilation::new("Setup", config).expect("valid configuration")
}

fn compile_errors(err: &TesseraError) -> Vec<ErrorCode> {
    err.as_compile_error()
        .expect("compile error")
        .errors()
        .filter_map(|d| d.code())
        .collect()
}

#[test]
fn test_compilation_api_exists() {
    let compilation = compilation(CompilerConfig::default());
    assert!(compilation.definitions().get("Directory").is_some());
}

#[test]
fn test_empty_compilation() {
    let output = compilation(CompilerConfig::default())
        .finish()
        .expect("nothing to fail");
    assert!(output.intermediate().sections().is_empty());
    assert!(output.warnings().is_empty());
}

#[test]
fn test_ensure_table_is_idempotent() {
    let mut compilation = compilation(CompilerConfig::default());
    let mut unit = compilation.unit("Product", Some(line(1)));
    {
        let (analyzer, section, _) = unit.parts_mut();
        analyzer.ensure_table(section, &line(3), "Shortcut");
        analyzer.ensure_table(section, &line(9), "Shortcut");
    }
    assert!(compilation.add_unit(unit));

    let output = compilation.finish().expect("no errors");
    let section = &output.intermediate().sections()[0];
    assert_eq!(section.symbols_of(wix_ensure_table::TABLE).count(), 1);
    assert!(section.is_table_ensured("Shortcut"));
}

#[test]
fn test_integer_coercion() {
    let mut compilation = compilation(CompilerConfig::default());
    let mut unit = compilation.unit("Product", None);

    let (analyzer, _, _) = unit.parts_mut();
    let level = XmlAttribute::new("Feature", "Level", "5");
    let valid = analyzer.attribute_integer(&line(2), &level, 1, 10);
    assert_eq!(valid.ok(), Some(5));
    assert!(analyzer.diagnostics().is_empty());

    let out_of_range =
        analyzer.attribute_integer(&line(3), &XmlAttribute::new("Feature", "Level", "15"), 1, 10);
    assert!(out_of_range.is_sentinel());
    assert_eq!(*out_of_range.value(), ILLEGAL_INTEGER);
    assert_eq!(analyzer.diagnostics().len(), 1);

    let not_a_number =
        analyzer.attribute_integer(&line(4), &XmlAttribute::new("Feature", "Level", "abc"), 1, 10);
    assert_eq!(not_a_number.into_inner(), ILLEGAL_INTEGER);
    assert_eq!(analyzer.diagnostics().len(), 2);
    assert_eq!(analyzer.diagnostics()[1].location(), Some(&line(4)));

    assert!(!compilation.add_unit(unit));
    let err = compilation.finish().unwrap_err();
    assert_eq!(err.as_compile_error().expect("compile error").errors().count(), 2);
}

#[test]
fn test_inline_directory_twice_in_one_unit() {
    let mut compilation = compilation(CompilerConfig::default());
    let mut unit = compilation.unit("Product", None);
    let (analyzer, section, cache) = unit.parts_mut();

    let first = analyzer.create_directory_reference_from_inline_syntax(
        section,
        &line(5),
        None,
        None,
        "ProgramFilesFolder\\Vendor\\App",
        cache,
    );
    let second = analyzer.create_directory_reference_from_inline_syntax(
        section,
        &line(8),
        None,
        None,
        "ProgramFilesFolder\\Vendor\\App",
        cache,
    );
    assert!(first.is_some());
    assert_eq!(first, second);

    assert!(compilation.add_unit(unit));
    let output = compilation.finish().expect("no errors");
    let section = &output.intermediate().sections()[0];
    assert_eq!(section.symbols_of(directory::TABLE).count(), 2);
    assert_eq!(section.symbols_of(wix_simple_reference::TABLE).count(), 1);
}

#[test]
fn test_inline_directory_cache_is_per_unit() {
    let mut compilation = compilation(CompilerConfig::default());

    let mut leaves = Vec::new();
    for id in ["Product", "Fragment"] {
        let mut unit = compilation.unit(id, None);
        let (analyzer, section, cache) = unit.parts_mut();
        leaves.push(analyzer.create_directory_reference_from_inline_syntax(
            section,
            &line(5),
            None,
            None,
            "ProgramFilesFolder\\Vendor",
            cache,
        ));
        assert!(compilation.add_unit(unit));
    }
    assert_eq!(leaves[0], leaves[1]);

    let output = compilation.finish().expect("no errors");
    for section in output.intermediate().sections() {
        assert_eq!(section.symbols_of(directory::TABLE).count(), 1);
        assert_eq!(section.symbols_of(wix_simple_reference::TABLE).count(), 1);
    }
}

#[test]
fn test_search_chain_preserves_order() {
    let mut compilation = compilation(CompilerConfig::default());
    let mut unit = compilation.unit("Bundle", None);
    {
        let (analyzer, section, _) = unit.parts_mut();
        let searches = [
            SearchEntry::new("RegistrySearch", Identifier::private("A"), "VarA"),
            SearchEntry::new("FileSearch", Identifier::private("B"), "VarB").after("A"),
            SearchEntry::new("DirectorySearch", Identifier::private("C"), "VarC").after("B"),
        ];
        for (n, search) in (10..).zip(&searches) {
            analyzer.create_search_symbol(section, &line(n), search);
        }
    }
    assert!(compilation.add_unit(unit));

    let output = compilation.finish().expect("no errors");
    let graph = SearchGraph::from_section(&output.intermediate().sections()[0]);
    assert_eq!(graph.evaluation_order().expect("acyclic"), ["A", "B", "C"]);
    assert_eq!(graph.parents_of("C"), [("B", SearchRelationFlags::AFTER)]);
}

#[test]
fn test_search_self_loop_rejected() {
    let mut compilation = compilation(CompilerConfig::default());
    let mut unit = compilation.unit("Bundle", None);
    {
        let (analyzer, section, _) = unit.parts_mut();
        let id = Identifier::private("A");
        let search = SearchEntry::new("FileSearch", id.clone(), "VarA");
        analyzer.create_search_symbol(section, &line(10), &search);
        let recorded = analyzer.create_search_relation_symbol(
            section,
            &line(11),
            &id,
            "A",
            SearchRelationFlags::AFTER,
        );
        assert!(!recorded);
        assert!(SearchGraph::from_section(section).parents_of("A").is_empty());
    }
    assert!(!compilation.add_unit(unit));

    let err = compilation.finish().unwrap_err();
    assert_eq!(compile_errors(&err), [ErrorCode::E102]);
}

#[test]
fn test_rejected_unit_does_not_stop_siblings() {
    let mut compilation = compilation(CompilerConfig::default());

    let mut broken = compilation.unit("Broken", None);
    {
        let (analyzer, section, _) = broken.parts_mut();
        let id = Identifier::private("Loop");
        analyzer.create_search_relation_symbol(
            section,
            &line(2),
            &id,
            "Loop",
            SearchRelationFlags::AFTER,
        );
    }
    let mut healthy = compilation.unit("Healthy", None);
    {
        let (analyzer, section, _) = healthy.parts_mut();
        analyzer.ensure_table(section, &line(2), "Shortcut");
    }

    assert!(!compilation.add_unit(broken));
    assert!(compilation.add_unit(healthy));
    assert!(compilation.finish().is_err());
}

#[test]
fn test_duplicate_action() {
    let mut compilation = compilation(CompilerConfig::default());
    let mut unit = compilation.unit("Product", None);
    {
        let (analyzer, section, _) = unit.parts_mut();
        let action = ActionSchedule::new(SequenceTable::InstallExecuteSequence, "MyAction");
        assert!(analyzer.schedule_action(section, &line(20), &action).is_some());
        assert!(analyzer
            .schedule_action(section, &line(21), &action.clone().with_condition("NOT Installed"))
            .is_none());
        assert_eq!(section.actions_in(SequenceTable::InstallExecuteSequence).count(), 1);
    }
    assert!(!compilation.add_unit(unit));

    let err = compilation.finish().unwrap_err();
    assert_eq!(compile_errors(&err), [ErrorCode::E101]);
}

#[test]
fn test_overridable_action() {
    let mut compilation = compilation(CompilerConfig::default());
    let mut unit = compilation.unit("Product", None);
    {
        let (analyzer, section, _) = unit.parts_mut();
        let action = ActionSchedule::new(SequenceTable::InstallExecuteSequence, "MyAction");
        assert!(analyzer.schedule_action(section, &line(20), &action).is_some());
        assert!(analyzer
            .schedule_action(section, &line(21), &action.clone().overridable(true))
            .is_some());
    }
    assert!(compilation.add_unit(unit));

    let output = compilation.finish().expect("override accepted");
    let rows: Vec<_> = output.intermediate().sections()[0]
        .actions_in(SequenceTable::InstallExecuteSequence)
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].flag(wix_action::OVERRIDABLE), Some(true));
}

#[test]
fn test_platform_custom_action_reference() {
    let config = CompilerConfig::default().with_platform(Platform::X64);
    let mut compilation = compilation(config);
    let mut unit = compilation.unit("Product", None);
    let platform = unit.platform();
    let supported = PlatformSet::X86 | PlatformSet::X64;
    {
        let (analyzer, section, _) = unit.parts_mut();
        let id = analyzer
            .create_custom_action_reference(
                &line(4),
                section,
                "QueryNativeMachine",
                platform,
                supported,
            )
            .expect("x64 is supported");
        assert_eq!(id, "QueryNativeMachine_X64");
        assert!(
            analyzer
                .create_custom_action_reference(
                    &line(5),
                    section,
                    "QueryNativeMachine",
                    Platform::Arm64,
                    supported,
                )
                .is_none()
        );
    }
    assert!(compilation.add_unit(unit));

    let output = compilation.finish().expect("no errors");
    let reference = output.intermediate().sections()[0]
        .symbols_of(wix_simple_reference::TABLE)
        .next()
        .expect("custom action reference");
    assert_eq!(reference.string(wix_simple_reference::TABLE_NAME), Some(custom_action::TABLE));
    assert_eq!(
        reference.string(wix_simple_reference::PRIMARY_KEYS),
        Some("QueryNativeMachine_X64")
    );
}

/// Claims `util:Flag` attributes and nothing else.
struct FlagExtension;

impl CompilerExtension for FlagExtension {
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
}

#[test]
fn test_unclaimed_extension_attribute() {
    let mut compilation = compilation(CompilerConfig::default());
    compilation.register_extension(Box::new(FlagExtension));

    let element = XmlElement::new("Component", line(30))
        .with_attribute(QualifiedName::with_namespace(UTIL, "Flag"), "yes")
        .with_attribute(QualifiedName::with_namespace(UTIL, "Mystery"), "yes");

    let mut unit = compilation.unit("Product", None);
    {
        let (intermediate, extensions) = compilation.extension_context();
        let (analyzer, section, _) = unit.parts_mut();
        for attribute in element.attributes() {
            analyzer.parse_extension_attribute(
                extensions,
                intermediate,
                section,
                &element,
                attribute,
                None,
            );
        }
        assert_eq!(analyzer.diagnostics().len(), 1);
    }
    assert!(!compilation.add_unit(unit));

    let err = compilation.finish().unwrap_err();
    let compile = err.as_compile_error().expect("compile error");
    let diagnostic = &compile.diagnostics()[0];
    assert_eq!(diagnostic.code(), Some(ErrorCode::E200));
    assert_eq!(diagnostic.location(), Some(&line(30)));
}

#[test]
fn test_extra_table_is_registered() {
    let config = CompilerConfig::default().with_extra_table(TableConfig::new(
        "WixFirewallException",
        vec![
            FieldConfig::new("Port", FieldKind::String),
            FieldConfig::new("Scope", FieldKind::Number),
        ],
    ));
    let mut compilation = compilation(config);
    let mut unit = compilation.unit("Product", None);
    {
        let (analyzer, section, _) = unit.parts_mut();
        let symbol = analyzer
            .create_symbol(
                section,
                &line(7),
                "WixFirewallException",
                Some(Identifier::private("fw1")),
            )
            .expect("registered table");
        symbol.set_by_name("Port", "8080").expect("string field");
    }
    assert!(compilation.add_unit(unit));
    assert!(compilation.finish().is_ok());
}

#[test]
fn test_extra_table_cannot_shadow_builtin() {
    let config =
        CompilerConfig::default().with_extra_table(TableConfig::new("Directory", Vec::new()));
    let err = Compilation::new("Setup", config).err().expect("duplicate table");
    assert!(matches!(err, TesseraError::Config(_)));
}

fn unit_with_long_identifier(compilation: &mut Compilation) -> bool {
    let mut unit = compilation.unit("Product", None);
    let (analyzer, _, _) = unit.parts_mut();
    let id = format!("Component_{}", "x".repeat(80));
    let attribute = XmlAttribute::new("Component", "Id", id);
    let coerced = analyzer.attribute_identifier(&line(6), &attribute);
    assert!(coerced.is_valid());
    compilation.add_unit(unit)
}

#[test]
fn test_warnings_reported() {
    let mut compilation = compilation(CompilerConfig::default());
    assert!(unit_with_long_identifier(&mut compilation));

    let output = compilation.finish().expect("warnings only");
    assert_eq!(output.warnings().len(), 1);
    assert_eq!(output.warnings()[0].code(), Some(ErrorCode::W001));
}

#[test]
fn test_suppressed_warnings() {
    let mut compilation = compilation(CompilerConfig::default().with_suppress_warnings(true));
    assert!(unit_with_long_identifier(&mut compilation));

    let output = compilation.finish().expect("warnings only");
    assert!(output.warnings().is_empty());
    assert_eq!(output.intermediate().sections().len(), 1);
}

#[test]
fn test_warnings_as_errors() {
    let config = CompilerConfig::default()
        .with_warnings_as_errors(true)
        .with_suppress_warnings(true);
    let mut compilation = compilation(config);
    assert!(!unit_with_long_identifier(&mut compilation));

    let err = compilation.finish().unwrap_err();
    assert_eq!(compile_errors(&err), [ErrorCode::W001]);
}

#[test]
fn test_generated_identifiers_are_stable_across_compilations() {
    let id_of = || {
        let mut compilation = compilation(CompilerConfig::default());
        let mut unit = compilation.unit("Product", None);
        let (analyzer, section, cache) = unit.parts_mut();
        let leaf = analyzer
            .create_directory_reference_from_inline_syntax(
                section,
                &line(1),
                None,
                Some("INSTALLFOLDER"),
                "bin",
                cache,
            )
            .expect("leaf directory");
        assert!(compilation.add_unit(unit));
        leaf
    };
    assert_eq!(id_of(), id_of());
}

mod proptest_tests {
    use super::*;

    use proptest::test_runner::TestCaseError;

    fn part_strategy() -> impl Strategy<Value = String> {
        "[ -~]{0,24}"
    }

    fn check_identifier_deterministic(prefix: &str, parts: &[String]) -> Result<(), TestCaseError> {
        let first = generate_identifier(prefix, parts);
        let second = generate_identifier(prefix, parts);
        prop_assert_eq!(&first, &second);
        prop_assert!(is_valid_identifier(first.id()), "illegal identifier {}", first.id());
        Ok(())
    }

    fn check_guid_deterministic(value: &str) -> Result<(), TestCaseError> {
        let namespace = &tessera::identifiers::COMPONENT_GUID_NAMESPACE;
        prop_assert_eq!(generate_guid(namespace, value), generate_guid(namespace, value));
        Ok(())
    }

    fn check_platform_identifier(
        name: &str,
        platform: Platform,
        supported: PlatformSet,
    ) -> Result<(), TestCaseError> {
        let id = generate_platform_identifier(name, platform, supported);
        prop_assert_eq!(id.is_some(), supported.contains(platform));
        Ok(())
    }

    fn platform_strategy() -> impl Strategy<Value = Platform> {
        prop::sample::select(Platform::ALL.to_vec())
    }

    fn platform_set_strategy() -> impl Strategy<Value = PlatformSet> {
        prop::sample::subsequence(Platform::ALL.to_vec(), 0..=3)
            .prop_map(|platforms| platforms.into_iter().collect())
    }

    proptest! {
        #[test]
        fn identifier_is_deterministic(
            prefix in "[a-z]{1,4}",
            parts in prop::collection::vec(part_strategy(), 0..5),
        ) {
            check_identifier_deterministic(&prefix, &parts)?;
        }

        #[test]
        fn guid_is_deterministic(value in part_strategy()) {
            check_guid_deterministic(&value)?;
        }

        #[test]
        fn platform_identifier_follows_supported_set(
            name in "[A-Za-z_][A-Za-z0-9_]{0,16}",
            platform in platform_strategy(),
            supported in platform_set_strategy(),
        ) {
            check_platform_identifier(&name, platform, supported)?;
        }
    }
}
