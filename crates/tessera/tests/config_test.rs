//! Integration tests for loading a CompilerConfig from disk

use std::io::Write;

use tessera::{
    Compilation, TesseraError, config::CompilerConfig, platform::Platform, symbol::FieldKind,
};

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

#[test]
fn test_load_config_file() {
    let file = write_config(
        r#"
        platform = "arm64"
        suppress_warnings = true

        [[extra_tables]]
        name = "WixDependencyProvider"
        fields = [
            { name = "ProviderKey", kind = "string" },
            { name = "Attributes", kind = "number" },
        ]
        "#,
    );

    let config = CompilerConfig::load(file.path()).expect("Failed to load config");
    assert_eq!(config.platform(), Platform::Arm64);
    assert!(config.suppress_warnings());
    assert!(!config.warnings_as_errors());

    let table = &config.extra_tables()[0];
    assert_eq!(table.name(), "WixDependencyProvider");
    assert_eq!(table.fields()[1].kind(), FieldKind::Number);

    let compilation = Compilation::new("Setup", config).expect("valid configuration");
    let definition = compilation
        .definitions()
        .get("WixDependencyProvider")
        .expect("registered table");
    assert_eq!(definition.fields().len(), 2);

    let unit = compilation.unit("Product", None);
    assert_eq!(unit.platform(), Platform::Arm64);
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let err = CompilerConfig::load(dir.path().join("tessera.toml")).unwrap_err();
    assert!(matches!(err, TesseraError::Io(_)));
}

#[test]
fn test_malformed_config_file() {
    let file = write_config("platform = ");
    let err = CompilerConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, TesseraError::Config(_)));
}

#[test]
fn test_duplicate_extra_tables() {
    let config = CompilerConfig::from_toml_str(
        r#"
        [[extra_tables]]
        name = "WixFirewallException"

        [[extra_tables]]
        name = "WixFirewallException"
        "#,
    )
    .expect("parses");

    let err = Compilation::new("Setup", config).err().expect("duplicate table");
    assert!(err.to_string().contains("WixFirewallException"));
}
