//! Tessera Core Types and Definitions
//!
//! This crate provides the intermediate representation shared by the Tessera
//! installer compiler stages. It includes:
//!
//! - **Identifiers**: Access-scoped symbol identifiers ([`identifier::Identifier`])
//! - **Locations**: Source file and line information ([`location::SourceLineNumber`])
//! - **Symbols**: Typed rows and their schemas ([`symbol`] module)
//! - **Sections**: Per-source-unit symbol containers ([`section`] module)
//! - **Enumerations**: Platforms, registry roots, references and sequences
//! - **XML**: The element/attribute tree consumed from the front end ([`xml`] module)

pub mod identifier;
pub mod location;
pub mod platform;
pub mod reference;
pub mod registry;
pub mod section;
pub mod sequence;
pub mod symbol;
pub mod xml;
