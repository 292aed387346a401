//! Built-in symbol definitions.
//!
//! Each submodule describes one output table: its `TABLE` name, a typed
//! [`Field`](crate::symbol::Field) handle per column and a shared
//! `definition()`.

macro_rules! symbol_definitions {
    (
        $(
            $(#[$meta:meta])*
            $module:ident => $table:literal {
                $( $field:ident : $ty:ty = $name:literal @ $index:literal ),* $(,)?
            }
        )*
    ) => {
        $(
            $(#[$meta])*
            pub mod $module {
                use std::sync::{Arc, LazyLock};

                use crate::symbol::{Field, SymbolDefinition};

                pub const TABLE: &str = $table;

                $( pub const $field: Field<$ty> = Field::new(TABLE, $name, $index); )*

                static DEFINITION: LazyLock<Arc<SymbolDefinition>> = LazyLock::new(|| {
                    Arc::new(SymbolDefinition::new(TABLE, vec![$( $field.definition() ),*]))
                });

                /// Returns the shared definition of this table.
                pub fn definition() -> Arc<SymbolDefinition> {
                    Arc::clone(&DEFINITION)
                }
            }
        )*

        /// Returns every built-in definition.
        pub fn all() -> Vec<std::sync::Arc<crate::symbol::SymbolDefinition>> {
            vec![$( $module::definition() ),*]
        }
    };
}

symbol_definitions! {
    /// Installation directories.
    directory => "Directory" {
        PARENT_DIRECTORY_REF: String = "ParentDirectoryRef" @ 0,
        NAME: String = "Name" @ 1,
        SHORT_NAME: String = "ShortName" @ 2,
        SOURCE_NAME: String = "SourceName" @ 3,
        SOURCE_SHORT_NAME: String = "SourceShortName" @ 4,
    }

    /// Registry values written by components.
    registry => "Registry" {
        ROOT: i64 = "Root" @ 0,
        KEY: String = "Key" @ 1,
        NAME: String = "Name" @ 2,
        VALUE: String = "Value" @ 3,
        VALUE_TYPE: i64 = "ValueType" @ 4,
        VALUE_ACTION: i64 = "ValueAction" @ 5,
        COMPONENT_REF: String = "ComponentRef" @ 6,
    }

    /// Named dependencies on rows defined elsewhere.
    wix_simple_reference => "WixSimpleReference" {
        TABLE_NAME: String = "Table" @ 0,
        PRIMARY_KEYS: String = "PrimaryKeys" @ 1,
    }

    /// Structural parent/child grouping edges.
    wix_complex_reference => "WixComplexReference" {
        PARENT: String = "Parent" @ 0,
        PARENT_TYPE: i64 = "ParentType" @ 1,
        PARENT_LANGUAGE: String = "ParentLanguage" @ 2,
        CHILD: String = "Child" @ 3,
        CHILD_TYPE: i64 = "ChildType" @ 4,
        IS_PRIMARY: bool = "IsPrimary" @ 5,
    }

    /// Table-level registration of a grouping edge.
    wix_group => "WixGroup" {
        PARENT_ID: String = "ParentId" @ 0,
        PARENT_TYPE: i64 = "ParentType" @ 1,
        CHILD_ID: String = "ChildId" @ 2,
        CHILD_TYPE: i64 = "ChildType" @ 3,
    }

    /// Discovery operations evaluated before planning.
    wix_search => "WixSearch" {
        ELEMENT_NAME: String = "ElementName" @ 0,
        VARIABLE: String = "Variable" @ 1,
        CONDITION: String = "Condition" @ 2,
        BUNDLE_EXTENSION_REF: String = "BundleExtensionRef" @ 3,
    }

    /// Ordering edges between searches. The symbol id is the child search.
    wix_search_relation => "WixSearchRelation" {
        PARENT_SEARCH_REF: String = "ParentSearchRef" @ 0,
        ATTRIBUTES: i64 = "Attributes" @ 1,
    }

    /// Actions scheduled in a sequence table. The symbol id is `Table/Action`.
    wix_action => "WixAction" {
        SEQUENCE_TABLE: i64 = "SequenceTable" @ 0,
        ACTION: String = "Action" @ 1,
        CONDITION: String = "Condition" @ 2,
        BEFORE: String = "Before" @ 3,
        AFTER: String = "After" @ 4,
        OVERRIDABLE: bool = "Overridable" @ 5,
    }

    /// Tables that must be materialized even when empty.
    wix_ensure_table => "WixEnsureTable" {
        TABLE_NAME: String = "Table" @ 0,
    }

    custom_action => "CustomAction" {
        TYPE: i64 = "Type" @ 0,
        SOURCE: String = "Source" @ 1,
        TARGET: String = "Target" @ 2,
    }

    component => "Component" {
        COMPONENT_ID: String = "ComponentId" @ 0,
        DIRECTORY_REF: String = "DirectoryRef" @ 1,
        KEY_PATH: String = "KeyPath" @ 2,
        CONDITION: String = "Condition" @ 3,
    }

    feature => "Feature" {
        PARENT_FEATURE_REF: String = "ParentFeatureRef" @ 0,
        TITLE: String = "Title" @ 1,
        LEVEL: i64 = "Level" @ 2,
    }

    property => "Property" {
        VALUE: String = "Value" @ 0,
    }

    /// Bundle extensions that own searches.
    wix_bundle_extension => "WixBundleExtension" {
        PAYLOAD_REF: String = "PayloadRef" @ 0,
    }
}
