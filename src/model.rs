//! Catalog entity data model
//!
//! Plain data carried by an application dictionary: windows composed of
//! tabs composed of fields, and browsers composed of fields, plus the
//! tables, columns, and processes they reference. These structs are what a
//! catalog backend (or an offline snapshot) hands to the assemblers; they
//! own their children in catalog-defined order and never reference shared
//! mutable state.
//!
//! IDs follow the dictionary convention: positive means a concrete
//! reference, zero or negative means "not set".

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Localized display texts for one language.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Translation {
    /// Language code, e.g. `es_VE`
    pub language: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Tab-only attribute; ignored elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_warning: Option<String>,
}

/// Base display text plus per-language overrides.
///
/// The catalog's localization layer is out of scope here: entities arrive
/// with their translations already attached, and the assemblers only pick
/// the resolved string for the document's language.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct DisplayText {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub translations: Vec<Translation>,
}

impl DisplayText {
    fn translation(&self, language: &str) -> Option<&Translation> {
        self.translations.iter().find(|t| t.language == language)
    }

    /// Name in `language`, falling back to the base name.
    pub fn name_for(&self, language: &str) -> &str {
        self.translation(language)
            .and_then(|t| t.name.as_deref())
            .unwrap_or(&self.name)
    }

    /// Description in `language`, falling back to the base description.
    pub fn description_for(&self, language: &str) -> Option<&str> {
        self.translation(language)
            .and_then(|t| t.description.as_deref())
            .or(self.description.as_deref())
    }

    /// Help text in `language`, falling back to the base help text.
    pub fn help_for(&self, language: &str) -> Option<&str> {
        self.translation(language)
            .and_then(|t| t.help.as_deref())
            .or(self.help.as_deref())
    }
}

/// Minimal cross-reference view of an entity (forms, workflows, linked
/// windows and browsers inside process detail).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EntitySummary {
    pub id: i32,
    pub uuid: String,

    #[serde(flatten)]
    pub text: DisplayText,
}

/// A window definition: the top-level UI construct for record editing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Window {
    pub id: i32,
    pub uuid: String,

    #[serde(flatten)]
    pub text: DisplayText,

    #[serde(default)]
    pub window_type: String,

    #[serde(default)]
    pub is_sales_transaction: bool,

    /// Tabs in catalog-defined order
    #[serde(default)]
    pub tabs: Vec<Tab>,
}

/// A tab inside a window.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Tab {
    pub id: i32,
    pub uuid: String,

    #[serde(flatten)]
    pub text: DisplayText,

    #[serde(default)]
    pub is_insert_record: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_warning: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_logic: Option<String>,

    #[serde(default)]
    pub sequence: i32,

    #[serde(default)]
    pub tab_level: i32,

    #[serde(default)]
    pub is_read_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_logic: Option<String>,

    #[serde(default)]
    pub is_single_row: bool,

    #[serde(default)]
    pub is_advanced_tab: bool,

    #[serde(default)]
    pub is_has_tree: bool,

    #[serde(default)]
    pub is_info_tab: bool,

    #[serde(default)]
    pub is_translation_tab: bool,

    /// Underlying table, 0 if the tab is not table-backed
    #[serde(default)]
    pub table_id: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by_clause: Option<String>,

    #[serde(default)]
    pub parent_column_id: i32,

    #[serde(default)]
    pub link_column_id: i32,

    #[serde(default)]
    pub is_sort_tab: bool,

    #[serde(default)]
    pub sort_order_column_id: i32,

    #[serde(default)]
    pub sort_yes_no_column_id: i32,

    /// Owning window
    #[serde(default)]
    pub window_id: i32,

    /// Directly linked process, 0 if none
    #[serde(default)]
    pub process_id: i32,

    /// Fields in catalog-defined order
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Tab {
    /// Commit warning in `language`, falling back to the base text.
    pub fn commit_warning_for(&self, language: &str) -> Option<&str> {
        self.text
            .translations
            .iter()
            .find(|t| t.language == language)
            .and_then(|t| t.commit_warning.as_deref())
            .or(self.commit_warning.as_deref())
    }
}

/// A field on a tab. Most value-level metadata lives on the underlying
/// [`Column`]; the field carries UI placement and per-field overrides.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub id: i32,
    pub uuid: String,

    #[serde(flatten)]
    pub text: DisplayText,

    #[serde(default)]
    pub is_allow_copy: bool,

    #[serde(default)]
    pub is_heading: bool,

    #[serde(default)]
    pub is_field_only: bool,

    /// Underlying column
    pub column_id: i32,

    /// Display-kind override; 0 falls back to the column's kind
    #[serde(default)]
    pub reference_id: i32,

    /// Reference-value override; 0 falls back to the column's
    #[serde(default)]
    pub reference_value_id: i32,

    /// Validation-rule override; 0 falls back to the column's
    #[serde(default)]
    pub validation_rule_id: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default)]
    pub is_encrypted: bool,

    #[serde(default)]
    pub is_displayed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_logic: Option<String>,

    #[serde(default)]
    pub sequence: i32,

    #[serde(default)]
    pub is_displayed_grid: bool,

    #[serde(default)]
    pub grid_sequence: i32,

    #[serde(default)]
    pub is_read_only: bool,

    /// Explicit mandatory override. Only `Some(true)` wins over the
    /// column's flag; unset and explicit `false` both fall back.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mandatory: Option<bool>,
}

/// A table column: the value-level metadata behind window fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub id: i32,
    pub column_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_sql: Option<String>,

    #[serde(default)]
    pub is_key: bool,

    #[serde(default)]
    pub is_translated: bool,

    #[serde(default)]
    pub is_identifier: bool,

    /// Identifier ordering among the table's identifier columns
    #[serde(default)]
    pub sequence: i32,

    #[serde(default)]
    pub is_selection_column: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callout: Option<String>,

    /// Display kind of the column's values
    #[serde(default)]
    pub reference_id: i32,

    #[serde(default)]
    pub reference_value_id: i32,

    #[serde(default)]
    pub validation_rule_id: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default)]
    pub field_length: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format_pattern: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_min: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_max: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_logic: Option<String>,

    #[serde(default)]
    pub is_updateable: bool,

    #[serde(default)]
    pub is_always_updateable: bool,

    #[serde(default)]
    pub is_mandatory: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory_logic: Option<String>,

    /// Column-linked process (e.g. a button column), 0 if none
    #[serde(default)]
    pub process_id: i32,
}

/// A table definition referenced by tabs and browsers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub id: i32,
    pub table_name: String,

    #[serde(default)]
    pub access_level: String,

    #[serde(default)]
    pub is_view: bool,

    #[serde(default)]
    pub is_document: bool,

    #[serde(default)]
    pub is_deleteable: bool,

    #[serde(default)]
    pub is_change_log: bool,

    #[serde(default)]
    pub key_columns: Vec<String>,

    #[serde(default)]
    pub columns: Vec<Column>,

    /// Processes assigned at table level
    #[serde(default)]
    pub process_ids: Vec<i32>,
}

/// A process or report definition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Process {
    pub id: i32,
    pub uuid: String,

    #[serde(flatten)]
    pub text: DisplayText,

    #[serde(default)]
    pub is_report: bool,

    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Linked smart browser, 0 if none
    #[serde(default)]
    pub browser_id: i32,

    /// Linked form, 0 if none
    #[serde(default)]
    pub form_id: i32,

    /// Linked workflow, 0 if none
    #[serde(default)]
    pub workflow_id: i32,
}

fn default_active() -> bool {
    true
}

/// A smart-browser definition: a query surface over a view, composed of
/// fields.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Browser {
    pub id: i32,
    pub uuid: String,

    /// Search key
    #[serde(default)]
    pub code: String,

    #[serde(flatten)]
    pub text: DisplayText,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default)]
    pub is_execute_query_by_default: bool,

    #[serde(default)]
    pub is_collapsible_by_default: bool,

    #[serde(default)]
    pub is_selected_by_default: bool,

    #[serde(default)]
    pub is_show_total: bool,

    #[serde(default)]
    pub access_level: String,

    #[serde(default)]
    pub is_updateable: bool,

    #[serde(default)]
    pub is_deleteable: bool,

    #[serde(default)]
    pub table_id: i32,

    #[serde(default)]
    pub process_id: i32,

    #[serde(default)]
    pub window_id: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<String>,

    /// Fields in catalog-defined order
    #[serde(default)]
    pub fields: Vec<BrowserField>,
}

impl Browser {
    /// The configured key field, if any.
    pub fn key_field(&self) -> Option<&BrowserField> {
        self.fields.iter().find(|f| f.is_key)
    }
}

/// A field on a smart browser. Unlike window fields, browser fields carry
/// their value metadata directly; the underlying column only supplies the
/// element name.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BrowserField {
    pub id: i32,
    pub uuid: String,

    #[serde(flatten)]
    pub text: DisplayText,

    /// Display kind of the field's values
    #[serde(default)]
    pub reference_id: i32,

    #[serde(default)]
    pub reference_value_id: i32,

    #[serde(default)]
    pub validation_rule_id: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callout: Option<String>,

    #[serde(default)]
    pub is_order_by: bool,

    #[serde(default)]
    pub is_key: bool,

    #[serde(default)]
    pub is_identifier: bool,

    /// View column the field selects
    pub column_name: String,

    /// Underlying table column, 0 for computed view columns
    #[serde(default)]
    pub column_id: i32,

    /// Element-level column name, the fallback when no table column backs
    /// the view column
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_column_name: Option<String>,

    #[serde(default)]
    pub is_range: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value_to: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub v_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_min: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_max: Option<String>,

    #[serde(default)]
    pub is_displayed: bool,

    #[serde(default)]
    pub is_query_criteria: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_logic: Option<String>,

    #[serde(default)]
    pub sequence: i32,

    #[serde(default)]
    pub grid_sequence: i32,

    #[serde(default)]
    pub is_read_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_logic: Option<String>,

    #[serde(default)]
    pub is_info_only: bool,

    #[serde(default)]
    pub is_mandatory: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_with_translation() -> DisplayText {
        DisplayText {
            name: "Business Partner".into(),
            description: Some("Partner master data".into()),
            help: None,
            translations: vec![Translation {
                language: "es_VE".into(),
                name: Some("Socio de Negocio".into()),
                description: None,
                help: Some("Datos maestros".into()),
                commit_warning: None,
            }],
        }
    }

    #[test]
    fn translation_overrides_only_what_it_carries() {
        let text = text_with_translation();
        assert_eq!(text.name_for("es_VE"), "Socio de Negocio");
        assert_eq!(text.description_for("es_VE"), Some("Partner master data"));
        assert_eq!(text.help_for("es_VE"), Some("Datos maestros"));
    }

    #[test]
    fn unknown_language_falls_back_to_base() {
        let text = text_with_translation();
        assert_eq!(text.name_for("de_DE"), "Business Partner");
        assert_eq!(text.help_for("de_DE"), None);
    }

    #[test]
    fn key_field_is_first_flagged() {
        let browser = Browser {
            id: 1,
            uuid: "b-1".into(),
            code: "B".into(),
            text: DisplayText { name: "B".into(), ..Default::default() },
            is_active: true,
            is_execute_query_by_default: false,
            is_collapsible_by_default: false,
            is_selected_by_default: false,
            is_show_total: false,
            access_level: "3".into(),
            is_updateable: false,
            is_deleteable: false,
            table_id: 0,
            process_id: 0,
            window_id: 0,
            where_clause: None,
            fields: vec![
                BrowserField {
                    is_key: false,
                    ..browser_field("F1", "Col1")
                },
                BrowserField {
                    is_key: true,
                    ..browser_field("F2", "Col2")
                },
            ],
        };
        assert_eq!(browser.key_field().map(|f| f.column_name.as_str()), Some("Col2"));
    }

    fn browser_field(uuid: &str, column_name: &str) -> BrowserField {
        BrowserField {
            id: 0,
            uuid: uuid.into(),
            text: DisplayText::default(),
            reference_id: 0,
            reference_value_id: 0,
            validation_rule_id: 0,
            callout: None,
            is_order_by: false,
            is_key: false,
            is_identifier: false,
            column_name: column_name.into(),
            column_id: 0,
            element_column_name: None,
            is_range: false,
            default_value: None,
            default_value_to: None,
            v_format: None,
            value_min: None,
            value_max: None,
            is_displayed: false,
            is_query_criteria: false,
            display_logic: None,
            sequence: 0,
            grid_sequence: 0,
            is_read_only: false,
            read_only_logic: None,
            is_info_only: false,
            is_mandatory: false,
        }
    }
}
