//! Collaborator interfaces around the dictionary catalog
//!
//! The assemblers never reach into ambient state: every catalog read goes
//! through these traits, passed in explicitly. That keeps the core
//! testable with struct-literal fixtures and leaves the storage model
//! (live database, offline snapshot, …) to the implementor.
//!
//! Lookup failures follow one rule: returning `Ok(None)` for an ID an
//! entity positively references is fatal for that entity's document —
//! the assembler aborts rather than emitting a partial record.

use crate::error::Result;
use crate::model::{Browser, BrowserField, Column, EntitySummary, Field, Process, Tab, Table};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// ID-based reads the assemblers need while walking an entity graph.
pub trait DictionaryCatalog {
    fn column(&self, column_id: i32) -> Result<Option<Column>>;

    fn table(&self, table_id: i32) -> Result<Option<Table>>;

    fn process(&self, process_id: i32) -> Result<Option<Process>>;

    fn window_summary(&self, window_id: i32) -> Result<Option<EntitySummary>>;

    fn browse_summary(&self, browser_id: i32) -> Result<Option<EntitySummary>>;

    fn form_summary(&self, form_id: i32) -> Result<Option<EntitySummary>>;

    fn workflow_summary(&self, workflow_id: i32) -> Result<Option<EntitySummary>>;

    /// Processes linked through columns of the tab's displayed fields.
    fn column_linked_processes(&self, tab: &Tab) -> Result<Vec<Process>>;

    /// Processes assigned to the table itself.
    fn table_linked_processes(&self, table_id: i32) -> Result<Vec<Process>>;
}

/// Lookup definition metadata for generic (non-fixed-table) references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LookupMetadata {
    /// Declared target table
    pub table_name: String,

    /// Primary query text
    #[serde(default)]
    pub query: Option<String>,

    /// Direct (by-key) query text
    #[serde(default)]
    pub direct_query: Option<String>,

    /// Validation code embedded in the lookup definition
    #[serde(default)]
    pub validation_code: Option<String>,
}

/// Resolves generic lookup references that carry no fixed target table.
pub trait LookupMetadataSource {
    fn lookup_metadata(
        &self,
        reference_id: i32,
        column_name: &str,
        reference_value_id: i32,
    ) -> Result<Option<LookupMetadata>>;
}

/// Resolves validation-rule IDs to their code text.
pub trait ValidationRuleSource {
    fn validation_code(&self, validation_rule_id: i32) -> Result<Option<String>>;
}

/// Computes the fields whose expressions depend on a given field.
///
/// The computation is opaque to the core: whatever JSON value the
/// implementor returns is placed into the field detail as-is.
pub trait DependentFieldSource {
    fn window_field_dependents(&self, tab: &Tab, field: &Field) -> Result<Value>;

    fn browser_field_dependents(&self, browser: &Browser, field: &BrowserField) -> Result<Value>;
}
