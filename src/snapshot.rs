//! Offline catalog snapshot
//!
//! A [`CatalogSnapshot`] is a JSON export of the application dictionary:
//! the windows and browsers to publish plus the tables, processes, and
//! lookup definitions they reference. [`SnapshotCatalog`] indexes one
//! snapshot in memory and implements every collaborator trait the
//! assemblers consume, which makes it both the CLI's catalog backend and
//! the reference implementation for tests.

use crate::catalog::{
    DependentFieldSource, DictionaryCatalog, LookupMetadata, LookupMetadataSource,
    ValidationRuleSource,
};
use crate::context::{extract_context_variables, join_expression_sources};
use crate::error::{Error, Result};
use crate::model::{
    Browser, BrowserField, Column, EntitySummary, Field, Process, Tab, Table, Window,
};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// A lookup definition row: which reference it serves and the metadata the
/// resolver needs.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LookupDefinition {
    /// Display kind the definition serves
    #[serde(default)]
    pub reference_id: i32,

    /// Column the definition is keyed on, for column-driven lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_name: Option<String>,

    /// Reference-value the definition is keyed on, for list/table lookups
    #[serde(default)]
    pub reference_value_id: i32,

    #[serde(flatten)]
    pub metadata: LookupMetadata,
}

/// A validation rule row.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ValidationRule {
    pub id: i32,

    #[serde(default)]
    pub name: String,

    pub code: String,
}

/// A full dictionary export.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CatalogSnapshot {
    /// When the export was taken
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub windows: Vec<Window>,

    #[serde(default)]
    pub browsers: Vec<Browser>,

    #[serde(default)]
    pub tables: Vec<Table>,

    #[serde(default)]
    pub processes: Vec<Process>,

    #[serde(default)]
    pub forms: Vec<EntitySummary>,

    #[serde(default)]
    pub workflows: Vec<EntitySummary>,

    #[serde(default)]
    pub lookups: Vec<LookupDefinition>,

    #[serde(default)]
    pub validation_rules: Vec<ValidationRule>,
}

impl CatalogSnapshot {
    /// Parse a snapshot from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::SnapshotParse(e.to_string()))
    }

    /// Read and parse a snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// An indexed, read-only view over one [`CatalogSnapshot`].
pub struct SnapshotCatalog {
    snapshot: CatalogSnapshot,
    columns: HashMap<i32, Column>,
    tables: HashMap<i32, usize>,
    processes: HashMap<i32, usize>,
    forms: HashMap<i32, usize>,
    workflows: HashMap<i32, usize>,
    windows: HashMap<i32, usize>,
    browsers: HashMap<i32, usize>,
}

impl SnapshotCatalog {
    pub fn new(snapshot: CatalogSnapshot) -> Self {
        let mut columns = HashMap::new();
        let mut tables = HashMap::new();
        for (index, table) in snapshot.tables.iter().enumerate() {
            tables.insert(table.id, index);
            for column in &table.columns {
                columns.insert(column.id, column.clone());
            }
        }
        let processes =
            snapshot.processes.iter().enumerate().map(|(i, p)| (p.id, i)).collect();
        let forms = snapshot.forms.iter().enumerate().map(|(i, f)| (f.id, i)).collect();
        let workflows =
            snapshot.workflows.iter().enumerate().map(|(i, w)| (w.id, i)).collect();
        let windows = snapshot.windows.iter().enumerate().map(|(i, w)| (w.id, i)).collect();
        let browsers = snapshot.browsers.iter().enumerate().map(|(i, b)| (b.id, i)).collect();
        debug!(
            windows = snapshot.windows.len(),
            browsers = snapshot.browsers.len(),
            tables = snapshot.tables.len(),
            "indexed catalog snapshot"
        );
        Self { snapshot, columns, tables, processes, forms, workflows, windows, browsers }
    }

    pub fn snapshot(&self) -> &CatalogSnapshot {
        &self.snapshot
    }

    pub fn windows(&self) -> &[Window] {
        &self.snapshot.windows
    }

    pub fn browsers(&self) -> &[Browser] {
        &self.snapshot.browsers
    }

    fn summary_of(id: i32, index: &HashMap<i32, usize>, rows: &[EntitySummary]) -> Option<EntitySummary> {
        index.get(&id).map(|&position| rows[position].clone())
    }

    /// The dependency sources of a window field, concatenated for
    /// scanning.
    fn window_field_sources(&self, field: &Field) -> String {
        let column = self.columns.get(&field.column_id);
        join_expression_sources([
            field
                .default_value
                .as_deref()
                .or(column.and_then(|c| c.default_value.as_deref())),
            field.display_logic.as_deref(),
            column.and_then(|c| c.read_only_logic.as_deref()),
            column.and_then(|c| c.mandatory_logic.as_deref()),
        ])
    }
}

impl DictionaryCatalog for SnapshotCatalog {
    fn column(&self, column_id: i32) -> Result<Option<Column>> {
        Ok(self.columns.get(&column_id).cloned())
    }

    fn table(&self, table_id: i32) -> Result<Option<Table>> {
        Ok(self.tables.get(&table_id).map(|&index| self.snapshot.tables[index].clone()))
    }

    fn process(&self, process_id: i32) -> Result<Option<Process>> {
        Ok(self.processes.get(&process_id).map(|&index| self.snapshot.processes[index].clone()))
    }

    fn window_summary(&self, window_id: i32) -> Result<Option<EntitySummary>> {
        Ok(self.windows.get(&window_id).map(|&index| {
            let window = &self.snapshot.windows[index];
            EntitySummary { id: window.id, uuid: window.uuid.clone(), text: window.text.clone() }
        }))
    }

    fn browse_summary(&self, browser_id: i32) -> Result<Option<EntitySummary>> {
        Ok(self.browsers.get(&browser_id).map(|&index| {
            let browser = &self.snapshot.browsers[index];
            EntitySummary { id: browser.id, uuid: browser.uuid.clone(), text: browser.text.clone() }
        }))
    }

    fn form_summary(&self, form_id: i32) -> Result<Option<EntitySummary>> {
        Ok(Self::summary_of(form_id, &self.forms, &self.snapshot.forms))
    }

    fn workflow_summary(&self, workflow_id: i32) -> Result<Option<EntitySummary>> {
        Ok(Self::summary_of(workflow_id, &self.workflows, &self.snapshot.workflows))
    }

    fn column_linked_processes(&self, tab: &Tab) -> Result<Vec<Process>> {
        let mut linked = Vec::new();
        for field in &tab.fields {
            if !field.is_displayed {
                continue;
            }
            let Some(column) = self.columns.get(&field.column_id) else {
                continue;
            };
            if column.process_id > 0 {
                if let Some(process) = self.process(column.process_id)? {
                    linked.push(process);
                }
            }
        }
        Ok(linked)
    }

    fn table_linked_processes(&self, table_id: i32) -> Result<Vec<Process>> {
        let Some(&index) = self.tables.get(&table_id) else {
            return Ok(Vec::new());
        };
        let mut linked = Vec::new();
        for &process_id in &self.snapshot.tables[index].process_ids {
            if let Some(process) = self.process(process_id)? {
                linked.push(process);
            }
        }
        Ok(linked)
    }
}

impl LookupMetadataSource for SnapshotCatalog {
    fn lookup_metadata(
        &self,
        reference_id: i32,
        column_name: &str,
        reference_value_id: i32,
    ) -> Result<Option<LookupMetadata>> {
        let found = self.snapshot.lookups.iter().find(|definition| {
            if reference_value_id > 0 {
                definition.reference_value_id == reference_value_id
            } else {
                definition.reference_id == reference_id
                    && definition.column_name.as_deref() == Some(column_name)
            }
        });
        Ok(found.map(|definition| definition.metadata.clone()))
    }
}

impl ValidationRuleSource for SnapshotCatalog {
    fn validation_code(&self, validation_rule_id: i32) -> Result<Option<String>> {
        Ok(self
            .snapshot
            .validation_rules
            .iter()
            .find(|rule| rule.id == validation_rule_id)
            .map(|rule| rule.code.clone()))
    }
}

impl DependentFieldSource for SnapshotCatalog {
    /// Sibling fields on the same tab whose expressions reference this
    /// field's column.
    fn window_field_dependents(&self, tab: &Tab, field: &Field) -> Result<Value> {
        let Some(column) = self.columns.get(&field.column_id) else {
            return Ok(Value::Array(Vec::new()));
        };
        let mut dependents = Vec::new();
        for sibling in &tab.fields {
            if sibling.id == field.id {
                continue;
            }
            let sources = self.window_field_sources(sibling);
            if extract_context_variables(&sources).contains(&column.column_name) {
                let sibling_column =
                    self.columns.get(&sibling.column_id).map(|c| c.column_name.clone());
                dependents.push(dependent_entry(sibling.id, &sibling.uuid, &sibling.text.name, sibling_column));
            }
        }
        Ok(Value::Array(dependents))
    }

    fn browser_field_dependents(&self, browser: &Browser, field: &BrowserField) -> Result<Value> {
        let mut dependents = Vec::new();
        for sibling in &browser.fields {
            if sibling.id == field.id {
                continue;
            }
            let sources = join_expression_sources([
                sibling.default_value.as_deref(),
                sibling.default_value_to.as_deref(),
                sibling.display_logic.as_deref(),
                sibling.read_only_logic.as_deref(),
            ]);
            if extract_context_variables(&sources).contains(&field.column_name) {
                dependents.push(dependent_entry(
                    sibling.id,
                    &sibling.uuid,
                    &sibling.text.name,
                    Some(sibling.column_name.clone()),
                ));
            }
        }
        Ok(Value::Array(dependents))
    }
}

fn dependent_entry(id: i32, uuid: &str, name: &str, column_name: Option<String>) -> Value {
    let mut entry = serde_json::Map::new();
    entry.insert("id".to_string(), Value::from(id));
    entry.insert("uuid".to_string(), Value::from(uuid));
    entry.insert("name".to_string(), Value::from(name));
    if let Some(column_name) = column_name {
        entry.insert("column_name".to_string(), Value::from(column_name));
    }
    Value::Object(entry)
}
