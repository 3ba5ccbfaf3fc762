//! Window document assembly
//!
//! Walks window → tabs → fields, resolving table, column, and process
//! cross-references through the catalog and accumulating per-field context
//! variables and reference definitions.

use super::{
    context_names_value, put_display_text, put_optional, require, summary_detail, AssemblyContext,
};
use crate::context::{extract_context_variables, join_expression_sources};
use crate::envelope::{DictionaryDocument, DocumentChannel, DocumentScope};
use crate::error::Result;
use crate::model::{Field, Process, Tab, Window};
use crate::reference::resolve_reference;
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::debug;

/// Assemble the document for one window definition.
pub fn window_document(
    ctx: &AssemblyContext<'_>,
    window: &Window,
    scope: DocumentScope,
) -> Result<DictionaryDocument> {
    let language = scope.language().to_string();
    debug!(window = window.id, tabs = window.tabs.len(), "assembling window document");

    let mut detail = Map::new();
    detail.insert("id".to_string(), Value::from(window.id));
    detail.insert("uuid".to_string(), Value::from(window.uuid.as_str()));
    put_display_text(&mut detail, &window.text, &language);
    detail.insert("window_type".to_string(), Value::from(window.window_type.as_str()));
    detail.insert(
        "is_sales_transaction".to_string(),
        Value::from(window.is_sales_transaction),
    );

    let mut tabs = Vec::with_capacity(window.tabs.len());
    for tab in &window.tabs {
        tabs.push(Value::Object(tab_detail(ctx, tab, &language)?));
    }
    detail.insert("tabs".to_string(), Value::Array(tabs));

    Ok(DictionaryDocument::seal(DocumentChannel::Window, scope, detail))
}

fn tab_detail(ctx: &AssemblyContext<'_>, tab: &Tab, language: &str) -> Result<Map<String, Value>> {
    let mut detail = Map::new();
    detail.insert("id".to_string(), Value::from(tab.id));
    detail.insert("uuid".to_string(), Value::from(tab.uuid.as_str()));
    put_display_text(&mut detail, &tab.text, language);

    // Record attributes
    detail.insert("is_insert_record".to_string(), Value::from(tab.is_insert_record));
    put_optional(&mut detail, "commit_warning", tab.commit_warning_for(language));

    // Attributes
    put_optional(&mut detail, "display_logic", tab.display_logic.as_deref());
    detail.insert("sequence".to_string(), Value::from(tab.sequence));
    detail.insert("tab_level".to_string(), Value::from(tab.tab_level));
    detail.insert("is_read_only".to_string(), Value::from(tab.is_read_only));
    put_optional(&mut detail, "read_only_logic", tab.read_only_logic.as_deref());
    detail.insert("is_single_row".to_string(), Value::from(tab.is_single_row));
    detail.insert("is_advanced_tab".to_string(), Value::from(tab.is_advanced_tab));
    detail.insert("is_has_tree".to_string(), Value::from(tab.is_has_tree));
    detail.insert("is_info_tab".to_string(), Value::from(tab.is_info_tab));
    detail.insert("is_translation_tab".to_string(), Value::from(tab.is_translation_tab));

    // Table attributes
    if tab.table_id > 0 {
        let table = require(ctx.catalog.table(tab.table_id)?, "table", tab.table_id)?;
        detail.insert("table_name".to_string(), Value::from(table.table_name.as_str()));

        let mut table_detail = Map::new();
        table_detail.insert("table_name".to_string(), Value::from(table.table_name.as_str()));
        table_detail.insert("access_level".to_string(), Value::from(table.access_level.as_str()));
        table_detail.insert(
            "key_columns".to_string(),
            Value::Array(table.key_columns.iter().map(|c| Value::from(c.as_str())).collect()),
        );
        table_detail.insert("is_view".to_string(), Value::from(table.is_view));
        table_detail.insert("is_document".to_string(), Value::from(table.is_document));
        table_detail.insert("is_deleteable".to_string(), Value::from(table.is_deleteable));
        table_detail.insert("is_change_log".to_string(), Value::from(table.is_change_log));

        let mut identifier_columns: Vec<_> =
            table.columns.iter().filter(|c| c.is_identifier).collect();
        identifier_columns.sort_by_key(|c| c.sequence);
        table_detail.insert(
            "identifier_columns".to_string(),
            Value::Array(
                identifier_columns.iter().map(|c| Value::from(c.column_name.as_str())).collect(),
            ),
        );
        table_detail.insert(
            "selection_colums".to_string(),
            Value::Array(
                table
                    .columns
                    .iter()
                    .filter(|c| c.is_selection_column)
                    .map(|c| Value::from(c.column_name.as_str()))
                    .collect(),
            ),
        );
        detail.insert("table".to_string(), Value::Object(table_detail));
    }

    // Link attributes
    let context_names = extract_context_variables(&join_expression_sources([
        tab.where_clause.as_deref(),
        tab.order_by_clause.as_deref(),
    ]));
    detail.insert("context_column_names".to_string(), context_names_value(context_names));
    if tab.parent_column_id > 0 {
        let column = require(ctx.catalog.column(tab.parent_column_id)?, "column", tab.parent_column_id)?;
        detail.insert("parent_column_name".to_string(), Value::from(column.column_name));
    }
    if tab.link_column_id > 0 {
        let column = require(ctx.catalog.column(tab.link_column_id)?, "column", tab.link_column_id)?;
        detail.insert("link_column_name".to_string(), Value::from(column.column_name));
    }

    // Sort attributes
    detail.insert("is_sort_tab".to_string(), Value::from(tab.is_sort_tab));
    if tab.is_sort_tab {
        if tab.sort_order_column_id > 0 {
            let column =
                require(ctx.catalog.column(tab.sort_order_column_id)?, "column", tab.sort_order_column_id)?;
            detail.insert("sort_order_column_name".to_string(), Value::from(column.column_name));
        }
        if tab.sort_yes_no_column_id > 0 {
            let column =
                require(ctx.catalog.column(tab.sort_yes_no_column_id)?, "column", tab.sort_yes_no_column_id)?;
            detail.insert("sort_yes_no_column_name".to_string(), Value::from(column.column_name));
        }
    }

    // External info
    detail.insert("window_id".to_string(), Value::from(tab.window_id));
    detail.insert("process_id".to_string(), Value::from(tab.process_id));

    let mut linked: Vec<Process> = Vec::new();
    if tab.process_id > 0 {
        let process = require(ctx.catalog.process(tab.process_id)?, "process", tab.process_id)?;
        if process.is_active {
            detail.insert(
                "process".to_string(),
                Value::Object(process_detail(ctx, &process, language)?),
            );
        }
        linked.push(process);
    }
    linked.extend(ctx.catalog.column_linked_processes(tab)?);
    if tab.table_id > 0 {
        linked.extend(ctx.catalog.table_linked_processes(tab.table_id)?);
    }
    // One entry per process, no matter how many linkage sources carry it.
    let mut seen = HashSet::new();
    let mut processes = Vec::new();
    for process in &linked {
        if process.is_active && seen.insert(process.id) {
            processes.push(Value::Object(process_detail(ctx, process, language)?));
        }
    }
    detail.insert("processes".to_string(), Value::Array(processes));

    // Fields
    let mut fields = Vec::with_capacity(tab.fields.len());
    let mut row_fields = Vec::new();
    let mut grid_fields = Vec::new();
    for field in &tab.fields {
        let parsed = Value::Object(field_detail(ctx, tab, field, language)?);
        if field.is_displayed {
            row_fields.push(parsed.clone());
        }
        if field.is_displayed_grid {
            grid_fields.push(parsed.clone());
        }
        fields.push(parsed);
    }
    detail.insert("fields".to_string(), Value::Array(fields));
    detail.insert("row_fields".to_string(), Value::Array(row_fields));
    detail.insert("grid_fields".to_string(), Value::Array(grid_fields));

    Ok(detail)
}

fn process_detail(
    ctx: &AssemblyContext<'_>,
    process: &Process,
    language: &str,
) -> Result<Map<String, Value>> {
    let mut detail = Map::new();
    detail.insert("id".to_string(), Value::from(process.id));
    detail.insert("uuid".to_string(), Value::from(process.uuid.as_str()));
    put_display_text(&mut detail, &process.text, language);
    detail.insert("is_report".to_string(), Value::from(process.is_report));

    // Linked
    detail.insert("browser_id".to_string(), Value::from(process.browser_id));
    detail.insert("form_id".to_string(), Value::from(process.form_id));
    detail.insert("workflow_id".to_string(), Value::from(process.workflow_id));
    if process.browser_id > 0 {
        let browse = require(ctx.catalog.browse_summary(process.browser_id)?, "browser", process.browser_id)?;
        detail.insert("browse".to_string(), Value::Object(summary_detail(&browse, language)));
    } else if process.form_id > 0 {
        let form = require(ctx.catalog.form_summary(process.form_id)?, "form", process.form_id)?;
        detail.insert("form".to_string(), Value::Object(summary_detail(&form, language)));
    } else if process.workflow_id > 0 {
        let workflow =
            require(ctx.catalog.workflow_summary(process.workflow_id)?, "workflow", process.workflow_id)?;
        detail.insert("workflow".to_string(), Value::Object(summary_detail(&workflow, language)));
    }
    Ok(detail)
}

fn field_detail(
    ctx: &AssemblyContext<'_>,
    tab: &Tab,
    field: &Field,
    language: &str,
) -> Result<Map<String, Value>> {
    let column = require(ctx.catalog.column(field.column_id)?, "column", field.column_id)?;

    let mut detail = Map::new();
    detail.insert("id".to_string(), Value::from(field.id));
    detail.insert("uuid".to_string(), Value::from(field.uuid.as_str()));
    put_display_text(&mut detail, &field.text, language);

    detail.insert("is_allow_copy".to_string(), Value::from(field.is_allow_copy));
    detail.insert("is_heading".to_string(), Value::from(field.is_heading));
    detail.insert("is_field_only".to_string(), Value::from(field.is_field_only));

    // Column properties
    detail.insert("column_name".to_string(), Value::from(column.column_name.as_str()));
    put_optional(&mut detail, "column_sql", column.column_sql.as_deref());
    detail.insert("is_key".to_string(), Value::from(column.is_key));
    detail.insert("is_translated".to_string(), Value::from(column.is_translated));
    detail.insert("is_identifier".to_string(), Value::from(column.is_identifier));
    detail.insert("identifier_sequence".to_string(), Value::from(column.sequence));
    detail.insert("is_selection_column".to_string(), Value::from(column.is_selection_column));
    put_optional(&mut detail, "callout", column.callout.as_deref());

    // The field may override the column's display kind and lookup wiring.
    let display_type = if field.reference_id > 0 { field.reference_id } else { column.reference_id };
    detail.insert("display_type".to_string(), Value::from(display_type));

    // Value properties
    let default_value = field.default_value.as_deref().or(column.default_value.as_deref());
    put_optional(&mut detail, "default_value", default_value);
    detail.insert("field_length".to_string(), Value::from(column.field_length));
    put_optional(&mut detail, "v_format", column.v_format.as_deref());
    put_optional(&mut detail, "format_pattern", column.format_pattern.as_deref());
    put_optional(&mut detail, "value_min", column.value_min.as_deref());
    put_optional(&mut detail, "value_max", column.value_max.as_deref());
    detail.insert("is_encrypted".to_string(), Value::from(field.is_encrypted));

    // Display properties
    detail.insert("is_displayed".to_string(), Value::from(field.is_displayed));
    put_optional(&mut detail, "display_logic", field.display_logic.as_deref());
    detail.insert("sequence".to_string(), Value::from(field.sequence));
    detail.insert("is_displayed_grid".to_string(), Value::from(field.is_displayed_grid));
    detail.insert("grid_sequence".to_string(), Value::from(field.grid_sequence));

    // Editable properties
    detail.insert("is_read_only".to_string(), Value::from(field.is_read_only));
    put_optional(&mut detail, "read_only_logic", column.read_only_logic.as_deref());
    detail.insert("is_updateable".to_string(), Value::from(column.is_updateable));
    detail.insert("is_always_updateable".to_string(), Value::from(column.is_always_updateable));

    // Mandatory properties: only an explicit true on the field wins over
    // the column flag.
    let is_mandatory = match field.is_mandatory {
        Some(true) => true,
        _ => column.is_mandatory,
    };
    detail.insert("is_mandatory".to_string(), Value::from(is_mandatory));
    put_optional(&mut detail, "mandatory_logic", column.mandatory_logic.as_deref());

    // External info
    let reference_value_id = if field.reference_value_id > 0 {
        field.reference_value_id
    } else {
        column.reference_value_id
    };
    let validation_rule_id = if field.validation_rule_id > 0 {
        field.validation_rule_id
    } else {
        column.validation_rule_id
    };
    let mut embedded_context_expression = None;
    if let Some(reference) = resolve_reference(
        ctx.lookups,
        ctx.rules,
        &column.column_name,
        display_type,
        reference_value_id,
        validation_rule_id,
    )? {
        let mut reference_detail = Map::new();
        reference_detail.insert("id".to_string(), Value::from(reference.reference_id));
        if let Some(table_name) = &reference.table_name {
            reference_detail.insert("table_name".to_string(), Value::from(table_name.as_str()));
        }
        detail.insert("reference".to_string(), Value::Object(reference_detail));
        embedded_context_expression = reference.embedded_context_expression;
    }

    let context_names = extract_context_variables(&join_expression_sources([
        default_value,
        field.display_logic.as_deref(),
        column.mandatory_logic.as_deref(),
        column.read_only_logic.as_deref(),
        embedded_context_expression.as_deref(),
    ]));
    detail.insert("context_column_names".to_string(), context_names_value(context_names));
    detail.insert(
        "dependent_fields".to_string(),
        ctx.dependents.window_field_dependents(tab, field)?,
    );

    detail.insert("process_id".to_string(), Value::from(column.process_id));
    if column.process_id > 0 {
        let process = require(ctx.catalog.process(column.process_id)?, "process", column.process_id)?;
        detail.insert("process".to_string(), Value::Object(process_detail(ctx, &process, language)?));
    }
    Ok(detail)
}
