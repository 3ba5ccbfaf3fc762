//! Browser document assembly
//!
//! Walks a smart-browser definition and its fields, emitting the five
//! named field subsets; a field may land in more than one subset.

use super::{
    context_names_value, put_display_text, put_optional, require, summary_detail, AssemblyContext,
};
use crate::context::{extract_context_variables, join_expression_sources};
use crate::envelope::{DictionaryDocument, DocumentChannel, DocumentScope};
use crate::error::Result;
use crate::model::{Browser, BrowserField};
use crate::reference::resolve_reference;
use serde_json::{Map, Value};
use tracing::debug;

/// Assemble the document for one browser definition.
pub fn browser_document(
    ctx: &AssemblyContext<'_>,
    browser: &Browser,
    scope: DocumentScope,
) -> Result<DictionaryDocument> {
    let language = scope.language().to_string();
    debug!(browser = browser.id, fields = browser.fields.len(), "assembling browser document");

    let mut detail = Map::new();
    detail.insert("id".to_string(), Value::from(browser.id));
    detail.insert("uuid".to_string(), Value::from(browser.uuid.as_str()));
    detail.insert("code".to_string(), Value::from(browser.code.as_str()));
    put_display_text(&mut detail, &browser.text, &language);
    detail.insert("is_active".to_string(), Value::from(browser.is_active));
    detail.insert(
        "is_execute_query_by_default".to_string(),
        Value::from(browser.is_execute_query_by_default),
    );
    detail.insert(
        "is_collapsible_by_default".to_string(),
        Value::from(browser.is_collapsible_by_default),
    );
    detail.insert(
        "is_selected_by_default".to_string(),
        Value::from(browser.is_selected_by_default),
    );
    detail.insert("is_show_total".to_string(), Value::from(browser.is_show_total));

    if let Some(key_field) = browser.key_field() {
        detail.insert("field_key".to_string(), Value::from(key_field.column_name.as_str()));
    }

    // Record attributes
    detail.insert("access_level".to_string(), Value::from(browser.access_level.as_str()));
    detail.insert("is_updateable".to_string(), Value::from(browser.is_updateable));
    detail.insert("is_deleteable".to_string(), Value::from(browser.is_deleteable));
    if browser.table_id > 0 {
        let table = require(ctx.catalog.table(browser.table_id)?, "table", browser.table_id)?;
        detail.insert("table_name".to_string(), Value::from(table.table_name));
    }

    // External references
    detail.insert("process_id".to_string(), Value::from(browser.process_id));
    if browser.process_id > 0 {
        let process = require(ctx.catalog.process(browser.process_id)?, "process", browser.process_id)?;
        let mut process_detail = Map::new();
        process_detail.insert("id".to_string(), Value::from(process.id));
        process_detail.insert("uuid".to_string(), Value::from(process.uuid.as_str()));
        put_display_text(&mut process_detail, &process.text, &language);
        detail.insert("process".to_string(), Value::Object(process_detail));
    }

    detail.insert("window_id".to_string(), Value::from(browser.window_id));
    if browser.window_id > 0 {
        let window =
            require(ctx.catalog.window_summary(browser.window_id)?, "window", browser.window_id)?;
        detail.insert("window".to_string(), Value::Object(summary_detail(&window, &language)));
    }

    let context_names =
        extract_context_variables(&join_expression_sources([browser.where_clause.as_deref()]));
    detail.insert("context_column_names".to_string(), context_names_value(context_names));

    // Field subsets; one parse per field, shared across subsets.
    let mut display_fields = Vec::new();
    let mut criteria_fields = Vec::new();
    let mut identifier_fields = Vec::new();
    let mut order_fields = Vec::new();
    let mut editable_fields = Vec::new();
    for field in &browser.fields {
        let parsed = Value::Object(field_detail(ctx, browser, field, &language)?);
        if field.is_displayed {
            display_fields.push(parsed.clone());
        }
        if field.is_query_criteria {
            criteria_fields.push(parsed.clone());
        }
        if field.is_identifier {
            identifier_fields.push(parsed.clone());
        }
        if field.is_order_by {
            order_fields.push(parsed.clone());
        }
        if !field.is_read_only {
            editable_fields.push(parsed);
        }
    }
    detail.insert("display_fields".to_string(), Value::Array(display_fields));
    detail.insert("criteria_fields".to_string(), Value::Array(criteria_fields));
    detail.insert("identifier_fields".to_string(), Value::Array(identifier_fields));
    detail.insert("order_fields".to_string(), Value::Array(order_fields));
    detail.insert("editable_fields".to_string(), Value::Array(editable_fields));

    Ok(DictionaryDocument::seal(DocumentChannel::Browser, scope, detail))
}

fn field_detail(
    ctx: &AssemblyContext<'_>,
    browser: &Browser,
    field: &BrowserField,
    language: &str,
) -> Result<Map<String, Value>> {
    let mut detail = Map::new();
    detail.insert("id".to_string(), Value::from(field.id));
    detail.insert("uuid".to_string(), Value::from(field.uuid.as_str()));
    put_display_text(&mut detail, &field.text, language);
    detail.insert("display_type".to_string(), Value::from(field.reference_id));
    put_optional(&mut detail, "callout", field.callout.as_deref());

    detail.insert("is_order_by".to_string(), Value::from(field.is_order_by));
    detail.insert("is_key".to_string(), Value::from(field.is_key));
    detail.insert("is_identifier".to_string(), Value::from(field.is_identifier));

    detail.insert("column_name".to_string(), Value::from(field.column_name.as_str()));

    // Value properties
    detail.insert("is_range".to_string(), Value::from(field.is_range));
    put_optional(&mut detail, "default_value", field.default_value.as_deref());
    put_optional(&mut detail, "default_value_to", field.default_value_to.as_deref());
    put_optional(&mut detail, "value_format", field.v_format.as_deref());
    put_optional(&mut detail, "min_value", field.value_min.as_deref());
    put_optional(&mut detail, "max_value", field.value_max.as_deref());

    // Display properties
    detail.insert("is_displayed".to_string(), Value::from(field.is_displayed));
    detail.insert("is_query_criteria".to_string(), Value::from(field.is_query_criteria));
    put_optional(&mut detail, "display_logic", field.display_logic.as_deref());
    detail.insert("sequence".to_string(), Value::from(field.sequence));
    detail.insert("grid_sequence".to_string(), Value::from(field.grid_sequence));

    // Editable properties
    detail.insert("is_read_only".to_string(), Value::from(field.is_read_only));
    put_optional(&mut detail, "read_only_logic", field.read_only_logic.as_deref());
    detail.insert("is_info_only".to_string(), Value::from(field.is_info_only));

    // Mandatory properties
    detail.insert("is_mandatory".to_string(), Value::from(field.is_mandatory));

    // External info: element name comes from the backing table column when
    // one exists, otherwise from the element definition.
    let mut element_name = None;
    if field.column_id > 0 {
        let column = require(ctx.catalog.column(field.column_id)?, "column", field.column_id)?;
        if !column.column_name.is_empty() {
            element_name = Some(column.column_name);
        }
    }
    let element_name = element_name.or_else(|| field.element_column_name.clone());
    put_optional(&mut detail, "element_name", element_name.as_deref());
    detail.insert("reference_value_id".to_string(), Value::from(field.reference_value_id));

    let mut embedded_context_expression = None;
    if let Some(reference) = resolve_reference(
        ctx.lookups,
        ctx.rules,
        &field.column_name,
        field.reference_id,
        field.reference_value_id,
        field.validation_rule_id,
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
        field.default_value.as_deref(),
        field.default_value_to.as_deref(),
        field.display_logic.as_deref(),
        field.read_only_logic.as_deref(),
        embedded_context_expression.as_deref(),
    ]));
    detail.insert("context_column_names".to_string(), context_names_value(context_names));
    detail.insert(
        "dependent_fields".to_string(),
        ctx.dependents.browser_field_dependents(browser, field)?,
    );
    Ok(detail)
}
