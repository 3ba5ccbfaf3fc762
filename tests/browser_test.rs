//! Browser assembly against an in-memory catalog snapshot

use metadex::{
    browser_document, AssemblyContext, CatalogSnapshot, DocumentChannel, DocumentScope,
    SnapshotCatalog,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn catalog() -> SnapshotCatalog {
    let snapshot: CatalogSnapshot = serde_json::from_value(json!({
        "tables": [{
            "id": 200,
            "table_name": "C_Invoice",
            "access_level": "3",
            "columns": [
                {"id": 2001, "column_name": "C_Invoice_ID"},
                {"id": 2002, "column_name": "DateInvoiced"}
            ]
        }],
        "processes": [
            {"id": 601, "uuid": "p-601", "name": "Reprice Invoices", "is_report": true}
        ],
        "windows": [{
            "id": 50, "uuid": "win-50", "name": "Invoice",
            "translations": [{"language": "es_VE", "name": "Factura"}]
        }],
        "browsers": [{
            "id": 71,
            "uuid": "brw-71",
            "code": "InvoiceExplorer",
            "name": "Invoice Explorer",
            "description": "Query invoices",
            "is_execute_query_by_default": true,
            "is_show_total": true,
            "access_level": "3",
            "is_updateable": true,
            "is_deleteable": false,
            "table_id": 200,
            "process_id": 601,
            "window_id": 50,
            "where_clause": "i.AD_Org_ID=@AD_Org_ID@",
            "fields": [
                {"id": 81, "uuid": "bf-81", "name": "Invoice",
                 "column_name": "T_Invoice_ID", "column_id": 2001,
                 "reference_id": 30,
                 "is_key": true, "is_displayed": true, "is_query_criteria": true},
                {"id": 82, "uuid": "bf-82", "name": "Date",
                 "column_name": "DateInvoiced", "column_id": 2002,
                 "is_order_by": true, "is_identifier": true, "is_read_only": true,
                 "is_displayed": true,
                 "display_logic": "@T_Invoice_ID@>0"},
                {"id": 83, "uuid": "bf-83", "name": "Document Type",
                 "column_name": "C_DocType_ID",
                 "element_column_name": "C_DocType_ID",
                 "reference_id": 19,
                 "is_range": true,
                 "default_value": "@#Date@",
                 "default_value_to": "@DateTo@",
                 "is_displayed": true}
            ]
        }]
    }))
    .unwrap();
    SnapshotCatalog::new(snapshot)
}

fn assemble(scope: DocumentScope) -> Value {
    let catalog = catalog();
    let ctx = AssemblyContext {
        catalog: &catalog,
        lookups: &catalog,
        rules: &catalog,
        dependents: &catalog,
    };
    let document = browser_document(&ctx, &catalog.browsers()[0], scope).unwrap();
    assert_eq!(document.channel(), DocumentChannel::Browser);
    document.to_value()
}

fn ids_of(fields: &Value) -> Vec<i64> {
    fields
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_i64().unwrap())
        .collect()
}

#[test]
fn browser_detail_carries_descriptive_attributes() {
    let value = assemble(DocumentScope::new());
    let detail = &value["document"];
    assert_eq!(detail["id"], 71);
    assert_eq!(detail["uuid"], "brw-71");
    assert_eq!(detail["code"], "InvoiceExplorer");
    assert_eq!(detail["name"], "Invoice Explorer");
    assert_eq!(detail["is_active"], true);
    assert_eq!(detail["is_execute_query_by_default"], true);
    assert_eq!(detail["is_show_total"], true);
    assert_eq!(detail["access_level"], "3");
    assert_eq!(detail["is_updateable"], true);
    assert_eq!(detail["is_deleteable"], false);
    assert_eq!(detail["table_name"], "C_Invoice");
    assert_eq!(detail["index_value"], "browser");
}

#[test]
fn key_field_column_surfaces_as_field_key() {
    let value = assemble(DocumentScope::new());
    assert_eq!(value["document"]["field_key"], "T_Invoice_ID");
}

#[test]
fn where_clause_feeds_context_names() {
    let value = assemble(DocumentScope::new());
    assert_eq!(value["document"]["context_column_names"], json!(["AD_Org_ID"]));
}

#[test]
fn linked_process_and_window_are_summarized() {
    let value = assemble(DocumentScope::new().with_language("es_VE"));
    let detail = &value["document"];
    assert_eq!(detail["process_id"], 601);
    assert_eq!(detail["process"]["id"], 601);
    assert_eq!(detail["process"]["name"], "Reprice Invoices");
    // The browser's process cross-reference is a summary, not the full
    // process detail.
    assert!(detail["process"].get("is_report").is_none());
    assert_eq!(detail["window_id"], 50);
    assert_eq!(detail["window"]["name"], "Factura");
    assert_eq!(detail["index_value"], "browser_es_ve");
}

#[test]
fn field_subsets_overlap_by_flag() {
    let value = assemble(DocumentScope::new());
    let detail = &value["document"];
    assert_eq!(ids_of(&detail["display_fields"]), vec![81, 82, 83]);
    assert_eq!(ids_of(&detail["criteria_fields"]), vec![81]);
    assert_eq!(ids_of(&detail["identifier_fields"]), vec![82]);
    assert_eq!(ids_of(&detail["order_fields"]), vec![82]);
    // Read-only fields drop out of the editable subset.
    assert_eq!(ids_of(&detail["editable_fields"]), vec![81, 83]);
}

#[test]
fn element_name_prefers_the_backing_column() {
    let value = assemble(DocumentScope::new());
    let fields = value["document"]["display_fields"].as_array().unwrap();
    assert_eq!(fields[0]["element_name"], "C_Invoice_ID");
    // No backing column: the element definition supplies the name.
    assert_eq!(fields[2]["element_name"], "C_DocType_ID");
}

#[test]
fn range_defaults_feed_context_names() {
    let value = assemble(DocumentScope::new());
    let field = &value["document"]["display_fields"][2];
    assert_eq!(field["is_range"], true);
    assert_eq!(field["default_value"], "@#Date@");
    assert_eq!(field["default_value_to"], "@DateTo@");
    assert_eq!(field["context_column_names"], json!(["#Date", "DateTo"]));
    // Table-direct reference derives its table from the column name.
    assert_eq!(field["reference"]["id"], 19);
    assert_eq!(field["reference"]["table_name"], "C_DocType");
}

#[test]
fn dependents_report_fields_referencing_the_view_column() {
    let value = assemble(DocumentScope::new());
    let field = &value["document"]["display_fields"][0];
    let dependents = field["dependent_fields"].as_array().unwrap();
    assert_eq!(dependents.len(), 1);
    assert_eq!(dependents[0]["id"], 82);
    assert_eq!(dependents[0]["column_name"], "DateInvoiced");
}
