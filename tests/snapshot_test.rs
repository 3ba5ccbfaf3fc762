//! Snapshot loading and whole-catalog publication

use metadex::{publish, CatalogSnapshot, Error, PublisherConfig, SnapshotCatalog};
use serde_json::json;

fn snapshot_json() -> serde_json::Value {
    json!({
        "exported_at": "2026-08-01T09:30:00Z",
        "tables": [{
            "id": 300,
            "table_name": "M_Product",
            "columns": [
                {"id": 3001, "column_name": "M_Product_ID", "is_key": true}
            ]
        }],
        "windows": [{
            "id": 140, "uuid": "win-140", "name": "Product",
            "tabs": [{
                "id": 31, "uuid": "tab-31", "name": "Product",
                "table_id": 300, "window_id": 140,
                "fields": [
                    {"id": 41, "uuid": "fld-41", "name": "Product",
                     "column_id": 3001, "is_displayed": true}
                ]
            }]
        }],
        "browsers": [
            {"id": 72, "uuid": "brw-72", "name": "Product Explorer",
             "table_id": 300,
             "fields": [
                 {"id": 91, "uuid": "bf-91", "name": "Product",
                  "column_name": "M_Product_ID", "is_displayed": true}
             ]},
            {"id": 73, "uuid": "brw-73", "name": "Retired Explorer",
             "is_active": false}
        ]
    })
}

#[test]
fn snapshot_round_trips_through_json() {
    let text = serde_json::to_string(&snapshot_json()).unwrap();
    let snapshot = CatalogSnapshot::from_json(&text).unwrap();
    assert_eq!(snapshot.windows.len(), 1);
    assert_eq!(snapshot.browsers.len(), 2);
    assert_eq!(
        snapshot.exported_at.unwrap().to_rfc3339(),
        "2026-08-01T09:30:00+00:00"
    );
}

#[test]
fn malformed_snapshot_is_a_parse_error() {
    let err = CatalogSnapshot::from_json("{\"windows\": 42}").unwrap_err();
    assert!(matches!(err, Error::SnapshotParse(_)));
}

#[test]
fn publish_emits_windows_then_active_browsers() {
    let snapshot: CatalogSnapshot = serde_json::from_value(snapshot_json()).unwrap();
    let catalog = SnapshotCatalog::new(snapshot);
    let documents = publish(&catalog, &PublisherConfig::default()).unwrap();

    let index_values: Vec<String> = documents.iter().map(|d| d.index_value()).collect();
    // The inactive browser is skipped.
    assert_eq!(index_values, vec!["window", "browser"]);
    assert_eq!(documents[0].body()["document"]["id"], 140);
    assert_eq!(documents[1].body()["document"]["id"], 72);
}

#[test]
fn channel_toggles_restrict_publication() {
    let snapshot: CatalogSnapshot = serde_json::from_value(snapshot_json()).unwrap();
    let catalog = SnapshotCatalog::new(snapshot);
    let config = PublisherConfig::from_yaml("channels:\n  browser: false\n").unwrap();
    let documents = publish(&catalog, &config).unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].index_value(), "window");
}

#[test]
fn configured_scope_flows_into_every_document() {
    let snapshot: CatalogSnapshot = serde_json::from_value(snapshot_json()).unwrap();
    let catalog = SnapshotCatalog::new(snapshot);
    let config =
        PublisherConfig::from_yaml("scope:\n  language: es_VE\n  client_id: 11\n").unwrap();
    let documents = publish(&catalog, &config).unwrap();
    assert_eq!(documents[0].index_value(), "window_es_ve_11");
    assert_eq!(documents[1].index_value(), "browser_es_ve_11");
    assert_eq!(documents[0].body()["document"]["client_id"], 11);
}

#[test]
fn snapshot_and_config_load_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let snapshot_path = dir.path().join("dictionary.json");
    std::fs::write(&snapshot_path, serde_json::to_string_pretty(&snapshot_json()).unwrap())
        .unwrap();
    let snapshot = CatalogSnapshot::load(&snapshot_path).unwrap();
    assert_eq!(snapshot.tables.len(), 1);

    let config_path = dir.path().join("metadex.yaml");
    std::fs::write(&config_path, "scope:\n  role_id: 102\n").unwrap();
    let config = PublisherConfig::load(&config_path).unwrap();
    assert_eq!(config.scope.role_id, 102);
    assert_eq!(config.scope.language, "en_US");

    let err = CatalogSnapshot::load(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn missing_referenced_column_aborts_publication() {
    let mut value = snapshot_json();
    value["windows"][0]["tabs"][0]["fields"][0]["column_id"] = json!(9999);
    let snapshot: CatalogSnapshot = serde_json::from_value(value).unwrap();
    let catalog = SnapshotCatalog::new(snapshot);
    let err = publish(&catalog, &PublisherConfig::default()).unwrap_err();
    assert!(matches!(err, Error::MissingEntity(_)));
}
