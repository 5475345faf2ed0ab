//! Browser-only checks, run with `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use tab_saver::markdown::{export_filename_at, LocalTime, TimeFormat};
use tab_saver::storage::TabHistory;
use tab_saver::tab_data::{TabInfo, TabRecord};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_export_filename_from_local_clock() {
    let name = export_filename_at(js_sys::Date::now());

    assert!(name.starts_with("tabs_"));
    assert!(name.ends_with(".md"));
    assert_eq!(name.len(), "tabs_2024-01-01_00-00.md".len());
}

#[wasm_bindgen_test]
fn test_local_time_is_not_empty() {
    let formatted = LocalTime.date_time(1_700_000_000_000.0);

    assert!(!formatted.trim().is_empty());
    assert!(!LocalTime.time(1_700_000_000_000.0).is_empty());
}

#[wasm_bindgen_test]
fn test_history_survives_js_json() {
    let mut history = TabHistory::new();
    history.insert(
        3,
        TabRecord {
            access_count: 2,
            opener_tab_id: Some(1),
            ..TabRecord::default()
        },
    );

    let value = js_sys::JSON::parse(&history.to_json().unwrap()).unwrap();
    let json: String = js_sys::JSON::stringify(&value).unwrap().into();
    let reloaded = TabHistory::from_json(&json).unwrap();

    assert_eq!(reloaded.get(3).unwrap().access_count, 2);
    assert_eq!(reloaded.get(3).unwrap().opener_tab_id, Some(1));
}

#[wasm_bindgen_test]
fn test_tab_info_from_js_object() {
    let value = js_sys::JSON::parse(
        r#"{"id": 4, "index": 1, "url": "https://a.com", "pinned": true, "mutedInfo": {"muted": false}}"#,
    )
    .unwrap();

    let tab: TabInfo = serde_wasm_bindgen::from_value(value).unwrap();

    assert_eq!(tab.id, 4);
    assert!(tab.pinned);
    assert!(!tab.is_muted());
    assert_eq!(tab.title, None);
}
