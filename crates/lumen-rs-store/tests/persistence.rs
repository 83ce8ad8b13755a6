//! File-backed persistence behaviour across store instances.

use lumen_rs_protocol::{GenerationRecord, GenerationStatus, RecordPatch, SettingsPatch};
use lumen_rs_store::{FileKeyValueStore, GenerationStore, StoreError};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::{TempDir, tempdir};

fn file_store(dir: &TempDir) -> GenerationStore {
    let backend = FileKeyValueStore::new(dir.path()).expect("backend");
    GenerationStore::new(Arc::new(backend))
}

fn completed(id: &str, timestamp: i64) -> GenerationRecord {
    GenerationRecord::generating(format!("prompt {id}"), None, timestamp)
        .completed(id, format!("https://img.test/{id}.png"))
}

#[test]
fn records_survive_reopen() {
    let dir = tempdir().expect("tempdir");
    file_store(&dir).save(completed("img_1", 1)).expect("save");

    let reopened = file_store(&dir);
    assert_eq!(
        reopened.get_by_id("img_1").map(|record| record.status),
        Some(GenerationStatus::Completed)
    );
}

#[test]
fn fifty_first_save_evicts_oldest() {
    let dir = tempdir().expect("tempdir");
    let store = file_store(&dir);
    for index in 0..51 {
        store
            .save(completed(&format!("img_{index}"), index))
            .expect("save");
    }

    let records = store.list();
    assert_eq!(records.len(), 50);
    assert_eq!(records[0].id, "img_50");
    assert_eq!(store.get_by_id("img_0"), None);
    assert!(store.get_by_id("img_1").is_some());
}

#[test]
fn zero_max_images_keeps_one_record() {
    let store = GenerationStore::in_memory();
    store
        .save_settings(SettingsPatch {
            max_images: Some(0),
            ..SettingsPatch::default()
        })
        .expect("settings");
    store.save(completed("a", 1)).expect("save");
    store.save(completed("b", 2)).expect("save");

    let ids: Vec<String> = store.list().into_iter().map(|record| record.id).collect();
    assert_eq!(ids, vec!["b".to_string()]);
}

#[test]
fn delete_of_absent_id_is_noop() {
    let store = GenerationStore::in_memory();
    store.save(completed("a", 1)).expect("save");
    let before = store.list();

    assert!(!store.delete("missing").expect("delete"));
    assert_eq!(store.list(), before);
}

#[test]
fn update_merges_and_keeps_untouched_fields() {
    let store = GenerationStore::in_memory();
    store
        .save(GenerationRecord::generating(
            "a lighthouse",
            Some("vintage".to_string()),
            7,
        ))
        .expect("save");

    let found = store
        .update("temp_7", RecordPatch::failed("API Error: 500 - Internal"))
        .expect("update");
    assert!(found);

    let record = store.get_by_id("temp_7").expect("record");
    assert_eq!(record.status, GenerationStatus::Error);
    assert_eq!(record.error.as_deref(), Some("API Error: 500 - Internal"));
    assert_eq!(record.prompt, "a lighthouse");
    assert_eq!(record.style.as_deref(), Some("vintage"));
    assert_eq!(record.url, None);
}

#[test]
fn update_of_absent_id_reports_not_found() {
    let store = GenerationStore::in_memory();
    assert!(!store
        .update("nope", RecordPatch::completed("https://img.test/x.png"))
        .expect("update"));
    assert!(store.list().is_empty());
}

#[test]
fn clear_keeps_settings() {
    let store = GenerationStore::in_memory();
    store.save(completed("a", 1)).expect("save");
    store
        .save_settings(SettingsPatch {
            default_style: Some("fantasy".to_string()),
            ..SettingsPatch::default()
        })
        .expect("settings");

    store.clear().expect("clear");
    assert!(store.list().is_empty());
    assert_eq!(store.settings().default_style, "fantasy");
}

#[test]
fn export_then_import_round_trips() {
    let source = GenerationStore::in_memory();
    source.save(completed("a", 1)).expect("save");
    source
        .save(GenerationRecord::generating("b", None, 2).failed("img_b", "boom"))
        .expect("save");
    source
        .save_settings(SettingsPatch {
            system_prompt: Some("Be bold.".to_string()),
            max_images: Some(10),
            ..SettingsPatch::default()
        })
        .expect("settings");
    let blob = source.export_snapshot().expect("export");

    let target = GenerationStore::in_memory();
    target.save(completed("stale", 0)).expect("save");
    let summary = target.import_snapshot(&blob).expect("import");

    assert_eq!(summary.records, Some(2));
    assert!(summary.settings_merged);
    assert_eq!(target.list(), source.list());
    assert_eq!(target.settings(), source.settings());
}

#[test]
fn import_accepts_legacy_field_names() {
    let store = GenerationStore::in_memory();
    let blob = r#"{
        "images": [
            {"id": "img_1", "prompt": "p", "timestamp": 1, "status": "completed", "url": "https://img.test/1.png"}
        ],
        "exportDate": "2024-01-01T00:00:00.000Z"
    }"#;
    let summary = store.import_snapshot(blob).expect("import");
    assert_eq!(summary.records, Some(1));
    assert!(!summary.settings_merged);
    assert_eq!(store.list()[0].id, "img_1");
}

#[test]
fn import_without_records_only_merges_settings() {
    let store = GenerationStore::in_memory();
    store.save(completed("keep", 1)).expect("save");

    let summary = store
        .import_snapshot(r#"{"settings": {"defaultStyle": "abstract"}}"#)
        .expect("import");
    assert_eq!(summary.records, None);
    assert_eq!(store.list().len(), 1);
    assert_eq!(store.settings().default_style, "abstract");
    assert_eq!(store.settings().max_images, 50);
}

#[test]
fn malformed_import_leaves_state_intact() {
    let store = GenerationStore::in_memory();
    store.save(completed("keep", 1)).expect("save");
    let before = store.list();

    let err = store.import_snapshot("{ not json").expect_err("malformed");
    assert!(matches!(err, StoreError::MalformedInput(_)));

    let err = store
        .import_snapshot(
            r#"{"records": [{"id": "x"}], "settings": {"defaultStyle": "abstract"}}"#,
        )
        .expect_err("bad record");
    assert!(matches!(err, StoreError::MalformedInput(_)));

    assert_eq!(store.list(), before);
    assert_eq!(store.settings().default_style, "photorealistic");
}

#[test]
fn import_normalizes_contradictory_records() {
    let store = GenerationStore::in_memory();
    let blob = r#"{"records": [
        {"id": "a", "prompt": "p", "timestamp": 1, "status": "error", "error": "boom", "url": "https://img.test/a.png"}
    ]}"#;
    store.import_snapshot(blob).expect("import");
    let record = store.get_by_id("a").expect("record");
    assert_eq!(record.url, None);
    assert_eq!(record.error.as_deref(), Some("boom"));
}

#[test]
fn corrupt_history_file_reads_as_empty() {
    let dir = tempdir().expect("tempdir");
    std::fs::write(dir.path().join("ai_generated_images.json"), "{{{").expect("write");
    let store = file_store(&dir);
    assert!(store.list().is_empty());
    store.save(completed("fresh", 1)).expect("save");
    assert_eq!(store.list().len(), 1);
}

#[test]
fn import_rejects_terminal_records_missing_their_payload() {
    let store = GenerationStore::in_memory();
    store.save(completed("keep", 1)).expect("save");
    let before = store.list();

    let err = store
        .import_snapshot(
            r#"{"records": [{"id": "a", "prompt": "p", "timestamp": 1, "status": "completed", "url": ""}]}"#,
        )
        .expect_err("completed without url");
    assert!(matches!(err, StoreError::MalformedInput(_)));

    let err = store
        .import_snapshot(
            r#"{"records": [{"id": "b", "prompt": "p", "timestamp": 1, "status": "error"}],
                "settings": {"defaultStyle": "abstract"}}"#,
        )
        .expect_err("error without message");
    assert!(matches!(err, StoreError::MalformedInput(_)));

    assert_eq!(store.list(), before);
    assert_eq!(store.settings().default_style, "photorealistic");
}

#[test]
fn update_refuses_patch_that_leaves_error_without_message() {
    let store = GenerationStore::in_memory();
    store
        .save(GenerationRecord::generating("a lighthouse", None, 1))
        .expect("save");

    let patch = RecordPatch {
        status: Some(GenerationStatus::Error),
        ..RecordPatch::default()
    };
    let err = store.update("temp_1", patch).expect_err("invalid patch");
    assert!(matches!(err, StoreError::InvalidRecord(_)));

    let patch = RecordPatch {
        status: Some(GenerationStatus::Completed),
        ..RecordPatch::default()
    };
    assert!(store.update("temp_1", patch).is_err());

    let record = store.get_by_id("temp_1").expect("record");
    assert_eq!(record.status, GenerationStatus::Generating);
    assert_eq!(record.error, None);
}
