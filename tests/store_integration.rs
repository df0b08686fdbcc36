use health_eval_store_lib::store::sanitize_filename;
use health_eval_store_lib::{commands, AppError, Evaluation, RecordStore};
use serde_json::{json, Value};
use std::fs;

fn evaluation(value: Value) -> Evaluation {
    serde_json::from_value(value).expect("evaluation payload")
}

fn json_files(store: &RecordStore) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(store.root())
        .expect("read store dir")
        .filter_map(|entry| {
            let name = entry.expect("dir entry").file_name().to_string_lossy().to_string();
            name.ends_with(".json").then_some(name)
        })
        .collect();
    names.sort();
    names
}

#[test]
fn open_creates_missing_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    let root = dir.path().join("nested").join("data");
    let store = RecordStore::open(&root).expect("open");
    assert!(root.is_dir());
    assert!(store.list().expect("list").is_empty());
}

#[test]
fn distinct_people_produce_one_summary_each() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = RecordStore::open(dir.path()).expect("open");
    let people = [
        ("Jane Doe", 34, Some("F")),
        ("Jane Doe", 35, Some("F")),
        ("Jane Doe", 34, Some("M")),
        ("Jon", 71, None),
    ];
    for (index, (name, age, sex)) in people.into_iter().enumerate() {
        store
            .save(evaluation(json!({
                "id": format!("id-{}", index),
                "created_at": "2024-05-05T10:00:00Z",
                "updated_at": "",
                "person_name": name,
                "person_age": age,
                "person_sex": sex,
                "measurements": {"height_cm": 170 + index}
            })))
            .expect("save");
    }

    assert_eq!(
        json_files(&store),
        vec![
            "jane-doe_34_f.json".to_string(),
            "jane-doe_34_m.json".to_string(),
            "jane-doe_35_f.json".to_string(),
            "jon_71_unknown.json".to_string(),
        ]
    );
    let summaries = store.list().expect("list");
    assert_eq!(summaries.len(), 4);
    assert!(summaries.iter().all(|summary| summary.measurement_count == 1));
}

#[test]
fn resave_replaces_content_instead_of_merging() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = RecordStore::open(dir.path()).expect("open");
    let stem = store
        .save(evaluation(json!({
            "id": "v1",
            "created_at": "2024-05-05T10:00:00Z",
            "person_name": "Ana",
            "person_age": 29,
            "person_sex": "F",
            "measurements": {"pulse": 80, "weight_kg": 60},
            "notes": "first visit"
        })))
        .expect("first save");
    let first_updated = store.get(&stem).expect("get")["updated_at"].clone();

    store
        .save(evaluation(json!({
            "id": "v2",
            "created_at": "2024-06-01T10:00:00Z",
            "person_name": "Ana",
            "person_age": 29,
            "person_sex": "F",
            "measurements": {"pulse": 72}
        })))
        .expect("second save");

    let stored = store.get(&stem).expect("get");
    assert_eq!(stored["id"], "v2");
    assert_eq!(stored["created_at"], "2024-06-01T10:00:00Z");
    assert_eq!(stored["measurements"], json!({"pulse": 72}));
    assert_eq!(stored["notes"], Value::Null);
    assert!(stored["updated_at"].as_str().expect("updated_at") >= first_updated.as_str().expect("updated_at"));
    assert_eq!(json_files(&store).len(), 1);
}

#[test]
fn saved_filename_round_trips_through_get_and_delete() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = RecordStore::open(dir.path()).expect("open");
    let saved = commands::save_evaluation(
        &store,
        evaluation(json!({
            "id": "rt",
            "created_at": "2024-05-05T10:00:00Z",
            "person_name": "Mary-Kate O'Neil",
            "person_age": 42,
            "person_sex": "female"
        })),
    )
    .expect("save");
    assert_eq!(saved.filename, "mary-kate-o-neil_42_f");
    assert_eq!(sanitize_filename(&saved.filename), saved.filename);

    let document = commands::get_evaluation(&store, &saved.filename).expect("get");
    assert_eq!(document["person_name"], "Mary-Kate O'Neil");
    assert_eq!(document["measurements"], json!({}));

    commands::delete_evaluation(&store, &saved.filename).expect("delete");
    assert!(json_files(&store).is_empty());
    assert!(matches!(store.delete(&saved.filename), Err(AppError::NotFound(_))));
}

#[test]
fn corrupt_file_does_not_hide_valid_records() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = RecordStore::open(dir.path()).expect("open");
    store
        .save(evaluation(json!({
            "id": "ok",
            "created_at": "2024-05-05T10:00:00Z",
            "person_name": "Ok",
            "person_age": 50,
            "person_sex": "M"
        })))
        .expect("save");
    fs::write(dir.path().join("ok_50_m-copy.json"), "{\"id\": \"trunc").expect("write truncated");

    let summaries = commands::list_evaluations(&store).expect("list");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].filename, "ok_50_m");

    let error = store.get("ok_50_m-copy").expect_err("corrupt get");
    assert!(matches!(error, AppError::Internal(_)));
}
