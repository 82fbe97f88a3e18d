//! 持久化测试：存储结构的字段集、往返一致、损坏记录跳过、JSON 文件存储跨实例读写。

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use crate::download::{DownloadRecord, DownloadState};
use crate::events::NativeEvent;
use crate::storage::{DownloadPersistence, JsonFileStore, KeyValueStore, MemoryStore, PersistenceError};
use crate::tests::{TENANT, sample_request};

const STORED_FIELDS: [&str; 15] = [
    "downloadID",
    "remoteURL",
    "state",
    "bitRate",
    "title",
    "assetArtworkURL",
    "progress",
    "localURL",
    "fileSize",
    "errorType",
    "errorMessage",
    "startedTimeStamp",
    "progressTimeStamp",
    "finishedTimeStamp",
    "erroredTimeStamp",
];

fn finished_record() -> DownloadRecord {
    let mut record = DownloadRecord::from_request(sample_request("d1").bit_rate(256));
    let t = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
    record.apply_event(&NativeEvent::Started { download_id: "d1".to_string() }, t);
    record.apply_event(
        &NativeEvent::Finished {
            download_id: "d1".to_string(),
            download_location: "/local/d1.mp4".to_string(),
            size: 2048,
        },
        t,
    );
    record
}

#[test]
fn serialized_record_has_exactly_the_stored_field_set() {
    let value = serde_json::to_value(DownloadRecord::from_request(sample_request("d1"))).unwrap();
    let object = value.as_object().unwrap();

    let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    let mut expected = STORED_FIELDS.to_vec();
    expected.sort_unstable();
    assert_eq!(keys, expected);

    assert_eq!(object["state"], json!("initialized"));
    assert_eq!(object["localURL"], Value::Null);
    assert_eq!(object["startedTimeStamp"], Value::Null);
}

#[test]
fn timestamps_are_stored_as_epoch_millis() {
    let value = serde_json::to_value(finished_record()).unwrap();
    assert_eq!(value["startedTimeStamp"], json!(1_700_000_000_123i64));
    assert_eq!(value["finishedTimeStamp"], json!(1_700_000_000_123i64));
    assert_eq!(value["fileSize"], json!(2048));
    assert_eq!(value["state"], json!("finished"));
}

#[tokio::test]
async fn save_then_load_all_reconstructs_identical_record() {
    let store = Arc::new(MemoryStore::new());
    let persistence = DownloadPersistence::new(store.clone(), TENANT);
    let record = finished_record();

    persistence.save(&record).await.unwrap();
    // 覆盖写入
    persistence.save(&record).await.unwrap();
    assert_eq!(store.len(TENANT).await, 1);

    let loaded = persistence.load_all().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded.get("d1"), Some(&record));
}

#[tokio::test]
async fn remove_is_a_no_op_for_missing_keys() {
    let store = Arc::new(MemoryStore::new());
    let persistence = DownloadPersistence::new(store.clone(), TENANT);
    persistence.remove("never").await.unwrap();

    persistence.save(&finished_record()).await.unwrap();
    persistence.remove("d1").await.unwrap();
    assert!(persistence.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn load_all_skips_corrupt_and_inconsistent_entries() {
    let store = Arc::new(MemoryStore::new());
    let persistence = DownloadPersistence::new(store.clone(), TENANT);
    persistence.save(&finished_record()).await.unwrap();

    store.set_item(TENANT, "garbage", json!("not a record")).await.unwrap();

    let mut mismatched = serde_json::to_value(DownloadRecord::from_request(sample_request("x"))).unwrap();
    mismatched["downloadID"] = json!("y");
    store.set_item(TENANT, "x", mismatched).await.unwrap();

    let mut finished_without_file = serde_json::to_value(DownloadRecord::from_request(sample_request("z"))).unwrap();
    finished_without_file["state"] = json!("finished");
    store.set_item(TENANT, "z", finished_without_file).await.unwrap();

    let loaded = persistence.load_all().await.unwrap();
    assert_eq!(loaded.keys().collect::<Vec<_>>(), vec!["d1"]);
}

#[tokio::test]
async fn tolerant_of_records_missing_optional_fields() {
    let store = Arc::new(MemoryStore::new());
    store
        .set_item(
            TENANT,
            "old",
            json!({ "downloadID": "old", "remoteURL": "http://x/old.mp4", "state": "started" }),
        )
        .await
        .unwrap();

    let loaded = DownloadPersistence::new(store, TENANT).load_all().await.unwrap();
    let record = &loaded["old"];
    assert_eq!(record.state, DownloadState::Started);
    assert_eq!(record.bit_rate, 0);
    assert_eq!(record.progress, 0.0);
    assert!(record.title.is_none());
}

#[tokio::test]
async fn tenants_are_isolated() {
    let store = Arc::new(MemoryStore::new());
    let a = DownloadPersistence::new(store.clone(), "a");
    let b = DownloadPersistence::new(store.clone(), "b");
    a.save(&finished_record()).await.unwrap();
    assert!(b.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn json_file_store_survives_a_new_instance() {
    let dir = tempfile::tempdir().unwrap();
    let record = finished_record();

    {
        let store = Arc::new(JsonFileStore::new(dir.path()));
        let persistence = DownloadPersistence::new(store, "RNMediaSuite/Downloads");
        persistence.prepare().await.unwrap();
        persistence.save(&record).await.unwrap();
        persistence
            .save(&DownloadRecord::from_request(sample_request("d2")))
            .await
            .unwrap();
        persistence.remove("d2").await.unwrap();
    }

    let store = Arc::new(JsonFileStore::new(dir.path()));
    let loaded = DownloadPersistence::new(store, "RNMediaSuite/Downloads")
        .load_all()
        .await
        .unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded["d1"], record);

    // 租户名中的路径分隔符被替换，不会写出目录之外
    assert!(dir.path().join("RNMediaSuite_Downloads.json").exists());
}

#[tokio::test]
async fn json_file_store_sets_unparseable_file_aside() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), b"{ not json").unwrap();

    let store = JsonFileStore::new(dir.path());
    assert!(store.get_all("broken").await.unwrap().is_empty());
    assert!(!dir.path().join("broken.json").exists());
    assert_eq!(
        std::fs::read(dir.path().join("broken.json.corrupt")).unwrap(),
        b"{ not json"
    );

    // 之后的写入正常落盘
    store.set_item("broken", "k", json!(1)).await.unwrap();
    let reopened = JsonFileStore::new(dir.path());
    assert_eq!(
        reopened.get_all("broken").await.unwrap(),
        vec![("k".to_string(), json!(1))]
    );
}

#[tokio::test]
async fn json_file_store_failed_write_leaves_cache_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path());
    store.add_tenant("t").await.unwrap();

    // 目标路径被目录占住，rename 失败
    let target = dir.path().join("t.json");
    std::fs::create_dir(&target).unwrap();
    let err = store.set_item("t", "lost", json!(1)).await.unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
    assert!(store.get_all("t").await.unwrap().is_empty());

    std::fs::remove_dir(&target).unwrap();
    store.set_item("t", "kept", json!(2)).await.unwrap();
    assert_eq!(
        store.get_all("t").await.unwrap(),
        vec![("kept".to_string(), json!(2))]
    );

    let reopened = JsonFileStore::new(dir.path());
    assert_eq!(
        reopened.get_all("t").await.unwrap(),
        vec![("kept".to_string(), json!(2))]
    );
}
