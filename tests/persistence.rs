//! Snapshot persistence through the HTTP API.

use std::sync::Arc;

use reqwest::header::COOKIE;
use serde_json::{json, Value};
use vendor_portal::vendors::MemoryVendorStore;

mod common;

use common::{start_server_with_store, test_config};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_leave_loadable_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vendors.json");
    let store = Arc::new(MemoryVendorStore::load_from_file(&path).unwrap());
    let server = start_server_with_store(test_config(), store.clone()).await;
    let cookie = server.login().await;

    let requests = (0..40).map(|i| {
        let client = server.client.clone();
        let url = server.url("/api/vendors");
        let cookie = cookie.clone();
        tokio::spawn(async move {
            client
                .post(url)
                .header(COOKIE, cookie)
                .json(&json!({ "name": format!("取引先{i}"), "email": format!("v{i}@example.com") }))
                .send()
                .await
                .unwrap()
                .status()
        })
    });
    for request in requests.collect::<Vec<_>>() {
        assert_eq!(request.await.unwrap(), 200);
    }

    assert_eq!(store.len(), 40);
    let reloaded = MemoryVendorStore::load_from_file(&path).unwrap();
    assert_eq!(reloaded.len(), 40);
}

#[tokio::test]
async fn test_failed_snapshot_write_is_not_committed() {
    let dir = tempfile::tempdir().unwrap();
    let unwritable = dir.path().join("missing").join("vendors.json");
    let server =
        start_server_with_store(test_config(), Arc::new(MemoryVendorStore::new(Some(unwritable))))
            .await;
    let cookie = server.login().await;

    let res = server
        .client
        .post(server.url("/api/vendors"))
        .header(COOKIE, &cookie)
        .json(&json!({ "name": "保存失敗", "email": "fail@example.com" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Internal Server Error" }));

    let res = server
        .client
        .get(server.url("/api/vendors"))
        .header(COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Vec<Value>>().await.unwrap(), Vec::<Value>::new());
}
