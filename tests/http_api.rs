use std::sync::Arc;
use std::time::Duration;

use record_server::{IntegrationTestSettings, Pet, Record, RecordStore, Server};
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Spin up a server on an OS-assigned port, returning the base URL and its task.
async fn spawn_test_server<R: Record>(
    dir: &TempDir,
) -> (String, JoinHandle<record_server::Result<()>>) {
    let store = Arc::new(RecordStore::<R>::open(dir.path().join("data.json")).unwrap());
    let server = Server::bind("127.0.0.1:0", store)
        .await
        .unwrap()
        .with_shutdown_grace(Duration::from_millis(500));
    let base = format!("http://{}", server.local_addr());
    let task = tokio::spawn(server.run());
    (base, task)
}

#[tokio::test]
async fn get_on_empty_store_returns_empty_collection() {
    let dir = TempDir::new().unwrap();
    let (base, _task) = spawn_test_server::<Pet>(&dir).await;

    let resp = reqwest::get(format!("{}/pet", base)).await.unwrap();
    assert_eq!(resp.status(), 200);

    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("application/json"));
    assert_eq!(resp.text().await.unwrap(), r#"{"pets_collection":{}}"#);
}

#[tokio::test]
async fn put_get_delete_round_trip() {
    let dir = TempDir::new().unwrap();
    let (base, _task) = spawn_test_server::<Pet>(&dir).await;
    let client = reqwest::Client::new();

    let shasta = r#"{"pets_collection":{"Shasta":{"age":9,"breed":"Spitz"}}}"#;
    let resp = client
        .put(format!("{}/pet", base))
        .header("content-type", "application/json")
        .body(shasta)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), shasta);

    let resp = reqwest::get(format!("{}/pet?name=Shasta", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), shasta);

    let resp = client
        .delete(format!("{}/pet?name=Shasta", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), r#"{"pets_collection":{}}"#);

    let resp = reqwest::get(format!("{}/pet", base)).await.unwrap();
    assert_eq!(resp.text().await.unwrap(), r#"{"pets_collection":{}}"#);
}

#[tokio::test]
async fn delete_without_name_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let (base, _task) = spawn_test_server::<Pet>(&dir).await;

    let resp = reqwest::Client::new()
        .delete(format!("{}/pet", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn malformed_put_is_server_error() {
    let dir = TempDir::new().unwrap();
    let (base, _task) = spawn_test_server::<Pet>(&dir).await;

    let resp = reqwest::Client::new()
        .put(format!("{}/pet", base))
        .body("{\"pets_collection\":")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn unsupported_verb_is_server_error() {
    let dir = TempDir::new().unwrap();
    let (base, _task) = spawn_test_server::<Pet>(&dir).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/pet", base))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let dir = TempDir::new().unwrap();
    let (base, _task) = spawn_test_server::<Pet>(&dir).await;

    let resp = reqwest::get(format!("{}/integrationTest", base)).await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn ci_gating_defaults_and_updates() {
    let dir = TempDir::new().unwrap();
    let (base, _task) = spawn_test_server::<IntegrationTestSettings>(&dir).await;
    let client = reqwest::Client::new();

    let resp = reqwest::get(format!("{}/integrationTest?testPath=Gracie", base))
        .await
        .unwrap();
    assert_eq!(
        resp.text().await.unwrap(),
        r#"{"settings_collection":{"Gracie":{"enabled":true,"gates_ci_build":true}}}"#
    );

    let body = r#"{"settings_collection":{"Gracie":{"enabled":true,"gates_ci_build":false}}}"#;
    let resp = client
        .put(format!("{}/integrationTest", base))
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.text().await.unwrap(), body);

    let resp = reqwest::get(format!("{}/integrationTest?testPath=Gracie", base))
        .await
        .unwrap();
    assert_eq!(resp.text().await.unwrap(), body);
}

#[tokio::test]
async fn close_persists_and_stops() {
    let dir = TempDir::new().unwrap();
    let (base, task) = spawn_test_server::<Pet>(&dir).await;
    let client = reqwest::Client::new();

    let pets = r#"{"pets_collection":{"Buttons":{"age":2,"breed":"Terrier"},"Gracie":{"age":9,"breed":"Spitz"}}}"#;
    client
        .put(format!("{}/pet", base))
        .body(pets)
        .send()
        .await
        .unwrap();

    let resp = client.put(format!("{}/close", base)).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();

    let persisted = std::fs::read_to_string(dir.path().join("data.json")).unwrap();
    assert_eq!(persisted, pets);

    let reopened = RecordStore::<Pet>::open(dir.path().join("data.json")).unwrap();
    assert_eq!(reopened.len().unwrap(), 2);
}

#[tokio::test]
async fn repeated_query_parameter_uses_first_value() {
    let dir = TempDir::new().unwrap();
    let (base, _task) = spawn_test_server::<Pet>(&dir).await;
    let client = reqwest::Client::new();

    client
        .put(format!("{}/pet", base))
        .body(r#"{"pets_collection":{"Gracie":{"age":9,"breed":"Spitz"},"Shasta":{"age":9,"breed":"Spitz"}}}"#)
        .send()
        .await
        .unwrap();

    let resp = reqwest::get(format!("{}/pet?name=Shasta&name=Gracie", base))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.text().await.unwrap(),
        r#"{"pets_collection":{"Shasta":{"age":9,"breed":"Spitz"}}}"#
    );
}

#[tokio::test]
async fn large_put_body_is_accepted() {
    let dir = TempDir::new().unwrap();
    let (base, _task) = spawn_test_server::<Pet>(&dir).await;

    let pets: serde_json::Map<String, serde_json::Value> = (0..60_000)
        .map(|i| {
            (
                format!("pet-{:05}", i),
                serde_json::json!({"age": i, "breed": "Mixed"}),
            )
        })
        .collect();
    let body = serde_json::to_vec(&serde_json::json!({ "pets_collection": pets })).unwrap();
    assert!(body.len() > 2 * 1024 * 1024);

    let resp = reqwest::Client::new()
        .put(format!("{}/pet", base))
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = reqwest::get(format!("{}/pet?name=pet-59999", base))
        .await
        .unwrap();
    assert_eq!(
        resp.text().await.unwrap(),
        r#"{"pets_collection":{"pet-59999":{"age":59999,"breed":"Mixed"}}}"#
    );
}
