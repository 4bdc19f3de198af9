//! Integration tests for the read API over a real listener.

use std::net::SocketAddr;

use repomirror::api::{FETCH_ERROR_BODY, serve};
use repomirror::record::{RawListing, RepoView, to_record};
use repomirror::RelationalStore;
use sea_orm::{ConnectOptions, Database};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

async fn setup_store() -> RelationalStore {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("Failed to create test database");
    RelationalStore::new(db)
}

/// Start the server on an ephemeral port.
async fn start(
    store: RelationalStore,
) -> (SocketAddr, oneshot::Sender<()>, JoinHandle<std::io::Result<()>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(serve(listener, store, "test", async move {
        let _ = rx.await;
    }));

    (addr, tx, handle)
}

#[tokio::test]
async fn test_get_repos_returns_synced_rows() {
    let store = setup_store().await;
    let record = to_record(RawListing {
        id: 9,
        full_name: "permalik/utility".to_string(),
        description: "tool:sync".to_string(),
        topics: vec!["go".to_string(), "redis".to_string()],
        ..Default::default()
    });
    store.rebuild_schema().await.unwrap();
    store.insert_all(std::slice::from_ref(&record)).await.unwrap();

    let (addr, shutdown, handle) = start(store).await;

    let response = reqwest::get(format!("http://{}/repos", addr)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body[0]["name"], "utility");
    assert_eq!(body[0]["topics"], "go,redis");
    assert_eq!(body[0]["htmlurl"], "");
    assert_eq!(body[0]["uid"], 9);

    let views: Vec<RepoView> = serde_json::from_value(body).unwrap();
    assert_eq!(views, vec![RepoView::from(&record)]);

    shutdown.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_get_repos_missing_table_is_generic_500() {
    let store = setup_store().await;
    let (addr, shutdown, handle) = start(store).await;

    let response = reqwest::get(format!("http://{}/repos", addr)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text().await.unwrap(), FETCH_ERROR_BODY);

    shutdown.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let store = setup_store().await;
    let (addr, shutdown, handle) = start(store).await;

    let response = reqwest::get(format!("http://{}/nope", addr)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

    shutdown.send(()).unwrap();
    handle.await.unwrap().unwrap();
}
