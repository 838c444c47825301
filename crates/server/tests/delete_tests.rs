//! Integration tests for the delete flow.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::TestServer;
use common::fixtures::{test_png, upload_request};
use serde_json::Value;
use tower::ServiceExt;

async fn send(router: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn upload(server: &TestServer) -> Value {
    let (status, record) = send(
        &server.router,
        upload_request(Some(server.api_key()), &test_png(64, 64), "photo.png", None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    record
}

fn delete_request(server: &TestServer, id: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(format!("/api/images/{id}"))
        .header("X-API-Key", server.api_key())
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn delete_removes_file_and_record() {
    let server = TestServer::new().await;
    let record = upload(&server).await;
    let id = record["id"].as_str().unwrap();
    let filename = record["filename"].as_str().unwrap();

    let (status, body) = send(&server.router, delete_request(&server, id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Image deleted successfully");
    assert_eq!(body["id"], id);
    assert_eq!(body["filename"], filename);

    assert!(!server.uploaded_path(filename).exists());
    assert!(server.state.index.get(id).await.is_none());

    // The on-disk document reflects the removal immediately.
    assert_eq!(server.metadata_document(), serde_json::json!({}));

    let get = Request::builder()
        .method("GET")
        .uri(format!("/api/images/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&server.router, get).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let server = TestServer::new().await;

    let (status, body) = send(&server.router, delete_request(&server, "no-such-id")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn project_images_cannot_be_deleted() {
    let server = TestServer::with_project_files(&[("logo.png", test_png(16, 16))]).await;

    let records = server.state.index.list().await;
    assert_eq!(records.len(), 1);
    let id = records[0].id.clone();

    let (status, body) = send(&server.router, delete_request(&server, &id)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    // Metadata and file remain untouched.
    assert!(server.project_path("logo.png").exists());
    assert!(server.state.index.get(&id).await.is_some());
}

#[tokio::test]
async fn delete_tolerates_a_file_already_missing_from_disk() {
    let server = TestServer::new().await;
    let record = upload(&server).await;
    let id = record["id"].as_str().unwrap();
    let filename = record["filename"].as_str().unwrap();

    std::fs::remove_file(server.uploaded_path(filename)).unwrap();

    let (status, body) = send(&server.router, delete_request(&server, id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id);
    assert!(server.state.index.get(id).await.is_none());
}

#[tokio::test]
async fn deleted_filenames_become_available_again() {
    let server = TestServer::new().await;

    let (status, first) = send(
        &server.router,
        upload_request(
            Some(server.api_key()),
            &test_png(32, 32),
            "a.png",
            Some("reused.png"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let id = first["id"].as_str().unwrap();
    let (status, _) = send(&server.router, delete_request(&server, id)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, second) = send(
        &server.router,
        upload_request(
            Some(server.api_key()),
            &test_png(48, 48),
            "b.png",
            Some("reused.png"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["filename"], "reused.png");
    assert_ne!(second["id"], first["id"]);
}
