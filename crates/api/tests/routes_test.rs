//! Router integration tests over a real temp-directory database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use inventaris_api::{create_router, AppState};
use inventaris_core::{inventory_schema, BlobStore};
use inventaris_shared::config::{AppConfig, DatabaseConfig, ServerConfig, UploadConfig};

const MULTIPART_BOUNDARY: &str = "------------------------inventaristest";

/// A router over a freshly reconciled database. The temp directory guard
/// must stay alive for the duration of the test.
async fn test_app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = AppConfig {
        server: ServerConfig::default(),
        database: DatabaseConfig {
            url: format!("sqlite://{}/test.db", dir.path().display()),
            max_connections: 5,
            acquire_timeout_secs: 10,
        },
        uploads: UploadConfig {
            dir: dir.path().join("uploads").display().to_string(),
            max_file_size: 1024 * 1024,
        },
    };

    let pool = inventaris_db::connect(&config.database)
        .await
        .expect("pool connects");
    inventaris_db::reconcile(&pool, &inventory_schema())
        .await
        .expect("reconcile succeeds");
    let blobs = Arc::new(BlobStore::open(&config.uploads.dir).expect("blob store opens"));

    let state = AppState {
        db: pool,
        blobs,
        config: Arc::new(config),
    };
    (dir, create_router(state))
}

async fn request(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request builds");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body is json")
    };
    (status, value)
}

/// Hand-built `multipart/form-data` body with an optional `kind` part.
fn multipart_body(kind: Option<&str>, file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(kind) = kind {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(b"Content-Disposition: form-data; name=\"kind\"\r\n\r\n");
        body.extend_from_slice(kind.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((filename, content)) = file {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n")
                .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/pdf\r\n\r\n");
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: &Router, item_id: i64, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/items/{item_id}/attachments"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request builds");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    (status, serde_json::from_slice(&bytes).expect("body is json"))
}

#[tokio::test]
async fn health_reports_database_reachable() {
    let (_dir, app) = test_app().await;

    let (status, body) = request(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true, "db": true }));
}

#[tokio::test]
async fn lookup_create_list_delete() {
    let (_dir, app) = test_app().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/locations",
        Some(json!({ "name": "Kelder" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().expect("id");

    let (status, body) = request(&app, "GET", "/api/locations", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|row| row["name"].as_str().expect("name"))
        .collect();
    // Seeded rows plus the new one, ordered by name.
    assert_eq!(names, vec!["Garage", "Kelder", "Schuur", "Zolder"]);

    let (status, body) = request(&app, "DELETE", &format!("/api/locations/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    // Deleting again still succeeds.
    let (status, _) = request(&app, "DELETE", &format!("/api/locations/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn blank_lookup_name_is_rejected() {
    let (_dir, app) = test_app().await;

    let (status, body) = request(&app, "POST", "/api/types", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "name_required");
}

#[tokio::test]
async fn item_create_normalizes_blank_numbers() {
    let (_dir, app) = test_app().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/items",
        Some(json!({
            "label": "Torx schroeven",
            "qty": "",
            "warranty_months": "24",
            "type_id": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_i64().expect("id");

    let (status, body) = request(&app, "GET", &format!("/api/items/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "Torx schroeven");
    assert_eq!(body["qty"], Value::Null);
    assert_eq!(body["warranty_months"], 24);
    assert_eq!(body["type_name"], Value::Null);
}

#[tokio::test]
async fn item_without_label_is_rejected() {
    let (_dir, app) = test_app().await;

    let (status, body) = request(&app, "POST", "/api/items", Some(json!({ "qty": 3 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "label_required");
}

#[tokio::test]
async fn missing_item_is_not_found() {
    let (_dir, app) = test_app().await;

    let (status, body) = request(&app, "GET", "/api/items/99999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn item_list_joins_lookup_names() {
    let (_dir, app) = test_app().await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/locations",
        Some(json!({ "name": "Werkbank" })),
    )
    .await;
    let location_id = body["id"].as_i64().expect("id");

    let (status, _) = request(
        &app,
        "POST",
        "/api/items",
        Some(json!({ "label": "Beitels", "location_id": location_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(&app, "GET", "/api/items", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["location_name"], "Werkbank");
}

#[tokio::test]
async fn box_contents_lifecycle() {
    let (_dir, app) = test_app().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/boxes",
        Some(json!({ "label": "Doos 12" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let box_id = body["id"].as_i64().expect("id");

    let (status, _) = request(
        &app,
        "POST",
        &format!("/api/boxes/{box_id}/items"),
        Some(json!({ "name": "Pluggen", "qty": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request(&app, "GET", "/api/boxes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["item_count"], 1);

    let (status, body) = request(&app, "GET", &format!("/api/boxes/{box_id}/items"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Pluggen");
    assert_eq!(body[0]["qty"], 50);
}

#[tokio::test]
async fn box_item_under_missing_box_is_not_found() {
    let (_dir, app) = test_app().await;

    let (status, body) = request(
        &app,
        "POST",
        "/api/boxes/404/items",
        Some(json!({ "name": "Pluggen" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn attachment_upload_and_serve_url() {
    let (_dir, app) = test_app().await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/items",
        Some(json!({ "label": "Boormachine" })),
    )
    .await;
    let item_id = body["id"].as_i64().expect("id");

    let (status, body) = upload(
        &app,
        item_id,
        multipart_body(Some("manual"), Some(("handleiding.pdf", b"pdf bytes"))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["item_id"], item_id);
    assert_eq!(body["kind"], "manual");
    assert_eq!(body["original_name"], "handleiding.pdf");
    let url = body["url"].as_str().expect("url");
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with("-handleiding.pdf"));

    // The file is served back under the advertised URL.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(url)
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let served = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes();
    assert_eq!(&served[..], b"pdf bytes");

    let (status, body) = request(
        &app,
        "GET",
        &format!("/api/items/{item_id}/attachments"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let (_dir, app) = test_app().await;

    let (_, body) = request(&app, "POST", "/api/items", Some(json!({ "label": "Zaag" }))).await;
    let item_id = body["id"].as_i64().expect("id");

    let (status, body) = upload(&app, item_id, multipart_body(Some("receipt"), None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "file_required");
}

#[tokio::test]
async fn upload_with_unknown_kind_is_rejected() {
    let (dir, app) = test_app().await;

    let (_, body) = request(&app, "POST", "/api/items", Some(json!({ "label": "Tang" }))).await;
    let item_id = body["id"].as_i64().expect("id");

    let (status, body) = upload(
        &app,
        item_id,
        multipart_body(Some("warranty"), Some(("bon.pdf", b"x"))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let uploads = std::fs::read_dir(dir.path().join("uploads"))
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(uploads, 0, "rejected upload left a file behind");
}

#[tokio::test]
async fn upload_defaults_to_receipt_kind() {
    let (_dir, app) = test_app().await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/items",
        Some(json!({ "label": "Hamer" })),
    )
    .await;
    let item_id = body["id"].as_i64().expect("id");

    let (status, body) = upload(&app, item_id, multipart_body(None, Some(("bon.pdf", b"x")))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["kind"], "receipt");
}

#[tokio::test]
async fn attachment_delete_is_idempotent() {
    let (_dir, app) = test_app().await;

    let (_, body) = request(
        &app,
        "POST",
        "/api/items",
        Some(json!({ "label": "Accu" })),
    )
    .await;
    let item_id = body["id"].as_i64().expect("id");
    let (_, body) = upload(&app, item_id, multipart_body(None, Some(("bon.pdf", b"x")))).await;
    let attachment_id = body["id"].as_i64().expect("id");

    let (status, body) = request(
        &app,
        "DELETE",
        &format!("/api/attachments/{attachment_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, _) = request(
        &app,
        "DELETE",
        &format!("/api/attachments/{attachment_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn router_nests_under_base_url() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = AppConfig {
        server: ServerConfig {
            base_url: "/ingress/abc".to_string(),
            ..ServerConfig::default()
        },
        database: DatabaseConfig {
            url: format!("sqlite://{}/test.db", dir.path().display()),
            max_connections: 5,
            acquire_timeout_secs: 10,
        },
        uploads: UploadConfig {
            dir: dir.path().join("uploads").display().to_string(),
            max_file_size: 1024 * 1024,
        },
    };
    let pool = inventaris_db::connect(&config.database)
        .await
        .expect("pool connects");
    inventaris_db::reconcile(&pool, &inventory_schema())
        .await
        .expect("reconcile succeeds");
    let blobs = Arc::new(BlobStore::open(&config.uploads.dir).expect("blob store opens"));
    let app = create_router(AppState {
        db: pool,
        blobs,
        config: Arc::new(config),
    });

    let (status, body) = request(&app, "GET", "/ingress/abc/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let (status, _) = request(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
