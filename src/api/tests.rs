use std::io::Cursor;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use super::create_router;
use crate::testutil::test_state;

const BOUNDARY: &str = "festival-boundary";

fn app(temp_dir: &tempfile::TempDir) -> Router {
    create_router(test_state(temp_dir))
}

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    into_json(app.clone().oneshot(request).await.unwrap()).await
}

async fn into_json(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: &Router, uri: &str, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    into_json(app.clone().oneshot(request).await.unwrap()).await
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 60]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_likes_flow() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, Method::GET, "/api/likes/resto-A/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["likes"], 0);

    for expected in 1..=3 {
        let (status, body) = send(&app, Method::POST, "/api/likes/resto-A/0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["subject"], "resto-A");
        assert_eq!(body["subIndex"], 0);
        assert_eq!(body["likes"], expected);
        assert_eq!(body["message"], "Like added successfully");
    }

    let (_, body) = send(&app, Method::GET, "/api/likes/resto-A/0").await;
    assert_eq!(body["likes"], 3);
    let (_, body) = send(&app, Method::GET, "/api/likes/resto-A/1").await;
    assert_eq!(body["likes"], 0);

    send(&app, Method::POST, "/api/likes/resto-B/2").await;
    let (status, body) = send(&app, Method::GET, "/api/likes").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resto-A-0"], 3);
    assert_eq!(body["resto-B-2"], 1);
    assert_eq!(body.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_likes_rejects_malformed_index() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, Method::POST, "/api/likes/resto-A/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert!(body["error"].as_str().unwrap().contains("invalid dish index"));

    let (_, body) = send(&app, Method::GET, "/api/likes").await;
    assert!(body.as_object().unwrap().is_empty());
}

#[tokio::test]
async fn test_top_likes() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    for (uri, times) in [
        ("/api/likes/a/0", 1),
        ("/api/likes/b/0", 3),
        ("/api/likes/c/0", 2),
    ] {
        for _ in 0..times {
            send(&app, Method::POST, uri).await;
        }
    }

    let (status, body) = send(&app, Method::GET, "/api/likes/top/2").await;
    assert_eq!(status, StatusCode::OK);
    let top = body.as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["subject"], "b");
    assert_eq!(top[0]["likes"], 3);
    assert_eq!(top[1]["subject"], "c");

    for uri in ["/api/likes/top", "/api/likes/top/0", "/api/likes/top/abc"] {
        let (status, body) = send(&app, Method::GET, uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn test_photo_upload_list_delete() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let body = multipart_body("photo", "plat.png", "image/png", &png_bytes(1200, 900));
    let (status, uploaded) = upload(&app, "/api/photos/resto-A/0", body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(uploaded["width"], 800);
    assert_eq!(uploaded["height"], 600);
    assert_eq!(uploaded["message"], "Photo uploaded successfully");
    let blob_name = uploaded["blobName"].as_str().unwrap().to_string();
    assert!(blob_name.ends_with(".jpg"));
    assert_eq!(uploaded["url"], format!("/uploads/{blob_name}"));

    let (status, photos) = send(&app, Method::GET, "/api/photos/resto-A/0").await;
    assert_eq!(status, StatusCode::OK);
    let photos = photos.as_array().unwrap();
    assert_eq!(photos.len(), 1);
    assert_eq!(photos[0]["originalName"], "plat.png");
    assert_eq!(photos[0]["url"], photos[0]["thumbnail_url"]);

    let blob = Request::builder()
        .uri(format!("/uploads/{blob_name}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(blob).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/jpeg");

    let id = uploaded["id"].as_u64().unwrap();
    let (status, body) = send(&app, Method::DELETE, &format!("/api/photos/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Photo deleted successfully");

    let (_, photos) = send(&app, Method::GET, "/api/photos/resto-A/0").await;
    assert!(photos.as_array().unwrap().is_empty());

    let (status, body) = send(&app, Method::DELETE, &format!("/api/photos/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Photo not found");
}

#[tokio::test]
async fn test_upload_rejects_non_image() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let body = multipart_body("photo", "notes.txt", "text/plain", b"hello");
    let (status, body) = upload(&app, "/api/photos/resto-A/0", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");

    let (_, photos) = send(&app, Method::GET, "/api/photos/resto-A/0").await;
    assert!(photos.as_array().unwrap().is_empty());
    assert_eq!(std::fs::read_dir(dir.path().join("uploads")).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_without_photo_field() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let body = multipart_body("other", "plat.png", "image/png", &png_bytes(4, 4));
    let (status, body) = upload(&app, "/api/photos/resto-A/0", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No photo provided");
}

#[tokio::test]
async fn test_upload_corrupt_image_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let body = multipart_body("photo", "broken.jpg", "image/jpeg", b"not really a jpeg");
    let (status, body) = upload(&app, "/api/photos/resto-A/0", body).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Failed to upload photo");
    assert_eq!(std::fs::read_dir(dir.path().join("uploads")).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let oversized = vec![0u8; 10 * 1024 * 1024 + 1];
    let body = multipart_body("photo", "huge.png", "image/png", &oversized);
    let (status, _) = upload(&app, "/api/photos/resto-A/0", body).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_delete_unknown_photo() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, _) = send(&app, Method::DELETE, "/api/photos/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, "/api/photos/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_serve_unknown_blob() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, _) = send(&app, Method::GET, "/uploads/missing.jpg").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_vote_for_restaurant_named_top() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(&dir);

    let (status, body) = send(&app, Method::POST, "/api/likes/top/0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "top");
    assert_eq!(body["subIndex"], 0);
    assert_eq!(body["likes"], 1);

    let (_, body) = send(&app, Method::POST, "/api/likes/top/3").await;
    assert_eq!(body["likes"], 1);

    let (_, body) = send(&app, Method::GET, "/api/likes").await;
    assert_eq!(body["top-0"], 1);
    assert_eq!(body["top-3"], 1);

    // The top-N listing still answers GET on the same path
    let (status, body) = send(&app, Method::GET, "/api/likes/top/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::POST, "/api/likes/top/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
}
