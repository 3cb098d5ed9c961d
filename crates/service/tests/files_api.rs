//! End-to-end tests over the HTTP router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::Engine;
use http_body_util::BodyExt;
use image::GenericImageView;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use cabinet_service::http_server::app_router;
use cabinet_service::pipeline::{process_job, Job};
use cabinet_service::{ServiceConfig, ServiceState};

struct TestService {
    router: Router,
    state: ServiceState,
    // Held so enqueued jobs are not rejected; tests drive the pipeline
    // synchronously through process_job.
    _job_rx: cabinet_service::pipeline::JobReceiver,
    _storage: TempDir,
}

async fn setup() -> TestService {
    let storage = TempDir::new().unwrap();
    let config = ServiceConfig {
        storage_dir: storage.path().to_path_buf(),
        ..ServiceConfig::default()
    };
    let (state, job_rx) = ServiceState::from_config(&config).await.unwrap();
    TestService {
        router: app_router(state.clone()),
        state,
        _job_rx: job_rx,
        _storage: storage,
    }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send(router, request).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, value)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header("x-token", token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-token", token);
    }
    builder.body(Body::empty()).unwrap()
}

/// Register a user and log them in, returning a session token.
async fn register_and_connect(router: &Router, email: &str, password: &str) -> String {
    let (status, _) = send_json(
        router,
        json_request(
            "POST",
            "/users",
            None,
            json!({ "email": email, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let credentials = base64::engine::general_purpose::STANDARD
        .encode(format!("{email}:{password}"));
    let request = Request::builder()
        .method("GET")
        .uri("/connect")
        .header(header::AUTHORIZATION, format!("Basic {credentials}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(router, request).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn b64(data: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(data)
}

fn sample_png(side: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
        side,
        side,
        image::Rgba([200, 60, 20, 255]),
    ));
    let mut out = std::io::Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

#[tokio::test]
async fn test_user_registration_and_session_flow() {
    let svc = setup().await;
    let router = &svc.router;

    let (status, body) = send_json(
        router,
        json_request("POST", "/users", None, json!({ "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing email");

    let (status, body) = send_json(
        router,
        json_request("POST", "/users", None, json!({ "email": "bob@dylan.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing password");

    let token = register_and_connect(router, "bob@dylan.com", "toto1234!").await;

    // Duplicate registration is rejected.
    let (status, body) = send_json(
        router,
        json_request(
            "POST",
            "/users",
            None,
            json!({ "email": "bob@dylan.com", "password": "other" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "User already exists");

    // Wrong password never yields a token.
    let credentials = b64(b"bob@dylan.com:wrong");
    let request = Request::builder()
        .method("GET")
        .uri("/connect")
        .header(header::AUTHORIZATION, format!("Basic {credentials}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send_json(router, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The minted token resolves to the identity.
    let (status, body) = send_json(router, get_request("/users/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "bob@dylan.com");

    // Disconnect invalidates it.
    let (status, _) = send(router, get_request("/disconnect", Some(&token))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send_json(router, get_request("/users/me", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(router, get_request("/disconnect", Some(&token))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_validation() {
    let svc = setup().await;
    let router = &svc.router;
    let token = register_and_connect(router, "bob@dylan.com", "toto1234!").await;

    // No token at all.
    let (status, body) = send_json(
        router,
        json_request("POST", "/files", None, json!({ "name": "x", "type": "folder" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let cases = [
        (json!({ "type": "file", "data": "aGk=" }), "Missing name"),
        (json!({ "name": "", "type": "file", "data": "aGk=" }), "Missing name"),
        (json!({ "name": "x", "data": "aGk=" }), "Missing type"),
        (json!({ "name": "x", "type": "blob", "data": "aGk=" }), "Invalid type"),
        (json!({ "name": "x", "type": "file" }), "Missing data"),
        (json!({ "name": "x", "type": "folder", "data": "aGk=" }), "Missing data"),
    ];
    for (payload, expected) in cases {
        let (status, body) =
            send_json(router, json_request("POST", "/files", Some(&token), payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], expected);
    }

    // Parent checks.
    let (status, body) = send_json(
        router,
        json_request(
            "POST",
            "/files",
            Some(&token),
            json!({
                "name": "x", "type": "file", "data": "aGk=",
                "parentId": "3b9f4d88-6e6f-4b64-8cf8-6a8ffb6d6a10"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Parent not found");

    let (status, file) = send_json(
        router,
        json_request(
            "POST",
            "/files",
            Some(&token),
            json!({ "name": "a.txt", "type": "file", "data": "aGk=" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(
        router,
        json_request(
            "POST",
            "/files",
            Some(&token),
            json!({
                "name": "x", "type": "folder",
                "parentId": file["id"]
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Parent is not a folder");
}

#[tokio::test]
async fn test_folder_hierarchy() {
    let svc = setup().await;
    let router = &svc.router;
    let token = register_and_connect(router, "bob@dylan.com", "toto1234!").await;

    let (status, root) = send_json(
        router,
        json_request(
            "POST",
            "/files",
            Some(&token),
            json!({ "name": "images", "type": "folder" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(root["type"], "folder");
    assert_eq!(root["parentId"], Value::Null);

    // Nested folder under the first.
    let (status, nested) = send_json(
        router,
        json_request(
            "POST",
            "/files",
            Some(&token),
            json!({ "name": "2026", "type": "folder", "parentId": root["id"] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(nested["parentId"], root["id"]);

    // Folders have no byte stream, ever; this is not a Not-Found.
    let uri = format!("/files/{}/data", root["id"].as_str().unwrap());
    let (status, body) = send_json(router, get_request(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A folder doesn't have content");
}

#[tokio::test]
async fn test_upload_show_and_content_round_trip() {
    let svc = setup().await;
    let router = &svc.router;
    let token = register_and_connect(router, "bob@dylan.com", "toto1234!").await;

    let (status, created) = send_json(
        router,
        json_request(
            "POST",
            "/files",
            Some(&token),
            json!({ "name": "a.txt", "type": "file", "data": "SGVsbG8=" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["type"], "file");
    assert_eq!(created["isPublic"], false);
    assert!(created.get("localPath").is_none());

    // Show returns the same logical fields.
    let id = created["id"].as_str().unwrap();
    let (status, shown) = send_json(router, get_request(&format!("/files/{id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown, created);

    // Content round-trips exactly, with a content type from the name.
    let request = get_request(&format!("/files/{id}/data"), Some(&token));
    let response = router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("text/plain"));
    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&body[..], b"Hello");
}

#[tokio::test]
async fn test_private_content_is_owner_only() {
    let svc = setup().await;
    let router = &svc.router;
    let owner = register_and_connect(router, "bob@dylan.com", "toto1234!").await;
    let stranger = register_and_connect(router, "eve@dylan.com", "hunter2!").await;

    let (_, created) = send_json(
        router,
        json_request(
            "POST",
            "/files",
            Some(&owner),
            json!({ "name": "secret.txt", "type": "file", "data": "c2VjcmV0" }),
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    let data_uri = format!("/files/{id}/data");

    // Anonymous and foreign reads are uniform Not-Founds; nothing reveals
    // that the record exists.
    let (status, body) = send_json(router, get_request(&data_uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
    let (status, _) = send_json(router, get_request(&data_uri, Some(&stranger))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Metadata is owner-scoped the same way.
    let (status, _) = send_json(router, get_request(&format!("/files/{id}"), Some(&stranger))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(router, get_request(&data_uri, Some(&owner))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"secret");
}

#[tokio::test]
async fn test_public_content_is_open_and_visibility_toggles() {
    let svc = setup().await;
    let router = &svc.router;
    let token = register_and_connect(router, "bob@dylan.com", "toto1234!").await;

    let (_, created) = send_json(
        router,
        json_request(
            "POST",
            "/files",
            Some(&token),
            json!({ "name": "note.txt", "type": "file", "isPublic": true, "data": "aGVsbG8=" }),
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    let data_uri = format!("/files/{id}/data");

    let (status, body) = send(router, get_request(&data_uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"hello");

    // Unpublish closes anonymous access.
    let (status, updated) = send_json(
        router,
        json_request("PUT", &format!("/files/{id}/unpublish"), Some(&token), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["isPublic"], false);
    let (status, _) = send_json(router, get_request(&data_uri, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Publish reopens it.
    let (status, updated) = send_json(
        router,
        json_request("PUT", &format!("/files/{id}/publish"), Some(&token), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["isPublic"], true);
    let (status, _) = send(router, get_request(&data_uri, None)).await;
    assert_eq!(status, StatusCode::OK);

    // Only the owner can toggle visibility.
    let stranger = register_and_connect(router, "eve@dylan.com", "hunter2!").await;
    let (status, _) = send_json(
        router,
        json_request("PUT", &format!("/files/{id}/unpublish"), Some(&stranger), Value::Null),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_is_owner_and_parent_scoped() {
    let svc = setup().await;
    let router = &svc.router;
    let token = register_and_connect(router, "bob@dylan.com", "toto1234!").await;

    let (_, folder) = send_json(
        router,
        json_request(
            "POST",
            "/files",
            Some(&token),
            json!({ "name": "docs", "type": "folder" }),
        ),
    )
    .await;
    for i in 0..3 {
        let (status, _) = send_json(
            router,
            json_request(
                "POST",
                "/files",
                Some(&token),
                json!({
                    "name": format!("f{i}.txt"), "type": "file",
                    "data": "aGk=", "parentId": folder["id"]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let uri = format!("/files?parentId={}", folder["id"].as_str().unwrap());
    let (status, listed) = send_json(router, get_request(&uri, Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 3);

    // Root listing sees only the folder.
    let (status, listed) = send_json(router, get_request("/files", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["name"], "docs");

    // Another user sees nothing.
    let stranger = register_and_connect(router, "eve@dylan.com", "hunter2!").await;
    let (status, listed) = send_json(router, get_request("/files", Some(&stranger))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_image_variants_via_pipeline() {
    let svc = setup().await;
    let router = &svc.router;
    let token = register_and_connect(router, "bob@dylan.com", "toto1234!").await;

    let (status, created) = send_json(
        router,
        json_request(
            "POST",
            "/files",
            Some(&token),
            json!({
                "name": "pic.png", "type": "image", "isPublic": true,
                "data": b64(&sample_png(600))
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap();

    // A variant requested before derivation has run is a Not-Found the
    // caller can retry.
    let (status, _) = send_json(router, get_request(&format!("/files/{id}/data?size=100"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Drive the pipeline synchronously.
    let job = Job {
        owner_id: created["userId"].as_str().unwrap().parse().unwrap(),
        file_id: id.parse().unwrap(),
        attempt: 0,
    };
    process_job(svc.state.database(), svc.state.blobs(), &job)
        .await
        .unwrap();

    let (status, body) = send(router, get_request(&format!("/files/{id}/data?size=100"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let decoded = image::load_from_memory(&body).unwrap();
    assert_eq!(decoded.width(), 100);

    // An unconfigured size was never generated.
    let (status, _) = send_json(router, get_request(&format!("/files/{id}/data?size=999"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The original is untouched.
    let (status, body) = send(router, get_request(&format!("/files/{id}/data"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, sample_png(600));
}

#[tokio::test]
async fn test_status_and_stats() {
    let svc = setup().await;
    let router = &svc.router;

    let (status, body) = send_json(router, get_request("/status", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "cache": true, "db": true }));

    let (status, body) = send_json(router, get_request("/stats", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "users": 0, "files": 0 }));

    let token = register_and_connect(router, "bob@dylan.com", "toto1234!").await;
    let (_, _) = send_json(
        router,
        json_request(
            "POST",
            "/files",
            Some(&token),
            json!({ "name": "docs", "type": "folder" }),
        ),
    )
    .await;

    let (status, body) = send_json(router, get_request("/stats", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "users": 1, "files": 1 }));

    // Unknown routes get the JSON fallback.
    let (status, body) = send_json(router, get_request("/nope", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}
