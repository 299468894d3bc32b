//! End-to-end exercise of the HTTP surface against a tempdir-backed service.

use std::net::SocketAddr;
use std::path::PathBuf;

use stocklist::config::Config;
use stocklist::server::{build_router, AppState};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

async fn spawn_service() -> (SocketAddr, TempDir) {
    let dir = TempDir::new().expect("tempdir");

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");

    let mut config = Config::default();
    config.server.host = addr.ip().to_string();
    config.server.port = addr.port();
    config.storage.cache_dir = dir.path().to_path_buf();

    let app = build_router(AppState::new(&config));
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    (addr, dir)
}

async fn send_raw(addr: SocketAddr, request: &[u8]) -> (u16, String, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    stream.write_all(request).await.expect("write request");
    let mut response = Vec::new();
    stream
        .read_to_end(&mut response)
        .await
        .expect("read response");
    let response = String::from_utf8_lossy(&response).to_string();
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    (status, head.to_string(), body.to_string())
}

async fn get(addr: SocketAddr, path: &str) -> (u16, String, String) {
    let req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    send_raw(addr, req.as_bytes()).await
}

async fn send_with_body(
    addr: SocketAddr,
    method: &str,
    path: &str,
    content_type: &str,
    body: &[u8],
) -> (u16, String, String) {
    let mut req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\n\r\n",
        body.len()
    )
    .into_bytes();
    req.extend_from_slice(body);
    send_raw(addr, &req).await
}

const BOUNDARY: &str = "stocklist-test-boundary";

fn multipart_body(fields: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(value);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn register_multipart(
    addr: SocketAddr,
    fields: &[(&str, Option<&str>, &[u8])],
) -> (u16, String, String) {
    let body = multipart_body(fields);
    send_with_body(
        addr,
        "POST",
        "/register",
        &format!("multipart/form-data; boundary={BOUNDARY}"),
        &body,
    )
    .await
}

#[tokio::test]
async fn full_crud_and_search_flow() {
    let (addr, dir) = spawn_service().await;

    // Register one record without a photo.
    let (status, _, body) = register_multipart(
        addr,
        &[
            ("inventory_name", None, b"hammer"),
            ("description", None, b"claw hammer"),
        ],
    )
    .await;
    assert_eq!(status, 201);
    let created: serde_json::Value = serde_json::from_str(&body).expect("created json");
    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "hammer");
    assert_eq!(created["photoUrl"], serde_json::Value::Null);

    // And one with a photo attached.
    let (status, _, body) = register_multipart(
        addr,
        &[
            ("inventory_name", None, b"ladder"),
            ("description", None, b"d"),
            ("photo", Some("ladder.jpg"), b"fake-jpeg-bytes"),
        ],
    )
    .await;
    assert_eq!(status, 201);
    let with_photo: serde_json::Value = serde_json::from_str(&body).expect("created json");
    assert_eq!(with_photo["id"], 2);
    assert_eq!(
        with_photo["photoUrl"],
        format!("http://{}/inventory/2/photo", addr)
    );

    // Full listing reflects both, in insertion order.
    let (status, _, body) = get(addr, "/inventory").await;
    assert_eq!(status, 200);
    let listing: serde_json::Value = serde_json::from_str(&body).expect("listing json");
    assert_eq!(listing.as_array().map(Vec::len), Some(2));
    assert_eq!(listing[0]["id"], 1);
    assert_eq!(listing[1]["id"], 2);

    // Single-record fetch, and 404 for a missing or non-numeric ID.
    let (status, _, body) = get(addr, "/inventory/1").await;
    assert_eq!(status, 200);
    let fetched: serde_json::Value = serde_json::from_str(&body).expect("record json");
    assert_eq!(fetched["name"], "hammer");

    let (status, _, body) = get(addr, "/inventory/99").await;
    assert_eq!(status, 404);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"], "Not found");

    let (status, _, _) = get(addr, "/inventory/banana").await;
    assert_eq!(status, 404);

    // The photo endpoint serves the uploaded bytes.
    let (status, head, body) = get(addr, "/inventory/2/photo").await;
    assert_eq!(status, 200);
    assert!(head.to_lowercase().contains("content-type: image/jpeg"));
    assert_eq!(body, "fake-jpeg-bytes");

    let (status, _, _) = get(addr, "/inventory/1/photo").await;
    assert_eq!(status, 404);

    // Search with the photo flag appends the reference to a copy.
    let (status, _, body) = get(addr, "/search?id=2&include_photo=on").await;
    assert_eq!(status, 200);
    let found: serde_json::Value = serde_json::from_str(&body).expect("search json");
    assert_eq!(
        found["description"],
        format!("d (Photo: http://{}/inventory/2/photo)", addr)
    );

    // Without the flag (or with a falsy value) the description is untouched.
    let (status, _, body) = get(addr, "/search?id=2&include_photo=off").await;
    assert_eq!(status, 200);
    let found: serde_json::Value = serde_json::from_str(&body).expect("search json");
    assert_eq!(found["description"], "d");

    // Form-encoded POST search behaves the same.
    let (status, _, body) = send_with_body(
        addr,
        "POST",
        "/search",
        "application/x-www-form-urlencoded",
        b"id=2&include_photo=on",
    )
    .await;
    assert_eq!(status, 200);
    let found: serde_json::Value = serde_json::from_str(&body).expect("search json");
    assert!(found["description"]
        .as_str()
        .unwrap()
        .contains("(Photo: http://"));

    let (status, _, _) = get(addr, "/search?id=42&include_photo=on").await;
    assert_eq!(status, 404);

    // Search never mutated the stored record.
    let (_, _, body) = get(addr, "/inventory/2").await;
    let stored: serde_json::Value = serde_json::from_str(&body).expect("record json");
    assert_eq!(stored["description"], "d");

    // Update name only; description survives.
    let (status, _, body) = send_with_body(
        addr,
        "PUT",
        "/inventory/1",
        "application/json",
        br#"{"name":"sledgehammer"}"#,
    )
    .await;
    assert_eq!(status, 200);
    let updated: serde_json::Value = serde_json::from_str(&body).expect("updated json");
    assert_eq!(updated["name"], "sledgehammer");
    assert_eq!(updated["description"], "claw hammer");

    let (status, _, _) = send_with_body(
        addr,
        "PUT",
        "/inventory/99",
        "application/json",
        br#"{"name":"ghost"}"#,
    )
    .await;
    assert_eq!(status, 404);

    // Delete removes the record and its photo file from disk.
    let photo_file: PathBuf = {
        let photos_dir = dir.path().join("photos");
        let mut entries = std::fs::read_dir(&photos_dir).expect("photos dir");
        entries.next().expect("one photo").expect("dir entry").path()
    };
    assert!(photo_file.exists());

    let (status, _, body) = send_with_body(addr, "DELETE", "/inventory/2", "text/plain", b"").await;
    assert_eq!(status, 200);
    let deleted: serde_json::Value = serde_json::from_str(&body).expect("deleted json");
    assert_eq!(deleted["deleted"], 2);
    assert!(!photo_file.exists());

    let (status, _, _) = get(addr, "/inventory/2").await;
    assert_eq!(status, 404);

    let (status, _, _) = send_with_body(addr, "DELETE", "/inventory/2", "text/plain", b"").await;
    assert_eq!(status, 404);

    // Only record 1 remains, so the next registration takes max+1 = 2.
    let (status, _, body) =
        register_multipart(addr, &[("inventory_name", None, b"wrench")]).await;
    assert_eq!(status, 201);
    let next: serde_json::Value = serde_json::from_str(&body).expect("created json");
    assert_eq!(next["id"], 2);
}

#[tokio::test]
async fn register_without_name_is_rejected_and_not_persisted() {
    let (addr, _dir) = spawn_service().await;

    let (status, _, body) =
        register_multipart(addr, &[("description", None, b"no name here")]).await;
    assert_eq!(status, 400);
    let err: serde_json::Value = serde_json::from_str(&body).expect("error json");
    assert_eq!(err["error"], "inventory_name is required");

    // Whitespace-only names are rejected too.
    let (status, _, _) = register_multipart(addr, &[("inventory_name", None, b"   ")]).await;
    assert_eq!(status, 400);

    let (status, _, body) = get(addr, "/inventory").await;
    assert_eq!(status, 200);
    let listing: serde_json::Value = serde_json::from_str(&body).expect("listing json");
    assert_eq!(listing.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn html_pages_are_served() {
    let (addr, _dir) = spawn_service().await;

    for path in ["/", "/register", "/search/form", "/docs"] {
        let (status, head, body) = get(addr, path).await;
        assert_eq!(status, 200, "unexpected status for {path}");
        assert!(head.to_lowercase().contains("text/html"), "not html: {path}");
        assert!(body.contains("<html>"), "no markup at {path}");
    }

    let (_, _, docs) = get(addr, "/docs").await;
    assert!(docs.contains("/inventory/:id/photo"));
    assert!(docs.contains("inventory_name"));
}

#[tokio::test]
async fn store_survives_restart_on_the_same_cache_dir() {
    let (addr, dir) = spawn_service().await;

    let (status, _, _) =
        register_multipart(addr, &[("inventory_name", None, b"anvil")]).await;
    assert_eq!(status, 201);

    // A second service instance over the same cache directory sees the
    // persisted document.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr2 = listener.local_addr().expect("local addr");
    let mut config = Config::default();
    config.server.host = addr2.ip().to_string();
    config.server.port = addr2.port();
    config.storage.cache_dir = dir.path().to_path_buf();
    let app = build_router(AppState::new(&config));
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

    let (status, _, body) = get(addr2, "/inventory").await;
    assert_eq!(status, 200);
    let listing: serde_json::Value = serde_json::from_str(&body).expect("listing json");
    assert_eq!(listing[0]["name"], "anvil");
}
