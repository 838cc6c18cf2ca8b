//! HTTP-level tests for [`ClubhouseClient`] against a loopback listener.
//!
//! Each test serves one canned response on `127.0.0.1` and inspects the
//! raw request the client sent.

use assert_matches::assert_matches;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use storywatch_clubhouse::{ClubhouseClient, ClubhouseError, TrackerApi};

const TOKEN: &str = "tok";

/// Accept one connection, answer with `status` and `body`, and hand back
/// the raw request text.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
             Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });

    (format!("http://{addr}/api/v2"), handle)
}

/// Read until the end of the headers plus any `Content-Length` body.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn client(api_url: String) -> ClubhouseClient {
    ClubhouseClient::with_base_url(reqwest::Client::new(), api_url, TOKEN.to_string())
}

// ---------------------------------------------------------------------------
// Test: request shape
// ---------------------------------------------------------------------------

#[tokio::test]
async fn members_request_carries_token_query_parameter() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"id":"u-1","profile":{"email_address":"ann@x.com"}}]"#,
    )
    .await;

    let members = client(url).fetch_members().await.unwrap();
    let request = server.await.unwrap();

    let request_line = request.lines().next().unwrap();
    assert!(request_line.starts_with("GET /api/v2/members?token=tok "), "{request_line}");
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, "u-1");
}

#[tokio::test]
async fn stories_request_targets_project_path() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"id":7,"name":"Copy","requested_by_id":"u-1","workflow_state_id":3,"moved_at":"2026-10-18T10:00:00Z"}]"#,
    )
    .await;

    let stories = client(url).fetch_stories(42).await.unwrap();
    let request = server.await.unwrap();

    assert!(request.starts_with("GET /api/v2/projects/42/stories?token=tok "), "{request}");
    assert_eq!(stories[0].id, 7);
}

// ---------------------------------------------------------------------------
// Test: failure stages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn server_error_maps_to_status() {
    let (url, server) = serve_once("500 Internal Server Error", "boom").await;

    let result = client(url).fetch_projects().await;
    server.await.unwrap();

    assert_matches!(
        result,
        Err(ClubhouseError::Status { ref resource, status: 500, ref body })
            if resource == "projects" && body == "boom"
    );
}

#[tokio::test]
async fn non_array_body_maps_to_decode() {
    let (url, server) = serve_once("200 OK", r#"{"message":"nope"}"#).await;

    let result = client(url).fetch_workflows().await;
    server.await.unwrap();

    assert_matches!(
        result,
        Err(ClubhouseError::Decode { ref resource, .. }) if resource == "workflows"
    );
}

#[tokio::test]
async fn transport_error_does_not_leak_token() {
    // Bind then drop so the port is closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ClubhouseClient::with_base_url(
        reqwest::Client::new(),
        format!("http://{addr}/api/v2"),
        "tok-very-secret".to_string(),
    );
    let err = client.fetch_members().await.unwrap_err();

    assert_matches!(err, ClubhouseError::Request { ref resource, .. } if resource == "members");
    let rendered = format!("{err} {err:?}");
    assert!(!rendered.contains("tok-very-secret"), "{rendered}");
}
