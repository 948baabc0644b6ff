//! Exercises the reqwest transport against a one-shot local server.

use std::time::Duration;

use api_client::{ApiError, ApiRequest, HttpTransport, Transport};
use reqwest::Method;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves one canned response and hands back the raw request it received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}/api", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text
                    .lines()
                    .find_map(|l| l.to_ascii_lowercase().strip_prefix("content-length:").map(|v| v.trim().to_string()))
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    break;
                }
            }
            if n == 0 {
                break;
            }
        }
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        String::from_utf8_lossy(&raw).to_string()
    });
    (base, handle)
}

fn transport(base: &str) -> HttpTransport {
    HttpTransport::new(base.parse().unwrap(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn sends_query_bearer_and_json() {
    let (base, server) = serve_once("200 OK", r#"{"Result": {"ok": true}}"#).await;
    let mut req = ApiRequest::new(Method::POST, "board/notices/")
        .query(vec![("page".into(), "2".into()), ("page_size".into(), "20".into())])
        .json(json!({"title": "Hi"}));
    req.bearer = Some("tok".into());

    let body = transport(&base).execute(req).await.unwrap();
    assert_eq!(body["Result"]["ok"], true);

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /api/board/notices/?page=2&page_size=20 HTTP/1.1"));
    assert!(raw.to_ascii_lowercase().contains("authorization: bearer tok"));
    assert!(raw.ends_with(r#"{"title":"Hi"}"#));
}

#[tokio::test]
async fn empty_body_is_null() {
    let (base, server) = serve_once("200 OK", "").await;
    let body = transport(&base)
        .execute(ApiRequest::new(Method::DELETE, "board/faqs/1/"))
        .await
        .unwrap();
    assert_eq!(body, Value::Null);
    server.await.unwrap();
}

#[tokio::test]
async fn error_status_keeps_the_envelope_message() {
    let (base, server) = serve_once(
        "401 Unauthorized",
        r#"{"IndeAPIResponse": {"ErrorCode": "91", "Message": "Token expired"}}"#,
    )
    .await;
    let err = transport(&base)
        .execute(ApiRequest::new(Method::GET, "publicMembers/"))
        .await
        .unwrap_err();
    match err {
        ApiError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message.as_deref(), Some("Token expired"));
        }
        other => panic!("unexpected {other:?}"),
    }
    server.await.unwrap();
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let err = transport(&format!("http://{addr}/"))
        .execute(ApiRequest::new(Method::POST, "adminMember/logout"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
