//! Integration tests for the price feed against a local HTTP responder

use std::time::Duration;
use ticker_watch::feed::{CoinbaseConfig, CoinbaseTicker, Credentials, FetchError, PriceSource};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Serve one canned HTTP response and hand back the raw request
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {}\r\n\
             content-type: application/json\r\n\
             content-length: {}\r\n\
             connection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        let _ = tx.send(String::from_utf8_lossy(&request).to_string());
    });

    (format!("http://{}", addr), rx)
}

fn ticker(base_url: String, credentials: Option<Credentials>) -> CoinbaseTicker {
    CoinbaseTicker::with_config(CoinbaseConfig {
        base_url,
        timeout: Duration::from_secs(5),
        credentials,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_parses_price() {
    let body = r#"{"trade_id":1,"price":"3021.456","size":"0.1"}"#;
    let (url, request) = serve_once("200 OK", body).await;

    let price = ticker(url, None).fetch("ETH-USD").await.unwrap();
    assert_eq!(price.to_string(), "3021.456");

    let request = request.await.unwrap();
    assert!(request.starts_with("GET /products/ETH-USD/ticker HTTP/1.1"));
    assert!(!request.to_lowercase().contains("cb-access-key"));
}

#[tokio::test]
async fn test_fetch_signs_when_credentials_present() {
    let (url, request) = serve_once("200 OK", r#"{"price":"100.00"}"#).await;
    let credentials = Credentials {
        key: "test-key".to_string(),
        secret: "c3VwZXItc2VjcmV0".to_string(),
        passphrase: "test-pass".to_string(),
    };

    ticker(url, Some(credentials))
        .fetch("BTC-USD")
        .await
        .unwrap();

    let request = request.await.unwrap().to_lowercase();
    assert!(request.contains("cb-access-key: test-key"));
    assert!(request.contains("cb-access-passphrase: test-pass"));
    assert!(request.contains("cb-access-sign: "));
    assert!(request.contains("cb-access-timestamp: "));
}

#[tokio::test]
async fn test_fetch_non_success_status() {
    let (url, _request) = serve_once("404 Not Found", r#"{"message":"NotFound"}"#).await;

    let result = ticker(url, None).fetch("NOPE-USD").await;
    match result {
        Err(FetchError::Status { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("NotFound"));
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_malformed_body() {
    let (url, _request) = serve_once("200 OK", r#"{"price":null}"#).await;

    let result = ticker(url, None).fetch("ETH-USD").await;
    assert!(matches!(result, Err(FetchError::Parse(_))));
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // Bind then drop to get a port nobody is listening on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let result = ticker(format!("http://{}", addr), None)
        .fetch("ETH-USD")
        .await;
    assert!(matches!(result, Err(FetchError::Http(_))));
}
