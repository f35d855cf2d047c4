//! Request logging tests
//!
//! These tests verify:
//! - Outcome classification (normal, deadline, cancellation, other error)
//! - Header, query and body capture with the body restored for the handler
//! - 400 responses when the body cannot be read
//! - The client transport against a local server

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Extension,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::time::Duration;
use tagged_logger::prelude::*;
use tower::ServiceExt;

fn memory_logger() -> (Logger, MemoryAppender) {
    let memory = MemoryAppender::new();
    let logger = Logger::builder()
        .min_level(LogLevel::Trace)
        .tags(["api"])
        .appender(memory.clone())
        .build();
    (logger, memory)
}

/// The middleware writes from a worker thread; poll until `count` lines arrive
async fn wait_for(memory: &MemoryAppender, count: usize) -> Vec<String> {
    for _ in 0..200 {
        if memory.len() >= count {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    memory.lines()
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_millis(50)).await;
    "slow"
}

async fn cancel(Extension(ctx): Extension<RequestContext>) -> &'static str {
    ctx.cancel();
    "cancelled"
}

async fn fail(Extension(ctx): Extension<RequestContext>) -> &'static str {
    ctx.cancel_with_cause(ContextError::Other("db pool closed".into()));
    "failed"
}

async fn echo(body: String) -> String {
    body
}

fn app(request_logger: &RequestLogger) -> Router {
    let router = Router::new()
        .route("/hello", get(|| async { "hello" }))
        .route("/slow", get(slow))
        .route("/cancel", get(cancel))
        .route("/fail", get(fail))
        .route("/echo", post(echo));
    request_logger.wrap(router)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_normal_request_logged_at_debug() {
    let (logger, memory) = memory_logger();
    let line = line!() + 1;
    let request_logger = RequestLogger::new(logger, RequestLoggerConfig::default());

    let response = app(&request_logger).oneshot(get_request("/hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let lines = wait_for(&memory, 1).await;
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[DEBUG]"));
    assert!(lines[0].contains(&format!("[http_tests.rs:{}]", line)));
    assert!(lines[0].contains("(api) GET /hello: "));
    assert!(lines[0].ends_with("ms"));
    assert!(!lines[0].contains("DEADLINE EXCEEDED"));
}

#[tokio::test]
async fn test_deadline_exceeded() {
    let (logger, memory) = memory_logger();
    let request_logger = RequestLogger::new(logger, RequestLoggerConfig::default());

    let request = Request::builder()
        .uri("/slow")
        .extension(RequestContext::with_timeout(Duration::from_millis(10)))
        .body(Body::empty())
        .unwrap();
    let response = app(&request_logger).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let lines = wait_for(&memory, 1).await;
    assert!(lines[0].contains("[WARN]"));
    assert!(lines[0].contains("GET /slow: "));
    assert!(lines[0].ends_with("ms (DEADLINE EXCEEDED)"));
}

#[tokio::test]
async fn test_latency_covers_handler() {
    let (logger, memory) = memory_logger();
    logger.set_format(OutputFormat::Json);
    let request_logger = RequestLogger::new(logger, RequestLoggerConfig::default());

    app(&request_logger).oneshot(get_request("/slow")).await.unwrap();

    let lines = wait_for(&memory, 1).await;
    let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert!(parsed["metadata"]["latency_ms"].as_u64().unwrap() >= 50);
}

#[tokio::test]
async fn test_cancelled_request() {
    let (logger, memory) = memory_logger();
    let request_logger = RequestLogger::new(logger, RequestLoggerConfig::default());

    app(&request_logger).oneshot(get_request("/cancel")).await.unwrap();

    let lines = wait_for(&memory, 1).await;
    assert!(lines[0].contains("[WARN]"));
    assert!(lines[0].ends_with("ms (CANCELLED)"));
}

#[tokio::test]
async fn test_other_context_error() {
    let (logger, memory) = memory_logger();
    logger.set_format(OutputFormat::Json);
    let request_logger = RequestLogger::new(logger, RequestLoggerConfig::default());

    app(&request_logger).oneshot(get_request("/fail")).await.unwrap();

    let lines = wait_for(&memory, 1).await;
    let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(parsed["level"], "ERROR");
    assert!(parsed["message"].as_str().unwrap().ends_with("(db pool closed)"));
    assert_eq!(parsed["metadata"]["cancel_reason"], "db pool closed");
}

#[tokio::test]
async fn test_custom_levels_and_disabled_outcome() {
    let (logger, memory) = memory_logger();
    let request_logger = RequestLogger::new(
        logger,
        RequestLoggerConfig {
            normal_level: Some(LogLevel::Info),
            cancelled_level: None,
            ..RequestLoggerConfig::default()
        },
    );
    let app = app(&request_logger);

    app.clone().oneshot(get_request("/cancel")).await.unwrap();
    app.oneshot(get_request("/hello")).await.unwrap();

    let lines = wait_for(&memory, 1).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(memory.len(), 1);
    assert!(lines[0].contains("[INFO]"));
    assert!(lines[0].contains("GET /hello"));
}

#[tokio::test]
async fn test_captures_headers_params_and_body() {
    let (logger, memory) = memory_logger();
    let request_logger = RequestLogger::new(
        logger,
        RequestLoggerConfig {
            headers: true,
            params: true,
            body: true,
            tags: vec!["http".into()],
            ..RequestLoggerConfig::default()
        },
    );

    let request = Request::builder()
        .method("POST")
        .uri("/echo?page=2&sort=asc")
        .header("content-type", "application/json")
        .header("x-request-id", "abc")
        .body(Body::from(r#"{"name":"widget","qty":3}"#))
        .unwrap();
    let response = app(&request_logger).oneshot(request).await.unwrap();

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&body[..], br#"{"name":"widget","qty":3}"#);

    let lines = wait_for(&memory, 1).await;
    let line = &lines[0];
    assert!(line.contains("(api,http) POST /echo: "));
    assert!(line.contains("\nHeaders: "));
    assert!(line.contains("x-request-id: [abc]"));
    assert!(line.contains("\nParams: page: [2]; sort: [asc]"));
    assert!(line.contains("\nBody: {\n  \"name\": \"widget\",\n  \"qty\": 3\n}"));
}

#[tokio::test]
async fn test_body_read_failure_returns_400() {
    let (logger, memory) = memory_logger();
    let request_logger = RequestLogger::new(
        logger,
        RequestLoggerConfig {
            body: true,
            ..RequestLoggerConfig::default()
        },
    );

    let chunks: Vec<std::result::Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(b"partial")),
        Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer reset")),
    ];
    let request = Request::builder()
        .method("POST")
        .uri("/echo")
        .body(Body::from_stream(futures_util::stream::iter(chunks)))
        .unwrap();

    let response = app(&request_logger).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let text = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert!(String::from_utf8_lossy(&text).starts_with("Failed to read request body: "));

    let lines = memory.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[ERROR]"));
    assert!(lines[0].contains("error creating request log for /echo: Failed to read request body"));
}

#[tokio::test]
async fn test_one_entry_per_concurrent_request() {
    let (logger, memory) = memory_logger();
    let request_logger = RequestLogger::new(logger, RequestLoggerConfig::default());
    let app = app(&request_logger);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            app.oneshot(get_request("/hello")).await.unwrap().status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap(), StatusCode::OK);
    }

    let lines = wait_for(&memory, 20).await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(lines.len(), 20);
    assert_eq!(memory.len(), 20);
}

async fn serve() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/items", get(|| async { "[]" }))
        .route("/slow", get(slow));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn test_client_transport_logs_request() {
    let addr = serve().await;
    let (logger, memory) = memory_logger();
    let request_logger = RequestLogger::new(
        logger,
        RequestLoggerConfig {
            params: true,
            tags: vec!["client".into()],
            ..RequestLoggerConfig::default()
        },
    );

    let client = reqwest::Client::new();
    let transport = request_logger.transport(client.clone());
    let request = client
        .get(format!("http://{}/items?limit=5", addr))
        .build()
        .unwrap();

    let response = transport.execute(request).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "[]");

    let lines = memory.lines();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("[DEBUG]"));
    assert!(lines[0].contains("(api,client) GET /items: "));
    assert!(lines[0].contains("\nParams: limit: [5]"));
}

#[tokio::test]
async fn test_client_timeout_is_deadline_exceeded() {
    let addr = serve().await;
    let (logger, memory) = memory_logger();
    let request_logger = RequestLogger::new(logger, RequestLoggerConfig::default());

    let client = reqwest::Client::new();
    let transport = request_logger.transport(client.clone());
    let request = client
        .get(format!("http://{}/slow", addr))
        .timeout(Duration::from_millis(10))
        .build()
        .unwrap();

    let result = transport.execute(request).await;
    assert!(result.unwrap_err().is_timeout());

    let lines = memory.lines();
    assert!(lines[0].contains("[WARN]"));
    assert!(lines[0].ends_with("ms (DEADLINE EXCEEDED)"));
}

#[tokio::test]
async fn test_client_cancelled_context() {
    let addr = serve().await;
    let (logger, memory) = memory_logger();
    let request_logger = RequestLogger::new(logger, RequestLoggerConfig::default());

    let client = reqwest::Client::new();
    let transport = request_logger.transport(client.clone());
    let request = client
        .get(format!("http://{}/items", addr))
        .build()
        .unwrap();

    let ctx = RequestContext::new();
    ctx.cancel();
    transport.execute_with_context(request, &ctx).await.unwrap();

    assert!(memory.lines()[0].ends_with("ms (CANCELLED)"));
}
