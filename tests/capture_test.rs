// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! End-to-end capture through the reqwest client against a mock server

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use flate2::write::GzEncoder;
use flate2::Compression;
use nettap::{
    CaptureConfig, CaptureContext, CaptureInterceptor, Error, HttpClient, MemoryStore, Pipeline,
    RecordId, Request,
};
use wiremock::matchers::{body_string, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline_with_store(context: Arc<CaptureContext>) -> (Pipeline, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let capture = CaptureInterceptor::with_config(context, &CaptureConfig::new())
        .store(store.clone())
        .sink(store.clone());
    let pipeline = Pipeline::new(HttpClient::new().unwrap()).with(capture);
    (pipeline, store)
}

#[tokio::test]
async fn test_plain_text_exchange() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/hello"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_string("hello"),
        )
        .mount(&server)
        .await;

    let (pipeline, store) = pipeline_with_store(Arc::new(CaptureContext::default()));
    let response = pipeline
        .execute(Request::get(format!("{}/hello", server.uri())).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.body.into_bytes().await.unwrap().as_ref(), b"hello");

    let requests = store.requests();
    let responses = store.responses();
    assert_eq!(requests.len(), 1);
    assert_eq!(responses.len(), 1);

    let request = &requests[0];
    let record = &responses[0];
    assert_eq!(request.record_id, Some(RecordId(1)));
    assert_eq!(request.exchange.ip, Some("127.0.0.1".parse().unwrap()));
    assert_eq!(
        request.exchange.correlation_id,
        record.exchange.correlation_id
    );
    assert_eq!(record.code(), Some(200));
    assert_eq!(record.exchange.body.as_deref(), Some("hello"));
    assert_eq!(record.exchange.body_size, Some(5));
    assert_eq!(record.error_message(), None);
    assert!(record.exchange.headers.as_ref().unwrap().contains_key("content-type"));
}

#[tokio::test]
async fn test_gzip_body_reaches_caller_compressed() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(b"zipped greeting").unwrap();
    let wire = encoder.finish().unwrap();

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gz"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain; charset=utf-8")
                .insert_header("content-encoding", "gzip")
                .set_body_bytes(wire.clone()),
        )
        .mount(&server)
        .await;

    let (pipeline, store) = pipeline_with_store(Arc::new(CaptureContext::default()));
    let response = pipeline
        .execute(Request::get(format!("{}/gz", server.uri())).unwrap())
        .await
        .unwrap();
    assert_eq!(response.content_encoding(), Some("gzip"));
    assert_eq!(
        response.body.into_bytes().await.unwrap().as_ref(),
        wire.as_slice()
    );

    let record = &store.responses()[0];
    assert_eq!(record.exchange.body.as_deref(), Some("zipped greeting"));
    assert_eq!(record.exchange.body_size, Some(15));
}

#[tokio::test]
async fn test_not_modified_and_head_capture_no_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cached"))
        .respond_with(ResponseTemplate::new(304))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;

    let (pipeline, store) = pipeline_with_store(Arc::new(CaptureContext::default()));
    pipeline
        .execute(Request::get(format!("{}/cached", server.uri())).unwrap())
        .await
        .unwrap();
    pipeline
        .execute(Request::head(format!("{}/page", server.uri())).unwrap())
        .await
        .unwrap();

    let responses = store.responses();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].code(), Some(304));
    for record in &responses {
        assert_eq!(record.exchange.body, None);
        assert_eq!(record.exchange.body_size, None);
    }
    assert_eq!(responses[1].exchange.method, "HEAD");
}

#[tokio::test]
async fn test_post_body_and_filtered_headers() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/submit"))
        .and(body_string(r#"{"user":"alice"}"#))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let (pipeline, store) = pipeline_with_store(Arc::new(CaptureContext::default()));
    let request = Request::post(format!("{}/submit", server.uri()))
        .unwrap()
        .header("x-request-id", "r-1")
        .json(&serde_json::json!({"user": "alice"}))
        .unwrap();
    let response = pipeline.execute(request).await.unwrap();
    assert_eq!(response.status.as_u16(), 201);

    let record = &store.requests()[0];
    assert_eq!(record.exchange.body.as_deref(), Some(r#"{"user":"alice"}"#));
    assert_eq!(record.exchange.body_size, Some(16));
    assert_eq!(record.content_type.as_deref(), Some("application/json"));
    let headers = record.exchange.headers.as_ref().unwrap();
    assert_eq!(headers["x-request-id"], "r-1");
    assert!(!headers.contains_key("content-type"));
    assert!(!headers.contains_key("content-length"));
}

#[tokio::test]
async fn test_connection_failure_is_reraised() {
    // Grab a free port, then close it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let (pipeline, store) = pipeline_with_store(Arc::new(CaptureContext::default()));
    let err = pipeline
        .execute(Request::get(format!("http://127.0.0.1:{}/", port)).unwrap())
        .await
        .unwrap_err();
    match &err {
        Error::Http(e) => assert!(e.is_connect()),
        other => panic!("transport error was converted: {:?}", other),
    }

    let records = store.records();
    assert_eq!(records.len(), 2);
    let response = records[1].as_response().unwrap();
    assert_eq!(response.code(), None);
    assert_eq!(
        response.error_message(),
        Some(err.failure_message().as_str())
    );
    assert_eq!(
        response.exchange.correlation_id,
        records[0].correlation_id()
    );
    assert_eq!(response.exchange.port, Some(port));
}

#[tokio::test]
async fn test_request_timeout_is_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let (pipeline, store) = pipeline_with_store(Arc::new(CaptureContext::default()));
    let request = Request::get(format!("{}/slow", server.uri()))
        .unwrap()
        .timeout(Duration::from_millis(50));
    let err = pipeline.execute(request).await.unwrap_err();
    assert!(err.is_timeout());
    match &err {
        Error::Timeout { duration_ms, url, .. } => {
            assert_eq!(*duration_ms, 50);
            assert_eq!(url.as_deref(), Some(format!("{}/slow", server.uri()).as_str()));
        }
        other => panic!("expected a timeout, got {:?}", other),
    }

    let responses = store.responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(
        responses[0].error_message(),
        Some(err.failure_message().as_str())
    );
}

#[tokio::test]
async fn test_disabled_context_records_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("quiet"))
        .mount(&server)
        .await;

    let context = Arc::new(CaptureContext::new(false));
    let (pipeline, store) = pipeline_with_store(context.clone());
    let response = pipeline
        .execute(Request::get(server.uri()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.body.into_bytes().await.unwrap().as_ref(), b"quiet");
    assert!(store.is_empty());
    assert_eq!(context.correlator().last_issued(), 0);

    context.set_enabled(true);
    pipeline
        .execute(Request::get(server.uri()).unwrap())
        .await
        .unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(store.records()[0].correlation_id(), 1);
}
