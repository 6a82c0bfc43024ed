// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # nettap - HTTP exchange capture
//!
//! A capture interceptor for an async HTTP pipeline. Every exchange that
//! passes through it is turned into a request record and a response record
//! and handed to a sink, while the caller receives the response (or error)
//! exactly as the next stage produced it.
//!
//! ## Features
//!
//! - Strict passthrough: responses and errors reach the caller unchanged
//! - Streamed bodies copied without being consumed
//! - gzip undone on the captured copy only
//! - Body-expected rules per status code, method and framing headers
//! - Correlation ids joining each request record to its response record
//! - Request record emitted even if host lookup fails or is cancelled
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nettap::{CaptureConfig, CaptureInterceptor, HttpClient, MemoryStore, Pipeline, Request};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryStore::new());
//!     let capture = CaptureInterceptor::from_config(&CaptureConfig::from_env())
//!         .store(store.clone())
//!         .sink(store.clone());
//!
//!     let pipeline = Pipeline::new(HttpClient::new()?).with(capture);
//!     let response = pipeline.execute(Request::get("https://example.com")?).await?;
//!     println!("{} -> {} records", response.status, store.len());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod network;

// Re-exports for convenience

// Configuration
pub use config::CaptureConfig;

// Errors
pub use error::{Error, ErrorContext, Result};

// HTTP
pub use http::{Body, HttpClient, HttpClientConfig, Request, Response};

// Pipeline
pub use network::{exchange_fn, Exchange, Interceptor, Next, Pipeline};

// Capture
pub use network::{CaptureContext, CaptureInterceptor, Correlator, ExchangePhase};
pub use network::{clone_body, expects_body, CapturedBody};

// Records and sinks
pub use network::{
    CapturedRecord, ExchangeRecord, RecordId, RequestRecord, ResponseOutcome, ResponseRecord,
};
pub use network::{MemoryStore, RecordSink, RecordStore, TracingSink};

/// nettap version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
