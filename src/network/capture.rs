// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Exchange capture interceptor
//!
//! Observes every exchange passing through a [`Pipeline`](super::Pipeline),
//! turns it into a request record and a response record, and hands both to a
//! [`RecordSink`]. The caller gets back exactly what the next stage produced.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use url::{Host, Url};

use super::body_clone::{clone_body, decode_content, CapturedBody};
use super::chain::{Interceptor, Next};
use super::classify::expects_body;
use super::context::CaptureContext;
use super::correlator::ExchangePhase;
use super::record::{CapturedRecord, ExchangeRecord, RequestRecord, ResponseRecord};
use super::sink::{RecordSink, RecordStore};
use crate::config::CaptureConfig;
use crate::error::Result;
use crate::http::{headers, Request, Response};

/// Request headers that have their own record fields
const REQUEST_HEADER_EXCLUDES: &[&str] = &[headers::CONTENT_TYPE, headers::CONTENT_LENGTH];

/// Priority of the capture interceptor. Low, so it sits closest to the
/// terminal stage and sees the request as it will be sent.
pub const CAPTURE_PRIORITY: i32 = -100;

/// Interceptor that records each exchange
pub struct CaptureInterceptor {
    context: Arc<CaptureContext>,
    store: Option<Arc<dyn RecordStore>>,
    sink: Option<Arc<dyn RecordSink>>,
    resolve_dns: bool,
    dns_timeout: Option<Duration>,
}

impl CaptureInterceptor {
    /// Create an interceptor over a shared context
    pub fn new(context: Arc<CaptureContext>) -> Self {
        Self {
            context,
            store: None,
            sink: None,
            resolve_dns: true,
            dns_timeout: None,
        }
    }

    /// Create an interceptor with its own context
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::with_config(Arc::new(CaptureContext::from_config(config)), config)
    }

    /// Create an interceptor over a shared context, with lookup settings
    /// taken from `config`
    pub fn with_config(context: Arc<CaptureContext>, config: &CaptureConfig) -> Self {
        Self {
            resolve_dns: config.resolve_dns,
            dns_timeout: config.dns_timeout,
            ..Self::new(context)
        }
    }

    /// Set the store that assigns ids to request records
    pub fn store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the sink that receives finished records
    pub fn sink(mut self, sink: Arc<dyn RecordSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Shared context (enable flag and correlator)
    pub fn context(&self) -> &Arc<CaptureContext> {
        &self.context
    }

    /// Best-effort lookup of the request host. Never fails the exchange.
    async fn resolve(&self, url: &Url) -> Option<IpAddr> {
        if !self.resolve_dns {
            return None;
        }

        let domain = match url.host()? {
            Host::Ipv4(ip) => return Some(IpAddr::V4(ip)),
            Host::Ipv6(ip) => return Some(IpAddr::V6(ip)),
            Host::Domain(domain) => domain,
        };
        let port = url.port_or_known_default().unwrap_or(0);
        let lookup = tokio::net::lookup_host((domain, port));

        let result = match self.dns_timeout {
            Some(limit) => match tokio::time::timeout(limit, lookup).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::debug!(
                        host = domain,
                        timeout_ms = limit.as_millis() as u64,
                        "host lookup timed out"
                    );
                    return None;
                }
            },
            None => lookup.await,
        };

        match result {
            Ok(mut addrs) => addrs.next().map(|addr| addr.ip()),
            Err(e) => {
                tracing::debug!(host = domain, error = %e, "host lookup failed");
                None
            }
        }
    }

    fn emit_request(&self, mut record: RequestRecord) {
        if !self.context.is_enabled() {
            return;
        }

        if let Some(store) = &self.store {
            record.record_id = Some(store.add_record(&record));
        }

        tracing::debug!(
            correlation_id = record.exchange.correlation_id,
            method = %record.exchange.method,
            url = %record.exchange.url,
            phase = %ExchangePhase::RequestLogged,
            "request captured"
        );

        if let Some(sink) = &self.sink {
            sink.on_record(&CapturedRecord::Request(record));
        }
    }

    fn emit_response(&self, record: ResponseRecord) {
        if !self.context.is_enabled() {
            return;
        }

        let exchange = &record.exchange;
        match record.code() {
            Some(status) => tracing::debug!(
                correlation_id = exchange.correlation_id,
                method = %exchange.method,
                url = %exchange.url,
                status,
                phase = %ExchangePhase::ResponseLogged,
                "response captured"
            ),
            None => tracing::warn!(
                correlation_id = exchange.correlation_id,
                method = %exchange.method,
                url = %exchange.url,
                error = record.error_message().unwrap_or_default(),
                phase = %ExchangePhase::ErrorLogged,
                "exchange failed"
            ),
        }

        if let Some(sink) = &self.sink {
            sink.on_record(&CapturedRecord::Response(record));
        }
    }

    async fn capture_response_body(&self, response: &mut Response) -> CapturedBody {
        if !expects_body(response) {
            return CapturedBody::default();
        }

        let Some(wire) = clone_body(&mut response.body).await else {
            return CapturedBody::default();
        };

        match decode_content(&wire, response.content_encoding()) {
            Some(decoded) => CapturedBody::from_bytes(&decoded, response.content_type()),
            None => CapturedBody::default(),
        }
    }
}

/// Emits the request record when finished, or when dropped unfinished.
///
/// Dropping happens if the exchange future is cancelled while the host
/// lookup is pending; the record then goes out without an address.
struct RequestEmission<'a> {
    capture: &'a CaptureInterceptor,
    record: Option<RequestRecord>,
}

impl<'a> RequestEmission<'a> {
    fn new(capture: &'a CaptureInterceptor, record: RequestRecord) -> Self {
        Self {
            capture,
            record: Some(record),
        }
    }

    fn finish(mut self, ip: Option<IpAddr>) {
        if let Some(mut record) = self.record.take() {
            record.exchange.ip = ip;
            self.capture.emit_request(record);
        }
    }
}

impl Drop for RequestEmission<'_> {
    fn drop(&mut self) {
        if let Some(record) = self.record.take() {
            self.capture.emit_request(record);
        }
    }
}

#[async_trait]
impl Interceptor for CaptureInterceptor {
    async fn intercept(&self, mut request: Request, next: Next<'_>) -> Result<Response> {
        if !self.context.is_enabled() {
            return next.run(request).await;
        }

        let correlation_id = self.context.next_correlation_id();
        let method = request.method.to_string();
        let url = request.url_str().to_string();
        let port = request.port();
        let content_type = request.content_type().map(String::from);

        let body = match request.body.as_mut() {
            Some(body) => match clone_body(body).await {
                Some(bytes) => CapturedBody::from_bytes(&bytes, content_type.as_deref()),
                None => CapturedBody::default(),
            },
            None => CapturedBody::default(),
        };

        let exchange = ExchangeRecord::new(correlation_id, method.as_str(), url.as_str(), port)
            .with_headers(&request.headers, REQUEST_HEADER_EXCLUDES)
            .with_body(body);
        let emission = RequestEmission::new(self, RequestRecord::new(exchange, content_type));
        let ip = self.resolve(&request.url).await;
        emission.finish(ip);

        let response_base = ExchangeRecord::new(correlation_id, method, url, port).with_ip(ip);
        let started = Instant::now();

        match next.run(request).await {
            Ok(mut response) => {
                let duration = started.elapsed();
                let mut exchange = response_base.with_headers(&response.headers, &[]);
                exchange.timestamp = Utc::now();
                let exchange = exchange.with_body(self.capture_response_body(&mut response).await);

                self.emit_response(ResponseRecord::completed(
                    exchange,
                    response.status_code(),
                    response.status_text(),
                    duration,
                ));
                Ok(response)
            }
            Err(err) => {
                self.emit_response(ResponseRecord::failed(response_base, err.failure_message()));
                Err(err)
            }
        }
    }

    fn priority(&self) -> i32 {
        CAPTURE_PRIORITY
    }
}
