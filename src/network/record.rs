// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Captured exchange records

use std::collections::BTreeMap;
use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use super::body_clone::CapturedBody;

/// Identifier assigned by a [`RecordStore`](super::RecordStore)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

/// Fields common to request and response records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRecord {
    /// Shared by the request and response record of one exchange
    pub correlation_id: u64,
    /// When this phase was recorded
    pub timestamp: DateTime<Utc>,
    /// HTTP method
    pub method: String,
    /// Request URL
    pub url: String,
    /// Port, explicit or the scheme default
    pub port: Option<u16>,
    /// Resolved host address, best effort
    pub ip: Option<IpAddr>,
    /// Headers; never an empty map
    pub headers: Option<BTreeMap<String, String>>,
    /// Body text
    pub body: Option<String>,
    /// Body size in bytes; never zero
    pub body_size: Option<u64>,
}

impl ExchangeRecord {
    /// Start a record stamped with the current time
    pub fn new(
        correlation_id: u64,
        method: impl Into<String>,
        url: impl Into<String>,
        port: Option<u16>,
    ) -> Self {
        Self {
            correlation_id,
            timestamp: Utc::now(),
            method: method.into(),
            url: url.into(),
            port,
            ip: None,
            headers: None,
            body: None,
            body_size: None,
        }
    }

    /// Set the resolved address
    pub fn with_ip(mut self, ip: Option<IpAddr>) -> Self {
        self.ip = ip;
        self
    }

    /// Set headers, dropping any whose name is in `exclude`
    pub fn with_headers(mut self, headers: &HeaderMap, exclude: &[&str]) -> Self {
        self.headers = collect_headers(headers, exclude);
        self
    }

    /// Set body text and size
    pub fn with_body(mut self, captured: CapturedBody) -> Self {
        self.body = captured.text;
        self.body_size = captured.size.filter(|size| *size > 0);
        self
    }
}

/// Flatten a header map. Repeated names are joined with ", ", non-text
/// values are skipped, and an empty result becomes `None`.
pub fn collect_headers(headers: &HeaderMap, exclude: &[&str]) -> Option<BTreeMap<String, String>> {
    let mut out: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers.iter() {
        let name = name.as_str();
        if exclude.iter().any(|ex| ex.eq_ignore_ascii_case(name)) {
            continue;
        }
        let Ok(value) = value.to_str() else {
            continue;
        };
        out.entry(name.to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// Request phase record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestRecord {
    #[serde(flatten)]
    pub exchange: ExchangeRecord,
    /// Declared content type
    pub content_type: Option<String>,
    /// Store-assigned id
    pub record_id: Option<RecordId>,
}

impl RequestRecord {
    pub fn new(exchange: ExchangeRecord, content_type: Option<String>) -> Self {
        Self {
            exchange,
            content_type,
            record_id: None,
        }
    }
}

/// How the exchange ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResponseOutcome {
    /// A response came back
    Completed {
        code: u16,
        message: String,
        duration_ms: u64,
    },
    /// The next stage failed at the transport level
    Failed { error_message: String },
}

/// Response phase record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    #[serde(flatten)]
    pub exchange: ExchangeRecord,
    #[serde(flatten)]
    pub outcome: ResponseOutcome,
}

impl ResponseRecord {
    /// Record for a response that arrived
    pub fn completed(
        exchange: ExchangeRecord,
        code: u16,
        message: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            exchange,
            outcome: ResponseOutcome::Completed {
                code,
                message: message.into(),
                duration_ms: duration.as_millis() as u64,
            },
        }
    }

    /// Record for a transport failure
    pub fn failed(exchange: ExchangeRecord, error_message: impl Into<String>) -> Self {
        Self {
            exchange,
            outcome: ResponseOutcome::Failed {
                error_message: error_message.into(),
            },
        }
    }

    /// Status code, if a response arrived
    pub fn code(&self) -> Option<u16> {
        match self.outcome {
            ResponseOutcome::Completed { code, .. } => Some(code),
            ResponseOutcome::Failed { .. } => None,
        }
    }

    /// Transport failure message, if any
    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            ResponseOutcome::Completed { .. } => None,
            ResponseOutcome::Failed { error_message } => Some(error_message),
        }
    }
}

/// A finished record, as handed to a sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapturedRecord {
    Request(RequestRecord),
    Response(ResponseRecord),
}

impl CapturedRecord {
    /// Common fields
    pub fn exchange(&self) -> &ExchangeRecord {
        match self {
            CapturedRecord::Request(r) => &r.exchange,
            CapturedRecord::Response(r) => &r.exchange,
        }
    }

    /// Correlation id
    pub fn correlation_id(&self) -> u64 {
        self.exchange().correlation_id
    }

    pub fn as_request(&self) -> Option<&RequestRecord> {
        match self {
            CapturedRecord::Request(r) => Some(r),
            CapturedRecord::Response(_) => None,
        }
    }

    pub fn as_response(&self) -> Option<&ResponseRecord> {
        match self {
            CapturedRecord::Response(r) => Some(r),
            CapturedRecord::Request(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn sample_exchange() -> ExchangeRecord {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("*/*"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));
        ExchangeRecord::new(7, "POST", "http://example.com/api", Some(80))
            .with_ip(Some("93.184.216.34".parse().unwrap()))
            .with_headers(&headers, &["content-type", "content-length"])
            .with_body(CapturedBody {
                text: Some(r#"{"a":1}"#.to_string()),
                size: Some(7),
            })
    }

    #[test]
    fn test_collect_headers_excludes_and_joins() {
        let mut headers = HeaderMap::new();
        headers.insert("content-type", HeaderValue::from_static("text/plain"));
        headers.insert("content-length", HeaderValue::from_static("5"));
        headers.append("x-multi", HeaderValue::from_static("a"));
        headers.append("x-multi", HeaderValue::from_static("b"));

        let collected = collect_headers(&headers, &["Content-Type", "content-length"]).unwrap();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected["x-multi"], "a, b");
    }

    #[test]
    fn test_empty_headers_are_absent() {
        let mut headers = HeaderMap::new();
        assert_eq!(collect_headers(&headers, &[]), None);

        headers.insert("content-length", HeaderValue::from_static("0"));
        assert_eq!(collect_headers(&headers, &["content-length"]), None);
    }

    #[test]
    fn test_zero_size_is_absent() {
        let record = ExchangeRecord::new(1, "GET", "http://x.test/", Some(80)).with_body(
            CapturedBody {
                text: Some(String::new()),
                size: Some(0),
            },
        );
        assert_eq!(record.body_size, None);
    }

    #[test]
    fn test_request_record_round_trip() {
        let mut record = RequestRecord::new(sample_exchange(), Some("application/json".into()));
        record.record_id = Some(RecordId(3));

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"correlation_id\":7"));
        assert!(json.contains("\"record_id\":3"));

        let back: RequestRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_response_records_round_trip() {
        let completed = ResponseRecord::completed(
            sample_exchange(),
            200,
            "OK",
            Duration::from_millis(42),
        );
        let failed = ResponseRecord::failed(
            ExchangeRecord::new(8, "GET", "http://example.com/", Some(80)),
            "connection reset",
        );

        for record in [completed, failed] {
            let wrapped = CapturedRecord::Response(record);
            let json = serde_json::to_string(&wrapped).unwrap();
            let back: CapturedRecord = serde_json::from_str(&json).unwrap();
            assert_eq!(back, wrapped);
        }
    }

    #[test]
    fn test_outcome_accessors() {
        let ok = ResponseRecord::completed(sample_exchange(), 204, "No Content", Duration::ZERO);
        assert_eq!(ok.code(), Some(204));
        assert_eq!(ok.error_message(), None);

        let failed = ResponseRecord::failed(sample_exchange(), "connection reset");
        assert_eq!(failed.code(), None);
        assert_eq!(failed.error_message(), Some("connection reset"));

        let wrapped = CapturedRecord::Response(failed);
        assert_eq!(wrapped.correlation_id(), 7);
        assert!(wrapped.as_request().is_none());
        assert!(wrapped.as_response().is_some());
    }
}
