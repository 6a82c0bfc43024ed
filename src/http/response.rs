// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response type

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use url::Url;

use super::body::Body;
use super::headers;

/// HTTP response representation
#[derive(Debug)]
pub struct Response {
    /// Method of the request that produced this response
    pub method: Method,
    /// Response status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body, exactly as transmitted
    pub body: Body,
    /// Final URL (after redirects)
    pub url: Url,
    /// Whether this was a redirect
    pub redirected: bool,
    /// Reason phrase as sent by the server, when the stage knows it
    pub reason: Option<String>,
}

impl Response {
    /// Create a new response
    pub fn new(
        method: Method,
        status: StatusCode,
        headers: HeaderMap,
        body: impl Into<Body>,
        url: Url,
    ) -> Self {
        Self {
            method,
            status,
            headers,
            body: body.into(),
            url,
            redirected: false,
            reason: None,
        }
    }

    /// Mark whether redirects were followed
    pub fn with_redirected(mut self, redirected: bool) -> Self {
        self.redirected = redirected;
        self
    }

    /// Set the reason phrase received on the wire
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Reason phrase: the one received if known, else the canonical one
    /// for the status code, else empty
    pub fn status_text(&self) -> &str {
        match &self.reason {
            Some(reason) => reason,
            None => self.status.canonical_reason().unwrap_or(""),
        }
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(headers::CONTENT_TYPE)
    }

    /// Get content encoding
    pub fn content_encoding(&self) -> Option<&str> {
        self.header(headers::CONTENT_ENCODING)
    }

    /// Declared content length. Unparseable values count as absent.
    pub fn content_length(&self) -> Option<u64> {
        self.header(headers::CONTENT_LENGTH)
            .and_then(|v| v.trim().parse().ok())
    }

    /// Whether transfer-encoding is chunked
    pub fn is_chunked(&self) -> bool {
        self.header(headers::TRANSFER_ENCODING)
            .map(|v| v.trim().eq_ignore_ascii_case("chunked"))
            .unwrap_or(false)
    }

    /// Get the final URL as string
    pub fn url_str(&self) -> &str {
        self.url.as_str()
    }
}
