// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response body expectation per HTTP/1.1 message rules

use reqwest::{Method, StatusCode};

use crate::http::Response;

/// Whether `response` is expected to carry a body.
///
/// HEAD responses never do. Informational, 204 and 304 responses only do
/// when the headers say otherwise (a parseable content-length, or chunked
/// transfer-encoding).
pub fn expects_body(response: &Response) -> bool {
    if response.method == Method::HEAD {
        return false;
    }

    let status = response.status;
    if !status.is_informational()
        && status != StatusCode::NO_CONTENT
        && status != StatusCode::NOT_MODIFIED
    {
        return true;
    }

    // Headers that disagree with the status code win
    response.content_length().is_some() || response.is_chunked()
}
