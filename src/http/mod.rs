// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for nettap
//!
//! Request/response/body types shared by every pipeline stage, plus the
//! reqwest-backed client that terminates the pipeline.

mod body;
mod client;
mod request;
mod response;

pub use body::{Body, BodyStream};
pub use client::{HttpClient, HttpClientConfig};
pub use request::Request;
pub use response::Response;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("nettap/", env!("CARGO_PKG_VERSION"));

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const CONTENT_LENGTH: &str = "content-length";
    pub const CONTENT_ENCODING: &str = "content-encoding";
    pub const TRANSFER_ENCODING: &str = "transfer-encoding";
}
