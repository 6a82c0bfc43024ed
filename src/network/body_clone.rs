// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Non-destructive body copies for capture
//!
//! The copy is what gets decompressed and decoded. The body left in place
//! for the caller always yields the bytes the previous stage produced.

use std::io::Read;

use bytes::{Bytes, BytesMut};
use encoding_rs::{Encoding, UTF_8};
use flate2::read::MultiGzDecoder;
use futures::StreamExt;

use crate::http::Body;

/// Copy `body` into memory without disturbing what its reader will see.
///
/// A streamed body is drained and put back as a buffered body with the same
/// bytes. If the stream fails part way, it is put back as a replay of the
/// chunks read so far followed by the original error, and `None` is returned.
pub async fn clone_body(body: &mut Body) -> Option<Bytes> {
    let mut stream = match std::mem::take(body) {
        Body::Full(bytes) => {
            let copy = bytes.clone();
            *body = Body::Full(bytes);
            return Some(copy);
        }
        Body::Stream(stream) => stream,
    };

    let mut chunks = Vec::new();
    while let Some(item) = stream.next().await {
        match item {
            Ok(chunk) => chunks.push(chunk),
            Err(err) => {
                tracing::debug!(
                    error = %err,
                    chunks = chunks.len(),
                    "body stream failed during capture"
                );
                *body = Body::replay(chunks, Some(err));
                return None;
            }
        }
    }

    let bytes = concat(chunks);
    *body = Body::Full(bytes.clone());
    Some(bytes)
}

fn concat(mut chunks: Vec<Bytes>) -> Bytes {
    match chunks.len() {
        0 => Bytes::new(),
        1 => chunks.pop().unwrap_or_default(),
        _ => {
            let total = chunks.iter().map(Bytes::len).sum();
            let mut buf = BytesMut::with_capacity(total);
            for chunk in &chunks {
                buf.extend_from_slice(chunk);
            }
            buf.freeze()
        }
    }
}

/// Undo `content-encoding` on a captured copy.
///
/// Only gzip is inflated; other encodings pass through. Returns `None` if
/// the copy claims gzip but does not inflate.
pub fn decode_content(bytes: &Bytes, content_encoding: Option<&str>) -> Option<Bytes> {
    let is_gzip = content_encoding
        .map(|enc| enc.trim().eq_ignore_ascii_case("gzip"))
        .unwrap_or(false);
    if !is_gzip {
        return Some(bytes.clone());
    }

    let mut out = Vec::new();
    match MultiGzDecoder::new(bytes.as_ref()).read_to_end(&mut out) {
        Ok(_) => Some(Bytes::from(out)),
        Err(e) => {
            tracing::debug!(error = %e, "captured body is not valid gzip");
            None
        }
    }
}

/// Charset for decoding a body: the content-type `charset` parameter when
/// it names a known encoding, otherwise UTF-8.
pub fn resolve_charset(content_type: Option<&str>) -> &'static Encoding {
    content_type
        .and_then(|ct| ct.parse::<mime::Mime>().ok())
        .and_then(|m| {
            m.get_param(mime::CHARSET)
                .and_then(|label| Encoding::for_label(label.as_str().as_bytes()))
        })
        .unwrap_or(UTF_8)
}

/// Decode `bytes` as text. Malformed input yields `None`.
pub fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Text and size extracted from a body copy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedBody {
    /// Decoded text
    pub text: Option<String>,
    /// Size in bytes
    pub size: Option<u64>,
}

impl CapturedBody {
    /// Capture an (already decompressed) body copy. Empty copies capture nothing.
    pub fn from_bytes(bytes: &[u8], content_type: Option<&str>) -> Self {
        if bytes.is_empty() {
            return Self::default();
        }

        Self {
            text: decode_text(bytes, resolve_charset(content_type)),
            size: Some(bytes.len() as u64),
        }
    }
}
