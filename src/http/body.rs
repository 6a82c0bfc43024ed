// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request/response body representation
//!
//! A body is either fully buffered or a stream of chunks that the caller
//! reads once.

use std::fmt;
use std::pin::Pin;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, Stream, StreamExt};

use crate::error::{Error, Result};

/// Stream of body chunks
pub type BodyStream = BoxStream<'static, Result<Bytes>>;

/// HTTP message body
pub enum Body {
    /// Fully buffered bytes
    Full(Bytes),
    /// Chunked stream, consumed once
    Stream(BodyStream),
}

impl Body {
    /// Empty buffered body
    pub fn empty() -> Self {
        Body::Full(Bytes::new())
    }

    /// Wrap a chunk stream
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<Bytes>> + Send + 'static,
    {
        Body::Stream(stream.boxed())
    }

    /// Replay `chunks` in order, then yield `error` if there is one.
    ///
    /// Used to hand a partially read stream back to its reader unchanged.
    pub fn replay(chunks: Vec<Bytes>, error: Option<Error>) -> Self {
        let tail = error.map(Err);
        let items = chunks.into_iter().map(Ok).chain(tail);
        Body::Stream(stream::iter(items).boxed())
    }

    /// Whether the body is already buffered
    pub fn is_buffered(&self) -> bool {
        matches!(self, Body::Full(_))
    }

    /// Buffered bytes, if the body is not a stream
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Body::Full(bytes) => Some(bytes),
            Body::Stream(_) => None,
        }
    }

    /// Read the whole body into memory
    pub async fn into_bytes(self) -> Result<Bytes> {
        match self {
            Body::Full(bytes) => Ok(bytes),
            Body::Stream(mut stream) => {
                let mut buf = BytesMut::new();
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(buf.freeze())
            }
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::empty()
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Body::Full(bytes) => f.debug_tuple("Full").field(&bytes.len()).finish(),
            Body::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

impl From<Bytes> for Body {
    fn from(bytes: Bytes) -> Self {
        Body::Full(bytes)
    }
}

impl From<Vec<u8>> for Body {
    fn from(bytes: Vec<u8>) -> Self {
        Body::Full(Bytes::from(bytes))
    }
}

impl From<String> for Body {
    fn from(s: String) -> Self {
        Body::Full(Bytes::from(s))
    }
}

impl From<&'static str> for Body {
    fn from(s: &'static str) -> Self {
        Body::Full(Bytes::from_static(s.as_bytes()))
    }
}

impl From<&'static [u8]> for Body {
    fn from(s: &'static [u8]) -> Self {
        Body::Full(Bytes::from_static(s))
    }
}

impl Stream for Body {
    type Item = Result<Bytes>;

    fn poll_next(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        let this = self.get_mut();
        match this {
            Body::Full(bytes) => {
                if bytes.is_empty() {
                    std::task::Poll::Ready(None)
                } else {
                    let chunk = std::mem::take(bytes);
                    std::task::Poll::Ready(Some(Ok(chunk)))
                }
            }
            Body::Stream(stream) => stream.as_mut().poll_next(cx),
        }
    }
}
