// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interceptor pipeline
//!
//! Chain-of-responsibility over a terminal [`Exchange`]. Each interceptor
//! receives the request together with a [`Next`] continuation standing for
//! the rest of the pipeline. `Next::run` consumes the continuation, so a
//! stage can forward a request at most once.
//!
//! # Example
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use nettap::http::{HttpClient, Request, Response};
//! use nettap::network::{Interceptor, Next, Pipeline};
//! use nettap::Result;
//!
//! struct Tagger;
//!
//! #[async_trait]
//! impl Interceptor for Tagger {
//!     async fn intercept(&self, request: Request, next: Next<'_>) -> Result<Response> {
//!         next.run(request.header("x-tag", "1")).await
//!     }
//! }
//!
//! # async fn run() -> Result<()> {
//! let pipeline = Pipeline::new(HttpClient::new()?).with(Tagger);
//! let response = pipeline.execute(Request::get("https://example.com")?).await?;
//! # Ok(())
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::http::{Request, Response};

/// A stage that turns a request into a response
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Carry out the exchange
    async fn proceed(&self, request: Request) -> Result<Response>;
}

/// Middleware wrapped around the rest of the pipeline
#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Handle `request`, normally by forwarding it through `next`.
    ///
    /// Errors returned by `next` should be passed back untouched.
    async fn intercept(&self, request: Request, next: Next<'_>) -> Result<Response>;

    /// Priority - higher priority interceptors run first (outermost)
    fn priority(&self) -> i32 {
        0
    }
}

/// Continuation for the remainder of the pipeline
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    terminal: &'a dyn Exchange,
}

impl<'a> Next<'a> {
    /// Continuation that goes straight to `terminal`
    pub fn terminal(terminal: &'a dyn Exchange) -> Self {
        Self {
            interceptors: &[],
            terminal,
        }
    }

    /// Forward `request` to the rest of the pipeline
    pub async fn run(self, request: Request) -> Result<Response> {
        match self.interceptors.split_first() {
            Some((head, rest)) => {
                let next = Next {
                    interceptors: rest,
                    terminal: self.terminal,
                };
                head.intercept(request, next).await
            }
            None => self.terminal.proceed(request).await,
        }
    }
}

/// Interceptors in front of a terminal exchange
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
    terminal: Arc<dyn Exchange>,
}

impl Pipeline {
    /// Create a pipeline with no interceptors
    pub fn new<E: Exchange + 'static>(terminal: E) -> Self {
        Self {
            interceptors: Vec::new(),
            terminal: Arc::new(terminal),
        }
    }

    /// Add an interceptor
    pub fn add<I: Interceptor + 'static>(&mut self, interceptor: I) {
        self.add_shared(Arc::new(interceptor));
    }

    /// Add an interceptor that is shared with other owners
    pub fn add_shared(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
        // Stable sort: equal priorities keep insertion order
        self.interceptors.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Builder form of [`Pipeline::add`]
    pub fn with<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.add(interceptor);
        self
    }

    /// Number of interceptors
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether the pipeline has no interceptors
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Send a request through every interceptor and the terminal stage
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let next = Next {
            interceptors: &self.interceptors,
            terminal: self.terminal.as_ref(),
        };
        next.run(request).await
    }
}

#[async_trait]
impl Exchange for Pipeline {
    async fn proceed(&self, request: Request) -> Result<Response> {
        self.execute(request).await
    }
}

/// Exchange backed by an async closure
pub struct FnExchange<F>(F);

/// Build an [`Exchange`] from an async closure
pub fn exchange_fn<F, Fut>(f: F) -> FnExchange<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    FnExchange(f)
}

#[async_trait]
impl<F, Fut> Exchange for FnExchange<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    async fn proceed(&self, request: Request) -> Result<Response> {
        (self.0)(request).await
    }
}
