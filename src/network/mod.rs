// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Exchange capture
//!
//! Records every request/response pair that passes through a [`Pipeline`]
//! and forwards the records to a sink.

mod body_clone;
mod capture;
mod chain;
mod classify;
mod context;
mod correlator;
mod record;
mod sink;

pub use body_clone::{clone_body, decode_content, decode_text, resolve_charset, CapturedBody};
pub use capture::{CaptureInterceptor, CAPTURE_PRIORITY};
pub use chain::{exchange_fn, Exchange, FnExchange, Interceptor, Next, Pipeline};
pub use classify::expects_body;
pub use context::CaptureContext;
pub use correlator::{Correlator, ExchangePhase};
pub use record::{
    collect_headers, CapturedRecord, ExchangeRecord, RecordId, RequestRecord, ResponseOutcome,
    ResponseRecord,
};
pub use sink::{MemoryStore, RecordSink, RecordStore, TracingSink};
