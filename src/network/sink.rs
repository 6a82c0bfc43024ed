// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Record consumers: the log sink and the persistent store

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use super::record::{CapturedRecord, RecordId, RequestRecord, ResponseRecord};

/// Receives finished records. Called synchronously, at most twice per exchange.
pub trait RecordSink: Send + Sync {
    fn on_record(&self, record: &CapturedRecord);
}

impl<F> RecordSink for F
where
    F: Fn(&CapturedRecord) + Send + Sync,
{
    fn on_record(&self, record: &CapturedRecord) {
        self(record)
    }
}

/// Persists request records and hands back their identifier
pub trait RecordStore: Send + Sync {
    fn add_record(&self, record: &RequestRecord) -> RecordId;
}

/// Sink that writes each record as JSON through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl RecordSink for TracingSink {
    fn on_record(&self, record: &CapturedRecord) {
        match serde_json::to_string(record) {
            Ok(json) => tracing::info!(
                target: "nettap::record",
                correlation_id = record.correlation_id(),
                "{}",
                json
            ),
            Err(e) => tracing::warn!(
                correlation_id = record.correlation_id(),
                error = %e,
                "failed to serialize captured record"
            ),
        }
    }
}

/// In-process store and sink.
///
/// As a store it hands out sequential ids starting at 1. As a sink it keeps
/// every record it receives, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<CapturedRecord>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// All retained records
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.records.read().clone()
    }

    /// Request records only
    pub fn requests(&self) -> Vec<RequestRecord> {
        self.records
            .read()
            .iter()
            .filter_map(|r| r.as_request().cloned())
            .collect()
    }

    /// Response records only
    pub fn responses(&self) -> Vec<ResponseRecord> {
        self.records
            .read()
            .iter()
            .filter_map(|r| r.as_response().cloned())
            .collect()
    }

    /// Records belonging to one exchange
    pub fn find(&self, correlation_id: u64) -> Vec<CapturedRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.correlation_id() == correlation_id)
            .cloned()
            .collect()
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Drop retained records. Ids keep counting.
    pub fn clear(&self) {
        self.records.write().clear();
    }

    /// Export retained records as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&*self.records.read())
    }
}

impl RecordStore for MemoryStore {
    fn add_record(&self, _record: &RequestRecord) -> RecordId {
        RecordId(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl RecordSink for MemoryStore {
    fn on_record(&self, record: &CapturedRecord) {
        self.records.write().push(record.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::record::ExchangeRecord;
    use std::sync::Arc;
    use std::time::Duration;

    fn request(id: u64) -> RequestRecord {
        RequestRecord::new(
            ExchangeRecord::new(id, "GET", "http://example.com/", Some(80)),
            None,
        )
    }

    #[test]
    fn test_store_assigns_sequential_ids() {
        let store = MemoryStore::new();
        assert_eq!(store.add_record(&request(1)), RecordId(1));
        assert_eq!(store.add_record(&request(2)), RecordId(2));
        // Assigning an id does not retain anything
        assert!(store.is_empty());
    }

    #[test]
    fn test_sink_retains_in_order() {
        let store = MemoryStore::new();
        store.on_record(&CapturedRecord::Request(request(1)));
        store.on_record(&CapturedRecord::Request(request(2)));
        store.on_record(&CapturedRecord::Response(ResponseRecord::completed(
            request(1).exchange,
            200,
            "OK",
            Duration::from_millis(3),
        )));

        assert_eq!(store.len(), 3);
        assert_eq!(store.requests().len(), 2);
        assert_eq!(store.responses().len(), 1);
        assert_eq!(store.find(1).len(), 2);
        assert_eq!(store.records()[1].correlation_id(), 2);

        let json = store.to_json().unwrap();
        let back: Vec<CapturedRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store.records());

        assert_eq!(store.add_record(&request(1)), RecordId(1));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.add_record(&request(3)), RecordId(2));
    }

    #[test]
    fn test_closure_sink() {
        let seen = Arc::new(RwLock::new(Vec::new()));
        let captured = seen.clone();
        let sink = move |record: &CapturedRecord| captured.write().push(record.correlation_id());

        sink.on_record(&CapturedRecord::Request(request(9)));
        assert_eq!(*seen.read(), vec![9]);
    }

    #[test]
    fn test_tracing_sink_does_not_panic() {
        TracingSink.on_record(&CapturedRecord::Request(request(1)));
    }
}
