// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Correlation ids joining request and response records

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Monotonic id generator. The first id issued is 1.
#[derive(Debug, Default)]
pub struct Correlator {
    counter: AtomicU64,
}

impl Correlator {
    /// Create a correlator that has issued nothing yet
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// Issue the next id
    pub fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Most recently issued id, 0 if none
    pub fn last_issued(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

/// Progress of a single exchange through the capture layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangePhase {
    Started,
    RequestLogged,
    ResponseLogged,
    ErrorLogged,
}

impl ExchangePhase {
    /// Whether no further transition is possible
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ExchangePhase::ResponseLogged | ExchangePhase::ErrorLogged
        )
    }
}

impl fmt::Display for ExchangePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExchangePhase::Started => "started",
            ExchangePhase::RequestLogged => "request_logged",
            ExchangePhase::ResponseLogged => "response_logged",
            ExchangePhase::ErrorLogged => "error_logged",
        };
        f.write_str(s)
    }
}
