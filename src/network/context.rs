// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Shared capture state: the enable flag and the correlator

use std::sync::atomic::{AtomicBool, Ordering};

use super::correlator::Correlator;
use crate::config::CaptureConfig;

/// State shared by every exchange a capture layer sees.
///
/// The flag carries no transactional guarantee; it is read independently at
/// each check, so toggling it mid-exchange can log one phase without the
/// other.
#[derive(Debug)]
pub struct CaptureContext {
    enabled: AtomicBool,
    correlator: Correlator,
}

impl CaptureContext {
    /// Create a context with the given initial flag
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            correlator: Correlator::new(),
        }
    }

    /// Create a context from configuration
    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new(config.enabled)
    }

    /// Whether capture is on
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Turn capture on or off
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// The correlator
    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    /// Issue the next correlation id
    pub fn next_correlation_id(&self) -> u64 {
        self.correlator.next_id()
    }
}

impl Default for CaptureContext {
    fn default() -> Self {
        Self::new(true)
    }
}
