// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Capture configuration
//!
//! Values can be set in code or loaded from the environment:
//!
//! - `NETTAP_CAPTURE_ENABLED`: initial state of the enable flag (default on)
//! - `NETTAP_RESOLVE_DNS`: resolve the request host to an IP (default on)
//! - `NETTAP_DNS_TIMEOUT_MS`: upper bound on that lookup (default none)

use std::time::Duration;

pub const ENV_CAPTURE_ENABLED: &str = "NETTAP_CAPTURE_ENABLED";
pub const ENV_RESOLVE_DNS: &str = "NETTAP_RESOLVE_DNS";
pub const ENV_DNS_TIMEOUT_MS: &str = "NETTAP_DNS_TIMEOUT_MS";

/// Capture layer configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Initial state of the enable flag
    pub enabled: bool,
    /// Look up the host's IP for each request
    pub resolve_dns: bool,
    /// Give up on the lookup after this long
    pub dns_timeout: Option<Duration>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            resolve_dns: true,
            dns_timeout: None,
        }
    }
}

impl CaptureConfig {
    /// Create a new capture config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial enable flag
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Enable/disable host resolution
    pub fn resolve_dns(mut self, resolve: bool) -> Self {
        self.resolve_dns = resolve;
        self
    }

    /// Bound host resolution
    pub fn dns_timeout(mut self, timeout: Duration) -> Self {
        self.dns_timeout = Some(timeout);
        self
    }

    /// Load from process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Bad values keep their default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CAPTURE_ENABLED) {
            match parse_flag(&raw) {
                Some(v) => config.enabled = v,
                None => {
                    tracing::warn!(key = ENV_CAPTURE_ENABLED, value = %raw, "ignoring invalid flag")
                }
            }
        }

        if let Some(raw) = lookup(ENV_RESOLVE_DNS) {
            match parse_flag(&raw) {
                Some(v) => config.resolve_dns = v,
                None => {
                    tracing::warn!(key = ENV_RESOLVE_DNS, value = %raw, "ignoring invalid flag")
                }
            }
        }

        if let Some(raw) = lookup(ENV_DNS_TIMEOUT_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.dns_timeout = Some(Duration::from_millis(ms)),
                Err(_) => tracing::warn!(
                    key = ENV_DNS_TIMEOUT_MS,
                    value = %raw,
                    "ignoring invalid timeout"
                ),
            }
        }

        config
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
