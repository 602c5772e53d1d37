//! Common test utilities and helpers
//!
//! Shared fixtures for the integration tests: a concrete payload error and a
//! scoped annotator that never touches the process-wide store.

#![allow(dead_code)]

use iodine::{Annotator, ContextData, ContextStore, StaticHostResolver};
use std::sync::Arc;

pub const TEST_HOST: &str = "test-host";

/// Payload error with a structured field that must not leak into JSON output
#[derive(Debug, thiserror::Error)]
#[error("upload rejected: {reason}")]
pub struct UploadRejected {
    pub reason: String,
    pub internal_code: u32,
}

impl UploadRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            internal_code: 0xdead,
        }
    }
}

/// Annotator over a fresh store with a fixed host name
pub fn scoped_annotator() -> Annotator {
    Annotator::new(
        Arc::new(ContextStore::new()),
        Arc::new(StaticHostResolver::new(TEST_HOST)),
    )
}

/// Build context data from string pairs
pub fn data(pairs: &[(&str, &str)]) -> ContextData {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
