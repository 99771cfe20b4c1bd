//! Event Sink Implementations
//!
//! Provides concrete implementations of SyncEventSink:
//! - JsonEventSink: NDJSON output for schedulers and log shippers

mod json;

pub use json::JsonEventSink;
