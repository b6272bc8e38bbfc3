//! Persistence adapter contracts and implementations.
//!
//! # Responsibility
//! - Define the key-value contract the attendance session persists through.
//! - Isolate SQLite query details from session orchestration.
//!
//! # Invariants
//! - Values are opaque UTF-8 blobs to the store; (de)serialization belongs to
//!   the caller.
//! - Only the keys enumerated by `StoreKey` are ever written.

pub mod kv_store;
