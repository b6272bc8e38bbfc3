//! Core attendance use-cases.
//!
//! # Responsibility
//! - Own roster, ledger, summary and export rules as plain in-memory types.
//! - Orchestrate them behind one explicit session object that persists every
//!   mutation through the key-value store.
//!
//! # Invariants
//! - Roster, ledger, summary and export types never touch storage directly.
//! - All mutations reachable from hosts go through `AttendanceSession`.

pub mod export;
pub mod ledger;
pub mod roster;
pub mod roster_import;
pub mod session;
pub mod summary;
