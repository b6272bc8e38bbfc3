//! Classroom attendance domain model.
//!
//! # Responsibility
//! - Define canonical data structures shared by roster, ledger and export.
//! - Keep wire/storage field names stable across releases.
//!
//! # Invariants
//! - Every student is identified by a stable `StudentId`.
//! - Attendance status is a closed set of four values.

pub mod attendance;
pub mod config;
pub mod student;
