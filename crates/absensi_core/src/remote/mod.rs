//! Remote collaborators: spreadsheet submission and narrative reports.
//!
//! # Responsibility
//! - Define narrow request/response traits the session calls through.
//! - Provide HTTP implementations for production hosts.
//! - Guard each request kind so at most one is in flight.
//!
//! # Invariants
//! - Remote failures are values, never panics.
//! - Payloads and prompts are built by core; transports only move bytes.

pub mod report;
pub mod sheet;
pub mod single_flight;
