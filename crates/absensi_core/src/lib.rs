//! Core domain logic for classroom attendance.
//! This crate is the single source of truth for roster, ledger, summary and
//! export rules; hosts only render state and forward user actions.

pub mod db;
pub mod locale;
pub mod logging;
pub mod model;
pub mod remote;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attendance::{AttendanceDay, AttendanceRecord, AttendanceStatus};
pub use model::config::AppConfig;
pub use model::student::{Student, StudentCandidate, StudentId, ValidationError};
pub use remote::report::{
    build_report_prompt, GeminiReportClient, ReportError, ReportGenerator, DEFAULT_REPORT_MODEL,
};
pub use remote::sheet::{HttpSheetTransport, SheetTransport, SubmitOutcome, TransportError};
pub use repo::kv_store::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StoreError, StoreKey, StoreResult,
};
pub use service::export::{build_sheet_payload, reconcile, ExportRow, SheetPayload};
pub use service::ledger::{DayRecords, Ledger, LedgerError};
pub use service::roster::Roster;
pub use service::roster_import::{
    parse_roster_csv, read_roster_csv, ImportEmptyReason, ImportOutcome,
};
pub use service::session::{AttendanceSession, ReportOutcome, SessionError, SessionResult};
pub use service::summary::{summarize, DailySummary, StatusCounts};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
