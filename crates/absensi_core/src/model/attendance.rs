//! Attendance status and per-day record model.
//!
//! # Responsibility
//! - Define the closed status set and its stable wire labels.
//! - Define the record stored by the ledger for one `(day, student)` pair.
//!
//! # Invariants
//! - Status labels (`Hadir`, `Sakit`, `Izin`, `Alpa`) never change; they are
//!   both the storage format and the spreadsheet payload format.
//! - `timestamp` is Unix epoch milliseconds of the last update.

use crate::model::student::StudentId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar day an attendance record belongs to.
pub type AttendanceDay = NaiveDate;

/// Attendance state of one student on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Attended class.
    #[serde(rename = "Hadir")]
    Present,
    /// Absent due to illness.
    #[serde(rename = "Sakit")]
    Sick,
    /// Absent with permission.
    #[serde(rename = "Izin")]
    Permission,
    /// Absent without explanation.
    #[serde(rename = "Alpa")]
    Unexcused,
}

impl AttendanceStatus {
    /// Every status in display order.
    pub const ALL: [AttendanceStatus; 4] = [
        AttendanceStatus::Present,
        AttendanceStatus::Sick,
        AttendanceStatus::Permission,
        AttendanceStatus::Unexcused,
    ];

    /// Returns the stable label used in storage, payloads and reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "Hadir",
            Self::Sick => "Sakit",
            Self::Permission => "Izin",
            Self::Unexcused => "Alpa",
        }
    }

    /// Parses a stable label back into a status.
    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "Hadir" => Some(Self::Present),
            "Sakit" => Some(Self::Sick),
            "Izin" => Some(Self::Permission),
            "Alpa" => Some(Self::Unexcused),
            _ => None,
        }
    }

    /// Whether a note is expected alongside this status.
    ///
    /// Notes are still accepted for every status.
    pub fn expects_note(self) -> bool {
        matches!(self, Self::Sick | Self::Permission)
    }
}

/// Latest attendance mark for one student on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub student_id: StudentId,
    pub status: AttendanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Unix epoch milliseconds of the last update.
    pub timestamp: i64,
}

impl AttendanceRecord {
    /// Returns the note, or an empty string when none was recorded.
    pub fn note_or_empty(&self) -> &str {
        self.note.as_deref().unwrap_or("")
    }
}
