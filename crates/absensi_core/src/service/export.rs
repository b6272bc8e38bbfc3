//! Export reconciliation for the spreadsheet service.
//!
//! # Responsibility
//! - Produce exactly one row per roster student, in roster order.
//! - Shape the JSON payload posted to the spreadsheet endpoint.
//!
//! # Invariants
//! - A student without a record is exported as `Alpa` with an empty note.
//! - Ledger records of students no longer on the roster are not exported.
//! - Reconciliation is pure; the same inputs always yield the same rows.

use crate::model::attendance::AttendanceStatus;
use crate::service::ledger::DayRecords;
use crate::service::roster::Roster;
use serde::{Deserialize, Serialize};

/// One reconciled spreadsheet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub name: String,
    pub nis: String,
    pub status: AttendanceStatus,
    pub note: String,
}

/// Body posted to the spreadsheet endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPayload {
    /// Display-formatted day.
    pub date: String,
    pub class_name: String,
    pub records: Vec<ExportRow>,
}

/// Reconciles roster and one day's records into export rows.
pub fn reconcile(roster: &Roster, records: &DayRecords) -> Vec<ExportRow> {
    roster
        .students()
        .iter()
        .map(|student| match records.get(&student.id) {
            Some(record) => ExportRow {
                name: student.name.clone(),
                nis: student.nis.clone(),
                status: record.status,
                note: record.note_or_empty().to_string(),
            },
            None => ExportRow {
                name: student.name.clone(),
                nis: student.nis.clone(),
                status: AttendanceStatus::Unexcused,
                note: String::new(),
            },
        })
        .collect()
}

/// Builds the full payload for one class and day.
pub fn build_sheet_payload(
    roster: &Roster,
    records: &DayRecords,
    class_name: &str,
    display_date: &str,
) -> SheetPayload {
    SheetPayload {
        date: display_date.to_string(),
        class_name: class_name.to_string(),
        records: reconcile(roster, records),
    }
}
