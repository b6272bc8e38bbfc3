//! Attendance ledger.
//!
//! # Responsibility
//! - Hold the latest attendance record per `(day, student)`.
//! - Apply status/note updates with partial-update semantics.
//!
//! # Invariants
//! - At most one record exists per `(day, student)`.
//! - Omitting a note on `mark` keeps the note already stored for that day.
//! - Resetting a day never touches records of other days.
//! - Days are retained until `prune_before` drops them.
//! - Days without records are not retained.
//!
//! The ledger accepts any student id; roster membership is enforced by
//! `AttendanceSession::mark`.

use crate::model::attendance::{AttendanceDay, AttendanceRecord, AttendanceStatus};
use crate::model::student::StudentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Records for one day keyed by student.
pub type DayRecords = BTreeMap<StudentId, AttendanceRecord>;

/// Ledger-level errors raised through the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerError {
    /// The student is not on the current roster.
    UnknownStudent(StudentId),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownStudent(id) => write!(f, "student not on roster: {id}"),
        }
    }
}

impl Error for LedgerError {}

/// Attendance records grouped by day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    days: BTreeMap<AttendanceDay, DayRecords>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates or replaces the record for `(day, student_id)`.
    ///
    /// `note = None` keeps the previously stored note for that day;
    /// `Some(..)` replaces it, including with an empty string.
    pub fn mark(
        &mut self,
        day: AttendanceDay,
        student_id: StudentId,
        status: AttendanceStatus,
        note: Option<String>,
        timestamp_ms: i64,
    ) -> &AttendanceRecord {
        let records = self.days.entry(day).or_default();
        let note = match note {
            Some(note) => Some(note),
            None => records
                .get(&student_id)
                .and_then(|previous| previous.note.clone()),
        };
        records.insert(
            student_id,
            AttendanceRecord {
                student_id,
                status,
                note,
                timestamp: timestamp_ms,
            },
        );
        &records[&student_id]
    }

    pub fn record(&self, day: AttendanceDay, student_id: StudentId) -> Option<&AttendanceRecord> {
        self.days.get(&day).and_then(|records| records.get(&student_id))
    }

    /// Status for `(day, student_id)`, or `None` when unmarked.
    pub fn status(&self, day: AttendanceDay, student_id: StudentId) -> Option<AttendanceStatus> {
        self.record(day, student_id).map(|record| record.status)
    }

    /// Records of one day; empty when nothing was marked.
    pub fn day_records(&self, day: AttendanceDay) -> &DayRecords {
        static EMPTY: DayRecords = BTreeMap::new();
        self.days.get(&day).unwrap_or(&EMPTY)
    }

    /// Clears every record of `day` and returns how many were removed.
    pub fn reset_day(&mut self, day: AttendanceDay) -> usize {
        self.days.remove(&day).map_or(0, |records| records.len())
    }

    /// Drops every day strictly before `day` and returns how many records
    /// were removed. `day` itself and later days are kept.
    pub fn prune_before(&mut self, day: AttendanceDay) -> usize {
        let kept = self.days.split_off(&day);
        let removed: usize = self.days.values().map(BTreeMap::len).sum();
        self.days = kept;
        removed
    }

    /// Days that currently hold at least one record.
    pub fn days(&self) -> impl Iterator<Item = AttendanceDay> + '_ {
        self.days.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Ledger;
    use crate::model::attendance::AttendanceStatus;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn day_records_of_unmarked_day_is_empty() {
        let ledger = Ledger::new();
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert!(ledger.day_records(day).is_empty());
    }

    #[test]
    fn prune_before_keeps_given_day_and_later() {
        let mut ledger = Ledger::new();
        let day = |d| NaiveDate::from_ymd_opt(2026, 1, d).unwrap();
        let id = Uuid::new_v4();
        for d in [3, 4, 5, 6] {
            ledger.mark(day(d), id, AttendanceStatus::Present, None, 1);
        }
        ledger.mark(day(4), Uuid::new_v4(), AttendanceStatus::Sick, None, 1);

        assert_eq!(ledger.prune_before(day(5)), 3);
        assert_eq!(ledger.days().collect::<Vec<_>>(), vec![day(5), day(6)]);
        assert_eq!(ledger.prune_before(day(5)), 0);
    }

    #[test]
    fn explicit_empty_note_clears_previous_note() {
        let mut ledger = Ledger::new();
        let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        let id = Uuid::new_v4();

        ledger.mark(day, id, AttendanceStatus::Sick, Some("flu".into()), 1);
        ledger.mark(day, id, AttendanceStatus::Sick, Some(String::new()), 2);

        assert_eq!(ledger.record(day, id).unwrap().note.as_deref(), Some(""));
    }
}
