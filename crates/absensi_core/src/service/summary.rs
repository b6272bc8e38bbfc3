//! Daily summary aggregation.
//!
//! # Invariants
//! - Only records of students on the roster are counted.
//! - `sum(counts) + unmarked == total_students`.
//! - `present_percentage` is `0` for an empty roster.
//! - `unmarked` (no record yet) and the `Unexcused` count (explicit `Alpa`)
//!   are separate figures.

use crate::model::attendance::AttendanceStatus;
use crate::service::ledger::DayRecords;
use crate::service::roster::Roster;

/// Number of roster students per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub present: usize,
    pub sick: usize,
    pub permission: usize,
    pub unexcused: usize,
}

impl StatusCounts {
    pub fn get(&self, status: AttendanceStatus) -> usize {
        match status {
            AttendanceStatus::Present => self.present,
            AttendanceStatus::Sick => self.sick,
            AttendanceStatus::Permission => self.permission,
            AttendanceStatus::Unexcused => self.unexcused,
        }
    }

    fn increment(&mut self, status: AttendanceStatus) {
        let slot = match status {
            AttendanceStatus::Present => &mut self.present,
            AttendanceStatus::Sick => &mut self.sick,
            AttendanceStatus::Permission => &mut self.permission,
            AttendanceStatus::Unexcused => &mut self.unexcused,
        };
        *slot += 1;
    }

    /// Students with any status.
    pub fn marked(&self) -> usize {
        self.present + self.sick + self.permission + self.unexcused
    }
}

/// Derived attendance figures for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySummary {
    /// Display-formatted day, e.g. `Senin, 19 Oktober 2026`.
    pub date: String,
    pub total_students: usize,
    pub counts: StatusCounts,
    /// Roster students without any record for the day.
    pub unmarked: usize,
    /// `round(100 * present / total)`, `0` when the roster is empty.
    pub present_percentage: u32,
    /// `"<name> (<status>): <note>"` for every non-blank note, in roster order.
    pub notes: Vec<String>,
}

impl DailySummary {
    /// Students not known to be at school or excused.
    ///
    /// Equals `unexcused + unmarked`; this is the "absent" figure used in the
    /// narrative report, not a status count.
    pub fn absent_for_report(&self) -> usize {
        self.total_students - (self.counts.present + self.counts.sick + self.counts.permission)
    }
}

/// Builds the summary of `records` against the current roster.
pub fn summarize(records: &DayRecords, roster: &Roster, date: impl Into<String>) -> DailySummary {
    let mut counts = StatusCounts::default();
    let mut notes = Vec::new();

    for student in roster.students() {
        let Some(record) = records.get(&student.id) else {
            continue;
        };
        counts.increment(record.status);
        let note = record.note_or_empty().trim();
        if !note.is_empty() {
            notes.push(format!(
                "{} ({}): {}",
                student.name,
                record.status.label(),
                note
            ));
        }
    }

    let total_students = roster.len();
    DailySummary {
        date: date.into(),
        total_students,
        counts,
        unmarked: total_students - counts.marked(),
        present_percentage: present_percentage(counts.present, total_students),
        notes,
    }
}

/// Rounds half up, matching how the percentage has always been displayed.
fn present_percentage(present: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * present + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(100)
}
