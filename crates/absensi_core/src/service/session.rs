//! Attendance session: the single owner of mutable attendance state.
//!
//! # Responsibility
//! - Own config, roster, ledger and the selected day.
//! - Route every mutation through roster/ledger APIs and persist it.
//! - Call remote collaborators with at most one request in flight per kind.
//!
//! # Invariants
//! - A mutation is visible in memory only after it was persisted.
//! - Corrupted stored values reset that part of state to empty; they never
//!   abort `open`.
//! - `mark` rejects students that are not on the roster.
//! - A `mark` that returned before `sheet_payload`/`send_to_sheet` is
//!   reflected in the payload.

use crate::locale;
use crate::model::attendance::{AttendanceDay, AttendanceRecord, AttendanceStatus};
use crate::model::config::AppConfig;
use crate::model::student::{Student, StudentCandidate, StudentId, ValidationError};
use crate::remote::report::ReportGenerator;
use crate::remote::sheet::{SheetTransport, SubmitOutcome};
use crate::remote::single_flight::SingleFlight;
use crate::repo::kv_store::{KeyValueStore, StoreError, StoreKey};
use crate::service::export::{build_sheet_payload, reconcile, ExportRow, SheetPayload};
use crate::service::ledger::{Ledger, LedgerError};
use crate::service::roster::Roster;
use crate::service::summary::{summarize, DailySummary};
use chrono::{Local, Utc};
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Errors returned by session mutations.
#[derive(Debug)]
pub enum SessionError {
    Validation(ValidationError),
    Ledger(LedgerError),
    Store(StoreError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Ledger(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Ledger(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for SessionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<LedgerError> for SessionError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Result of a report request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Text produced by the report service.
    Generated(String),
    /// The service failed or returned nothing; carries the fallback text.
    Fallback(String),
    /// Roster is empty; nothing was requested.
    NoStudents,
    /// Another report request is still running.
    Busy,
}

impl ReportOutcome {
    /// Text to display, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Generated(text) | Self::Fallback(text) => Some(text),
            Self::NoStudents | Self::Busy => None,
        }
    }
}

/// Explicit session over one class.
pub struct AttendanceSession<S: KeyValueStore> {
    store: S,
    config: AppConfig,
    roster: Roster,
    ledger: Ledger,
    selected_day: AttendanceDay,
    first_run: bool,
    sheet_flight: SingleFlight,
    report_flight: SingleFlight,
}

impl<S: KeyValueStore> AttendanceSession<S> {
    /// Loads persisted state with today (local time) selected.
    ///
    /// # Errors
    /// - `SessionError::Store` when the store itself fails.
    pub fn open(store: S) -> SessionResult<Self> {
        Self::open_for_day(store, Local::now().date_naive())
    }

    /// Loads persisted state with `day` selected.
    pub fn open_for_day(store: S, day: AttendanceDay) -> SessionResult<Self> {
        let config_raw = store.load(StoreKey::Config)?;
        let ledger_raw = store.load(StoreKey::Ledger)?;
        let first_run = config_raw.is_none() && ledger_raw.is_none();

        let config: AppConfig = decode_or_reset(&store, StoreKey::Config, config_raw)?;
        let roster_raw = store.load(StoreKey::Roster)?;
        let roster = Roster::from_students(decode_or_reset::<_, Vec<Student>>(
            &store,
            StoreKey::Roster,
            roster_raw,
        )?);
        let ledger: Ledger = decode_or_reset(&store, StoreKey::Ledger, ledger_raw)?;

        info!(
            "event=session_open module=session status=ok students={} ledger_days={} first_run={}",
            roster.len(),
            ledger.days().count(),
            first_run
        );

        Ok(Self {
            store,
            config,
            roster,
            ledger,
            selected_day: day,
            first_run,
            sheet_flight: SingleFlight::new(),
            report_flight: SingleFlight::new(),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn selected_day(&self) -> AttendanceDay {
        self.selected_day
    }

    /// True when neither settings nor attendance had ever been saved.
    pub fn is_first_run(&self) -> bool {
        self.first_run
    }

    /// Selects the day that marks, summaries and exports apply to.
    ///
    /// Records of other days are kept.
    pub fn select_day(&mut self, day: AttendanceDay) {
        self.selected_day = day;
    }

    pub fn save_config(&mut self, config: AppConfig) -> SessionResult<()> {
        self.persist(StoreKey::Config, &config)?;
        self.config = config;
        self.first_run = false;
        Ok(())
    }

    pub fn add_student(&mut self, name: &str, nis: &str) -> SessionResult<Student> {
        let mut next = self.roster.clone();
        let student = next.add(name, nis)?;
        self.commit_roster(next)?;
        Ok(student)
    }

    /// Removes a student; unknown ids are a no-op returning `false`.
    ///
    /// Ledger records of the removed student stay stored but are no longer
    /// counted or exported.
    pub fn remove_student(&mut self, id: StudentId) -> SessionResult<bool> {
        let mut next = self.roster.clone();
        if !next.remove(id) {
            return Ok(false);
        }
        self.commit_roster(next)?;
        Ok(true)
    }

    /// Appends confirmed import candidates and returns the appended count.
    pub fn apply_import(&mut self, candidates: Vec<StudentCandidate>) -> SessionResult<usize> {
        if candidates.is_empty() {
            return Ok(0);
        }
        let mut next = self.roster.clone();
        let appended = next.bulk_import(candidates);
        self.commit_roster(next)?;
        info!("event=roster_import_apply module=session status=ok appended={appended}");
        Ok(appended)
    }

    pub fn replace_roster(&mut self, students: Vec<Student>) -> SessionResult<()> {
        self.commit_roster(Roster::from_students(students))
    }

    /// Marks a student for the selected day.
    ///
    /// `note = None` keeps the note already stored for that day.
    ///
    /// # Errors
    /// - `LedgerError::UnknownStudent` when `student_id` is not on the roster.
    pub fn mark(
        &mut self,
        student_id: StudentId,
        status: AttendanceStatus,
        note: Option<String>,
    ) -> SessionResult<AttendanceRecord> {
        if !self.roster.contains(student_id) {
            warn!("event=attendance_mark module=session status=rejected error_code=unknown_student");
            return Err(LedgerError::UnknownStudent(student_id).into());
        }

        let mut next = self.ledger.clone();
        let record = next
            .mark(
                self.selected_day,
                student_id,
                status,
                note,
                Utc::now().timestamp_millis(),
            )
            .clone();
        self.commit_ledger(next)?;
        Ok(record)
    }

    pub fn status(&self, student_id: StudentId) -> Option<AttendanceStatus> {
        self.ledger.status(self.selected_day, student_id)
    }

    /// Clears every record of the selected day; the roster is untouched.
    ///
    /// Irreversible. Hosts must confirm first (see `locale::MSG_RESET_CONFIRM`).
    pub fn reset_day(&mut self) -> SessionResult<usize> {
        let mut next = self.ledger.clone();
        let removed = next.reset_day(self.selected_day);
        if removed > 0 {
            self.commit_ledger(next)?;
        }
        info!("event=ledger_reset module=session status=ok removed={removed}");
        Ok(removed)
    }

    /// Drops ledger days before the selected day and returns the number of
    /// records removed. The selected day and later days are kept.
    ///
    /// Irreversible. Hosts must confirm first (see
    /// `locale::MSG_PRUNE_HISTORY_CONFIRM`).
    pub fn prune_history(&mut self) -> SessionResult<usize> {
        let mut next = self.ledger.clone();
        let removed = next.prune_before(self.selected_day);
        if removed > 0 {
            self.commit_ledger(next)?;
        }
        info!(
            "event=ledger_prune module=session status=ok removed={} days_left={}",
            removed,
            self.ledger.days().count()
        );
        Ok(removed)
    }

    /// Display form of the selected day.
    pub fn display_date(&self) -> String {
        locale::format_display_date(self.selected_day)
    }

    pub fn summary(&self) -> DailySummary {
        summarize(
            self.ledger.day_records(self.selected_day),
            &self.roster,
            self.display_date(),
        )
    }

    pub fn export_rows(&self) -> Vec<ExportRow> {
        reconcile(&self.roster, self.ledger.day_records(self.selected_day))
    }

    pub fn sheet_payload(&self) -> SheetPayload {
        build_sheet_payload(
            &self.roster,
            self.ledger.day_records(self.selected_day),
            &self.config.class_name,
            &self.display_date(),
        )
    }

    /// Submits the reconciled selected day to the configured endpoint.
    pub fn send_to_sheet(&self, transport: &impl SheetTransport) -> SubmitOutcome {
        if !self.config.has_sheet_endpoint() {
            return SubmitOutcome::failed(locale::MSG_SHEET_URL_MISSING);
        }
        let Some(_permit) = self.sheet_flight.try_acquire() else {
            return SubmitOutcome::failed(locale::MSG_SHEET_BUSY);
        };

        let payload = self.sheet_payload();
        transport
            .submit(self.config.sheet_endpoint_url.trim(), &payload)
            .into()
    }

    /// Requests a narrative report for the selected day.
    pub fn generate_report(&self, generator: &impl ReportGenerator) -> ReportOutcome {
        if self.roster.is_empty() {
            return ReportOutcome::NoStudents;
        }
        let Some(_permit) = self.report_flight.try_acquire() else {
            return ReportOutcome::Busy;
        };

        match generator.generate(&self.summary(), &self.config.class_name) {
            Ok(text) if !text.trim().is_empty() => ReportOutcome::Generated(text),
            Ok(_) => ReportOutcome::Fallback(locale::MSG_REPORT_EMPTY.to_string()),
            Err(err) => {
                warn!("event=report_generate module=session status=degraded error={err}");
                ReportOutcome::Fallback(locale::MSG_REPORT_FAILED.to_string())
            }
        }
    }

    fn commit_roster(&mut self, next: Roster) -> SessionResult<()> {
        self.persist(StoreKey::Roster, &next)?;
        self.roster = next;
        Ok(())
    }

    fn commit_ledger(&mut self, next: Ledger) -> SessionResult<()> {
        if next.is_empty() {
            self.store.delete(StoreKey::Ledger)?;
        } else {
            self.persist(StoreKey::Ledger, &next)?;
        }
        self.ledger = next;
        Ok(())
    }

    fn persist<T: Serialize>(&self, key: StoreKey, value: &T) -> SessionResult<()> {
        let encoded = serde_json::to_string(value).map_err(StoreError::from)?;
        self.store.save(key, &encoded)?;
        Ok(())
    }
}

fn decode_or_reset<S: KeyValueStore, T: DeserializeOwned + Default>(
    store: &S,
    key: StoreKey,
    raw: Option<String>,
) -> SessionResult<T> {
    let Some(raw) = raw else {
        return Ok(T::default());
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(err) => {
            warn!(
                "event=session_load module=session status=reset key={} error_code=corrupt_value error={}",
                key, err
            );
            store.delete(key)?;
            Ok(T::default())
        }
    }
}
