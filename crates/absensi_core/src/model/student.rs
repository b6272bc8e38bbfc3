//! Student roster model.
//!
//! # Responsibility
//! - Define the canonical roster entry and the provisional import candidate.
//! - Enforce non-empty `name`/`nis` on validated creation paths.
//!
//! # Invariants
//! - `id` is stable and never reused for another student.
//! - `name` and `nis` are trimmed and non-empty after validated creation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one roster entry.
///
/// Serialized as a plain string in storage and payloads.
pub type StudentId = Uuid;

/// Validation errors for manual entry and candidate construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// `name` is empty after trimming.
    EmptyName,
    /// `nis` is empty after trimming.
    EmptyNis,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "student name cannot be empty"),
            Self::EmptyNis => write!(f, "student nis cannot be empty"),
        }
    }
}

impl Error for ValidationError {}

/// One student on the class roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Student identification number as printed on school records.
    pub nis: String,
}

impl Student {
    /// Creates a student with a freshly generated id.
    ///
    /// # Errors
    /// - `EmptyName` / `EmptyNis` when a field is blank after trimming.
    pub fn new(name: &str, nis: &str) -> Result<Self, ValidationError> {
        let candidate = StudentCandidate::new(name, nis)?;
        Ok(Self::from_candidate(candidate))
    }

    /// Promotes an already validated candidate to a roster entry.
    pub fn from_candidate(candidate: StudentCandidate) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: candidate.name,
            nis: candidate.nis,
        }
    }
}

/// Provisional `{name, nis}` pair awaiting confirmation.
///
/// Fields are private so every candidate in circulation has passed
/// validation; bulk roster import can therefore never fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentCandidate {
    name: String,
    nis: String,
}

impl StudentCandidate {
    /// Builds a candidate from raw field values.
    ///
    /// # Errors
    /// - `EmptyName` / `EmptyNis` when a field is blank after trimming.
    pub fn new(name: &str, nis: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        let nis = nis.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if nis.is_empty() {
            return Err(ValidationError::EmptyNis);
        }
        Ok(Self {
            name: name.to_string(),
            nis: nis.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nis(&self) -> &str {
        &self.nis
    }
}
