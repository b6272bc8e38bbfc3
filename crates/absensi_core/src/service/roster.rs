//! Roster store.
//!
//! # Responsibility
//! - Own the ordered set of students for the class.
//! - Generate ids for manual entry and bulk import.
//!
//! # Invariants
//! - Student ids are unique within the roster.
//! - Insertion order is preserved and is the export order.
//! - Duplicate `name`/`nis` pairs are allowed.

use crate::model::student::{Student, StudentCandidate, StudentId, ValidationError};
use serde::{Deserialize, Serialize};

/// Ordered class roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a roster from previously stored students.
    ///
    /// Later entries sharing an id with an earlier one are dropped.
    pub fn from_students(students: Vec<Student>) -> Self {
        let mut roster = Self::new();
        roster.replace_all(students);
        roster
    }

    /// Adds one manually entered student.
    ///
    /// # Errors
    /// - `ValidationError` when `name` or `nis` is blank after trimming.
    pub fn add(&mut self, name: &str, nis: &str) -> Result<Student, ValidationError> {
        let student = Student::new(name, nis)?;
        self.students.push(student.clone());
        Ok(student)
    }

    /// Removes the student with `id`.
    ///
    /// Returns `false` when no such student exists.
    pub fn remove(&mut self, id: StudentId) -> bool {
        let before = self.students.len();
        self.students.retain(|student| student.id != id);
        self.students.len() != before
    }

    /// Appends every candidate as a new student and returns the appended count.
    pub fn bulk_import(&mut self, candidates: impl IntoIterator<Item = StudentCandidate>) -> usize {
        let before = self.students.len();
        self.students
            .extend(candidates.into_iter().map(Student::from_candidate));
        self.students.len() - before
    }

    /// Replaces the whole roster.
    pub fn replace_all(&mut self, students: Vec<Student>) {
        let mut kept: Vec<Student> = Vec::with_capacity(students.len());
        for student in students {
            if kept.iter().all(|existing| existing.id != student.id) {
                kept.push(student);
            }
        }
        self.students = kept;
    }

    pub fn get(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|student| student.id == id)
    }

    pub fn contains(&self, id: StudentId) -> bool {
        self.get(id).is_some()
    }

    pub fn students(&self) -> &[Student] {
        &self.students
    }

    pub fn len(&self) -> usize {
        self.students.len()
    }

    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}
