//! CSV roster importer.
//!
//! # Responsibility
//! - Turn raw spreadsheet exports into `{name, nis}` candidates.
//! - Tolerate comma or semicolon delimited files and a leading header row.
//!
//! # Invariants
//! - The importer never mutates a roster; it only returns candidates.
//! - Delimiter choice is made once per file from the first non-blank line.
//! - A row is dropped as a header only when both the name and nis columns
//!   look like column titles.
//! - Unreadable, empty or unusable input is an `ImportOutcome::Empty`, never
//!   an error.

use crate::locale;
use crate::model::student::StudentCandidate;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n?").expect("valid line break regex"));

const UTF8_BOM: char = '\u{feff}';
const NAME_HEADER_KEYWORDS: [&str; 4] = ["name", "nama", "nama siswa", "student"];
const NIS_HEADER_KEYWORDS: [&str; 4] = ["nis", "nomor", "id", "induk"];

/// Why an import produced nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportEmptyReason {
    /// The file could not be read or was not valid UTF-8.
    Unreadable,
    /// The file contained no text at all.
    EmptyFile,
    /// Text was present (possibly only whitespace) but no row produced a
    /// candidate.
    NoCandidates,
}

impl ImportEmptyReason {
    /// Message shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::Unreadable => locale::MSG_IMPORT_UNREADABLE,
            Self::EmptyFile => locale::MSG_IMPORT_EMPTY_FILE,
            Self::NoCandidates => locale::MSG_IMPORT_NO_RECORDS,
        }
    }
}

/// Result of parsing one roster file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// At least one usable row, in file order.
    Candidates(Vec<StudentCandidate>),
    /// No usable records found.
    Empty(ImportEmptyReason),
}

impl ImportOutcome {
    pub fn candidates(&self) -> &[StudentCandidate] {
        match self {
            Self::Candidates(candidates) => candidates,
            Self::Empty(_) => &[],
        }
    }

    pub fn into_candidates(self) -> Vec<StudentCandidate> {
        match self {
            Self::Candidates(candidates) => candidates,
            Self::Empty(_) => Vec::new(),
        }
    }

    /// Confirmation prompt or failure message for the host to display.
    pub fn message(&self) -> String {
        match self {
            Self::Candidates(candidates) => locale::import_confirmation(candidates.len()),
            Self::Empty(reason) => reason.message().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Comma,
    Semicolon,
}

impl Delimiter {
    fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
        }
    }

    fn other(self) -> Self {
        match self {
            Self::Comma => Self::Semicolon,
            Self::Semicolon => Self::Comma,
        }
    }

    fn detect(line: &str) -> Self {
        let commas = line.matches(',').count();
        let semicolons = line.matches(';').count();
        if semicolons > commas {
            Self::Semicolon
        } else {
            Self::Comma
        }
    }
}

/// Reads and parses a roster file from disk.
///
/// I/O and encoding failures are reported as `ImportEmptyReason::Unreadable`.
pub fn read_roster_csv(path: impl AsRef<Path>) -> ImportOutcome {
    match std::fs::read_to_string(path.as_ref()) {
        Ok(text) => parse_roster_csv(&text),
        Err(err) => {
            warn!(
                "event=roster_import module=import status=error error_code=file_unreadable error={}",
                err
            );
            ImportOutcome::Empty(ImportEmptyReason::Unreadable)
        }
    }
}

/// Parses raw roster text into candidates.
///
/// A leading UTF-8 byte order mark is dropped. Only zero-length text counts
/// as an empty file; whitespace-only text yields no candidates.
pub fn parse_roster_csv(text: &str) -> ImportOutcome {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    if text.is_empty() {
        info!("event=roster_import module=import status=empty reason=empty_file");
        return ImportOutcome::Empty(ImportEmptyReason::EmptyFile);
    }

    let normalized = LINE_BREAK_RE.replace_all(text, "\n");
    let lines: Vec<&str> = normalized
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let Some(first_line) = lines.first() else {
        info!("event=roster_import module=import status=empty reason=blank_lines");
        return ImportOutcome::Empty(ImportEmptyReason::NoCandidates);
    };
    let delimiter = Delimiter::detect(first_line);

    let mut headers_skipped = 0_usize;
    let mut candidates = Vec::new();
    for line in &lines {
        let fields = split_fields(line, delimiter);
        if fields.len() < 2 {
            continue;
        }
        let (name, nis) = (fields[0].as_str(), fields[1].as_str());
        if is_header_row(name, nis) {
            headers_skipped += 1;
            continue;
        }
        if let Ok(candidate) = StudentCandidate::new(name, nis) {
            candidates.push(candidate);
        }
    }

    info!(
        "event=roster_import module=import status=ok delimiter={:?} lines={} candidates={} headers_skipped={}",
        delimiter,
        lines.len(),
        candidates.len(),
        headers_skipped
    );

    if candidates.is_empty() {
        ImportOutcome::Empty(ImportEmptyReason::NoCandidates)
    } else {
        ImportOutcome::Candidates(candidates)
    }
}

fn split_fields(line: &str, delimiter: Delimiter) -> Vec<String> {
    let mut parts: Vec<&str> = line.split(delimiter.as_char()).collect();
    if parts.len() < 2 {
        parts = line.split(delimiter.other().as_char()).collect();
    }
    parts.into_iter().map(clean_field).collect()
}

/// Trims a field and strips one pair of surrounding double quotes.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    unquoted.trim().to_string()
}

fn is_header_row(name: &str, nis: &str) -> bool {
    let name = name.to_lowercase();
    let nis = nis.to_lowercase();
    NAME_HEADER_KEYWORDS
        .iter()
        .any(|keyword| name.contains(keyword))
        && NIS_HEADER_KEYWORDS
            .iter()
            .any(|keyword| nis.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::{clean_field, is_header_row, split_fields, Delimiter};

    #[test]
    fn clean_field_strips_only_balanced_quotes() {
        assert_eq!(clean_field(r#"  "Jane Doe"  "#), "Jane Doe");
        assert_eq!(clean_field(r#"Jane "Doe""#), r#"Jane "Doe""#);
        assert_eq!(clean_field(r#""Jane"#), r#""Jane"#);
        assert_eq!(clean_field(r#"""#), r#"""#);
        assert_eq!(clean_field(r#""""#), "");
    }

    #[test]
    fn detect_prefers_comma_on_tie() {
        assert_eq!(Delimiter::detect("a;b,c"), Delimiter::Comma);
        assert_eq!(Delimiter::detect("a;b;c,d"), Delimiter::Semicolon);
        assert_eq!(Delimiter::detect("plain"), Delimiter::Comma);
    }

    #[test]
    fn split_falls_back_to_other_delimiter() {
        assert_eq!(split_fields("Ani;1001", Delimiter::Comma), vec!["Ani", "1001"]);
        assert_eq!(split_fields("Ani,1001", Delimiter::Semicolon), vec!["Ani", "1001"]);
        assert_eq!(split_fields("Ani", Delimiter::Comma), vec!["Ani"]);
    }

    #[test]
    fn header_requires_both_columns() {
        assert!(is_header_row("Nama Siswa", "NIS"));
        assert!(is_header_row("Student Name", "Student ID"));
        assert!(!is_header_row("Nama Siswa", "1001"));
        assert!(!is_header_row("Budi", "NIS"));
    }
}
