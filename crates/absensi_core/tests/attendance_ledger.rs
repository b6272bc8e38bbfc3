use absensi_core::{summarize, AttendanceStatus, Ledger, Roster, StudentCandidate};
use chrono::NaiveDate;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn roster_of(names: &[&str]) -> Roster {
    let mut roster = Roster::new();
    for (index, name) in names.iter().enumerate() {
        roster.add(name, &format!("{}", 1000 + index)).unwrap();
    }
    roster
}

#[test]
fn status_and_note_update_independently() {
    let roster = roster_of(&["Ani"]);
    let id = roster.students()[0].id;
    let mut ledger = Ledger::new();

    ledger.mark(day(19), id, AttendanceStatus::Sick, None, 1);
    ledger.mark(day(19), id, AttendanceStatus::Sick, Some("fever".into()), 2);
    ledger.mark(day(19), id, AttendanceStatus::Present, None, 3);

    let record = ledger.record(day(19), id).unwrap();
    assert_eq!(record.status, AttendanceStatus::Present);
    assert_eq!(record.note.as_deref(), Some("fever"));
    assert_eq!(record.timestamp, 3);
    assert_eq!(record.student_id, id);
}

#[test]
fn one_record_per_student_and_day() {
    let roster = roster_of(&["Ani", "Budi"]);
    let (a, b) = (roster.students()[0].id, roster.students()[1].id);
    let mut ledger = Ledger::new();

    ledger.mark(day(19), a, AttendanceStatus::Present, None, 1);
    ledger.mark(day(19), a, AttendanceStatus::Unexcused, None, 2);
    ledger.mark(day(19), b, AttendanceStatus::Permission, None, 3);

    assert_eq!(ledger.day_records(day(19)).len(), 2);
    assert_eq!(ledger.status(day(19), a), Some(AttendanceStatus::Unexcused));
    assert_eq!(ledger.status(day(20), a), None);
}

#[test]
fn notes_do_not_leak_between_days() {
    let roster = roster_of(&["Ani"]);
    let id = roster.students()[0].id;
    let mut ledger = Ledger::new();

    ledger.mark(day(19), id, AttendanceStatus::Sick, Some("flu".into()), 1);
    ledger.mark(day(20), id, AttendanceStatus::Present, None, 2);

    assert_eq!(ledger.record(day(20), id).unwrap().note, None);
    assert_eq!(
        ledger.record(day(19), id).unwrap().note.as_deref(),
        Some("flu")
    );
}

#[test]
fn reset_day_clears_only_that_day() {
    let roster = roster_of(&["Ani", "Budi"]);
    let (a, b) = (roster.students()[0].id, roster.students()[1].id);
    let mut ledger = Ledger::new();
    ledger.mark(day(19), a, AttendanceStatus::Present, None, 1);
    ledger.mark(day(19), b, AttendanceStatus::Sick, None, 1);
    ledger.mark(day(20), a, AttendanceStatus::Present, None, 1);

    assert_eq!(ledger.reset_day(day(19)), 2);
    assert!(ledger.day_records(day(19)).is_empty());
    assert_eq!(ledger.status(day(20), a), Some(AttendanceStatus::Present));
    assert_eq!(ledger.days().collect::<Vec<_>>(), vec![day(20)]);
    assert_eq!(ledger.reset_day(day(19)), 0);
    assert_eq!(roster.len(), 2);
}

#[test]
fn ledger_serializes_by_day_then_student_with_status_labels() {
    let roster = roster_of(&["Ani"]);
    let id = roster.students()[0].id;
    let mut ledger = Ledger::new();
    ledger.mark(day(19), id, AttendanceStatus::Permission, Some("lomba".into()), 42);

    let json = serde_json::to_value(&ledger).unwrap();
    let record = &json["2026-10-19"][id.to_string()];
    assert_eq!(record["studentId"], id.to_string());
    assert_eq!(record["status"], "Izin");
    assert_eq!(record["note"], "lomba");
    assert_eq!(record["timestamp"], 42);

    let decoded: Ledger = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, ledger);
}

#[test]
fn summary_counts_statuses_and_unmarked_separately() {
    let roster = roster_of(&["Ani", "Budi", "Citra", "Dewi", "Eko"]);
    let ids: Vec<_> = roster.students().iter().map(|s| s.id).collect();
    let mut ledger = Ledger::new();
    ledger.mark(day(19), ids[0], AttendanceStatus::Present, None, 1);
    ledger.mark(day(19), ids[1], AttendanceStatus::Present, None, 1);
    ledger.mark(day(19), ids[2], AttendanceStatus::Sick, Some(" flu ".into()), 1);
    ledger.mark(day(19), ids[3], AttendanceStatus::Unexcused, None, 1);

    let summary = summarize(ledger.day_records(day(19)), &roster, "Senin, 19 Oktober 2026");

    assert_eq!(summary.total_students, 5);
    assert_eq!(summary.counts.get(AttendanceStatus::Present), 2);
    assert_eq!(summary.counts.get(AttendanceStatus::Sick), 1);
    assert_eq!(summary.counts.get(AttendanceStatus::Permission), 0);
    assert_eq!(summary.counts.get(AttendanceStatus::Unexcused), 1);
    assert_eq!(summary.unmarked, 1);
    assert_eq!(summary.absent_for_report(), 2);
    assert_eq!(summary.present_percentage, 40);
    assert_eq!(summary.notes, vec!["Citra (Sakit): flu".to_string()]);
    assert_eq!(summary.date, "Senin, 19 Oktober 2026");
}

#[test]
fn summary_ignores_records_of_students_off_the_roster() {
    let mut roster = roster_of(&["Ani", "Budi"]);
    let ids: Vec<_> = roster.students().iter().map(|s| s.id).collect();
    let mut ledger = Ledger::new();
    ledger.mark(day(19), ids[0], AttendanceStatus::Present, None, 1);
    ledger.mark(day(19), ids[1], AttendanceStatus::Present, None, 1);
    roster.remove(ids[1]);
    roster.bulk_import(vec![StudentCandidate::new("Citra", "1003").unwrap()]);

    let summary = summarize(ledger.day_records(day(19)), &roster, "");

    assert_eq!(summary.counts.marked() + summary.unmarked, summary.total_students);
    assert_eq!(summary.counts.present, 1);
    assert_eq!(summary.unmarked, 1);
}

#[test]
fn summary_invariant_holds_for_every_status_mix() {
    let roster = roster_of(&["A", "B", "C", "D", "E", "F", "G"]);
    for (offset, _) in AttendanceStatus::ALL.iter().enumerate() {
        let mut ledger = Ledger::new();
        for (index, student) in roster.students().iter().enumerate().skip(offset) {
            let status = AttendanceStatus::ALL[(index + offset) % 4];
            ledger.mark(day(19), student.id, status, None, 1);
        }

        let summary = summarize(ledger.day_records(day(19)), &roster, "");
        let counted: usize = AttendanceStatus::ALL
            .iter()
            .map(|status| summary.counts.get(*status))
            .sum();
        assert_eq!(counted + summary.unmarked, summary.total_students);
        assert_eq!(summary.unmarked, offset);
    }
}

#[test]
fn empty_roster_has_zero_percentage() {
    let summary = summarize(Ledger::new().day_records(day(19)), &Roster::new(), "");

    assert_eq!(summary.total_students, 0);
    assert_eq!(summary.present_percentage, 0);
    assert_eq!(summary.unmarked, 0);
    assert!(summary.notes.is_empty());
}
