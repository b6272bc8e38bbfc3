use absensi_core::{parse_roster_csv, read_roster_csv, ImportEmptyReason, ImportOutcome};

fn pairs(outcome: &ImportOutcome) -> Vec<(String, String)> {
    outcome
        .candidates()
        .iter()
        .map(|candidate| (candidate.name().to_string(), candidate.nis().to_string()))
        .collect()
}

fn pair(name: &str, nis: &str) -> (String, String) {
    (name.to_string(), nis.to_string())
}

#[test]
fn comma_file_yields_one_candidate_per_data_line() {
    let outcome = parse_roster_csv("Nama,NIS\nAni Lestari,1001\n\nBudi,1002\nCitra,1003\n");

    assert_eq!(
        pairs(&outcome),
        vec![
            pair("Ani Lestari", "1001"),
            pair("Budi", "1002"),
            pair("Citra", "1003"),
        ]
    );
}

#[test]
fn semicolon_majority_on_first_line_selects_semicolon() {
    let outcome = parse_roster_csv("Nama Siswa;NIS;Kelas\nDoe, Jane;2001;XII\nRoe, Rick;2002;XII");

    assert_eq!(
        pairs(&outcome),
        vec![pair("Doe, Jane", "2001"), pair("Roe, Rick", "2002")]
    );
}

#[test]
fn row_with_other_delimiter_falls_back() {
    let outcome = parse_roster_csv("Ani,1001\nBudi;1002\nCitra,1003");

    assert_eq!(
        pairs(&outcome),
        vec![
            pair("Ani", "1001"),
            pair("Budi", "1002"),
            pair("Citra", "1003"),
        ]
    );
}

#[test]
fn windows_and_classic_mac_line_endings_are_normalized() {
    let outcome = parse_roster_csv("Ani,1001\r\nBudi,1002\rCitra,1003\r\n");
    assert_eq!(outcome.candidates().len(), 3);
}

#[test]
fn balanced_quotes_are_stripped_and_unbalanced_kept() {
    let outcome = parse_roster_csv("\"Jane Doe\",\"3001\"\nJane \"Doe\",3002");

    assert_eq!(
        pairs(&outcome),
        vec![pair("Jane Doe", "3001"), pair("Jane \"Doe\"", "3002")]
    );
}

#[test]
fn header_needs_both_keyword_sets() {
    let outcome = parse_roster_csv(
        "Student Name,Student ID\nNamaku Siswa,4001\nBudi,NIS-77\nNama,Nomor Induk",
    );

    assert_eq!(
        pairs(&outcome),
        vec![pair("Namaku Siswa", "4001"), pair("Budi", "NIS-77")]
    );
}

#[test]
fn rows_missing_name_or_nis_are_skipped_and_extra_fields_ignored() {
    let outcome = parse_roster_csv("Ani,1001,XII,extra\n,1002\nBudi,\nCitra\nDewi , 1004 ");

    assert_eq!(
        pairs(&outcome),
        vec![pair("Ani", "1001"), pair("Dewi", "1004")]
    );
}

#[test]
fn zero_length_input_reports_empty_file() {
    assert_eq!(
        parse_roster_csv(""),
        ImportOutcome::Empty(ImportEmptyReason::EmptyFile)
    );
    assert_eq!(
        parse_roster_csv("\u{feff}"),
        ImportOutcome::Empty(ImportEmptyReason::EmptyFile)
    );
}

#[test]
fn whitespace_only_input_reports_no_candidates() {
    let outcome = parse_roster_csv(" \r\n\t\n");

    assert_eq!(outcome, ImportOutcome::Empty(ImportEmptyReason::NoCandidates));
    assert_eq!(
        outcome.message(),
        "Gagal membaca data. Pastikan format file CSV adalah: Nama, NIS"
    );
}

#[test]
fn leading_byte_order_mark_is_not_part_of_first_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("excel-utf8.csv");
    std::fs::write(&path, "\u{feff}Ani,1001\nBudi,1002\n").unwrap();

    let outcome = read_roster_csv(&path);

    assert_eq!(
        pairs(&outcome),
        vec![pair("Ani", "1001"), pair("Budi", "1002")]
    );
    assert_eq!(outcome.candidates()[0].name().as_bytes(), b"Ani");
}

#[test]
fn byte_order_mark_before_header_still_skips_header() {
    let outcome = parse_roster_csv("\u{feff}Nama;NIS\r\nAni;1001\r\n");

    assert_eq!(pairs(&outcome), vec![pair("Ani", "1001")]);
}

#[test]
fn header_only_file_reports_no_candidates() {
    let outcome = parse_roster_csv("Nama,NIS\n");

    assert_eq!(outcome, ImportOutcome::Empty(ImportEmptyReason::NoCandidates));
    assert_eq!(
        outcome.message(),
        "Gagal membaca data. Pastikan format file CSV adalah: Nama, NIS"
    );
}

#[test]
fn candidate_outcome_message_asks_for_confirmation() {
    let outcome = parse_roster_csv("Ani,1001\nBudi,1002");
    assert_eq!(outcome.message(), "Ditemukan 2 siswa. Tambahkan ke daftar?");
}

#[test]
fn read_roster_csv_parses_file_and_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("siswa.csv");
    std::fs::write(&path, "Nama;NIS\nAni;1001\n").unwrap();

    assert_eq!(pairs(&read_roster_csv(&path)), vec![pair("Ani", "1001")]);
    assert_eq!(
        read_roster_csv(dir.path().join("missing.csv")),
        ImportOutcome::Empty(ImportEmptyReason::Unreadable)
    );
}

#[test]
fn read_roster_csv_treats_invalid_utf8_as_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("binary.csv");
    std::fs::write(&path, [0xff_u8, 0xfe, 0x00, 0x41]).unwrap();

    assert_eq!(
        read_roster_csv(&path),
        ImportOutcome::Empty(ImportEmptyReason::Unreadable)
    );
}
