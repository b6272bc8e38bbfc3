//! Indonesian user-facing text and date formatting.
//!
//! # Responsibility
//! - Keep every message shown to the user in one place.
//! - Render calendar days in the long `id-ID` form used by the spreadsheet.

use crate::model::attendance::AttendanceDay;
use chrono::{Datelike, Weekday};

pub const MSG_SHEET_URL_MISSING: &str = "URL Script Google Sheets belum diatur.";
pub const MSG_SHEET_SENT: &str = "Data berhasil dikirim ke Google Sheets!";
pub const MSG_SHEET_REJECTED: &str = "Gagal mengirim data. Periksa URL Script.";
pub const MSG_SHEET_NETWORK: &str = "Terjadi kesalahan koneksi (CORS/Network).";
pub const MSG_SHEET_BUSY: &str = "Pengiriman sebelumnya masih berlangsung.";

pub const MSG_IMPORT_NO_RECORDS: &str =
    "Gagal membaca data. Pastikan format file CSV adalah: Nama, NIS";
pub const MSG_IMPORT_EMPTY_FILE: &str = "File kosong atau tidak dapat dibaca.";
pub const MSG_IMPORT_UNREADABLE: &str = "Terjadi kesalahan saat membaca file.";

pub const MSG_REPORT_EMPTY: &str = "Gagal membuat laporan.";
pub const MSG_REPORT_FAILED: &str = "Maaf, terjadi kesalahan saat menghubungi asisten AI.";

pub const MSG_RESET_CONFIRM: &str =
    "Mulai hari baru? Data kehadiran tanggal ini akan dihapus (pastikan sudah dikirim ke Sheets).";
pub const MSG_PRUNE_HISTORY_CONFIRM: &str =
    "Hapus data kehadiran sebelum tanggal ini? Data yang dihapus tidak dapat dikembalikan.";

/// Confirmation prompt shown before applying imported candidates.
pub fn import_confirmation(count: usize) -> String {
    format!("Ditemukan {count} siswa. Tambahkan ke daftar?")
}

/// Formats a day as e.g. `Senin, 19 Oktober 2026`.
pub fn format_display_date(day: AttendanceDay) -> String {
    format!(
        "{}, {} {} {}",
        weekday_name(day.weekday()),
        day.day(),
        month_name(day.month()),
        day.year()
    )
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Senin",
        Weekday::Tue => "Selasa",
        Weekday::Wed => "Rabu",
        Weekday::Thu => "Kamis",
        Weekday::Fri => "Jumat",
        Weekday::Sat => "Sabtu",
        Weekday::Sun => "Minggu",
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Januari",
        2 => "Februari",
        3 => "Maret",
        4 => "April",
        5 => "Mei",
        6 => "Juni",
        7 => "Juli",
        8 => "Agustus",
        9 => "September",
        10 => "Oktober",
        11 => "November",
        _ => "Desember",
    }
}
