//! Narrative attendance report.
//!
//! # Responsibility
//! - Build the report prompt from a `DailySummary`.
//! - Call the language model over HTTP.
//!
//! # Invariants
//! - The prompt carries counts, the class name and note lines only.
//! - Failures are returned as `ReportError`; the session turns them into
//!   fallback text.

use crate::service::summary::DailySummary;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub const DEFAULT_REPORT_MODEL: &str = "gemini-3-flash-preview";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const REPORT_THINKING_BUDGET: u32 = 0;
const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// Report generation failure.
#[derive(Debug)]
pub enum ReportError {
    MissingApiKey,
    Rejected { status: u16 },
    Network(String),
    InvalidResponse(String),
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "no report API key configured"),
            Self::Rejected { status } => write!(f, "report service returned status {status}"),
            Self::Network(message) => write!(f, "report request failed: {message}"),
            Self::InvalidResponse(message) => write!(f, "invalid report response: {message}"),
        }
    }
}

impl Error for ReportError {}

impl From<reqwest::Error> for ReportError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::InvalidResponse(value.to_string())
        } else {
            Self::Network(value.to_string())
        }
    }
}

/// Produces a narrative report for one day.
///
/// An `Ok` with blank text is treated as "no report" by the session.
pub trait ReportGenerator {
    fn generate(&self, summary: &DailySummary, class_name: &str) -> Result<String, ReportError>;
}

/// Prompt sent to the model, in Indonesian.
pub fn build_report_prompt(summary: &DailySummary, class_name: &str) -> String {
    let notes = if summary.notes.is_empty() {
        "-".to_string()
    } else {
        summary.notes.join(", ")
    };
    format!(
        "Bertindaklah sebagai asisten administrasi sekolah yang profesional.\n\
         Buatkan laporan ringkas dan sopan untuk Wali Kelas {class_name} berdasarkan data kehadiran hari ini:\n\
         \n\
         Tanggal: {date}\n\
         Total Siswa: {total}\n\
         Hadir: {present}\n\
         Sakit: {sick}\n\
         Izin: {permission}\n\
         Alpa (Tanpa Keterangan): {absent}\n\
         \n\
         Catatan Khusus:\n\
         {notes}\n\
         \n\
         Berikan analisis singkat tentang tren kehadiran hari ini dan saran jika ada banyak siswa yang tidak hadir.\n\
         Gunakan Bahasa Indonesia yang formal namun mudah dibaca.",
        date = summary.date,
        total = summary.total_students,
        present = summary.counts.present,
        sick = summary.counts.sick,
        permission = summary.counts.permission,
        absent = summary.absent_for_report(),
    )
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

/// A budget of `0` turns model thinking off.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct GeminiReportClient {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiReportClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ReportError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ReportError::MissingApiKey);
        }
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Reads the key from `GEMINI_API_KEY`, then `API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Result<Self, ReportError> {
        let api_key = API_KEY_ENV_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|value| !value.trim().is_empty()))
            .ok_or(ReportError::MissingApiKey)?;
        Self::new(api_key, model)
    }

    /// Replaces the HTTP client, e.g. to configure proxies or timeouts.
    pub fn with_http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.client = client;
        self
    }

    /// Points the client at another API root, e.g. a proxy.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

impl ReportGenerator for GeminiReportClient {
    fn generate(&self, summary: &DailySummary, class_name: &str) -> Result<String, ReportError> {
        let started_at = Instant::now();
        let prompt = build_report_prompt(summary, class_name);
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig {
                    thinking_budget: REPORT_THINKING_BUDGET,
                },
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .map_err(|err| {
                // The url carries the api key.
                let err = err.without_url();
                error!(
                    "event=report_generate module=remote status=error error_code=network error={}",
                    err
                );
                ReportError::from(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(
                "event=report_generate module=remote status=error error_code=rejected http_status={}",
                status.as_u16()
            );
            return Err(ReportError::Rejected {
                status: status.as_u16(),
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|err| ReportError::from(err.without_url()))?;
        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .map(|part| part.text)
            .collect::<String>();

        info!(
            "event=report_generate module=remote status=ok duration_ms={} chars={}",
            started_at.elapsed().as_millis(),
            text.chars().count()
        );
        Ok(text)
    }
}
