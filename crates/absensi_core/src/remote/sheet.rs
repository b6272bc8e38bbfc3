//! Spreadsheet submission.
//!
//! # Responsibility
//! - Deliver a `SheetPayload` to the configured endpoint as a JSON POST.
//! - Collapse every failure into a retryable `SubmitOutcome`.
//!
//! # Invariants
//! - Any non-2xx status is a rejection; there is no status-specific handling.
//! - No retries; the caller re-invokes to retry.

use crate::locale;
use crate::service::export::SheetPayload;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const USER_AGENT: &str = concat!("absensi_core/", env!("CARGO_PKG_VERSION"));

/// Transport-level failure while submitting.
#[derive(Debug)]
pub enum TransportError {
    /// The endpoint answered with a non-success status.
    Rejected { status: u16 },
    /// The request never completed (DNS, TLS, refused connection, ...).
    Network(String),
}

impl TransportError {
    /// Message shown to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => locale::MSG_SHEET_REJECTED,
            Self::Network(_) => locale::MSG_SHEET_NETWORK,
        }
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected { status } => write!(f, "sheet endpoint returned status {status}"),
            Self::Network(message) => write!(f, "sheet request failed: {message}"),
        }
    }
}

impl Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(value: reqwest::Error) -> Self {
        Self::Network(value.to_string())
    }
}

/// Result of one submission attempt, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub success: bool,
    pub message: String,
}

impl SubmitOutcome {
    pub fn sent() -> Self {
        Self {
            success: true,
            message: locale::MSG_SHEET_SENT.to_string(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

impl From<Result<(), TransportError>> for SubmitOutcome {
    fn from(value: Result<(), TransportError>) -> Self {
        match value {
            Ok(()) => Self::sent(),
            Err(err) => Self::failed(err.user_message()),
        }
    }
}

/// Delivers payloads to a spreadsheet endpoint.
pub trait SheetTransport {
    fn submit(&self, endpoint: &str, payload: &SheetPayload) -> Result<(), TransportError>;
}

/// Blocking HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpSheetTransport {
    client: reqwest::blocking::Client,
}

impl HttpSheetTransport {
    /// # Errors
    /// - `TransportError::Network` when the HTTP client cannot be built.
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Uses a caller-configured client (proxy, TLS roots, timeouts).
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl SheetTransport for HttpSheetTransport {
    fn submit(&self, endpoint: &str, payload: &SheetPayload) -> Result<(), TransportError> {
        let started_at = Instant::now();
        let response = match self.client.post(endpoint).json(payload).send() {
            Ok(response) => response,
            Err(err) => {
                error!(
                    "event=sheet_submit module=remote status=error duration_ms={} error_code=network error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                return Err(err.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!(
                "event=sheet_submit module=remote status=error duration_ms={} error_code=rejected http_status={}",
                started_at.elapsed().as_millis(),
                status.as_u16()
            );
            return Err(TransportError::Rejected {
                status: status.as_u16(),
            });
        }

        info!(
            "event=sheet_submit module=remote status=ok duration_ms={} rows={}",
            started_at.elapsed().as_millis(),
            payload.records.len()
        );
        Ok(())
    }
}
