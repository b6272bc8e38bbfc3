//! Per-installation application settings.

use serde::{Deserialize, Serialize};

/// Class-level settings edited by the homeroom teacher.
///
/// `sheetScriptUrl` is accepted on load so settings saved by earlier builds
/// keep working.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub class_name: String,
    #[serde(default, alias = "sheetScriptUrl")]
    pub sheet_endpoint_url: String,
}

impl AppConfig {
    /// Returns whether a spreadsheet endpoint has been configured.
    pub fn has_sheet_endpoint(&self) -> bool {
        !self.sheet_endpoint_url.trim().is_empty()
    }
}
