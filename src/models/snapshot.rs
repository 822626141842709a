//! Export snapshot written by the data-management export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Intern, Reward};

/// Full dump of the local store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub interns: Vec<Intern>,
    pub rewards: Vec<Reward>,
    pub exported_at: DateTime<Utc>,
}

impl ExportSnapshot {
    /// `intern-portal-data-<YYYY-MM-DD>.json`, dated by the export time.
    pub fn file_name(&self) -> String {
        format!(
            "intern-portal-data-{}.json",
            self.exported_at.format("%Y-%m-%d")
        )
    }
}

/// Shape accepted by import. Either collection may be missing, in which case
/// the stored one is left alone.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportPayload {
    #[serde(default)]
    pub interns: Option<Vec<Intern>>,
    #[serde(default)]
    pub rewards: Option<Vec<Reward>>,
}
