//! The persisted consent record and its wire format.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::category::ESSENTIAL;
use crate::error::{Error, Result};

/// Per-category decisions, keyed by category id.
pub type ConsentChoices = BTreeMap<String, bool>;

/// Snapshot of a user's per-category decisions plus metadata.
///
/// Serialized as `{"choices":…,"ts":…,"ua":…}`, the payload format the
/// site's previous banner script wrote, so existing stored records are
/// still readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsentRecord {
    pub choices: ConsentChoices,
    /// RFC 3339 timestamp of when the decision was saved.
    #[serde(rename = "ts")]
    pub timestamp: String,
    /// User agent of the client that saved the decision, when known.
    #[serde(rename = "ua", default)]
    pub user_agent: Option<String>,
}

impl ConsentRecord {
    /// Build a record from raw choices, forcing `essential` to `true` and
    /// stamping the current time.
    pub fn new(mut choices: ConsentChoices, user_agent: Option<String>) -> Self {
        choices.insert(ESSENTIAL.to_string(), true);
        Self {
            choices,
            timestamp: Utc::now().to_rfc3339(),
            user_agent,
        }
    }

    /// Whether the record grants a category. Total: unknown ids are `false`.
    pub fn allows(&self, category_id: &str) -> bool {
        self.choices.get(category_id).copied().unwrap_or(false)
    }

    /// Decode and validate a persisted record.
    ///
    /// A blob that parses but does not grant `essential` violates the
    /// record invariant and is rejected as malformed.
    pub fn from_json(raw: &str) -> Result<Self> {
        let record: ConsentRecord =
            serde_json::from_str(raw).map_err(|e| Error::MalformedRecord(e.to_string()))?;
        if !record.allows(ESSENTIAL) {
            return Err(Error::MalformedRecord(
                "record does not grant the essential category".to_string(),
            ));
        }
        Ok(record)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
