//! The cookie settings dialog.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use consentry_core::{Category, ConsentChoices, ConsentRecord, Result};
use consentry_store::ConsentStore;

/// One category as the settings dialog presents it. Required categories
/// render as fixed text, optional ones as a toggle.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRow {
    pub id: String,
    pub label: String,
    pub description: String,
    pub required: bool,
    pub granted: bool,
}

/// Settings dialog state: one row per category, edited in place and only
/// persisted on `save`.
pub struct SettingsDialog {
    store: Arc<ConsentStore>,
    rows: Vec<CategoryRow>,
}

impl SettingsDialog {
    /// Open the dialog, pre-filling toggles from the current record.
    /// Optional categories default to off when no decision exists yet.
    pub fn open(store: Arc<ConsentStore>) -> Self {
        let existing = store.read();
        let rows = Category::builtin()
            .into_iter()
            .map(|cat| {
                let granted = if cat.required {
                    true
                } else {
                    existing.as_ref().map(|r| r.allows(&cat.id)).unwrap_or(false)
                };
                CategoryRow {
                    label: cat.label(),
                    id: cat.id,
                    description: cat.description,
                    required: cat.required,
                    granted,
                }
            })
            .collect();
        debug!("Settings dialog opened, prefilled={}", existing.is_some());
        Self { store, rows }
    }

    pub fn rows(&self) -> &[CategoryRow] {
        &self.rows
    }

    /// Flip an optional toggle. Required and unknown ids are ignored.
    pub fn set_toggle(&mut self, category_id: &str, granted: bool) {
        if let Some(row) = self
            .rows
            .iter_mut()
            .find(|r| r.id == category_id && !r.required)
        {
            row.granted = granted;
        }
    }

    /// Persist the toggle states. On success the store notifies its
    /// subscribers and any mounted banner transitions to decided.
    pub fn save(&self) -> Result<ConsentRecord> {
        let choices: ConsentChoices = self
            .rows
            .iter()
            .map(|r| (r.id.clone(), r.granted))
            .collect();
        self.store.write(choices)
    }

    /// Discard without persisting.
    pub fn cancel(self) {
        debug!("Settings dialog cancelled");
    }
}
