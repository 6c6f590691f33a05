//! Registry for the page's informational dialogs.
//!
//! One component owns every dialog it manages; there is no module-level
//! shared state. A backdrop click closes all open dialogs, whichever one
//! the click landed on.

use tracing::debug;

struct Dialog {
    id: String,
    open: bool,
}

/// Tracks open/closed state for a fixed set of dialogs registered by id.
#[derive(Default)]
pub struct DialogRegistry {
    dialogs: Vec<Dialog>,
}

impl DialogRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dialog id. Re-registering an existing id is a no-op.
    pub fn register(&mut self, id: &str) {
        if self.dialogs.iter().any(|d| d.id == id) {
            return;
        }
        self.dialogs.push(Dialog {
            id: id.to_string(),
            open: false,
        });
    }

    /// Open a dialog. Unknown ids are ignored.
    pub fn open(&mut self, id: &str) {
        if let Some(dialog) = self.dialogs.iter_mut().find(|d| d.id == id) {
            dialog.open = true;
            debug!("Dialog {} opened", id);
        }
    }

    /// Close a dialog. Unknown ids are ignored.
    pub fn close(&mut self, id: &str) {
        if let Some(dialog) = self.dialogs.iter_mut().find(|d| d.id == id) {
            dialog.open = false;
        }
    }

    /// Close every open dialog.
    pub fn close_all(&mut self) {
        for dialog in &mut self.dialogs {
            dialog.open = false;
        }
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.dialogs.iter().any(|d| d.id == id && d.open)
    }

    pub fn open_ids(&self) -> Vec<&str> {
        self.dialogs
            .iter()
            .filter(|d| d.open)
            .map(|d| d.id.as_str())
            .collect()
    }

    /// Handle a click that landed outside dialog content. When the target
    /// is any registered dialog's backdrop, every open dialog closes.
    /// Returns whether anything was closed.
    pub fn handle_backdrop_click(&mut self, target_id: &str) -> bool {
        if !self.dialogs.iter().any(|d| d.id == target_id) {
            return false;
        }
        let had_open = self.dialogs.iter().any(|d| d.open);
        self.close_all();
        had_open
    }
}
