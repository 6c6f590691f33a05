//! Configuration for the consent store.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Storage key used by the site's previous JS banner. Kept as the default
/// namespace so consent decisions recorded before the rewrite are honored.
pub const DEFAULT_NAMESPACE: &str = "axis3d_cookie_consent";

/// Default directory for the durable backend's database file.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Top-level Consentry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsentConfig {
    /// Storage key the record is persisted under. Injected rather than a
    /// process-wide constant so multiple consent domains don't collide.
    pub namespace: String,
    /// Directory holding the consent database.
    pub data_dir: PathBuf,
    /// User agent stamped onto saved records, when the host knows it.
    pub user_agent: Option<String>,
}

impl ConsentConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env() -> Self {
        let namespace = std::env::var("CONSENTRY_NAMESPACE")
            .unwrap_or_else(|_| DEFAULT_NAMESPACE.to_string());
        let data_dir = std::env::var("CONSENTRY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));
        let user_agent = std::env::var("CONSENTRY_USER_AGENT").ok();
        Self {
            namespace,
            data_dir,
            user_agent,
        }
    }
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            user_agent: None,
        }
    }
}
