//! Consent categories and the built-in registry.

use serde::{Deserialize, Serialize};

/// Category id for cookies the site cannot function without. Always granted.
pub const ESSENTIAL: &str = "essential";

/// Category id for optional analytics cookies.
pub const ANALYTICS: &str = "analytics";

/// A named class of cookie/script usage the user grants or denies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub required: bool,
    pub description: String,
}

impl Category {
    /// The fixed category set: `essential` (required) and `analytics`
    /// (optional). Order is the order the settings UI lists them in.
    pub fn builtin() -> Vec<Category> {
        vec![
            Category {
                id: ESSENTIAL.to_string(),
                required: true,
                description: "Essential cookies required for site functionality.".to_string(),
            },
            Category {
                id: ANALYTICS.to_string(),
                required: false,
                description: "Analytics to help us improve the site (optional).".to_string(),
            },
        ]
    }

    /// Look up a built-in category by id.
    pub fn find(id: &str) -> Option<Category> {
        Self::builtin().into_iter().find(|c| c.id == id)
    }

    /// Whether an id names a built-in category.
    pub fn is_known(id: &str) -> bool {
        Self::find(id).is_some()
    }

    /// Display label for the settings UI ("analytics" -> "Analytics").
    pub fn label(&self) -> String {
        let mut chars = self.id.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    }
}
