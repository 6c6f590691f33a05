//! Consentry Core: consent record model, category registry, configuration.

pub mod category;
pub mod config;
pub mod error;
pub mod record;

pub use category::{Category, ANALYTICS, ESSENTIAL};
pub use config::ConsentConfig;
pub use error::{Error, Result};
pub use record::{ConsentChoices, ConsentRecord};
