//! Consentry Store: durable consent persistence plus change notification.
//!
//! Provides the pluggable storage backends, the `ConsentStore` observer
//! surface, and the deferred-loader gate that holds third-party scripts
//! back until the matching category is granted.

pub mod backend;
pub mod gate;
pub mod sqlite;
pub mod store;

pub use backend::{MemoryBackend, StorageBackend};
pub use sqlite::SqliteBackend;
pub use store::{ConsentStore, SubscriptionId};
