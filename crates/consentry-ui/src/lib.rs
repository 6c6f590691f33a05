//! Consentry UI: renderer-agnostic view models for the consent banner,
//! the settings dialog, and the page's dialog registry.
//!
//! Nothing here touches a real DOM. Each component derives its state from
//! the [`consentry_store::ConsentStore`] and yields plain view structs for
//! the host shell to paint.

pub mod banner;
pub mod dialogs;
pub mod settings;

pub use banner::{
    BannerAction, BannerRender, BannerState, BannerView, ConsentBanner, ManageView,
    DEFAULT_CONTAINER_ID,
};
pub use dialogs::DialogRegistry;
pub use settings::{CategoryRow, SettingsDialog};
