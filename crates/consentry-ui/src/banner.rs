//! The consent banner component.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;

use consentry_core::{Category, ConsentChoices, ConsentRecord, Result};
use consentry_store::{ConsentStore, SubscriptionId};

use crate::settings::SettingsDialog;

/// Id of the container element the page markup must provide as the
/// banner's mount point.
pub const DEFAULT_CONTAINER_ID: &str = "cookie-consent-root";

const BANNER_MESSAGE: &str = "We use essential cookies to run this site. \
We also use optional analytics cookies to improve our service.";
const PRIVACY_HREF: &str = "/legal/privacy.html";
const MANAGE_LABEL: &str = "Manage cookies";

/// Banner lifecycle: `Unknown` until the user decides, `Decided` once a
/// record exists. Revoking the record returns the banner to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    Unknown,
    Decided,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BannerAction {
    Reject,
    Manage,
    Accept,
}

/// What the host paints while the user has not decided yet.
#[derive(Debug, Clone, Serialize)]
pub struct BannerView {
    pub container_id: String,
    pub message: String,
    pub privacy_href: String,
    /// Actions in display order.
    pub actions: Vec<BannerAction>,
}

/// The persistent affordance shown after a decision, so preferences can be
/// changed later.
#[derive(Debug, Clone, Serialize)]
pub struct ManageView {
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub enum BannerRender {
    Banner(BannerView),
    Manage(ManageView),
}

/// Presentation state for the banner; a pure consumer of the store.
///
/// Keeps itself in sync with the store through a subscription, so an
/// external `write` hides the banner and an external `revoke` re-shows it.
/// `unmount` (or dropping the component) removes the subscription, which
/// keeps repeated re-mounts from leaking listeners.
pub struct ConsentBanner {
    store: Arc<ConsentStore>,
    container_id: String,
    state: Arc<Mutex<BannerState>>,
    subscription: Option<SubscriptionId>,
}

impl ConsentBanner {
    /// Mount the banner against the container element with the given id.
    pub fn mount(store: Arc<ConsentStore>, container_id: &str) -> Self {
        let initial = match store.read() {
            Some(_) => BannerState::Decided,
            None => BannerState::Unknown,
        };
        let state = Arc::new(Mutex::new(initial));

        let shared = Arc::clone(&state);
        let subscription = store.subscribe(move |record| {
            let next = match record {
                Some(_) => BannerState::Decided,
                None => BannerState::Unknown,
            };
            debug!("Banner state -> {:?}", next);
            *shared.lock() = next;
        });

        debug!("Banner mounted on #{}: {:?}", container_id, initial);
        Self {
            store,
            container_id: container_id.to_string(),
            state,
            subscription: Some(subscription),
        }
    }

    pub fn state(&self) -> BannerState {
        *self.state.lock()
    }

    /// What the host should currently render.
    pub fn view(&self) -> BannerRender {
        match self.state() {
            BannerState::Unknown => BannerRender::Banner(BannerView {
                container_id: self.container_id.clone(),
                message: BANNER_MESSAGE.to_string(),
                privacy_href: PRIVACY_HREF.to_string(),
                actions: vec![BannerAction::Reject, BannerAction::Manage, BannerAction::Accept],
            }),
            BannerState::Decided => BannerRender::Manage(ManageView {
                label: MANAGE_LABEL.to_string(),
            }),
        }
    }

    /// Accept all categories. A failed write leaves the banner showing.
    pub fn accept(&self) -> Result<ConsentRecord> {
        self.store.write(Self::uniform_choices(true))
    }

    /// Reject everything optional, keeping only essential cookies.
    pub fn reject(&self) -> Result<ConsentRecord> {
        self.store.write(Self::uniform_choices(false))
    }

    /// The Manage action: open the settings dialog over the same store.
    pub fn open_settings(&self) -> SettingsDialog {
        SettingsDialog::open(Arc::clone(&self.store))
    }

    /// Remove the store subscription. Idempotent.
    pub fn unmount(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.store.unsubscribe(id);
            debug!("Banner unmounted from #{}", self.container_id);
        }
    }

    fn uniform_choices(optional_granted: bool) -> ConsentChoices {
        Category::builtin()
            .into_iter()
            .map(|c| (c.id, c.required || optional_granted))
            .collect()
    }
}

impl Drop for ConsentBanner {
    fn drop(&mut self) {
        self.unmount();
    }
}
