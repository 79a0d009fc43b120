//! # Ad Slot Lifecycle
//!
//! Each [`AdSlot`] asks the injected [`AdProvider`] for an ad once, on mount, and
//! then pokes the ad's navigation hook after every completed soft navigation so
//! the provider can count a new virtual page view without recreating the unit.
//!
//! This is part of the embeddable client API, driven by whatever hosts the page
//! in a browser. The server only uses [`AdConfig`], which it writes into each
//! slot's `data-ad-config` attribute.
//!
//! ## Guarantees
//!
//! - **One creation per slot**: navigation never recreates the ad
//! - **Once per navigation**: the hook runs once for each completed route change
//! - **Nothing early**: navigations that complete before creation resolves are skipped
//! - **Nothing late**: unmounting removes the listener and cancels a pending creation

use std::sync::{Arc, OnceLock};

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::navigation::{ClientRouter, RouteEventKind, Subscription};

pub const TOP_SLOT_ID: &str = "lol-name-checker-top";
pub const RESULT_SLOT_ID: &str = "lol-name-checker-result";

/// Fixed configuration sent with every creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdConfig {
    pub demo: bool,
    pub format: String,
    pub sizes: Vec<[u32; 2]>,
    pub media_query: String,
    pub refresh_visible_only: bool,
    pub render_visible_only: bool,
    pub refresh_limit: u32,
    /// Seconds between refreshes.
    pub refresh_time: u32,
    pub report: AdReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdReport {
    pub enabled: bool,
}

impl AdConfig {
    /// 320x50 banner shown on narrow screens.
    pub fn horizontal_mobile(production: bool) -> Self {
        Self {
            demo: !production,
            format: "display".to_string(),
            sizes: vec![[320, 50]],
            media_query: "(max-width: 777px)".to_string(),
            refresh_visible_only: true,
            render_visible_only: true,
            refresh_limit: 10,
            refresh_time: 60,
            report: AdReport { enabled: true },
        }
    }
}

/// A created ad unit.
pub trait AdHandle: Send + Sync {
    /// Some ad units come back without a navigation hook.
    fn has_navigation_hook(&self) -> bool {
        true
    }

    /// Must be safe to call repeatedly.
    fn on_navigate(&self);
}

/// The third-party ad network, injected rather than looked up globally.
#[async_trait]
pub trait AdProvider: Send + Sync {
    /// Creates an ad unit in the element with id `slot_id`.
    ///
    /// # Arguments
    /// * `slot_id` - Id of the placeholder element the unit renders into
    /// * `config` - Format, sizing and refresh settings for the unit
    ///
    /// # Returns
    /// * `Result<Box<dyn AdHandle>>` - Handle kept for the slot's lifetime, or the
    ///   provider's error (logged, and the slot stays empty)
    async fn create_ad(&self, slot_id: &str, config: &AdConfig) -> Result<Box<dyn AdHandle>>;
}

/// One mounted ad placement. Dropping it unmounts the slot.
pub struct AdSlot {
    slot_id: String,
    handle: Arc<OnceLock<Box<dyn AdHandle>>>,
    creation: JoinHandle<()>,
    _route_complete: Subscription,
}

impl AdSlot {
    /// Mounts the slot and starts ad creation in the background.
    ///
    /// The navigation-complete listener is registered immediately; it stays inert
    /// until the provider returns a handle.
    ///
    /// # Arguments
    /// * `slot_id` - Placeholder element id, e.g. [`TOP_SLOT_ID`]
    /// * `provider` - Ad network used for the single creation request
    /// * `config` - Settings sent with the creation request
    /// * `router` - Router whose completed navigations trigger the hook
    ///
    /// # Panics
    /// Must be called from within a tokio runtime.
    pub fn mount(
        slot_id: impl Into<String>,
        provider: Arc<dyn AdProvider>,
        config: AdConfig,
        router: &ClientRouter,
    ) -> Self {
        let slot_id = slot_id.into();
        let handle: Arc<OnceLock<Box<dyn AdHandle>>> = Arc::new(OnceLock::new());

        let hook = Arc::clone(&handle);
        let hook_slot = slot_id.clone();
        let route_complete = router.on(RouteEventKind::Complete, move |change| {
            // Navigations that complete before the ad exists are not replayed.
            if let Some(ad) = hook.get()
                && ad.has_navigation_hook()
            {
                debug!(slot = %hook_slot, url = %change.url, "notifying ad of navigation");
                ad.on_navigate();
            }
        });

        let cell = Arc::clone(&handle);
        let creation_slot = slot_id.clone();
        let creation = tokio::spawn(async move {
            match provider.create_ad(&creation_slot, &config).await {
                Ok(ad) => {
                    if cell.set(ad).is_ok() {
                        info!("Ad created for slot {}", creation_slot);
                    }
                }
                Err(e) => warn!(slot = %creation_slot, error = %e, "ad creation failed"),
            }
        });

        Self {
            slot_id,
            handle,
            creation,
            _route_complete: route_complete,
        }
    }

    pub fn slot_id(&self) -> &str {
        &self.slot_id
    }

    /// Whether creation has resolved and the handle is retained.
    pub fn is_ready(&self) -> bool {
        self.handle.get().is_some()
    }
}

impl Drop for AdSlot {
    fn drop(&mut self) {
        // A creation still in flight is cancelled and its result never stored.
        self.creation.abort();
        debug!(slot = %self.slot_id, "ad slot unmounted");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::oneshot;

    use super::*;

    struct CountingAd {
        navigations: Arc<AtomicUsize>,
        hook: bool,
    }

    impl AdHandle for CountingAd {
        fn has_navigation_hook(&self) -> bool {
            self.hook
        }

        fn on_navigate(&self) {
            self.navigations.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FakeProvider {
        navigations: Arc<AtomicUsize>,
        created: Arc<AtomicUsize>,
        hook: bool,
        fail: bool,
        gate: Mutex<Option<oneshot::Receiver<()>>>,
        requests: Mutex<Vec<(String, AdConfig)>>,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                navigations: Arc::new(AtomicUsize::new(0)),
                created: Arc::new(AtomicUsize::new(0)),
                hook: true,
                fail: false,
                gate: Mutex::new(None),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn gated() -> (Self, oneshot::Sender<()>) {
            let (tx, rx) = oneshot::channel();
            let provider = Self::new();
            *provider.gate.lock().expect("gate lock") = Some(rx);
            (provider, tx)
        }

        fn navigations(&self) -> usize {
            self.navigations.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AdProvider for FakeProvider {
        async fn create_ad(&self, slot_id: &str, config: &AdConfig) -> Result<Box<dyn AdHandle>> {
            self.requests
                .lock()
                .expect("requests lock")
                .push((slot_id.to_string(), config.clone()));

            let gate = self.gate.lock().expect("gate lock").take();
            if let Some(gate) = gate {
                gate.await?;
            }
            if self.fail {
                anyhow::bail!("ad blocked");
            }

            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingAd {
                navigations: Arc::clone(&self.navigations),
                hook: self.hook,
            }))
        }
    }

    fn navigate(router: &ClientRouter, url: &str) {
        let change = router.start(url);
        router.complete(&change);
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    async fn wait_until_ready(slot: &AdSlot) {
        for _ in 0..100 {
            if slot.is_ready() {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("ad slot {} never became ready", slot.slot_id());
    }

    fn mount(provider: &Arc<FakeProvider>, router: &ClientRouter) -> AdSlot {
        let provider: Arc<dyn AdProvider> = Arc::clone(provider) as Arc<dyn AdProvider>;
        AdSlot::mount(TOP_SLOT_ID, provider, AdConfig::horizontal_mobile(false), router)
    }

    #[tokio::test]
    async fn creation_request_carries_slot_and_config() {
        let provider = Arc::new(FakeProvider::new());
        let router = ClientRouter::new("/lol-name-checker");
        let slot = mount(&provider, &router);
        wait_until_ready(&slot).await;

        let requests = provider.requests.lock().expect("requests lock");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, TOP_SLOT_ID);
        assert!(requests[0].1.demo);
    }

    #[tokio::test]
    async fn hook_runs_once_per_completed_navigation() {
        let provider = Arc::new(FakeProvider::new());
        let router = ClientRouter::new("/lol-name-checker");
        let slot = mount(&provider, &router);
        wait_until_ready(&slot).await;

        navigate(&router, "/lol-name-checker?region=na&name=abc");
        navigate(&router, "/frequently-asked-questions");
        router.start("/lol-name-checker?region=na&name=pending");

        assert_eq!(provider.navigations(), 2);
        assert_eq!(provider.created.load(Ordering::SeqCst), 1, "navigation must not recreate the ad");
    }

    #[tokio::test]
    async fn navigations_before_creation_resolves_are_ignored() {
        let (provider, release) = FakeProvider::gated();
        let provider = Arc::new(provider);
        let router = ClientRouter::new("/lol-name-checker");
        let slot = mount(&provider, &router);

        settle().await;
        navigate(&router, "/lol-name-checker?region=na&name=early");
        assert!(!slot.is_ready());
        assert_eq!(provider.navigations(), 0);

        release.send(()).expect("creation should still be waiting");
        wait_until_ready(&slot).await;
        assert_eq!(provider.navigations(), 0);

        navigate(&router, "/lol-name-checker?region=na&name=late");
        assert_eq!(provider.navigations(), 1);
    }

    #[tokio::test]
    async fn hook_is_not_called_after_unmount() {
        let provider = Arc::new(FakeProvider::new());
        let router = ClientRouter::new("/lol-name-checker");
        let slot = mount(&provider, &router);
        wait_until_ready(&slot).await;

        drop(slot);
        assert_eq!(router.listener_count(RouteEventKind::Complete), 0);

        navigate(&router, "/lol-name-checker?region=na&name=abc");
        assert_eq!(provider.navigations(), 0);
    }

    #[tokio::test]
    async fn creation_resolving_after_unmount_is_discarded() {
        let (provider, release) = FakeProvider::gated();
        let provider = Arc::new(provider);
        let router = ClientRouter::new("/lol-name-checker");
        let slot = mount(&provider, &router);
        settle().await;

        drop(slot);
        let _ = release.send(());
        settle().await;

        assert_eq!(provider.created.load(Ordering::SeqCst), 0);
        navigate(&router, "/lol-name-checker?region=na&name=abc");
        assert_eq!(provider.navigations(), 0);
    }

    #[tokio::test]
    async fn ads_without_navigation_hook_are_left_alone() {
        let mut provider = FakeProvider::new();
        provider.hook = false;
        let provider = Arc::new(provider);
        let router = ClientRouter::new("/lol-name-checker");
        let slot = mount(&provider, &router);
        wait_until_ready(&slot).await;

        navigate(&router, "/lol-name-checker?region=na&name=abc");
        assert_eq!(provider.navigations(), 0);
    }

    #[tokio::test]
    async fn failed_creation_leaves_slot_empty() {
        let mut provider = FakeProvider::new();
        provider.fail = true;
        let provider = Arc::new(provider);
        let router = ClientRouter::new("/lol-name-checker");
        let slot = mount(&provider, &router);
        settle().await;

        assert!(!slot.is_ready());
        navigate(&router, "/lol-name-checker?region=na&name=abc");
        assert_eq!(provider.navigations(), 0);
    }

    #[test]
    fn config_serializes_with_provider_field_names() {
        let json = serde_json::to_value(AdConfig::horizontal_mobile(true)).expect("config serializes");

        assert_eq!(
            json,
            serde_json::json!({
                "demo": false,
                "format": "display",
                "sizes": [[320, 50]],
                "mediaQuery": "(max-width: 777px)",
                "refreshVisibleOnly": true,
                "renderVisibleOnly": true,
                "refreshLimit": 10,
                "refreshTime": 60,
                "report": { "enabled": true }
            })
        );
    }
}
