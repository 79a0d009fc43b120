//! Client-side router events for soft navigations.
//!
//! Listeners are called synchronously, in registration order, on the thread that
//! emits the event. A [`Subscription`] unregisters its listener when dropped, so a
//! component that holds one cannot leak a listener on any exit path.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use reqwest::Url;
use tracing::debug;

use crate::models::{PAGE_PATH, SummonerQuery};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteEventKind {
    Start,
    Complete,
}

/// A route transition from `from` to `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    pub url: String,
    pub from: String,
}

type Listener = Arc<dyn Fn(&RouteChange) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, RouteEventKind, Listener)>,
}

pub struct ClientRouter {
    as_path: Mutex<String>,
    listeners: Arc<Mutex<Listeners>>,
}

impl ClientRouter {
    pub fn new(initial_path: impl Into<String>) -> Self {
        Self {
            as_path: Mutex::new(initial_path.into()),
            listeners: Arc::new(Mutex::new(Listeners::default())),
        }
    }

    /// Path and query of the currently committed route.
    pub fn as_path(&self) -> String {
        self.as_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn on<F>(&self, kind: RouteEventKind, listener: F) -> Subscription
    where
        F: Fn(&RouteChange) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, kind, Arc::new(listener)));
        debug!(id, ?kind, "route listener registered");

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn listener_count(&self, kind: RouteEventKind) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .count()
    }

    /// Announces a navigation to `url`. The committed path does not change yet.
    pub fn start(&self, url: impl Into<String>) -> RouteChange {
        let change = RouteChange {
            url: url.into(),
            from: self.as_path(),
        };
        self.emit(RouteEventKind::Start, &change);
        change
    }

    /// Commits `change` as the current route and announces completion.
    pub fn complete(&self, change: &RouteChange) {
        *self.as_path.lock().unwrap_or_else(PoisonError::into_inner) = change.url.clone();
        self.emit(RouteEventKind::Complete, change);
    }

    fn emit(&self, kind: RouteEventKind, change: &RouteChange) {
        // Snapshot first so listeners may subscribe or unsubscribe while running.
        let targets: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, listener)| Arc::clone(listener))
            .collect();

        for listener in targets {
            listener(change);
        }
    }
}

/// Keeps a route listener registered until dropped.
#[must_use = "dropping a subscription unregisters its listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .entries
                .retain(|(id, _, _)| *id != self.id);
            debug!(id = self.id, "route listener removed");
        }
    }
}

/// In-app URLs are paths; they are resolved against this origin before parsing.
const APP_ORIGIN: &str = "http://localhost";

/// Resolves an in-app path such as `/lol-name-checker?region=na&name=abc`.
fn parse_app_url(url: &str) -> Option<Url> {
    Url::parse(APP_ORIGIN).and_then(|base| base.join(url)).ok()
}

/// Whether `url` points at the name checker page with a query string.
pub fn is_checker_query_url(url: &str) -> bool {
    parse_app_url(url).is_some_and(|parsed| parsed.path() == PAGE_PATH && parsed.query().is_some())
}

/// Raw `region` and `name` values from an in-app URL's query string.
///
/// # Arguments
/// * `url` - An in-app path with an optional query and fragment
///
/// # Returns
/// * `(Option<String>, Option<String>)` - The decoded `region` and `name`; the last
///   occurrence of a repeated key wins
pub fn query_params(url: &str) -> (Option<String>, Option<String>) {
    let Some(parsed) = parse_app_url(url) else {
        return (None, None);
    };

    let mut region = None;
    let mut name = None;
    for (key, value) in parsed.query_pairs() {
        match key.as_ref() {
            "region" => region = Some(value.into_owned()),
            "name" => name = Some(value.into_owned()),
            _ => {}
        }
    }
    (region, name)
}

/// Parses a URL into a query, if it carries a known region and a name.
pub fn query_of(url: &str) -> Option<SummonerQuery> {
    let (region, name) = query_params(url);
    let region = region?.parse().ok()?;
    let name = name.filter(|name| !name.is_empty())?;
    Some(SummonerQuery::new(region, name))
}
