//! State of the name checker page across initial renders and soft navigations.
//!
//! The server mounts a [`NameCheckerPage`] once per request to build the initial
//! render. Navigation operations (`navigate`, `submit`, `key_press`, `commit`) are
//! the embeddable client API that a browser host drives between page loads.
//!
//! The page moves between three phases:
//!
//! - **Idle**: no query yet, empty form, nothing to show.
//! - **Settled**: a query was resolved and its outcome is on screen.
//! - **Navigating**: a soft navigation to a *different* checker query has started
//!   and its props have not been committed yet.
//!
//! `loading` is raised by a route-start listener and cleared synchronously at the
//! start of every [`NameCheckerPage::commit`], so it never outlives the fetch
//! that triggered it. Errors are reported through an [`ErrorSignal`], orthogonal
//! to the phase.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::decay::DerivedStatus;
use crate::error::LookupError;
use crate::lookup::SummonerLookup;
use crate::models::{LookupOutcome, MIN_NAME_LEN, Region, SummonerQuery};
use crate::navigation::{
    ClientRouter, RouteEventKind, Subscription, is_checker_query_url, query_params,
};
use crate::notify::{ErrorSignal, Notifier};

/// Props produced by one server-side resolution of the page URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageProps {
    /// Name exactly as it appeared in the URL.
    pub initial_name: Option<String>,
    pub initial_region: Option<Region>,
    /// `None` when the URL did not carry both a region and a name.
    pub outcome: Option<LookupOutcome>,
}

impl PageProps {
    /// Resolves raw URL parameters, performing at most one lookup.
    pub async fn resolve(
        lookup: &dyn SummonerLookup,
        region: Option<&str>,
        name: Option<&str>,
    ) -> Self {
        let region = region.filter(|value| !value.is_empty());
        let name = name.filter(|value| !value.is_empty());
        let (Some(region), Some(name)) = (region, name) else {
            return Self::default();
        };

        match region.parse::<Region>() {
            Ok(region) => {
                let query = SummonerQuery::new(region, name);
                let outcome = lookup.lookup(&query).await;
                Self {
                    initial_name: Some(name.to_string()),
                    initial_region: Some(region),
                    outcome: Some(outcome),
                }
            }
            Err(e) => {
                warn!(error = %LookupError::from(e), "skipping lookup");
                Self {
                    initial_name: Some(name.to_string()),
                    initial_region: None,
                    outcome: Some(LookupOutcome::Error),
                }
            }
        }
    }

    pub fn is_error(&self) -> bool {
        self.outcome.as_ref().is_some_and(LookupOutcome::is_error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Settled,
    Navigating,
}

/// Controlled form inputs. Editing them never navigates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInputs {
    pub name: String,
    pub region: Region,
}

impl FormInputs {
    fn from_props(props: &PageProps) -> Self {
        Self {
            name: props.initial_name.clone().unwrap_or_default(),
            region: props.initial_region.unwrap_or_default(),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.name.chars().count() >= MIN_NAME_LEN
    }

    pub fn target_url(&self) -> String {
        SummonerQuery::new(self.region, self.name.as_str()).page_url()
    }
}

/// Verdict shown in the availability section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Found {
        name: String,
        level: u32,
        status: DerivedStatus,
        revision_date: DateTime<Utc>,
        availability_date: DateTime<Utc>,
    },
    NotFound {
        name: String,
    },
}

/// Everything a render needs, derived at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub form: FormInputs,
    pub can_submit: bool,
    pub submit_url: String,
    pub loading: bool,
    /// `None` while loading, before any query, and on errors.
    pub verdict: Option<Verdict>,
}

pub struct NameCheckerPage {
    router: Arc<ClientRouter>,
    props: PageProps,
    form: FormInputs,
    loading: Arc<AtomicBool>,
    error_signal: ErrorSignal,
    notifier: Arc<dyn Notifier>,
    _route_start: Subscription,
}

impl NameCheckerPage {
    /// Initial render with server-resolved props.
    ///
    /// Registers the route-start listener that raises `loading`, initialises the
    /// form from the props and signals an error outcome if there is one.
    ///
    /// # Arguments
    /// * `router` - Router the page listens to for the rest of its lifetime
    /// * `props` - Props resolved for the URL being rendered
    /// * `notifier` - Surface for the one-shot error message
    ///
    /// # Returns
    /// * `Self` - The mounted page. Dropping it unregisters the listener.
    pub fn mount(router: Arc<ClientRouter>, props: PageProps, notifier: Arc<dyn Notifier>) -> Self {
        let loading = Arc::new(AtomicBool::new(false));

        let flag = Arc::clone(&loading);
        let route_start = router.on(RouteEventKind::Start, move |change| {
            if is_checker_query_url(&change.url) && change.url != change.from {
                debug!(url = %change.url, "checker navigation started");
                flag.store(true, Ordering::SeqCst);
            }
        });

        let mut page = Self {
            router,
            form: FormInputs::from_props(&props),
            props,
            loading,
            error_signal: ErrorSignal::default(),
            notifier,
            _route_start: route_start,
        };
        page.signal_errors();
        page
    }

    /// Commits a fresh render with new props.
    ///
    /// `loading` is cleared before anything else, whatever the new outcome is, so
    /// a render never shows a loading state over fresh content. Form inputs keep
    /// their current values.
    ///
    /// # Arguments
    /// * `props` - Props resolved for the navigation that just finished
    pub fn commit(&mut self, props: PageProps) {
        self.loading.store(false, Ordering::SeqCst);
        self.props = props;
        self.signal_errors();
    }

    fn signal_errors(&mut self) {
        self.error_signal
            .observe(self.props.is_error(), self.notifier.as_ref());
    }

    pub fn phase(&self) -> Phase {
        if self.loading() {
            Phase::Navigating
        } else if self.props.outcome.is_some() {
            Phase::Settled
        } else {
            Phase::Idle
        }
    }

    pub fn loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn props(&self) -> &PageProps {
        &self.props
    }

    pub fn form(&self) -> &FormInputs {
        &self.form
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.name = name.into();
    }

    pub fn set_region(&mut self, region: Region) {
        self.form.region = region;
    }

    /// Runs a full soft navigation to `url`: start, resolve, commit, complete.
    ///
    /// A different checker query puts the page in [`Phase::Navigating`] until the
    /// commit. Re-navigating to the current URL still performs the lookup but never
    /// shows a loading state.
    ///
    /// # Arguments
    /// * `url` - In-app path, e.g. `/lol-name-checker?region=na&name=abc`
    /// * `lookup` - Service used to resolve the new props
    pub async fn navigate(&mut self, url: &str, lookup: &dyn SummonerLookup) {
        info!(url, "navigating");
        let change = self.router.start(url);

        let (region, name) = query_params(url);
        let props = PageProps::resolve(lookup, region.as_deref(), name.as_deref()).await;

        self.commit(props);
        self.router.complete(&change);
    }

    /// Navigates to the URL built from the current inputs.
    ///
    /// Returns the URL navigated to, or `None` when the name is too short.
    pub async fn submit(&mut self, lookup: &dyn SummonerLookup) -> Option<String> {
        if !self.form.can_submit() {
            debug!("submit suppressed, name too short");
            return None;
        }

        let url = self.form.target_url();
        self.navigate(&url, lookup).await;
        Some(url)
    }

    pub async fn key_press(&mut self, key: &str, lookup: &dyn SummonerLookup) -> Option<String> {
        if key == "Enter" {
            self.submit(lookup).await
        } else {
            None
        }
    }

    pub fn view(&self, now: DateTime<Utc>) -> PageView {
        let loading = self.loading();
        let verdict = if loading {
            None
        } else {
            self.verdict(now)
        };

        PageView {
            form: self.form.clone(),
            can_submit: self.form.can_submit(),
            submit_url: self.form.target_url(),
            loading,
            verdict,
        }
    }

    fn verdict(&self, now: DateTime<Utc>) -> Option<Verdict> {
        match self.props.outcome.as_ref()? {
            LookupOutcome::Found(record) => Some(Verdict::Found {
                name: record.name.to_lowercase(),
                level: record.level,
                status: DerivedStatus::derive(record, now),
                revision_date: record.revision_date,
                availability_date: record.availability_date,
            }),
            LookupOutcome::NotFound => Some(Verdict::NotFound {
                name: self.props.initial_name.clone().unwrap_or_default(),
            }),
            LookupOutcome::Error => None,
        }
    }
}
