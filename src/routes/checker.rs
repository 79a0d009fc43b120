use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::Uri;
use axum::response::{Html, Redirect};
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::models::PAGE_PATH;
use crate::navigation::ClientRouter;
use crate::notify::ToastQueue;
use crate::page::{NameCheckerPage, PageProps};
use crate::render::render_page;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CheckerParams {
    pub region: Option<String>,
    pub name: Option<String>,
}

pub async fn index() -> Redirect {
    Redirect::to(PAGE_PATH)
}

/// Renders the checker page, resolving the query server-side before responding.
pub async fn name_checker(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<CheckerParams>,
) -> Html<String> {
    let props = PageProps::resolve(
        state.lookup.as_ref(),
        params.region.as_deref(),
        params.name.as_deref(),
    )
    .await;
    if let Some(outcome) = &props.outcome {
        info!(?outcome, "resolved name checker query");
    }

    let current_path = uri
        .path_and_query()
        .map_or(PAGE_PATH, |path_and_query| path_and_query.as_str());
    let toasts = ToastQueue::default();
    let page = NameCheckerPage::mount(
        Arc::new(ClientRouter::new(current_path)),
        props,
        Arc::new(toasts.clone()),
    );

    Html(render_page(
        &page.view(Utc::now()),
        &state.ad_config(),
        &toasts.drain(),
    ))
}
