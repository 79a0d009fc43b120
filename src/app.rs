use axum::Router;
use axum::routing::get;

use crate::models::PAGE_PATH;
use crate::routes;
use crate::state::AppState;

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::checker::index))
        .route(PAGE_PATH, get(routes::checker::name_checker))
        .with_state(state)
}
