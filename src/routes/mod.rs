mod common;
mod entity;

pub use common::common_routes;
pub use entity::entity_routes;

use crate::executor::QueryExecutor;
use crate::state::AppState;
use axum::Router;

/// Full gateway: common routes at the root, entity routes under `/api`.
pub fn gateway_router<E: QueryExecutor>(state: AppState<E>) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .nest("/api", entity_routes(state))
}
