//! Entity read routes. The entity name is a path segment; handlers canonicalize it per request.

use crate::executor::QueryExecutor;
use crate::handlers::{list, list_entities, read};
use crate::state::AppState;
use axum::{routing::get, Router};

/// GET /_entities, GET /e/:entity_name, GET /e/:entity_name/:id.
pub fn entity_routes<E: QueryExecutor>(state: AppState<E>) -> Router {
    Router::new()
        .route("/_entities", get(list_entities::<E>))
        .route("/e/:entity_name", get(list::<E>))
        .route("/e/:entity_name/:id", get(read::<E>))
        .with_state(state)
}
