//! Entity metadata listing handler.

use crate::error::AppError;
use crate::executor::QueryExecutor;
use crate::response::success_many;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

pub async fn list_entities<E: QueryExecutor>(
    State(state): State<AppState<E>>,
) -> Result<impl IntoResponse, AppError> {
    let metas = state.meta_lister().list_entity_meta().await?;
    Ok(success_many(metas))
}
