//! Entity read handlers: list (with skip/take) and read by id.

use crate::error::AppError;
use crate::executor::QueryExecutor;
use crate::record::PaginationOptions;
use crate::response::{success_many, success_one};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::collections::HashMap;

/// Blank or missing means 0 (not applied).
fn parse_count(params: &HashMap<String, String>, key: &str) -> Result<u64, AppError> {
    match params.get(key).map(|v| v.trim()) {
        None | Some("") => Ok(0),
        Some(v) => v
            .parse()
            .map_err(|_| AppError::BadRequest(format!("{} must be a non-negative integer", key))),
    }
}

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))
}

pub async fn list<E: QueryExecutor>(
    State(state): State<AppState<E>>,
    Path(entity_name): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let options = PaginationOptions {
        skip: parse_count(&params, "skip")?,
        take: parse_count(&params, "take")?,
    };
    let rows = state.reader().get_all(&entity_name, options).await?;
    Ok(success_many(rows))
}

pub async fn read<E: QueryExecutor>(
    State(state): State<AppState<E>>,
    Path((entity_name, id_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = state
        .reader()
        .get_single(&entity_name, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{}/{}", entity_name, id)))?;
    Ok(success_one(row))
}
