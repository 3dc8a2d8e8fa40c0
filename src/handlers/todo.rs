//! Todo handlers: list, read, create, update, delete.

use crate::error::AppError;
use crate::extractors::RequireApiKey;
use crate::model::{CreateTodo, TodoFields, UpdateTodo};
use crate::pagination::PageRequest;
use crate::response::{acknowledge, success, success_ok};
use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest("invalid id".into()))
}

/// Malformed JSON is a bad request; well-formed JSON of the wrong shape is a validation error.
fn parse_body<T: DeserializeOwned>(payload: Result<Json<Value>, JsonRejection>) -> Result<T, AppError> {
    let Json(body) = payload.map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
    if !body.is_object() {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    }
    serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))
}

pub async fn list(
    _: RequireApiKey,
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Query(params) = query.map_err(|e| AppError::from_rejection(e.status(), e.body_text()))?;
    let request = PageRequest::from_query(&params)?;
    let resp = state.todos.list(request, uri.path()).await?;
    Ok(success_ok(resp))
}

pub async fn read(
    _: RequireApiKey,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let todo = state.todos.get(id).await?;
    Ok(success_ok(todo))
}

pub async fn create(
    _: RequireApiKey,
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body: CreateTodo = parse_body(payload)?;
    let todo = state.todos.create(TodoFields::from(body)).await?;
    Ok(success(StatusCode::CREATED, "Todo created successfully", todo))
}

pub async fn update(
    _: RequireApiKey,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let body: UpdateTodo = parse_body(payload)?;
    let todo = state.todos.update(id, TodoFields::from(body)).await?;
    Ok(success(StatusCode::OK, "Todo updated successfully", todo))
}

pub async fn delete(
    _: RequireApiKey,
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    state.todos.delete(id).await?;
    Ok(acknowledge(StatusCode::OK, "Todo deleted successfully"))
}
