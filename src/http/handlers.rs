//! Route handlers.
//!
//! Handlers validate the request, then hand it to the [`InventoryClient`](crate::clients::InventoryClient).
//! They never touch storage.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::error::ApiError;
use super::AppState;
use crate::inventory_actor::ItemFilter;
use crate::model::{Condition, InventoryItem, ItemPayload, ValidationError};

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub const COLLECTION_PATH: &str = "/api/inventory";

type ApiResult<T> = Result<T, ApiError>;

/// Query string of `GET /api/inventory`. Empty values count as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
    pub condition: Option<String>,
    pub id: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn item_id(path: Result<Path<i64>, PathRejection>) -> ApiResult<i64> {
    let Path(id) = path?;
    Ok(id)
}

fn payload(body: Result<Json<Value>, JsonRejection>) -> ApiResult<ItemPayload> {
    let Json(data) = body?;
    debug!(payload = %data, "Processing payload");
    Ok(ItemPayload::from_json(&data)?)
}

/// Absolute when the client told us which host it used.
fn location(headers: &HeaderMap, id: i64) -> String {
    match headers.get(header::HOST).and_then(|host| host.to_str().ok()) {
        Some(host) => format!("http://{host}{COLLECTION_PATH}/{id}"),
        None => format!("{COLLECTION_PATH}/{id}"),
    }
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

pub async fn index() -> Html<&'static str> {
    info!("Request for Root URL");
    Html(INDEX_HTML)
}

/// Filter priority: condition, then name, then id.
pub async fn list_items(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<InventoryItem>>> {
    info!("Request for inventory item list");
    let Query(query) = query?;

    let filter = if let Some(condition) = present(query.condition) {
        info!(%condition, "Filtering by condition");
        match condition.parse::<Condition>() {
            Ok(condition) => Some(ItemFilter::Condition(condition)),
            Err(_) => return Ok(Json(Vec::new())),
        }
    } else if let Some(name) = present(query.name) {
        info!(%name, "Filtering by name");
        Some(ItemFilter::Name(name))
    } else if let Some(id) = present(query.id) {
        info!(%id, "Filtering by id");
        let id = id.parse::<i64>().map_err(|_| ValidationError::InvalidInteger {
            field: "id",
            found: id.clone(),
        })?;
        Some(ItemFilter::Id(id))
    } else {
        info!("Returning unfiltered list.");
        None
    };

    let items = state.client.list_items(filter).await?;
    info!(count = items.len(), "Inventory items returned");
    Ok(Json(items))
}

pub async fn create_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    info!("Request to Create an Item");
    let payload = payload(body)?;
    let item = state.client.create_item(payload).await?;

    let id = item.id.ok_or_else(|| ApiError::bad_request("Item was stored without an id"))?;
    info!(id, "Inventory Item saved");
    let location = location(&headers, id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(item)))
}

pub async fn get_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<InventoryItem>> {
    let id = item_id(path)?;
    info!(id, "Request to Retrieve an item");
    let item = state.client.get_item(id).await?;
    info!(name = %item.name, "Returning item");
    Ok(Json(item))
}

/// Full replacement: every field but the id comes from the body.
pub async fn update_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<InventoryItem>> {
    let id = item_id(path)?;
    info!(id, "Request to Update an item");
    // Unknown ids are a 404 even when the body is also bad.
    state.client.get_item(id).await?;
    let payload = payload(body)?;
    let item = state.client.update_item(id, payload).await?;
    info!(id, "Item updated");
    Ok(Json(item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = item_id(path)?;
    info!(id, "Request to Delete an item");
    state.client.delete_item(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn archive_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<InventoryItem>> {
    let id = item_id(path)?;
    info!(id, "Request to archive item");
    let item = state.client.archive_item(id).await?;
    Ok(Json(item))
}

pub async fn decrement_item(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<InventoryItem>> {
    let id = item_id(path)?;
    info!(id, "Request to decrement the quantity of an item");
    let item = state.client.decrement_item(id).await?;
    Ok(Json(item))
}

pub async fn not_found() -> ApiError {
    ApiError::not_found(super::error::NOT_FOUND_MESSAGE)
}
