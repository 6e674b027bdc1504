//! # REST API
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/health` | [`handlers::health`] |
//! | GET | `/` | [`handlers::index`] |
//! | GET, POST | `/api/inventory` | [`handlers::list_items`], [`handlers::create_item`] |
//! | GET, PUT, DELETE | `/api/inventory/:id` | [`handlers::get_item`], [`handlers::update_item`], [`handlers::delete_item`] |
//! | PUT | `/api/inventory/:id/archive` | [`handlers::archive_item`] |
//! | PUT | `/api/inventory/:id/decrement` | [`handlers::decrement_item`] |
//!
//! Every error, including unknown paths and unsupported methods, is a JSON
//! [`ApiError`] body.

pub mod error;
pub mod handlers;

pub use error::ApiError;

use axum::http::{header, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::Router;

use crate::clients::InventoryClient;

/// Shared state of every handler.
#[derive(Clone)]
pub struct AppState {
    pub client: InventoryClient,
}

impl AppState {
    pub fn new(client: InventoryClient) -> Self {
        Self { client }
    }
}

/// Gives the router's bare 405 replies a JSON body, keeping the `Allow` header.
async fn method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }
    let allow = response.headers().get(header::ALLOW).cloned();
    let mut json = ApiError::new(StatusCode::METHOD_NOT_ALLOWED, error::METHOD_NOT_ALLOWED_MESSAGE).into_response();
    if let Some(allow) = allow {
        json.headers_mut().insert(header::ALLOW, allow);
    }
    json
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::index))
        .route(
            handlers::COLLECTION_PATH,
            get(handlers::list_items).post(handlers::create_item),
        )
        .route(
            "/api/inventory/:id",
            get(handlers::get_item)
                .put(handlers::update_item)
                .delete(handlers::delete_item),
        )
        .route("/api/inventory/:id/archive", put(handlers::archive_item))
        .route("/api/inventory/:id/decrement", put(handlers::decrement_item))
        .fallback(handlers::not_found)
        .layer(middleware::map_response(method_not_allowed))
        .with_state(state)
}
