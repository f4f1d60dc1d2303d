/// API routes and handlers
pub mod data_access;
pub mod health;
pub mod middleware;
pub mod persons;

use crate::{
    context::AppContext,
    error::{PrError, PrResult},
    registry::AttributeMap,
};
use axum::{body::Bytes, Router};

/// Build registry routes (PR interface and data access)
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(persons::routes())
        .merge(data_access::routes())
}

/// Parse a request body as a JSON object, whatever its declared content type
pub fn parse_attributes(body: &Bytes) -> PrResult<AttributeMap> {
    serde_json::from_slice(body)
        .map_err(|e| PrError::Validation(format!("Request body must be a JSON object: {}", e)))
}
