/// Request middleware: failure logging, operation metrics, fault handling
use crate::{error::PrError, metrics};
use axum::{
    extract::{MatchedPath, Request},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{any::Any, time::Instant};

/// Registry operation served by a method and route template
pub fn operation_name(method: &Method, route: &str) -> Option<&'static str> {
    match (method.as_str(), route) {
        ("POST", "/v1/persons/:person_id") => Some("createPerson"),
        ("POST", "/v1/persons/:person_id/identities/:identity_id") => Some("createIdentityWithId"),
        ("POST", "/v1/persons/:person_id/match") => Some("matchPersonAttributes"),
        ("GET", "/v1/persons") => Some("queryPersonList"),
        ("GET", "/v1/persons/:person_id") => Some("readPersonAttributes"),
        _ => None,
    }
}

/// Record call count and latency for registry operations
pub async fn track_operations(request: Request, next: Next) -> Response {
    let operation = request
        .extensions()
        .get::<MatchedPath>()
        .and_then(|path| operation_name(request.method(), path.as_str()));

    let start = Instant::now();
    let response = next.run(request).await;

    if let Some(operation) = operation {
        metrics::record_operation(
            operation,
            response.status().as_u16(),
            start.elapsed().as_secs_f64(),
        );
    }

    response
}

/// Log every failed request
pub async fn log_failures(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;

    if response.status().is_client_error() || response.status().is_server_error() {
        tracing::info!(
            method = %method,
            uri = %uri,
            "Request failed with HTTP error {}",
            response.status().as_u16()
        );
    }

    response
}

/// Turn a handler panic into a 500 response
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown fault".to_string()
    };

    tracing::error!("Exception caught in middleware: [{}]", message);
    PrError::Internal(message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_operation_names() {
        assert_eq!(
            operation_name(&Method::POST, "/v1/persons/:person_id"),
            Some("createPerson")
        );
        assert_eq!(
            operation_name(&Method::GET, "/v1/persons/:person_id"),
            Some("readPersonAttributes")
        );
        assert_eq!(operation_name(&Method::GET, "/v1/persons"), Some("queryPersonList"));
        assert_eq!(operation_name(&Method::GET, "/health"), None);
    }

    #[test]
    fn test_handle_panic() {
        let response = handle_panic(Box::new("index out of bounds"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = handle_panic(Box::new(42_u32));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
