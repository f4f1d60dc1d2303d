/// PR interface: person and identity registration
use crate::{
    api::parse_attributes,
    context::AppContext,
    error::{PrError, PrResult},
    metrics,
    registry::Identity,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::post,
    Router,
};

/// Build PR interface routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/v1/persons/:person_id", post(create_person))
        .route(
            "/v1/persons/:person_id/identities/:identity_id",
            post(create_identity_with_id),
        )
}

/// First `transactionId` in the query string; PR interface calls require one
pub fn transaction_id(pairs: Vec<(String, String)>) -> PrResult<String> {
    pairs
        .into_iter()
        .find(|(key, _)| key == "transactionId")
        .map(|(_, value)| value)
        .ok_or_else(|| PrError::Validation("transactionId is required".to_string()))
}

/// Create a person with no identities
async fn create_person(
    State(ctx): State<AppContext>,
    Path(person_id): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
    body: Bytes,
) -> PrResult<StatusCode> {
    let transaction_id = transaction_id(query)?;
    tracing::info!(
        "[{}] - createPerson for personId [{}]",
        transaction_id,
        person_id
    );

    let attributes = parse_attributes(&body)?;
    ctx.repository.create_person(&person_id, attributes).await?;
    update_registry_size(&ctx).await;

    Ok(StatusCode::CREATED)
}

/// Attach an identity to an existing person
async fn create_identity_with_id(
    State(ctx): State<AppContext>,
    Path((person_id, identity_id)): Path<(String, String)>,
    Query(query): Query<Vec<(String, String)>>,
    body: Bytes,
) -> PrResult<StatusCode> {
    let transaction_id = transaction_id(query)?;
    tracing::info!(
        "[{}] - createIdentityWithId for personId [{}]/[{}]",
        transaction_id,
        person_id,
        identity_id
    );

    let identity = Identity::from_payload(identity_id, parse_attributes(&body)?)?;
    ctx.repository.create_identity(&person_id, identity).await?;
    update_registry_size(&ctx).await;

    Ok(StatusCode::CREATED)
}

async fn update_registry_size(ctx: &AppContext) {
    let (persons, identities) = ctx.repository.counts().await;
    metrics::record_registry_size(persons, identities);
}
