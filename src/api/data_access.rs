/// Data access interface: match, list and read person attributes
use crate::{
    api::parse_attributes,
    context::AppContext,
    error::PrResult,
    registry::{AttributeMap, Discrepancy, PersonListing, PersonQuery},
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};

/// Build data access routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/v1/persons", get(query_person_list))
        .route("/v1/persons/:person_id", get(read_person_attributes))
        .route("/v1/persons/:person_id/match", post(match_person_attributes))
}

/// Match attributes against the person's first identity
async fn match_person_attributes(
    State(ctx): State<AppContext>,
    Path(uin): Path<String>,
    body: Bytes,
) -> PrResult<Json<Vec<Discrepancy>>> {
    tracing::info!("matchPersonAttributes for UIN [{}]", uin);

    let attributes = parse_attributes(&body)?;
    let discrepancies = ctx.repository.match_person(&uin, &attributes).await?;
    tracing::debug!(
        uin = %uin,
        discrepancies = discrepancies.len(),
        "matchPersonAttributes completed"
    );

    Ok(Json(discrepancies))
}

/// List persons matching the query-string predicates
async fn query_person_list(
    State(ctx): State<AppContext>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> PrResult<Json<PersonListing>> {
    let query = PersonQuery::from_pairs(pairs)?;
    tracing::info!("queryPersonList for attributes [{:?}]", query.predicates);

    let listing = ctx.repository.list_persons(&query).await;
    tracing::debug!(
        offset = query.offset,
        limit = query.limit,
        results = listing.len(),
        "queryPersonList completed"
    );

    Ok(Json(listing))
}

/// Read requested attributes from the person's latest identity
async fn read_person_attributes(
    State(ctx): State<AppContext>,
    Path(uin): Path<String>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> PrResult<Json<AttributeMap>> {
    tracing::info!("readPersonAttributes for UIN [{}]", uin);

    let names: Vec<String> = pairs
        .into_iter()
        .filter(|(key, _)| key == "attributeNames")
        .map(|(_, value)| value)
        .collect();

    let attributes = ctx.repository.read_attributes(&uin, &names).await?;
    Ok(Json(attributes))
}
