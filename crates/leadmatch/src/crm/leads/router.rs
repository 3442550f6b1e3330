use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use super::domain::{LeadDraft, LeadId, Listing, ListingId};
use super::matching::MatchOutcome;
use super::repository::{CatalogError, LeadRepository, ListingCatalog, RepositoryError};
use super::service::{LeadMatchService, LeadServiceError};

/// Router builder exposing HTTP endpoints for the lead outreach pool.
pub fn lead_router<L, C>(service: Arc<LeadMatchService<L, C>>) -> Router
where
    L: LeadRepository + 'static,
    C: ListingCatalog + 'static,
{
    Router::new()
        .route("/api/v1/crm/leads", post(register_handler::<L, C>))
        .route("/api/v1/crm/leads/:lead_id", get(lead_handler::<L, C>))
        .route(
            "/api/v1/crm/leads/:lead_id/contact",
            post(contact_handler::<L, C>),
        )
        .route(
            "/api/v1/crm/leads/:lead_id/matches",
            get(matches_handler::<L, C>),
        )
        .route("/api/v1/crm/matches", post(preview_handler::<L, C>))
        .route("/api/v1/crm/listings", post(add_listing_handler::<L, C>))
        .route(
            "/api/v1/crm/listings/:listing_id",
            put(update_listing_handler::<L, C>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AsOfQuery {
    pub(crate) as_of: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewRequest {
    pub(crate) lead: LeadDraft,
    pub(crate) listings: Vec<Listing>,
    pub(crate) as_of: Option<DateTime<Utc>>,
}

pub(crate) async fn register_handler<L, C>(
    State(service): State<Arc<LeadMatchService<L, C>>>,
    axum::Json(draft): axum::Json<LeadDraft>,
) -> Response
where
    L: LeadRepository + 'static,
    C: ListingCatalog + 'static,
{
    match service.register(draft) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn lead_handler<L, C>(
    State(service): State<Arc<LeadMatchService<L, C>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    L: LeadRepository + 'static,
    C: ListingCatalog + 'static,
{
    match service.get(&LeadId(lead_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn contact_handler<L, C>(
    State(service): State<Arc<LeadMatchService<L, C>>>,
    Path(lead_id): Path<String>,
) -> Response
where
    L: LeadRepository + 'static,
    C: ListingCatalog + 'static,
{
    match service.record_contact(&LeadId(lead_id), Utc::now()) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn matches_handler<L, C>(
    State(service): State<Arc<LeadMatchService<L, C>>>,
    Path(lead_id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Response
where
    L: LeadRepository + 'static,
    C: ListingCatalog + 'static,
{
    let as_of = query.as_of.unwrap_or_else(Utc::now);
    match service.matches_for(&LeadId(lead_id), as_of) {
        Ok(outcome) => outcome_response(outcome),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn preview_handler<L, C>(
    State(service): State<Arc<LeadMatchService<L, C>>>,
    axum::Json(request): axum::Json<PreviewRequest>,
) -> Response
where
    L: LeadRepository + 'static,
    C: ListingCatalog + 'static,
{
    let as_of = request.as_of.unwrap_or_else(Utc::now);
    match service.preview(request.lead, &request.listings, as_of) {
        Ok(outcome) => outcome_response(outcome),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn add_listing_handler<L, C>(
    State(service): State<Arc<LeadMatchService<L, C>>>,
    axum::Json(listing): axum::Json<Listing>,
) -> Response
where
    L: LeadRepository + 'static,
    C: ListingCatalog + 'static,
{
    let listing_id = listing.listing_id.clone();
    match service.add_listing(listing) {
        Ok(()) => (
            StatusCode::CREATED,
            axum::Json(json!({ "listing_id": listing_id })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn update_listing_handler<L, C>(
    State(service): State<Arc<LeadMatchService<L, C>>>,
    Path(listing_id): Path<String>,
    axum::Json(mut listing): axum::Json<Listing>,
) -> Response
where
    L: LeadRepository + 'static,
    C: ListingCatalog + 'static,
{
    listing.listing_id = ListingId(listing_id);
    let listing_id = listing.listing_id.clone();
    match service.update_listing(listing) {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(json!({ "listing_id": listing_id })),
        )
            .into_response(),
        Err(err) => error_response(err),
    }
}

/// A not-eligible lead is a successful response, not an error; callers need
/// to distinguish it from an empty match list.
fn outcome_response(outcome: MatchOutcome) -> Response {
    match outcome {
        MatchOutcome::Eligible { lead_id, matches } => {
            let payload = json!({
                "lead_id": lead_id,
                "eligible": true,
                "matches": matches,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        MatchOutcome::NotEligible {
            lead_id,
            verification_expired_at,
        } => {
            let payload = json!({
                "lead_id": lead_id,
                "eligible": false,
                "reason": format!("verification expired at {verification_expired_at}"),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
    }
}

fn error_response(err: LeadServiceError) -> Response {
    let status = match &err {
        LeadServiceError::Validation(_) | LeadServiceError::Listing(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LeadServiceError::Repository(RepositoryError::Conflict)
        | LeadServiceError::Catalog(CatalogError::Conflict)
        | LeadServiceError::LeadArchived(_)
        | LeadServiceError::RentedListingImmutable(_) => StatusCode::CONFLICT,
        LeadServiceError::Repository(RepositoryError::NotFound)
        | LeadServiceError::Catalog(CatalogError::NotFound) => StatusCode::NOT_FOUND,
        LeadServiceError::Repository(RepositoryError::Unavailable(_))
        | LeadServiceError::Catalog(CatalogError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
