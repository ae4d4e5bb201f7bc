//! Salon services and customer reviews.
use axum::{extract::State, http::StatusCode, Extension};
use serde::Deserialize;
use uuid::Uuid;

use common::pagination::Pagination;
use common::types::Page;
use models::{review, salon_service};
use service::catalog_service::{self, NewService};
use service::permissions::Actor;
use service::review_service::{self, NewReview, ReviewUpdate};

use crate::auth::ServerState;
use crate::errors::{ApiError, ApiResult};
use crate::extract::{Json, Path, Query};

#[derive(Debug, Default, Deserialize)]
pub struct SalonFilter {
    pub salon_id: Option<Uuid>,
}

pub async fn list_services(
    State(state): State<ServerState>,
    Query(filter): Query<SalonFilter>,
    Query(opts): Query<Pagination>,
) -> ApiResult<Page<salon_service::Model>> {
    Ok(Json(catalog_service::list_services(&state.db, filter.salon_id, opts).await?))
}

pub async fn create_service(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<NewService>,
) -> Result<(StatusCode, Json<salon_service::Model>), ApiError> {
    let created = catalog_service::create_service(&state.db, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_service(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<salon_service::Model> {
    Ok(Json(catalog_service::get_service(&state.db, id).await?))
}

pub async fn update_service(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(fields): Json<salon_service::ServiceFields>,
) -> ApiResult<salon_service::Model> {
    Ok(Json(catalog_service::update_service(&state.db, &actor, id, fields).await?))
}

pub async fn delete_service(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    catalog_service::delete_service(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_reviews(
    State(state): State<ServerState>,
    Query(filter): Query<SalonFilter>,
    Query(opts): Query<Pagination>,
) -> ApiResult<Page<review::Model>> {
    Ok(Json(review_service::list_reviews(&state.db, filter.salon_id, opts).await?))
}

pub async fn create_review(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<NewReview>,
) -> Result<(StatusCode, Json<review::Model>), ApiError> {
    let created = review_service::create_review(&state.db, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_review(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<review::Model> {
    Ok(Json(review_service::get_review(&state.db, id).await?))
}

pub async fn update_review(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(input): Json<ReviewUpdate>,
) -> ApiResult<review::Model> {
    Ok(Json(review_service::update_review(&state.db, &actor, id, input).await?))
}

pub async fn delete_review(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    review_service::delete_review(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
