use axum::{extract::State, http::StatusCode, Extension};
use serde::Deserialize;
use uuid::Uuid;

use common::pagination::Pagination;
use common::types::Page;
use models::{salon, stylist};
use service::booking::analytics::{self, SalonAnalytics};
use service::permissions::Actor;
use service::salon_service::{self, NearbySalon, SalonWithStylists, SalonWithStylistsView};

use crate::auth::ServerState;
use crate::errors::{ApiError, ApiResult};
use crate::extract::{Json, Path, Query};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
}

#[utoipa::path(
    get, path = "/api/salons", tag = "salons",
    params(("page" = Option<u32>, Query,), ("per_page" = Option<u32>, Query,)),
    responses((status = 200, description = "Salons page"), (status = 401, description = "Unauthorized"))
)]
pub async fn list(State(state): State<ServerState>, Query(opts): Query<Pagination>) -> ApiResult<Page<salon::Model>> {
    Ok(Json(salon_service::list_salons(&state.db, opts).await?))
}

#[utoipa::path(
    post, path = "/api/salons", tag = "salons",
    request_body = crate::openapi::SalonInputDoc,
    responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 403, description = "Forbidden"))
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(fields): Json<salon::SalonFields>,
) -> Result<(StatusCode, Json<salon::Model>), ApiError> {
    let created = salon_service::create_salon(&state.db, &actor, fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/salons/{id}", tag = "salons",
    params(("id" = Uuid, Path, description = "Salon id")),
    responses((status = 200, description = "Salon"), (status = 404, description = "Not Found"))
)]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<salon::Model> {
    Ok(Json(salon_service::get_salon(&state.db, id).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(fields): Json<salon::SalonFields>,
) -> ApiResult<salon::Model> {
    Ok(Json(salon_service::update_salon(&state.db, &actor, id, fields).await?))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    salon_service::delete_salon(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get, path = "/api/salons/nearby", tag = "salons",
    params(NearbyQuery),
    responses((status = 200, description = "Nearest salons with distance_km"), (status = 400, description = "Validation Error"))
)]
pub async fn nearby(State(state): State<ServerState>, Query(q): Query<NearbyQuery>) -> ApiResult<Vec<NearbySalon>> {
    Ok(Json(salon_service::nearby(&state.db, q.lat, q.lon).await?))
}

/// Also served as `/api/salons/recommended`.
pub async fn top_rated(State(state): State<ServerState>) -> ApiResult<Vec<salon::Model>> {
    Ok(Json(salon_service::top_rated(&state.db).await?))
}

pub async fn stylists(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<Vec<stylist::Model>> {
    Ok(Json(salon_service::salon_stylists(&state.db, id).await?))
}

#[utoipa::path(
    get, path = "/api/salons/{id}/analytics", tag = "salons",
    params(("id" = Uuid, Path, description = "Salon id")),
    responses((status = 200, description = "Salon analytics"), (status = 403, description = "Forbidden"))
)]
pub async fn salon_analytics(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<SalonAnalytics> {
    Ok(Json(analytics::salon_analytics(&state.db, &actor, id).await?))
}

pub async fn claim(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<salon::Model> {
    Ok(Json(salon_service::claim_salon(&state.db, &actor, id).await?))
}

pub async fn create_with_stylists(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<SalonWithStylists>,
) -> Result<(StatusCode, Json<SalonWithStylistsView>), ApiError> {
    let created = salon_service::create_with_stylists(&state.db, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
