use axum::{extract::State, http::StatusCode, Extension};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::pagination::Pagination;
use common::types::Page;
use models::stylist;
use service::appointment_service::{self, AppointmentView};
use service::permissions::Actor;
use service::stylist_service::{self, NewStylist};

use crate::auth::ServerState;
use crate::errors::{ApiError, ApiResult};
use crate::extract::{Json, Path, Query};

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SlotsQuery {
    /// Defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AvailableSlots {
    pub stylist_id: Uuid,
    pub date: NaiveDate,
    pub slots: Vec<String>,
}

pub async fn list(State(state): State<ServerState>, Query(opts): Query<Pagination>) -> ApiResult<Page<stylist::Model>> {
    Ok(Json(stylist_service::list_stylists(&state.db, opts).await?))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<NewStylist>,
) -> Result<(StatusCode, Json<stylist::Model>), ApiError> {
    let created = stylist_service::create_stylist(&state.db, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<stylist::Model> {
    Ok(Json(stylist_service::get_stylist(&state.db, id).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(fields): Json<stylist::StylistFields>,
) -> ApiResult<stylist::Model> {
    Ok(Json(stylist_service::update_stylist(&state.db, &actor, id, fields).await?))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    stylist_service::delete_stylist(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn appointments(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<AppointmentView>> {
    Ok(Json(appointment_service::stylist_appointments(&state.db, &actor, id).await?))
}

#[utoipa::path(
    get, path = "/api/stylists/{id}/available-slots", tag = "booking",
    params(("id" = Uuid, Path, description = "Stylist id"), SlotsQuery),
    responses((status = 200, description = "Free HH:MM start times"), (status = 404, description = "Not Found"))
)]
pub async fn available_slots(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Query(q): Query<SlotsQuery>,
) -> ApiResult<AvailableSlots> {
    let date = q.date.unwrap_or_else(|| Utc::now().date_naive());
    let slots = state.booking.available_slots(&state.db, id, date).await?;
    Ok(Json(AvailableSlots { stylist_id: id, date, slots }))
}

pub async fn claim(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<stylist::Model> {
    Ok(Json(stylist_service::claim_stylist(&state.db, &actor, id).await?))
}
