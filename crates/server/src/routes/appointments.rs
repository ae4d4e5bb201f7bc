use axum::{extract::State, http::StatusCode, Extension};
use serde::Deserialize;
use uuid::Uuid;

use common::pagination::Pagination;
use common::types::Page;
use service::appointment_service::{self, AppointmentFilter, AppointmentView};
use service::booking::{transitions, BookingRequest};
use service::permissions::Actor;

use crate::auth::ServerState;
use crate::errors::{ApiError, ApiResult};
use crate::extract::{Json, Path, Query};

#[derive(Debug, Deserialize)]
pub struct NotesUpdate {
    pub notes: String,
}

#[utoipa::path(
    get, path = "/api/appointments", tag = "booking",
    params(
        ("status" = Option<String>, Query, description = "booked | confirmed | completed | cancelled"),
        ("date" = Option<String>, Query, description = "YYYY-MM-DD"),
        ("stylist_id" = Option<Uuid>, Query,),
        ("page" = Option<u32>, Query,),
        ("per_page" = Option<u32>, Query,)
    ),
    responses((status = 200, description = "Appointments visible to the caller"))
)]
pub async fn list(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Query(filter): Query<AppointmentFilter>,
    Query(opts): Query<Pagination>,
) -> ApiResult<Page<AppointmentView>> {
    Ok(Json(appointment_service::list_appointments(&state.db, &actor, filter, opts).await?))
}

#[utoipa::path(
    post, path = "/api/appointments", tag = "booking",
    request_body = crate::openapi::BookingRequestDoc,
    responses(
        (status = 201, description = "Booked"),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Overlaps an existing appointment")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(req): Json<BookingRequest>,
) -> Result<(StatusCode, Json<AppointmentView>), ApiError> {
    let created = state.booking.create(&state.db, &actor, req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppointmentView> {
    Ok(Json(appointment_service::get_appointment(&state.db, &actor, id).await?))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(input): Json<NotesUpdate>,
) -> ApiResult<AppointmentView> {
    Ok(Json(appointment_service::update_notes(&state.db, &actor, id, input.notes).await?))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    appointment_service::delete_appointment(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post, path = "/api/appointments/{id}/confirm", tag = "booking",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses((status = 200, description = "Confirmed"), (status = 409, description = "Not in booked state"))
)]
pub async fn confirm(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppointmentView> {
    Ok(Json(transitions::confirm(&state.db, &actor, id).await?))
}

#[utoipa::path(
    post, path = "/api/appointments/{id}/cancel", tag = "booking",
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses((status = 200, description = "Cancelled"), (status = 409, description = "Already terminal"))
)]
pub async fn cancel(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppointmentView> {
    Ok(Json(transitions::cancel(&state.db, &actor, id).await?))
}

pub async fn complete(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<AppointmentView> {
    Ok(Json(transitions::complete(&state.db, &actor, id).await?))
}
