//! Notifications, reports, search and the super-admin dashboard.
use axum::{extract::State, http::StatusCode, Extension};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::pagination::Pagination;
use common::types::Page;
use models::notification;
use service::dashboard_service::{self, DashboardCounts};
use service::permissions::Actor;
use service::report_service::{self, AppointmentStatusCount, SalonReportRow, StylistReportRow};
use service::search_service::{self, SearchResults};
use service::notification_service;

use crate::auth::ServerState;
use crate::errors::{ApiError, ApiResult};
use crate::extract::{Json, Path, Query};

#[derive(Debug, Deserialize)]
pub struct Broadcast {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct BroadcastResult {
    pub sent: u64,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn list_notifications(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Query(opts): Query<Pagination>,
) -> ApiResult<Page<notification::Model>> {
    Ok(Json(notification_service::list_own(&state.db, &actor, opts).await?))
}

pub async fn broadcast(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<Broadcast>,
) -> Result<(StatusCode, Json<BroadcastResult>), ApiError> {
    let sent = notification_service::broadcast(&state.db, &actor, &input.message).await?;
    Ok((StatusCode::CREATED, Json(BroadcastResult { sent })))
}

pub async fn mark_read(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<notification::Model> {
    Ok(Json(notification_service::mark_read(&state.db, &actor, id).await?))
}

pub async fn salon_report(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> ApiResult<Vec<SalonReportRow>> {
    Ok(Json(report_service::salon_report(&state.db, &actor).await?))
}

pub async fn stylist_report(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> ApiResult<Vec<StylistReportRow>> {
    Ok(Json(report_service::stylist_report(&state.db, &actor).await?))
}

pub async fn appointment_report(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
) -> ApiResult<Vec<AppointmentStatusCount>> {
    Ok(Json(report_service::appointment_report(&state.db, &actor).await?))
}

#[utoipa::path(
    get, path = "/api/search", tag = "search",
    params(SearchQuery),
    responses((status = 200, description = "Matching salons, stylists and services"), (status = 400, description = "Empty query"))
)]
pub async fn search(State(state): State<ServerState>, Query(q): Query<SearchQuery>) -> ApiResult<SearchResults> {
    Ok(Json(search_service::search(&state.db, &q.q).await?))
}

#[utoipa::path(
    get, path = "/api/super-admin-dashboard", tag = "admin",
    responses((status = 200, description = "Counts of users, salons and appointments"), (status = 403, description = "Forbidden"))
)]
pub async fn dashboard(State(state): State<ServerState>, Extension(actor): Extension<Actor>) -> ApiResult<DashboardCounts> {
    Ok(Json(dashboard_service::super_admin_dashboard(&state.db, &actor).await?))
}
