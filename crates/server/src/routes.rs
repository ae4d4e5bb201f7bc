pub mod admin;
pub mod appointments;
pub mod catalog;
pub mod content;
pub mod salons;
pub mod stylists;

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::{metrics::encode_metrics, types::Health};

use crate::auth::{self, ServerState};
use crate::openapi::ApiDoc;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> impl IntoResponse {
    encode_metrics()
}

fn api_routes() -> Router<ServerState> {
    Router::new()
        .route("/api/salons", get(salons::list).post(salons::create))
        .route("/api/salons/nearby", get(salons::nearby))
        .route("/api/salons/top-rated", get(salons::top_rated))
        .route("/api/salons/recommended", get(salons::top_rated))
        .route("/api/salons/with-stylists", post(salons::create_with_stylists))
        .route("/api/salons/:id", get(salons::get).put(salons::update).delete(salons::delete))
        .route("/api/salons/:id/stylists", get(salons::stylists))
        .route("/api/salons/:id/analytics", get(salons::salon_analytics))
        .route("/api/salons/:id/claim", post(salons::claim))
        .route("/api/stylists", get(stylists::list).post(stylists::create))
        .route("/api/stylists/:id", get(stylists::get).put(stylists::update).delete(stylists::delete))
        .route("/api/stylists/:id/appointments", get(stylists::appointments))
        .route("/api/stylists/:id/available-slots", get(stylists::available_slots))
        .route("/api/stylists/:id/claim", post(stylists::claim))
        .route("/api/services", get(catalog::list_services).post(catalog::create_service))
        .route(
            "/api/services/:id",
            get(catalog::get_service).put(catalog::update_service).delete(catalog::delete_service),
        )
        .route("/api/appointments", get(appointments::list).post(appointments::create))
        .route(
            "/api/appointments/:id",
            get(appointments::get).put(appointments::update).delete(appointments::delete),
        )
        .route("/api/appointments/:id/confirm", post(appointments::confirm))
        .route("/api/appointments/:id/cancel", post(appointments::cancel))
        .route("/api/appointments/:id/complete", post(appointments::complete))
        .route("/api/reviews", get(catalog::list_reviews).post(catalog::create_review))
        .route(
            "/api/reviews/:id",
            get(catalog::get_review).put(catalog::update_review).delete(catalog::delete_review),
        )
        .route("/api/blogs", get(content::list_blogs).post(content::create_blog))
        .route(
            "/api/blogs/:id",
            get(content::get_blog).put(content::update_blog).delete(content::delete_blog),
        )
        .route("/api/pages", get(content::list_pages).post(content::create_page))
        .route("/api/pages/slug/:slug", get(content::get_page_by_slug))
        .route(
            "/api/pages/:id",
            get(content::get_page).put(content::update_page).delete(content::delete_page),
        )
        .route("/api/faqs", get(content::list_faqs).post(content::create_faq))
        .route("/api/faqs/:id", get(content::get_faq).delete(content::delete_faq))
        .route("/api/contact", post(content::contact))
        .route("/api/coupons", get(content::list_coupons).post(content::create_coupon))
        .route(
            "/api/coupons/:id",
            get(content::get_coupon).put(content::update_coupon).delete(content::delete_coupon),
        )
        .route("/api/promotions", get(content::list_promotions).post(content::create_promotion))
        .route(
            "/api/promotions/:id",
            get(content::get_promotion).put(content::update_promotion).delete(content::delete_promotion),
        )
        .route("/api/notifications", get(admin::list_notifications).post(admin::broadcast))
        .route("/api/notifications/:id/read", post(admin::mark_read))
        .route("/api/reports/salons", get(admin::salon_report))
        .route("/api/reports/stylists", get(admin::stylist_report))
        .route("/api/reports/appointments", get(admin::appointment_report))
        .route("/api/search", get(admin::search))
        .route("/api/super-admin-dashboard", get(admin::dashboard))
}

/// Build the full application router: public probes and docs, and the
/// token-protected `/api` surface.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    let api = api_routes().route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    public
        .merge(api)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
