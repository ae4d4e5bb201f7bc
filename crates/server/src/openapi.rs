use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct SalonInputDoc {
    pub name: String,
    pub address: String,
    pub city: String,
    /// `^\+?1?\d{9,15}$`
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub country_code: String,
    pub description: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(ToSchema)]
pub struct BookingRequestDoc {
    pub stylist_id: Uuid,
    pub salon_id: Uuid,
    pub service_ids: Vec<Uuid>,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM:SS
    pub start_time: String,
    /// Defaults to start_time plus the summed service durations.
    pub end_time: Option<String>,
    pub notes: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::salons::list,
        crate::routes::salons::create,
        crate::routes::salons::get,
        crate::routes::salons::nearby,
        crate::routes::salons::salon_analytics,
        crate::routes::stylists::available_slots,
        crate::routes::appointments::list,
        crate::routes::appointments::create,
        crate::routes::appointments::confirm,
        crate::routes::appointments::cancel,
        crate::routes::admin::search,
        crate::routes::admin::dashboard,
    ),
    components(
        schemas(
            HealthResponse,
            SalonInputDoc,
            BookingRequestDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "salons"),
        (name = "booking"),
        (name = "search"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
