//! Blogs, static pages, FAQs, promotions, coupons and the contact form.
//! Writes are admin-only; coupons are not readable by anyone else either.
use axum::{extract::State, http::StatusCode, Extension};
use uuid::Uuid;

use common::pagination::Pagination;
use common::types::Page;
use models::{blog, coupon, faq, promotion, static_page};
use service::blog_service::{self, BlogInput};
use service::contact_service::{self, ContactAck, ContactForm};
use service::permissions::Actor;
use service::coupon_service::{self, CouponFilter};
use service::{page_service, promotion_service};

use crate::auth::ServerState;
use crate::errors::{ApiError, ApiResult};
use crate::extract::{Json, Path, Query};

pub async fn list_blogs(State(state): State<ServerState>, Query(opts): Query<Pagination>) -> ApiResult<Page<blog::Model>> {
    Ok(Json(blog_service::list_blogs(&state.db, opts).await?))
}

pub async fn create_blog(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(input): Json<BlogInput>,
) -> Result<(StatusCode, Json<blog::Model>), ApiError> {
    let created = blog_service::create_blog(&state.db, &actor, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_blog(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<blog::Model> {
    Ok(Json(blog_service::get_blog(&state.db, id).await?))
}

pub async fn update_blog(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(input): Json<BlogInput>,
) -> ApiResult<blog::Model> {
    Ok(Json(blog_service::update_blog(&state.db, &actor, id, input).await?))
}

pub async fn delete_blog(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    blog_service::delete_blog(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_pages(State(state): State<ServerState>, Query(opts): Query<Pagination>) -> ApiResult<Page<static_page::Model>> {
    Ok(Json(page_service::list_pages(&state.db, opts).await?))
}

pub async fn create_page(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(fields): Json<static_page::PageFields>,
) -> Result<(StatusCode, Json<static_page::Model>), ApiError> {
    let created = page_service::create_page(&state.db, &actor, fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_page(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<static_page::Model> {
    Ok(Json(page_service::get_page(&state.db, id).await?))
}

pub async fn get_page_by_slug(State(state): State<ServerState>, Path(slug): Path<String>) -> ApiResult<static_page::Model> {
    Ok(Json(page_service::get_page_by_slug(&state.db, &slug).await?))
}

pub async fn update_page(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(fields): Json<static_page::PageFields>,
) -> ApiResult<static_page::Model> {
    Ok(Json(page_service::update_page(&state.db, &actor, id, fields).await?))
}

pub async fn delete_page(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    page_service::delete_page(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_faqs(State(state): State<ServerState>, Query(opts): Query<Pagination>) -> ApiResult<Page<faq::Model>> {
    Ok(Json(page_service::list_faqs(&state.db, opts).await?))
}

pub async fn create_faq(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(fields): Json<faq::FaqFields>,
) -> Result<(StatusCode, Json<faq::Model>), ApiError> {
    let created = page_service::create_faq(&state.db, &actor, fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_faq(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<faq::Model> {
    Ok(Json(page_service::get_faq(&state.db, id).await?))
}

pub async fn delete_faq(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    page_service::delete_faq(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn contact(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(form): Json<ContactForm>,
) -> ApiResult<ContactAck> {
    Ok(Json(contact_service::submit(state.notifier.as_ref(), &actor, form).await?))
}

pub async fn list_promotions(State(state): State<ServerState>, Query(opts): Query<Pagination>) -> ApiResult<Page<promotion::Model>> {
    Ok(Json(promotion_service::list_promotions(&state.db, opts).await?))
}

pub async fn create_promotion(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(fields): Json<promotion::PromotionFields>,
) -> Result<(StatusCode, Json<promotion::Model>), ApiError> {
    let created = promotion_service::create_promotion(&state.db, &actor, fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_promotion(State(state): State<ServerState>, Path(id): Path<Uuid>) -> ApiResult<promotion::Model> {
    Ok(Json(promotion_service::get_promotion(&state.db, id).await?))
}

pub async fn update_promotion(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(fields): Json<promotion::PromotionFields>,
) -> ApiResult<promotion::Model> {
    Ok(Json(promotion_service::update_promotion(&state.db, &actor, id, fields).await?))
}

pub async fn delete_promotion(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    promotion_service::delete_promotion(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_coupons(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Query(filter): Query<CouponFilter>,
    Query(opts): Query<Pagination>,
) -> ApiResult<Page<coupon::Model>> {
    Ok(Json(coupon_service::list_coupons(&state.db, &actor, filter, opts).await?))
}

pub async fn create_coupon(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Json(fields): Json<coupon::CouponFields>,
) -> Result<(StatusCode, Json<coupon::Model>), ApiError> {
    let created = coupon_service::create_coupon(&state.db, &actor, fields).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn get_coupon(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> ApiResult<coupon::Model> {
    Ok(Json(coupon_service::get_coupon(&state.db, &actor, id).await?))
}

pub async fn update_coupon(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(fields): Json<coupon::CouponFields>,
) -> ApiResult<coupon::Model> {
    Ok(Json(coupon_service::update_coupon(&state.db, &actor, id, fields).await?))
}

pub async fn delete_coupon(
    State(state): State<ServerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    coupon_service::delete_coupon(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
