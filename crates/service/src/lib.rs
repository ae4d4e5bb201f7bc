//! Service layer providing business operations on top of models.
//! - Every operation takes the calling `Actor` and checks it through `permissions`.
//! - Reuses validation and entity definitions in the `models` crate.
//! - Booking keeps the conflict check and insert serialized per stylist and date.

pub mod errors;
pub mod permissions;
pub mod notifier;
pub mod booking;
pub mod appointment_service;
pub mod salon_service;
pub mod stylist_service;
pub mod catalog_service;
pub mod review_service;
pub mod blog_service;
pub mod page_service;
pub mod contact_service;
pub mod coupon_service;
pub mod promotion_service;
pub mod notification_service;
pub mod report_service;
pub mod search_service;
pub mod dashboard_service;
pub mod user_service;
pub mod geo;
#[cfg(test)]
pub mod test_support;

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Select};

use common::pagination::Pagination;
use common::types::Page;

use crate::errors::ServiceError;

/// Run `select` for one page and count the full result set.
pub(crate) async fn fetch_page<E>(db: &DatabaseConnection, select: Select<E>, opts: Pagination) -> Result<Page<E::Model>, ServiceError>
where
    E: EntityTrait,
    E::Model: Sync + 'static,
{
    let (page_idx, per_page) = opts.normalize();
    let paginator = select.paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page_idx).await?;
    let (page, per_page) = opts.effective();
    Ok(Page { items, page, per_page, total })
}
