use std::collections::HashMap;

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use models::appointment::{self, AppointmentStatus};
use models::{appointment_service, salon, salon_service};

use crate::errors::ServiceError;
use crate::permissions::{ensure, Action, Actor, Resource};

const POPULAR_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PopularService {
    pub service_id: Uuid,
    pub name: String,
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SalonAnalytics {
    pub total_appointments: u64,
    pub completed_appointments: u64,
    pub cancelled_appointments: u64,
    pub popular_services: Vec<PopularService>,
    pub total_revenue_cents: i64,
}

#[instrument(skip(db), fields(user_id = %actor.user_id))]
pub async fn salon_analytics(db: &DatabaseConnection, actor: &Actor, salon_id: Uuid) -> Result<SalonAnalytics, ServiceError> {
    let found = salon::Entity::find_by_id(salon_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("salon"))?;
    ensure(actor, &Resource::Salon { owner_id: found.owner_id }, Action::Analytics)?;

    let appointments = appointment::Entity::find()
        .filter(appointment::Column::SalonId.eq(salon_id))
        .all(db)
        .await?;

    let mut total = 0u64;
    let mut completed = 0u64;
    let mut cancelled = 0u64;
    let mut revenue = 0i64;
    let mut active_ids = Vec::new();
    for a in &appointments {
        match a.status()? {
            AppointmentStatus::Cancelled => cancelled += 1,
            status => {
                total += 1;
                active_ids.push(a.id);
                if status == AppointmentStatus::Completed {
                    completed += 1;
                    revenue += a.total_price_cents;
                }
            }
        }
    }

    let popular_services = if active_ids.is_empty() {
        Vec::new()
    } else {
        let links = appointment_service::Entity::find()
            .filter(appointment_service::Column::AppointmentId.is_in(active_ids))
            .all(db)
            .await?;
        let mut counts: HashMap<Uuid, u64> = HashMap::new();
        for link in &links {
            *counts.entry(link.service_id).or_default() += 1;
        }
        let services = salon_service::Entity::find()
            .filter(salon_service::Column::Id.is_in(counts.keys().copied().collect::<Vec<_>>()))
            .all(db)
            .await?;
        rank_services(services.into_iter().map(|s| {
            let count = counts.get(&s.id).copied().unwrap_or(0);
            PopularService { service_id: s.id, name: s.name, count }
        }))
    };

    Ok(SalonAnalytics {
        total_appointments: total,
        completed_appointments: completed,
        cancelled_appointments: cancelled,
        popular_services,
        total_revenue_cents: revenue,
    })
}

/// Count descending, then name ascending, at most five.
fn rank_services(items: impl Iterator<Item = PopularService>) -> Vec<PopularService> {
    let mut items: Vec<PopularService> = items.collect();
    items.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    items.truncate(POPULAR_LIMIT);
    items
}
