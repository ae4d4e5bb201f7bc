//! Admin reports over salons, stylists and appointments.
use std::collections::BTreeMap;

use uuid::Uuid;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use serde::Serialize;

use models::appointment::{self, AppointmentStatus};
use models::{salon, stylist};

use crate::errors::ServiceError;
use crate::permissions::{ensure, Action, Actor, Resource};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SalonReportRow {
    pub id: Uuid,
    pub name: String,
    pub stylist_count: u64,
    pub avg_rating: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StylistReportRow {
    pub id: Uuid,
    pub name: String,
    pub appointment_count: u64,
    pub years_of_experience: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AppointmentStatusCount {
    pub status: AppointmentStatus,
    pub count: u64,
}

fn tally<I: IntoIterator<Item = Uuid>>(ids: I) -> BTreeMap<Uuid, u64> {
    let mut counts = BTreeMap::new();
    for id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

pub async fn salon_report(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<SalonReportRow>, ServiceError> {
    ensure(actor, &Resource::Report, Action::Read)?;
    let salons = salon::Entity::find().order_by_asc(salon::Column::Name).all(db).await?;
    let counts = tally(stylist::Entity::find().all(db).await?.into_iter().map(|s| s.salon_id));
    Ok(salons
        .into_iter()
        .map(|s| SalonReportRow {
            stylist_count: counts.get(&s.id).copied().unwrap_or(0),
            id: s.id,
            name: s.name,
            avg_rating: s.rating,
        })
        .collect())
}

pub async fn stylist_report(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<StylistReportRow>, ServiceError> {
    ensure(actor, &Resource::Report, Action::Read)?;
    let stylists = stylist::Entity::find().order_by_asc(stylist::Column::Name).all(db).await?;
    let counts = tally(appointment::Entity::find().all(db).await?.into_iter().map(|a| a.stylist_id));
    Ok(stylists
        .into_iter()
        .map(|s| StylistReportRow {
            appointment_count: counts.get(&s.id).copied().unwrap_or(0),
            id: s.id,
            name: s.name,
            years_of_experience: s.years_of_experience,
        })
        .collect())
}

/// One row per status, zero counts included.
pub async fn appointment_report(db: &DatabaseConnection, actor: &Actor) -> Result<Vec<AppointmentStatusCount>, ServiceError> {
    ensure(actor, &Resource::Report, Action::Read)?;
    let all = appointment::Entity::find().all(db).await?;
    let mut rows: Vec<AppointmentStatusCount> = [
        AppointmentStatus::Booked,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ]
    .into_iter()
    .map(|status| AppointmentStatusCount { status, count: 0 })
    .collect();
    for a in &all {
        let status = a.status()?;
        if let Some(row) = rows.iter_mut().find(|r| r.status == status) {
            row.count += 1;
        }
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveTime};
    use models::user::Role;

    use super::*;
    use crate::booking::{transitions, BookingRequest, BookingService};
    use crate::notifier::mock::RecordingNotifier;
    use crate::test_support::{actor, fixture, get_db};

    #[tokio::test]
    async fn reports_count_per_salon_stylist_and_status() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        let fx = fixture(&db).await?;
        let admin = actor(&db, Role::Admin).await?;
        let customer = actor(&db, Role::Customer).await?;
        let booking = BookingService::new(Arc::new(RecordingNotifier::default()));

        let req = BookingRequest {
            stylist_id: fx.stylist.id,
            salon_id: fx.salon.id,
            service_ids: vec![fx.cut.id],
            date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: None,
            notes: None,
        };
        let first = booking.create(&db, &customer, req.clone()).await?;
        let later = BookingRequest { start_time: NaiveTime::from_hms_opt(13, 0, 0).unwrap(), ..req };
        booking.create(&db, &customer, later).await?;
        transitions::cancel(&db, &customer, first.appointment.id).await?;

        let salons = salon_report(&db, &admin).await?;
        assert_eq!(salons.len(), 1);
        assert_eq!(salons[0].stylist_count, 1);

        let stylists = stylist_report(&db, &admin).await?;
        assert_eq!(stylists[0].appointment_count, 2);
        assert_eq!(stylists[0].years_of_experience, 4);

        let statuses = appointment_report(&db, &admin).await?;
        let counts: Vec<u64> = statuses.iter().map(|r| r.count).collect();
        assert_eq!(counts, [1, 0, 0, 1]);

        assert_eq!(salon_report(&db, &fx.owner).await.unwrap_err().kind(), "forbidden");
        Ok(())
    }
}
