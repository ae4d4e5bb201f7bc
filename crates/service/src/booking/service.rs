use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseBackend, DatabaseConnection, EntityTrait, QueryFilter, QuerySelect,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use common::metrics::{APPOINTMENTS_BOOKED_TOTAL, BOOKING_CONFLICTS_TOTAL};
use models::{appointment, notification, salon, salon_service, stylist, user};

use super::locks::BookingLocks;
use super::schedule::{self, BusinessHours};
use crate::appointment_service::AppointmentView;
use crate::errors::ServiceError;
use crate::notifier::{BookingNotice, Notifier};
use crate::permissions::{ensure, Action, Actor, Resource};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BookingRequest {
    pub stylist_id: Uuid,
    pub salon_id: Uuid,
    pub service_ids: Vec<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// Defaults to `start_time` plus the summed service durations.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Books appointments without double-booking a stylist.
///
/// The overlap check and insert for one `(stylist, date)` run under an
/// in-process lock and inside a transaction that locks the stylist row,
/// so concurrent requests for the same slot produce one appointment.
pub struct BookingService {
    notifier: Arc<dyn Notifier>,
    locks: BookingLocks,
    hours: BusinessHours,
}

impl BookingService {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier, locks: BookingLocks::new(), hours: BusinessHours::default() }
    }

    #[instrument(skip(self, db, req), fields(user_id = %actor.user_id, stylist_id = %req.stylist_id, date = %req.date))]
    pub async fn create(&self, db: &DatabaseConnection, actor: &Actor, req: BookingRequest) -> Result<AppointmentView, ServiceError> {
        let found_salon = salon::Entity::find_by_id(req.salon_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("salon"))?;
        let found_stylist = stylist::Entity::find_by_id(req.stylist_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("stylist"))?;
        ensure(
            actor,
            &Resource::Appointment {
                customer_id: actor.user_id,
                stylist_user_id: found_stylist.user_id,
                salon_owner_id: found_salon.owner_id,
            },
            Action::Create,
        )?;
        if found_stylist.salon_id != found_salon.id {
            return Err(ServiceError::Validation("stylist does not work at this salon".into()));
        }

        let mut service_ids = req.service_ids.clone();
        service_ids.sort();
        service_ids.dedup();
        if service_ids.is_empty() {
            return Err(ServiceError::Validation("at least one service is required".into()));
        }
        let services = salon_service::Entity::find()
            .filter(salon_service::Column::Id.is_in(service_ids.clone()))
            .all(db)
            .await?;
        if services.len() != service_ids.len() {
            return Err(ServiceError::not_found("service"));
        }
        if services.iter().any(|s| s.salon_id != found_salon.id) {
            return Err(ServiceError::Validation("service is not offered by this salon".into()));
        }

        let total_minutes: i64 = services.iter().map(|s| i64::from(s.duration_minutes)).sum();
        let total_price_cents: i64 = services.iter().map(|s| s.price_cents).sum();
        let end_time = match req.end_time {
            Some(end) => end,
            None => schedule::end_after(req.start_time, total_minutes)?,
        };
        if req.start_time >= end_time {
            return Err(ServiceError::Validation("start_time must be before end_time".into()));
        }

        let created = {
            let _guard = self.locks.acquire(found_stylist.id, req.date).await;
            let txn = db.begin().await?;
            lock_stylist_row(&txn, found_stylist.id).await?;

            let existing = appointment::active_for_stylist_on(&txn, found_stylist.id, req.date).await?;
            if let Some(clash) = existing
                .iter()
                .find(|a| schedule::overlaps(req.start_time, end_time, a.start_time, a.end_time))
            {
                BOOKING_CONFLICTS_TOTAL.inc();
                warn!(conflicting_id = %clash.id, start = %req.start_time, end = %end_time, "booking_conflict");
                return Err(ServiceError::Conflict(format!(
                    "stylist already booked from {} to {}",
                    schedule::label(clash.start_time),
                    schedule::label(clash.end_time)
                )));
            }

            let created = appointment::insert(
                &txn,
                appointment::NewAppointment {
                    customer_id: actor.user_id,
                    stylist_id: found_stylist.id,
                    salon_id: found_salon.id,
                    date: req.date,
                    start_time: req.start_time,
                    end_time,
                    total_price_cents,
                    notes: req.notes.clone().unwrap_or_default(),
                },
                &service_ids,
            )
            .await?;
            txn.commit().await?;
            created
        };

        APPOINTMENTS_BOOKED_TOTAL.inc();
        info!(appointment_id = %created.id, total_price_cents, "appointment_booked");

        self.announce(db, &created, &found_salon, &found_stylist).await;
        Ok(AppointmentView { appointment: created, service_ids })
    }

    /// Inbox rows plus outbound notice. Failures here never undo the booking.
    async fn announce(&self, db: &DatabaseConnection, appt: &appointment::Model, found_salon: &salon::Model, found_stylist: &stylist::Model) {
        let customer = match user::Entity::find_by_id(appt.customer_id).one(db).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, "customer lookup for notice failed");
                None
            }
        };

        let mut notice = BookingNotice {
            appointment_id: appt.id,
            salon_name: found_salon.name.clone(),
            stylist_name: found_stylist.name.clone(),
            date: appt.date,
            start_time: appt.start_time,
            recipients: Vec::new(),
        };
        notice.recipients.extend(customer.map(|c| c.email));
        notice.recipients.extend(found_stylist.email.clone());

        let message = notice.message();
        let inbox = std::iter::once(appt.customer_id).chain(found_stylist.user_id);
        for user_id in inbox {
            if let Err(e) = notification::create(db, user_id, &message).await {
                warn!(%user_id, error = %e, "notification insert failed");
            }
        }

        if let Err(e) = self.notifier.appointment_booked(&notice).await {
            warn!(appointment_id = %appt.id, error = %e, "booking notice delivery failed");
        }
    }

    /// Free start times for a stylist on a date, as `HH:MM` labels.
    #[instrument(skip(self, db))]
    pub async fn available_slots(&self, db: &DatabaseConnection, stylist_id: Uuid, date: NaiveDate) -> Result<Vec<String>, ServiceError> {
        stylist::Entity::find_by_id(stylist_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("stylist"))?;
        let booked: Vec<NaiveTime> = appointment::active_for_stylist_on(db, stylist_id, date)
            .await?
            .into_iter()
            .map(|a| a.start_time)
            .collect();
        Ok(self.hours.free_slots(&booked).map(schedule::label).collect())
    }
}

/// `SELECT ... FOR UPDATE` on the stylist where the backend has row locks.
async fn lock_stylist_row<C: ConnectionTrait>(txn: &C, stylist_id: Uuid) -> Result<(), ServiceError> {
    let query = stylist::Entity::find_by_id(stylist_id);
    let found = match txn.get_database_backend() {
        DatabaseBackend::Sqlite => query.one(txn).await?,
        _ => query.lock_exclusive().one(txn).await?,
    };
    found.map(|_| ()).ok_or_else(|| ServiceError::not_found("stylist"))
}
