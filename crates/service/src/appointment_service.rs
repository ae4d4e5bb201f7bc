use chrono::NaiveDate;
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use common::pagination::Pagination;
use common::types::Page;
use models::appointment::{self, AppointmentStatus};
use models::{salon, stylist};

use crate::errors::ServiceError;
use crate::fetch_page;
use crate::permissions::{authorize, ensure, Action, Actor, Decision, Resource};

/// An appointment together with the services it books.
#[derive(Clone, Debug, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: appointment::Model,
    pub service_ids: Vec<Uuid>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub date: Option<NaiveDate>,
    pub stylist_id: Option<Uuid>,
}

/// The appointment and the ownership facts permission checks need.
pub(crate) async fn load_with_resource(db: &DatabaseConnection, id: Uuid) -> Result<(appointment::Model, Resource), ServiceError> {
    let appt = appointment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("appointment"))?;
    let stylist_user_id = stylist::Entity::find_by_id(appt.stylist_id).one(db).await?.and_then(|s| s.user_id);
    let salon_owner_id = salon::Entity::find_by_id(appt.salon_id).one(db).await?.and_then(|s| s.owner_id);
    let resource = Resource::Appointment { customer_id: appt.customer_id, stylist_user_id, salon_owner_id };
    Ok((appt, resource))
}

async fn view(db: &DatabaseConnection, appt: appointment::Model) -> Result<AppointmentView, ServiceError> {
    let service_ids = appointment::service_ids(db, appt.id).await?;
    Ok(AppointmentView { appointment: appt, service_ids })
}

pub async fn get_appointment(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<AppointmentView, ServiceError> {
    let (appt, resource) = load_with_resource(db, id).await?;
    ensure(actor, &resource, Action::Read)?;
    view(db, appt).await
}

/// Appointments the actor may see: all for staff, otherwise those where the
/// actor is the customer, the stylist's user or the salon's owner.
#[instrument(skip(db, filter), fields(user_id = %actor.user_id))]
pub async fn list_appointments(
    db: &DatabaseConnection,
    actor: &Actor,
    filter: AppointmentFilter,
    opts: Pagination,
) -> Result<Page<AppointmentView>, ServiceError> {
    let mut query = appointment::Entity::find();
    if !actor.role.is_staff() {
        let own_stylists: Vec<Uuid> = stylist::Entity::find()
            .filter(stylist::Column::UserId.eq(actor.user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        let own_salons: Vec<Uuid> = salon::Entity::find()
            .filter(salon::Column::OwnerId.eq(actor.user_id))
            .all(db)
            .await?
            .into_iter()
            .map(|s| s.id)
            .collect();
        let mut visible = Condition::any().add(appointment::Column::CustomerId.eq(actor.user_id));
        if !own_stylists.is_empty() {
            visible = visible.add(appointment::Column::StylistId.is_in(own_stylists));
        }
        if !own_salons.is_empty() {
            visible = visible.add(appointment::Column::SalonId.is_in(own_salons));
        }
        query = query.filter(visible);
    }
    if let Some(status) = filter.status {
        query = query.filter(appointment::Column::Status.eq(status.as_str()));
    }
    if let Some(date) = filter.date {
        query = query.filter(appointment::Column::Date.eq(date));
    }
    if let Some(stylist_id) = filter.stylist_id {
        query = query.filter(appointment::Column::StylistId.eq(stylist_id));
    }
    let query = query
        .order_by_asc(appointment::Column::Date)
        .order_by_asc(appointment::Column::StartTime);

    let page = fetch_page(db, query, opts).await?;
    let mut items = Vec::with_capacity(page.items.len());
    for appt in page.items {
        items.push(view(db, appt).await?);
    }
    Ok(Page { items, page: page.page, per_page: page.per_page, total: page.total })
}

/// Notes are the only field editable after booking, and only while the
/// appointment is still open.
#[instrument(skip(db, notes), fields(user_id = %actor.user_id))]
pub async fn update_notes(db: &DatabaseConnection, actor: &Actor, id: Uuid, notes: String) -> Result<AppointmentView, ServiceError> {
    let (appt, resource) = load_with_resource(db, id).await?;
    ensure(actor, &resource, Action::Update)?;
    let status = appt.status()?;
    if status.is_terminal() {
        return Err(ServiceError::Conflict(format!("cannot edit a {status} appointment")));
    }
    let updated = appointment::set_notes(db, appt, notes).await?;
    view(db, updated).await
}

pub async fn delete_appointment(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let (_, resource) = load_with_resource(db, id).await?;
    ensure(actor, &resource, Action::Delete)?;
    appointment::Entity::delete_by_id(id).exec(db).await?;
    info!(appointment_id = %id, "appointment_deleted");
    Ok(())
}

/// A stylist's schedule ordered by date and start time.
pub async fn stylist_appointments(db: &DatabaseConnection, actor: &Actor, stylist_id: Uuid) -> Result<Vec<AppointmentView>, ServiceError> {
    let found = stylist::Entity::find_by_id(stylist_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("stylist"))?;
    let salon_owner_id = salon::Entity::find_by_id(found.salon_id).one(db).await?.and_then(|s| s.owner_id);

    let rows = appointment::Entity::find()
        .filter(appointment::Column::StylistId.eq(stylist_id))
        .order_by_asc(appointment::Column::Date)
        .order_by_asc(appointment::Column::StartTime)
        .all(db)
        .await?;
    let mut out = Vec::new();
    for appt in rows {
        let resource = Resource::Appointment { customer_id: appt.customer_id, stylist_user_id: found.user_id, salon_owner_id };
        if authorize(actor, &resource, Action::Read) == Decision::Allow {
            out.push(view(db, appt).await?);
        }
    }
    Ok(out)
}
