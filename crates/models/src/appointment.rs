use std::fmt;
use std::str::FromStr;

use sea_orm::{entity::prelude::*, sea_query::Expr, ConnectionTrait, QueryOrder, Set};
use uuid::Uuid;
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{appointment_service, errors, salon, salon_service, stylist, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appointment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub stylist_id: Uuid,
    pub salon_id: Uuid,
    pub date: Date,
    pub start_time: Time,
    pub end_time: Time,
    pub status: String,
    pub total_price_cents: i64,
    pub notes: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Customer,
    Stylist,
    Salon,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Customer => Entity::belongs_to(user::Entity).from(Column::CustomerId).to(user::Column::Id).into(),
            Relation::Stylist => Entity::belongs_to(stylist::Entity).from(Column::StylistId).to(stylist::Column::Id).into(),
            Relation::Salon => Entity::belongs_to(salon::Entity).from(Column::SalonId).to(salon::Column::Id).into(),
        }
    }
}

impl Related<stylist::Entity> for Entity {
    fn to() -> RelationDef { Relation::Stylist.def() }
}

impl Related<salon_service::Entity> for Entity {
    fn to() -> RelationDef { appointment_service::Relation::Service.def() }
    fn via() -> Option<RelationDef> { Some(appointment_service::Relation::Appointment.def().rev()) }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Booked,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Booked => "booked",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for AppointmentStatus {
    type Err = errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "booked" => Ok(AppointmentStatus::Booked),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "completed" => Ok(AppointmentStatus::Completed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(errors::ModelError::Validation(format!("unknown status '{other}'"))),
        }
    }
}

impl Model {
    pub fn status(&self) -> Result<AppointmentStatus, errors::ModelError> { self.status.parse() }
}

/// Row values for a new appointment; pricing and conflicts are settled by the caller.
#[derive(Clone, Debug)]
pub struct NewAppointment {
    pub customer_id: Uuid,
    pub stylist_id: Uuid,
    pub salon_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub total_price_cents: i64,
    pub notes: String,
}

pub async fn insert<C: ConnectionTrait>(db: &C, new: NewAppointment, service_ids: &[Uuid]) -> Result<Model, errors::ModelError> {
    if new.start_time >= new.end_time {
        return Err(errors::ModelError::Validation("start_time must be before end_time".into()));
    }
    if new.total_price_cents < 0 {
        return Err(errors::ModelError::Validation("total_price_cents must be >= 0".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(new.customer_id),
        stylist_id: Set(new.stylist_id),
        salon_id: Set(new.salon_id),
        date: Set(new.date),
        start_time: Set(new.start_time),
        end_time: Set(new.end_time),
        status: Set(AppointmentStatus::Booked.as_str().to_string()),
        total_price_cents: Set(new.total_price_cents),
        notes: Set(new.notes),
        created_at: Set(now),
        updated_at: Set(now),
    };
    let created = am.insert(db).await?;
    for service_id in service_ids {
        appointment_service::ActiveModel {
            appointment_id: Set(created.id),
            service_id: Set(*service_id),
        }
        .insert(db)
        .await?;
    }
    Ok(created)
}

/// Moves the appointment from `from` to `to` only if it is still in `from`.
/// Returns whether a row changed.
pub async fn compare_and_set_status<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    from: AppointmentStatus,
    to: AppointmentStatus,
) -> Result<bool, errors::ModelError> {
    let now: DateTimeWithTimeZone = Utc::now().into();
    let res = Entity::update_many()
        .col_expr(Column::Status, Expr::value(to.as_str()))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::Id.eq(id))
        .filter(Column::Status.eq(from.as_str()))
        .exec(db)
        .await?;
    Ok(res.rows_affected == 1)
}

pub async fn set_notes<C: ConnectionTrait>(db: &C, existing: Model, notes: String) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = existing.into();
    am.notes = Set(notes);
    am.updated_at = Set(Utc::now().into());
    Ok(am.update(db).await?)
}

/// Non-cancelled appointments of one stylist on one date, ordered by start.
pub async fn active_for_stylist_on<C: ConnectionTrait>(db: &C, stylist_id: Uuid, date: NaiveDate) -> Result<Vec<Model>, errors::ModelError> {
    Ok(Entity::find()
        .filter(Column::StylistId.eq(stylist_id))
        .filter(Column::Date.eq(date))
        .filter(Column::Status.ne(AppointmentStatus::Cancelled.as_str()))
        .order_by_asc(Column::StartTime)
        .all(db)
        .await?)
}

pub async fn service_ids<C: ConnectionTrait>(db: &C, appointment_id: Uuid) -> Result<Vec<Uuid>, errors::ModelError> {
    let links = appointment_service::Entity::find()
        .filter(appointment_service::Column::AppointmentId.eq(appointment_id))
        .all(db)
        .await?;
    Ok(links.into_iter().map(|l| l.service_id).collect())
}
