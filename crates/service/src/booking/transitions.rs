use sea_orm::{DatabaseConnection, EntityTrait};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use common::metrics::APPOINTMENT_TRANSITIONS_TOTAL;
use models::appointment::{self, AppointmentStatus};

use crate::appointment_service::{load_with_resource, AppointmentView};
use crate::errors::ServiceError;
use crate::permissions::{ensure, Action, Actor};

/// Target state of `action` from `current`, or a conflict when the
/// state machine has no such edge.
pub fn next_status(current: AppointmentStatus, action: Action) -> Result<AppointmentStatus, ServiceError> {
    use AppointmentStatus::*;
    match (current, action) {
        (Booked, Action::Confirm) => Ok(Confirmed),
        (Booked | Confirmed, Action::Cancel) => Ok(Cancelled),
        (Confirmed, Action::Complete) => Ok(Completed),
        _ => Err(ServiceError::Conflict(format!(
            "cannot {} a {} appointment",
            format!("{action:?}").to_lowercase(),
            current
        ))),
    }
}

pub async fn confirm(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<AppointmentView, ServiceError> {
    transition(db, actor, id, Action::Confirm).await
}

pub async fn cancel(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<AppointmentView, ServiceError> {
    transition(db, actor, id, Action::Cancel).await
}

pub async fn complete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<AppointmentView, ServiceError> {
    transition(db, actor, id, Action::Complete).await
}

#[instrument(skip(db), fields(user_id = %actor.user_id))]
async fn transition(db: &DatabaseConnection, actor: &Actor, id: Uuid, action: Action) -> Result<AppointmentView, ServiceError> {
    let (appt, resource) = load_with_resource(db, id).await?;
    ensure(actor, &resource, action)?;

    let current = appt.status()?;
    let target = next_status(current, action)?;
    if !appointment::compare_and_set_status(db, id, current, target).await? {
        warn!(appointment_id = %id, from = %current, "appointment_status_race");
        return Err(ServiceError::Conflict("appointment changed concurrently".into()));
    }
    APPOINTMENT_TRANSITIONS_TOTAL.with_label_values(&[target.as_str()]).inc();
    info!(appointment_id = %id, from = %current, to = %target, "appointment_status_changed");

    let updated = appointment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("appointment"))?;
    let service_ids = appointment::service_ids(db, id).await?;
    Ok(AppointmentView { appointment: updated, service_ids })
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus::*;

    #[test]
    fn state_machine_edges() {
        assert_eq!(next_status(Booked, Action::Confirm).unwrap(), Confirmed);
        assert_eq!(next_status(Booked, Action::Cancel).unwrap(), Cancelled);
        assert_eq!(next_status(Confirmed, Action::Cancel).unwrap(), Cancelled);
        assert_eq!(next_status(Confirmed, Action::Complete).unwrap(), Completed);
    }

    #[test]
    fn terminal_and_missing_edges_conflict() {
        for action in [Action::Confirm, Action::Cancel, Action::Complete] {
            assert!(matches!(next_status(Cancelled, action), Err(ServiceError::Conflict(_))));
            assert!(matches!(next_status(Completed, action), Err(ServiceError::Conflict(_))));
        }
        assert!(matches!(next_status(Booked, Action::Complete), Err(ServiceError::Conflict(_))));
        assert!(matches!(next_status(Confirmed, Action::Confirm), Err(ServiceError::Conflict(_))));
    }
}
