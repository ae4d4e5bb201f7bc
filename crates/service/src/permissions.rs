//! Capability checks: `authorize(actor, resource, action)`.
//!
//! Resources carry only the ownership facts a rule needs, so callers load
//! those facts first and the rules stay pure.

use uuid::Uuid;

use models::user::Role;

use crate::errors::ServiceError;

/// The authenticated caller of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role) -> Self { Self { user_id, role } }

    fn is(&self, id: Option<Uuid>) -> bool { id == Some(self.user_id) }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Claim,
    Analytics,
    Confirm,
    Cancel,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resource {
    Salon { owner_id: Option<Uuid> },
    Stylist { salon_owner_id: Option<Uuid>, user_id: Option<Uuid> },
    Service { salon_owner_id: Option<Uuid> },
    Appointment { customer_id: Uuid, stylist_user_id: Option<Uuid>, salon_owner_id: Option<Uuid> },
    Review { author_id: Option<Uuid> },
    Blog,
    StaticPage,
    Faq,
    /// `Create` is a contact-form submission.
    Contact,
    Coupon,
    Promotion,
    /// `Create` is an admin broadcast to every user.
    Notification { recipient_id: Option<Uuid> },
    Report,
    Dashboard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

pub fn authorize(actor: &Actor, resource: &Resource, action: Action) -> Decision {
    use Action::*;

    if let Resource::Dashboard = resource {
        return decide(actor.role == Role::SuperAdmin);
    }
    if actor.role.is_staff() {
        return Decision::Allow;
    }

    let allowed = match (resource, action) {
        (Resource::Salon { .. }, Read) => true,
        (Resource::Salon { .. }, Create | Claim) => actor.role == Role::SalonOwner,
        (Resource::Salon { owner_id }, Update | Delete | Analytics) => actor.is(*owner_id),

        (Resource::Stylist { .. }, Read) => true,
        (Resource::Stylist { salon_owner_id, .. }, Create | Delete) => actor.is(*salon_owner_id),
        (Resource::Stylist { salon_owner_id, user_id }, Update) => actor.is(*salon_owner_id) || actor.is(*user_id),
        (Resource::Stylist { .. }, Claim) => actor.role == Role::Stylist,

        (Resource::Service { .. }, Read) => true,
        (Resource::Service { salon_owner_id }, Create | Update | Delete) => actor.is(*salon_owner_id),

        (Resource::Appointment { .. }, Create) => actor.role == Role::Customer,
        (Resource::Appointment { customer_id, stylist_user_id, salon_owner_id }, Read) => {
            actor.user_id == *customer_id || actor.is(*stylist_user_id) || actor.is(*salon_owner_id)
        }
        (Resource::Appointment { stylist_user_id, salon_owner_id, .. }, Confirm | Complete) => {
            actor.is(*stylist_user_id) || actor.is(*salon_owner_id)
        }
        (Resource::Appointment { customer_id, salon_owner_id, .. }, Cancel) => {
            actor.user_id == *customer_id || actor.is(*salon_owner_id)
        }
        (Resource::Appointment { customer_id, .. }, Update) => actor.user_id == *customer_id,

        (Resource::Review { .. }, Read) => true,
        (Resource::Review { .. }, Create) => actor.role == Role::Customer,
        (Resource::Review { author_id }, Update | Delete) => actor.is(*author_id),

        (Resource::Blog | Resource::StaticPage | Resource::Faq | Resource::Promotion, Read) => true,
        (Resource::Contact, Create) => true,

        (Resource::Notification { recipient_id }, Read | Update) => actor.is(*recipient_id),

        _ => false,
    };
    decide(allowed)
}

fn decide(allowed: bool) -> Decision {
    if allowed { Decision::Allow } else { Decision::Deny }
}

/// `authorize` as a `Result`, for use with `?`.
pub fn ensure(actor: &Actor, resource: &Resource, action: Action) -> Result<(), ServiceError> {
    match authorize(actor, resource, action) {
        Decision::Allow => Ok(()),
        Decision::Deny => {
            tracing::debug!(user_id = %actor.user_id, role = %actor.role, ?resource, ?action, "permission_denied");
            Err(ServiceError::Forbidden(format!("{} may not {:?} this resource", actor.role, action).to_lowercase()))
        }
    }
}
