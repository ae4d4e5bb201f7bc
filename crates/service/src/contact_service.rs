use serde::{Deserialize, Serialize};
use tracing::{error, info};

use models::user::{validate_email, validate_name};

use crate::errors::ServiceError;
use crate::notifier::{ContactMessage, Notifier};
use crate::permissions::{ensure, Action, Actor, Resource};

#[derive(Clone, Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ContactAck {
    pub message: &'static str,
}

/// Validate the form and hand it to the notifier. Delivery failures are
/// reported to the caller.
pub async fn submit(notifier: &dyn Notifier, actor: &Actor, form: ContactForm) -> Result<ContactAck, ServiceError> {
    ensure(actor, &Resource::Contact, Action::Create)?;
    validate_name(&form.name)?;
    validate_email(&form.email)?;
    if form.message.trim().is_empty() {
        return Err(ServiceError::Validation("message required".into()));
    }
    let contact = ContactMessage {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        message: form.message,
    };
    notifier.contact_received(&contact).await.map_err(|e| {
        error!(user_id = %actor.user_id, error = %e, "contact_delivery_failed");
        ServiceError::Delivery(e.to_string())
    })?;
    info!(user_id = %actor.user_id, "contact_message_sent");
    Ok(ContactAck { message: "Your message has been sent successfully." })
}
