use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tracing::info;
use uuid::Uuid;

/// What a booking confirmation message needs to say.
#[derive(Clone, Debug, PartialEq)]
pub struct BookingNotice {
    pub appointment_id: Uuid,
    pub salon_name: String,
    pub stylist_name: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    /// Customer first, then the stylist when they have an address.
    pub recipients: Vec<String>,
}

impl BookingNotice {
    pub fn message(&self) -> String {
        format!(
            "Appointment at {} with {} on {} at {}",
            self.salon_name,
            self.stylist_name,
            self.date,
            self.start_time.format("%H:%M"),
        )
    }
}

/// A visitor's message from the contact form.
#[derive(Clone, Debug, PartialEq)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactMessage {
    pub fn subject(&self) -> String {
        format!("Contact form submission from {}", self.name)
    }
}

/// Outbound delivery of booking and contact messages (email or similar).
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn appointment_booked(&self, notice: &BookingNotice) -> anyhow::Result<()>;

    /// Forward a contact-form message to the site's inbox.
    async fn contact_received(&self, contact: &ContactMessage) -> anyhow::Result<()>;
}

/// Writes notices to the log instead of delivering them.
pub struct LogNotifier {
    pub from_email: String,
    pub contact_email: String,
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn appointment_booked(&self, notice: &BookingNotice) -> anyhow::Result<()> {
        info!(
            from = %self.from_email,
            to = ?notice.recipients,
            appointment_id = %notice.appointment_id,
            message = %notice.message(),
            "booking_notice"
        );
        Ok(())
    }

    async fn contact_received(&self, contact: &ContactMessage) -> anyhow::Result<()> {
        info!(
            from = %contact.email,
            to = %self.contact_email,
            subject = %contact.subject(),
            message = %contact.message,
            "contact_message"
        );
        Ok(())
    }
}

/// In-memory notifiers for tests.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<BookingNotice>>,
        pub contacts: Mutex<Vec<ContactMessage>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self { Self { fail: true, ..Default::default() } }

        pub fn sent(&self) -> Vec<BookingNotice> {
            self.sent.lock().map(|v| v.clone()).unwrap_or_default()
        }

        pub fn contacts(&self) -> Vec<ContactMessage> {
            self.contacts.lock().map(|v| v.clone()).unwrap_or_default()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn appointment_booked(&self, notice: &BookingNotice) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("smtp unavailable");
            }
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(notice.clone());
            }
            Ok(())
        }

        async fn contact_received(&self, contact: &ContactMessage) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("smtp unavailable");
            }
            if let Ok(mut contacts) = self.contacts.lock() {
                contacts.push(contact.clone());
            }
            Ok(())
        }
    }
}
