use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

use common::pagination::Pagination;
use models::appointment::{self, AppointmentStatus};
use models::notification;
use models::user::Role;

use super::analytics::salon_analytics;
use super::transitions::{cancel, complete, confirm};
use super::{BookingRequest, BookingService};
use crate::appointment_service::{self, AppointmentFilter};
use crate::notifier::mock::RecordingNotifier;
use crate::test_support::{actor, fixture, get_db, Fixture};

fn t(h: u32, m: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, 0).unwrap() }

fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 8, 15).unwrap() }

fn request(fx: &Fixture, start: NaiveTime, end: Option<NaiveTime>) -> BookingRequest {
    BookingRequest {
        stylist_id: fx.stylist.id,
        salon_id: fx.salon.id,
        service_ids: vec![fx.cut.id],
        date: day(),
        start_time: start,
        end_time: end,
        notes: None,
    }
}

fn booking() -> (BookingService, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    (BookingService::new(notifier.clone()), notifier)
}

#[tokio::test]
async fn overlapping_booking_is_rejected_without_persisting() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let customer = actor(&db, Role::Customer).await?;
    let (svc, _) = booking();

    svc.create(&db, &customer, request(&fx, t(10, 0), Some(t(11, 0)))).await?;
    let err = svc.create(&db, &customer, request(&fx, t(10, 30), Some(t(11, 30)))).await.unwrap_err();
    assert_eq!(err.kind(), "conflict");
    assert_eq!(appointment::Entity::find().count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn back_to_back_bookings_both_succeed() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let customer = actor(&db, Role::Customer).await?;
    let (svc, _) = booking();

    svc.create(&db, &customer, request(&fx, t(10, 0), Some(t(11, 0)))).await?;
    svc.create(&db, &customer, request(&fx, t(11, 0), Some(t(12, 0)))).await?;
    assert_eq!(appointment::Entity::find().count(&db).await?, 2);
    Ok(())
}

#[tokio::test]
async fn cancelled_appointment_frees_the_interval() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let customer = actor(&db, Role::Customer).await?;
    let (svc, _) = booking();

    let first = svc.create(&db, &customer, request(&fx, t(14, 0), Some(t(15, 0)))).await?;
    let cancelled = cancel(&db, &customer, first.appointment.id).await?;
    assert_eq!(cancelled.appointment.status, "cancelled");
    svc.create(&db, &customer, request(&fx, t(14, 30), Some(t(15, 30)))).await?;
    Ok(())
}

#[tokio::test]
async fn end_time_and_price_derive_from_services() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let customer = actor(&db, Role::Customer).await?;
    let (svc, notifier) = booking();

    let mut req = request(&fx, t(9, 0), None);
    req.service_ids = vec![fx.cut.id, fx.dye.id, fx.cut.id];
    let view = svc.create(&db, &customer, req).await?;
    assert_eq!(view.appointment.end_time, t(10, 30));
    assert_eq!(view.appointment.total_price_cents, 6500);
    assert_eq!(view.appointment.customer_id, customer.user_id);
    assert_eq!(view.service_ids.len(), 2);

    // inbox rows for customer and the stylist's account, one outbound notice
    assert_eq!(notification::Entity::find().count(&db).await?, 2);
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipients.len(), 2);
    assert_eq!(sent[0].recipients[0], format!("customer-{}@example.com", customer.user_id.simple()));
    Ok(())
}

#[tokio::test]
async fn notifier_failure_does_not_fail_booking() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let customer = actor(&db, Role::Customer).await?;
    let svc = BookingService::new(Arc::new(RecordingNotifier::failing()));

    let view = svc.create(&db, &customer, request(&fx, t(9, 0), None)).await?;
    assert_eq!(view.appointment.status, "booked");
    Ok(())
}

#[tokio::test]
async fn booking_validation() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let other = fixture(&db).await?;
    let customer = actor(&db, Role::Customer).await?;
    let (svc, _) = booking();

    let mut no_services = request(&fx, t(9, 0), None);
    no_services.service_ids.clear();
    assert_eq!(svc.create(&db, &customer, no_services).await.unwrap_err().kind(), "validation");

    let mut foreign_service = request(&fx, t(9, 0), None);
    foreign_service.service_ids = vec![other.cut.id];
    assert_eq!(svc.create(&db, &customer, foreign_service).await.unwrap_err().kind(), "validation");

    let mut foreign_stylist = request(&fx, t(9, 0), None);
    foreign_stylist.stylist_id = other.stylist.id;
    assert_eq!(svc.create(&db, &customer, foreign_stylist).await.unwrap_err().kind(), "validation");

    let inverted = request(&fx, t(11, 0), Some(t(10, 0)));
    assert_eq!(svc.create(&db, &customer, inverted).await.unwrap_err().kind(), "validation");

    let mut missing = request(&fx, t(9, 0), None);
    missing.service_ids = vec![Uuid::new_v4()];
    assert_eq!(svc.create(&db, &customer, missing).await.unwrap_err().kind(), "not_found");

    assert_eq!(svc.create(&db, &fx.owner, request(&fx, t(9, 0), None)).await.unwrap_err().kind(), "forbidden");
    assert_eq!(appointment::Entity::find().count(&db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn concurrent_overlapping_creates_yield_one_appointment() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let customer = actor(&db, Role::Customer).await?;
    let (svc, _) = booking();
    let svc = Arc::new(svc);

    let mut handles = Vec::new();
    for i in 0..4u32 {
        let (svc, db, req) = (svc.clone(), db.clone(), request(&fx, t(10, i * 10), Some(t(11, 0))));
        handles.push(tokio::spawn(async move { svc.create(&db, &customer, req).await }));
    }
    let mut ok = 0;
    let mut conflicts = 0;
    for h in handles {
        match h.await? {
            Ok(_) => ok += 1,
            Err(e) if e.kind() == "conflict" => conflicts += 1,
            Err(e) => return Err(e.into()),
        }
    }
    assert_eq!((ok, conflicts), (1, 3));
    assert_eq!(appointment::Entity::find().count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn available_slots_exclude_booked_start_times() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let customer = actor(&db, Role::Customer).await?;
    let (svc, _) = booking();

    assert_eq!(svc.available_slots(&db, fx.stylist.id, day()).await?.len(), 16);

    svc.create(&db, &customer, request(&fx, t(14, 0), Some(t(15, 0)))).await?;
    let slots = svc.available_slots(&db, fx.stylist.id, day()).await?;
    assert_eq!(slots.len(), 15);
    assert!(!slots.contains(&"14:00".to_string()));
    assert!(slots.contains(&"14:30".to_string()));
    assert_eq!(slots.first().map(String::as_str), Some("09:00"));
    assert_eq!(slots.last().map(String::as_str), Some("16:30"));

    let other_day = NaiveDate::from_ymd_opt(2024, 8, 16).unwrap();
    assert_eq!(svc.available_slots(&db, fx.stylist.id, other_day).await?.len(), 16);
    assert_eq!(svc.available_slots(&db, Uuid::new_v4(), day()).await.unwrap_err().kind(), "not_found");
    Ok(())
}

#[tokio::test]
async fn state_machine_permissions_and_terminal_states() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let customer = actor(&db, Role::Customer).await?;
    let (svc, _) = booking();

    let id = svc.create(&db, &customer, request(&fx, t(9, 0), None)).await?.appointment.id;
    assert_eq!(confirm(&db, &customer, id).await.unwrap_err().kind(), "forbidden");
    assert_eq!(complete(&db, &fx.owner, id).await.unwrap_err().kind(), "conflict");

    let confirmed = confirm(&db, &fx.stylist_user, id).await?;
    assert_eq!(confirmed.appointment.status()?, AppointmentStatus::Confirmed);
    assert_eq!(confirm(&db, &fx.owner, id).await.unwrap_err().kind(), "conflict");

    let completed = complete(&db, &fx.owner, id).await?;
    assert_eq!(completed.appointment.status()?, AppointmentStatus::Completed);
    assert_eq!(cancel(&db, &customer, id).await.unwrap_err().kind(), "conflict");

    let other = svc.create(&db, &customer, request(&fx, t(12, 0), None)).await?.appointment.id;
    cancel(&db, &fx.owner, other).await?;
    assert_eq!(confirm(&db, &fx.owner, other).await.unwrap_err().kind(), "conflict");
    Ok(())
}

#[tokio::test]
async fn notes_editable_until_terminal() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let customer = actor(&db, Role::Customer).await?;
    let (svc, _) = booking();
    let id = svc.create(&db, &customer, request(&fx, t(9, 0), None)).await?.appointment.id;

    let edited = appointment_service::update_notes(&db, &customer, id, "bring photos".into()).await?;
    assert_eq!(edited.appointment.notes, "bring photos");
    assert_eq!(edited.appointment.status, "booked");
    let err = appointment_service::update_notes(&db, &fx.owner, id, "x".into()).await.unwrap_err();
    assert_eq!(err.kind(), "forbidden");

    cancel(&db, &customer, id).await?;
    let err = appointment_service::update_notes(&db, &customer, id, "late".into()).await.unwrap_err();
    assert_eq!(err.kind(), "conflict");
    Ok(())
}

#[tokio::test]
async fn visibility_of_appointments() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let alice = actor(&db, Role::Customer).await?;
    let bob = actor(&db, Role::Customer).await?;
    let admin = actor(&db, Role::Admin).await?;
    let (svc, _) = booking();

    let a = svc.create(&db, &alice, request(&fx, t(9, 0), None)).await?.appointment.id;
    svc.create(&db, &bob, request(&fx, t(10, 0), None)).await?;

    let page = Pagination::default();
    assert_eq!(appointment_service::list_appointments(&db, &alice, AppointmentFilter::default(), page).await?.total, 1);
    assert_eq!(appointment_service::list_appointments(&db, &fx.owner, AppointmentFilter::default(), page).await?.total, 2);
    assert_eq!(appointment_service::list_appointments(&db, &fx.stylist_user, AppointmentFilter::default(), page).await?.total, 2);
    assert_eq!(appointment_service::list_appointments(&db, &admin, AppointmentFilter::default(), page).await?.total, 2);

    confirm(&db, &fx.owner, a).await?;
    let only_confirmed = AppointmentFilter { status: Some(AppointmentStatus::Confirmed), ..Default::default() };
    let listed = appointment_service::list_appointments(&db, &admin, only_confirmed, page).await?;
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].appointment.id, a);

    assert_eq!(appointment_service::get_appointment(&db, &bob, a).await.unwrap_err().kind(), "forbidden");
    assert_eq!(appointment_service::stylist_appointments(&db, &bob, fx.stylist.id).await?.len(), 1);
    assert_eq!(appointment_service::stylist_appointments(&db, &fx.owner, fx.stylist.id).await?.len(), 2);

    assert_eq!(appointment_service::delete_appointment(&db, &alice, a).await.unwrap_err().kind(), "forbidden");
    appointment_service::delete_appointment(&db, &admin, a).await?;
    assert_eq!(appointment_service::get_appointment(&db, &admin, a).await.unwrap_err().kind(), "not_found");
    Ok(())
}

#[tokio::test]
async fn analytics_with_no_appointments_is_zero() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let stats = salon_analytics(&db, &fx.owner, fx.salon.id).await?;
    assert_eq!(stats.total_appointments, 0);
    assert_eq!(stats.completed_appointments, 0);
    assert_eq!(stats.total_revenue_cents, 0);
    assert!(stats.popular_services.is_empty());
    Ok(())
}

#[tokio::test]
async fn analytics_counts_and_revenue() -> Result<(), anyhow::Error> {
    let db = get_db().await?;
    let fx = fixture(&db).await?;
    let customer = actor(&db, Role::Customer).await?;
    let (svc, _) = booking();

    let mut both = request(&fx, t(9, 0), None);
    both.service_ids = vec![fx.cut.id, fx.dye.id];
    let done = svc.create(&db, &customer, both).await?.appointment.id;
    svc.create(&db, &customer, request(&fx, t(11, 0), None)).await?;
    let dropped = svc.create(&db, &customer, request(&fx, t(12, 0), None)).await?.appointment.id;

    confirm(&db, &fx.owner, done).await?;
    complete(&db, &fx.owner, done).await?;
    cancel(&db, &customer, dropped).await?;

    let stats = salon_analytics(&db, &fx.owner, fx.salon.id).await?;
    assert_eq!(stats.total_appointments, 2);
    assert_eq!(stats.completed_appointments, 1);
    assert_eq!(stats.cancelled_appointments, 1);
    assert_eq!(stats.total_revenue_cents, 6500);
    let ranked: Vec<(&str, u64)> = stats.popular_services.iter().map(|p| (p.name.as_str(), p.count)).collect();
    assert_eq!(ranked, [("Cut", 2), ("Dye", 1)]);

    let stranger = actor(&db, Role::SalonOwner).await?;
    assert_eq!(salon_analytics(&db, &stranger, fx.salon.id).await.unwrap_err().kind(), "forbidden");
    Ok(())
}
