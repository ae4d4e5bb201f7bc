use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, QueryFilter};
use uuid::Uuid;

use super::setup_test_db;
use crate::user::Role;
use crate::errors::ModelError;
use crate::{appointment, appointment_service, notification, review, salon, salon_service, static_page, stylist, user};

fn salon_fields(name: &str) -> salon::SalonFields {
    salon::SalonFields {
        name: name.into(),
        address: "1 High St".into(),
        city: "Springfield".into(),
        phone: "+1234567890".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_user_upsert_refreshes_claims() -> Result<()> {
    let db = setup_test_db().await?;
    let id = Uuid::new_v4();
    let first = user::upsert(&db, id, "jo@example.com", "Jo", Role::Customer).await?;
    assert_eq!(first.role, "customer");

    let second = user::upsert(&db, id, "jo@example.com", "Jo B", Role::SalonOwner).await?;
    assert_eq!(second.id, id);
    assert_eq!(second.name, "Jo B");
    assert_eq!(second.role, "salon_owner");
    assert_eq!(user::Entity::find().all(&db).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_salon_crud() -> Result<()> {
    let db = setup_test_db().await?;
    let owner = user::upsert(&db, Uuid::new_v4(), "owner@example.com", "Owner", Role::SalonOwner).await?;

    let created = salon::create(&db, Some(owner.id), salon_fields("Glamour")).await?;
    assert_eq!(created.owner_id, Some(owner.id));
    assert!(created.rating.is_none());

    let mut fields = salon_fields("Glamour & Co");
    fields.latitude = Some(51.5);
    fields.longitude = Some(-0.12);
    let updated = salon::update(&db, created.clone(), fields).await?;
    assert_eq!(updated.name, "Glamour & Co");
    assert_eq!(updated.latitude, Some(51.5));

    salon::set_rating(&db, created.id, Some(4.5)).await?;
    let found = salon::Entity::find_by_id(created.id).one(&db).await?.unwrap();
    assert_eq!(found.rating, Some(4.5));

    found.delete(&db).await?;
    assert!(salon::Entity::find_by_id(created.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_invalid_salon_is_not_inserted() -> Result<()> {
    let db = setup_test_db().await?;
    let mut fields = salon_fields("Bad");
    fields.phone = "call me".into();
    assert!(salon::create(&db, None, fields).await.is_err());
    assert!(salon::Entity::find().all(&db).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_stylist_user_link_is_unique() -> Result<()> {
    let db = setup_test_db().await?;
    let s = salon::create(&db, None, salon_fields("Cuts")).await?;
    let u = user::upsert(&db, Uuid::new_v4(), "sty@example.com", "Sty", Role::Stylist).await?;
    let fields = stylist::StylistFields { name: "Sty".into(), years_of_experience: 2, ..Default::default() };

    stylist::create(&db, s.id, Some(u.id), fields.clone()).await?;
    assert!(stylist::create(&db, s.id, Some(u.id), fields).await.is_err());
    assert!(stylist::find_by_user(&db, u.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_appointment_insert_links_services_and_cascades() -> Result<()> {
    let db = setup_test_db().await?;
    let customer = user::upsert(&db, Uuid::new_v4(), "c@example.com", "C", Role::Customer).await?;
    let s = salon::create(&db, None, salon_fields("Cuts")).await?;
    let st = stylist::create(&db, s.id, None, stylist::StylistFields { name: "Ana".into(), ..Default::default() }).await?;
    let cut = salon_service::create(&db, s.id, salon_service::ServiceFields { name: "Cut".into(), price_cents: 2500, duration_minutes: 30, ..Default::default() }).await?;
    let dye = salon_service::create(&db, s.id, salon_service::ServiceFields { name: "Dye".into(), price_cents: 4000, duration_minutes: 60, ..Default::default() }).await?;

    let date = NaiveDate::from_ymd_opt(2024, 8, 15).unwrap();
    let appt = appointment::insert(
        &db,
        appointment::NewAppointment {
            customer_id: customer.id,
            stylist_id: st.id,
            salon_id: s.id,
            date,
            start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
            total_price_cents: 6500,
            notes: String::new(),
        },
        &[cut.id, dye.id],
    )
    .await?;
    assert_eq!(appt.status()?, appointment::AppointmentStatus::Booked);

    let mut ids = appointment::service_ids(&db, appt.id).await?;
    ids.sort();
    let mut expected = vec![cut.id, dye.id];
    expected.sort();
    assert_eq!(ids, expected);

    let linked = appt.find_related(salon_service::Entity).all(&db).await?;
    assert_eq!(linked.len(), 2);

    let active = appointment::active_for_stylist_on(&db, st.id, date).await?;
    assert_eq!(active.len(), 1);
    use appointment::AppointmentStatus::{Booked, Cancelled, Confirmed};
    assert!(appointment::compare_and_set_status(&db, appt.id, Booked, Cancelled).await?);
    // stale source state changes nothing
    assert!(!appointment::compare_and_set_status(&db, appt.id, Booked, Confirmed).await?);
    let reloaded = appointment::Entity::find_by_id(appt.id).one(&db).await?.unwrap();
    assert_eq!(reloaded.status, "cancelled");
    assert!(appointment::active_for_stylist_on(&db, st.id, date).await?.is_empty());

    // deleting the salon removes its appointments and their links
    salon::Entity::delete_by_id(s.id).exec(&db).await?;
    assert!(appointment::Entity::find_by_id(appt.id).one(&db).await?.is_none());
    let links = appointment_service::Entity::find()
        .filter(appointment_service::Column::AppointmentId.eq(appt.id))
        .all(&db)
        .await?;
    assert!(links.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_review_mean_rating() -> Result<()> {
    let db = setup_test_db().await?;
    let author = user::upsert(&db, Uuid::new_v4(), "r@example.com", "R", Role::Customer).await?;
    let s = salon::create(&db, None, salon_fields("Cuts")).await?;
    assert!(review::mean_rating(&db, s.id).await?.is_none());

    for rating in [4, 5] {
        review::create(
            &db,
            review::NewReview { author_id: author.id, salon_id: s.id, stylist_id: None, appointment_id: None, rating, comment: String::new() },
        )
        .await?;
    }
    assert_eq!(review::mean_rating(&db, s.id).await?, Some(4.5));
    Ok(())
}

#[tokio::test]
async fn test_notification_mark_read() -> Result<()> {
    let db = setup_test_db().await?;
    let u = user::upsert(&db, Uuid::new_v4(), "n@example.com", "N", Role::Customer).await?;
    let n = notification::create(&db, u.id, "hello").await?;
    assert!(!n.is_read);
    let n = notification::mark_read(&db, n).await?;
    assert!(n.is_read);
    assert!(notification::create(&db, u.id, "   ").await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_static_page_slug_is_normalized_and_unique() -> Result<()> {
    let db = setup_test_db().await?;
    let fields = |slug: &str| static_page::PageFields { slug: slug.into(), title: "About us".into(), content: String::new() };

    let page = static_page::create(&db, fields(" About-Us ")).await?;
    assert_eq!(page.slug, "about-us");
    assert!(matches!(static_page::create(&db, fields("ABOUT-US")).await, Err(ModelError::Duplicate(_))));
    assert!(matches!(static_page::create(&db, fields("about us")).await, Err(ModelError::Validation(_))));
    assert_eq!(static_page::find_by_slug(&db, "About-Us").await?.map(|p| p.id), Some(page.id));
    Ok(())
}
