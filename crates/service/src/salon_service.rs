use uuid::Uuid;
use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use common::pagination::Pagination;
use common::types::Page;
use models::user::Role;
use models::{review, salon, stylist};

use crate::errors::ServiceError;
use crate::fetch_page;
use crate::geo::haversine_km;
use crate::permissions::{ensure, Action, Actor, Resource};

const NEARBY_LIMIT: usize = 6;
const TOP_RATED_LIMIT: u64 = 4;

#[derive(Clone, Debug, Serialize)]
pub struct NearbySalon {
    #[serde(flatten)]
    pub salon: salon::Model,
    pub distance_km: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SalonWithStylists {
    #[serde(flatten)]
    pub salon: salon::SalonFields,
    #[serde(default)]
    pub stylists: Vec<stylist::StylistFields>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SalonWithStylistsView {
    #[serde(flatten)]
    pub salon: salon::Model,
    pub stylists: Vec<stylist::Model>,
}

pub(crate) async fn load<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<salon::Model, ServiceError> {
    salon::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("salon"))
}

pub async fn get_salon(db: &DatabaseConnection, id: Uuid) -> Result<salon::Model, ServiceError> {
    load(db, id).await
}

pub async fn list_salons(db: &DatabaseConnection, opts: Pagination) -> Result<Page<salon::Model>, ServiceError> {
    fetch_page(db, salon::Entity::find().order_by_asc(salon::Column::Name), opts).await
}

/// Salon owners become the owner of what they create.
fn initial_owner(actor: &Actor) -> Option<Uuid> {
    (actor.role == Role::SalonOwner).then_some(actor.user_id)
}

#[instrument(skip(db, fields), fields(user_id = %actor.user_id))]
pub async fn create_salon(db: &DatabaseConnection, actor: &Actor, fields: salon::SalonFields) -> Result<salon::Model, ServiceError> {
    ensure(actor, &Resource::Salon { owner_id: None }, Action::Create)?;
    let created = salon::create(db, initial_owner(actor), fields).await?;
    info!(salon_id = %created.id, "salon_created");
    Ok(created)
}

#[instrument(skip(db, fields), fields(user_id = %actor.user_id))]
pub async fn update_salon(db: &DatabaseConnection, actor: &Actor, id: Uuid, fields: salon::SalonFields) -> Result<salon::Model, ServiceError> {
    let existing = load(db, id).await?;
    ensure(actor, &Resource::Salon { owner_id: existing.owner_id }, Action::Update)?;
    Ok(salon::update(db, existing, fields).await?)
}

pub async fn delete_salon(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<(), ServiceError> {
    let existing = load(db, id).await?;
    ensure(actor, &Resource::Salon { owner_id: existing.owner_id }, Action::Delete)?;
    salon::Entity::delete_by_id(id).exec(db).await?;
    info!(salon_id = %id, "salon_deleted");
    Ok(())
}

/// Take ownership of an unowned salon.
#[instrument(skip(db), fields(user_id = %actor.user_id))]
pub async fn claim_salon(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> Result<salon::Model, ServiceError> {
    let existing = load(db, id).await?;
    ensure(actor, &Resource::Salon { owner_id: existing.owner_id }, Action::Claim)?;
    if existing.owner_id.is_some() {
        return Err(ServiceError::Conflict("salon already has an owner".into()));
    }
    let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
    let res = salon::Entity::update_many()
        .col_expr(salon::Column::OwnerId, Expr::value(actor.user_id))
        .col_expr(salon::Column::UpdatedAt, Expr::value(now))
        .filter(salon::Column::Id.eq(id))
        .filter(salon::Column::OwnerId.is_null())
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::Conflict("salon already has an owner".into()));
    }
    info!(salon_id = %id, "salon_claimed");
    load(db, id).await
}

/// Create a salon and its stylists in one transaction.
#[instrument(skip(db, input), fields(user_id = %actor.user_id, stylists = input.stylists.len()))]
pub async fn create_with_stylists(db: &DatabaseConnection, actor: &Actor, input: SalonWithStylists) -> Result<SalonWithStylistsView, ServiceError> {
    ensure(actor, &Resource::Salon { owner_id: None }, Action::Create)?;
    let txn = db.begin().await?;
    let created = salon::create(&txn, initial_owner(actor), input.salon).await?;
    let mut stylists = Vec::with_capacity(input.stylists.len());
    for fields in input.stylists {
        stylists.push(stylist::create(&txn, created.id, None, fields).await?);
    }
    txn.commit().await?;
    info!(salon_id = %created.id, "salon_created");
    Ok(SalonWithStylistsView { salon: created, stylists })
}

/// The salons with coordinates closest to `(lat, lon)`.
pub async fn nearby(db: &DatabaseConnection, lat: f64, lon: f64) -> Result<Vec<NearbySalon>, ServiceError> {
    salon::validate_coordinates(Some(lat), Some(lon))?;
    let located = salon::Entity::find()
        .filter(salon::Column::Latitude.is_not_null())
        .filter(salon::Column::Longitude.is_not_null())
        .all(db)
        .await?;
    let mut ranked: Vec<NearbySalon> = located
        .into_iter()
        .filter_map(|s| {
            let distance_km = haversine_km(lat, lon, s.latitude?, s.longitude?);
            Some(NearbySalon { salon: s, distance_km })
        })
        .collect();
    ranked.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
    ranked.truncate(NEARBY_LIMIT);
    Ok(ranked)
}

/// Highest rated first; unrated salons are left out.
pub async fn top_rated(db: &DatabaseConnection) -> Result<Vec<salon::Model>, ServiceError> {
    Ok(salon::Entity::find()
        .filter(salon::Column::Rating.is_not_null())
        .order_by_desc(salon::Column::Rating)
        .order_by_asc(salon::Column::Name)
        .limit(TOP_RATED_LIMIT)
        .all(db)
        .await?)
}

pub async fn salon_stylists(db: &DatabaseConnection, id: Uuid) -> Result<Vec<stylist::Model>, ServiceError> {
    load(db, id).await?;
    Ok(stylist::Entity::find()
        .filter(stylist::Column::SalonId.eq(id))
        .order_by_asc(stylist::Column::Name)
        .all(db)
        .await?)
}

/// Store the mean of the salon's reviews as its rating.
pub(crate) async fn refresh_rating<C: ConnectionTrait>(db: &C, salon_id: Uuid) -> Result<(), ServiceError> {
    let mean = review::mean_rating(db, salon_id).await?;
    salon::set_rating(db, salon_id, mean).await?;
    Ok(())
}
