use std::fmt;
use std::str::FromStr;

use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// Account role as carried in identity-provider tokens.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    SalonOwner,
    Stylist,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::SalonOwner => "salon_owner",
            Role::Stylist => "stylist",
            Role::Admin => "admin",
            Role::SuperAdmin => "super_admin",
        }
    }

    /// Staff roles bypass ownership checks.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Role {
    type Err = errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "salon_owner" => Ok(Role::SalonOwner),
            "stylist" => Ok(Role::Stylist),
            "admin" => Ok(Role::Admin),
            "super_admin" => Ok(Role::SuperAdmin),
            other => Err(errors::ModelError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let trimmed = email.trim();
    let Some((local, domain)) = trimmed.split_once('@') else {
        return Err(errors::ModelError::Validation("invalid email".into()));
    };
    if local.is_empty() || domain.is_empty() || trimmed.len() > 255 {
        return Err(errors::ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    if name.len() > 128 { return Err(errors::ModelError::Validation("name too long (<=128)".into())); }
    Ok(())
}

/// Insert the account or refresh its email/name/role from the identity provider.
pub async fn upsert<C: ConnectionTrait>(db: &C, id: Uuid, email: &str, name: &str, role: Role) -> Result<Model, errors::ModelError> {
    validate_email(email)?;
    let name = if name.trim().is_empty() { email } else { name };
    validate_name(name)?;
    let now = Utc::now().into();
    match Entity::find_by_id(id).one(db).await? {
        Some(existing) => {
            if existing.email == email && existing.name == name && existing.role == role.as_str() {
                return Ok(existing);
            }
            let mut am: ActiveModel = existing.into();
            am.email = Set(email.to_string());
            am.name = Set(name.to_string());
            am.role = Set(role.as_str().to_string());
            am.updated_at = Set(now);
            Ok(am.update(db).await?)
        }
        None => {
            let am = ActiveModel {
                id: Set(id),
                email: Set(email.to_string()),
                name: Set(name.to_string()),
                role: Set(role.as_str().to_string()),
                created_at: Set(now),
                updated_at: Set(now),
            };
            Ok(am.insert(db).await?)
        }
    }
}
