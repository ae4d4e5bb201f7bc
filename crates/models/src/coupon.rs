use std::str::FromStr;

use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coupon")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    pub description: String,
    pub discount_type: String,
    pub discount_value: i64,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub max_uses: Option<i32>,
    pub times_used: i32,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

/// `Percentage` values are whole percent; `Fixed` values are cents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "percentage",
            DiscountType::Fixed => "fixed",
        }
    }
}

impl FromStr for DiscountType {
    type Err = errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            other => Err(errors::ModelError::Validation(format!("unknown discount_type '{other}'"))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CouponFields {
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub discount_type: DiscountType,
    pub discount_value: i64,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    #[serde(default)]
    pub max_uses: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool { true }

/// Upper-cases the code and rejects anything outside `[A-Z0-9_-]`.
pub fn normalize_code(code: &str) -> Result<String, errors::ModelError> {
    let code = code.trim().to_ascii_uppercase();
    if code.is_empty() || code.len() > 50 {
        return Err(errors::ModelError::Validation("code must be 1..=50 characters".into()));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(errors::ModelError::Validation("code may contain only letters, digits, '-' and '_'".into()));
    }
    Ok(code)
}

impl CouponFields {
    pub fn validate(&self) -> Result<String, errors::ModelError> {
        let code = normalize_code(&self.code)?;
        match self.discount_type {
            DiscountType::Percentage if !(1..=100).contains(&self.discount_value) => {
                return Err(errors::ModelError::Validation("percentage discount must be within 1..=100".into()));
            }
            DiscountType::Fixed if self.discount_value <= 0 => {
                return Err(errors::ModelError::Validation("fixed discount must be > 0".into()));
            }
            _ => {}
        }
        if self.end_date <= self.start_date {
            return Err(errors::ModelError::Validation("end_date must be after start_date".into()));
        }
        if matches!(self.max_uses, Some(n) if n <= 0) {
            return Err(errors::ModelError::Validation("max_uses must be > 0".into()));
        }
        Ok(code)
    }
}

pub async fn find_by_code<C: ConnectionTrait>(db: &C, code: &str) -> Result<Option<Model>, errors::ModelError> {
    let code = normalize_code(code)?;
    Ok(Entity::find().filter(Column::Code.eq(code)).one(db).await?)
}

pub async fn create<C: ConnectionTrait>(db: &C, fields: CouponFields) -> Result<Model, errors::ModelError> {
    let code = fields.validate()?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code),
        description: Set(fields.description),
        discount_type: Set(fields.discount_type.as_str().to_string()),
        discount_value: Set(fields.discount_value),
        start_date: Set(fields.start_date),
        end_date: Set(fields.end_date),
        max_uses: Set(fields.max_uses),
        times_used: Set(0),
        is_active: Set(fields.is_active),
        created_at: Set(Utc::now().into()),
    };
    Ok(am.insert(db).await?)
}

pub async fn update<C: ConnectionTrait>(db: &C, existing: Model, fields: CouponFields) -> Result<Model, errors::ModelError> {
    let code = fields.validate()?;
    let mut am: ActiveModel = existing.into();
    am.code = Set(code);
    am.description = Set(fields.description);
    am.discount_type = Set(fields.discount_type.as_str().to_string());
    am.discount_value = Set(fields.discount_value);
    am.start_date = Set(fields.start_date);
    am.end_date = Set(fields.end_date);
    am.max_uses = Set(fields.max_uses);
    am.is_active = Set(fields.is_active);
    Ok(am.update(db).await?)
}
