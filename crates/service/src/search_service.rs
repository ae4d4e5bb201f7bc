use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};
use serde::Serialize;

use models::{salon, salon_service, stylist};

use crate::errors::ServiceError;

#[derive(Clone, Debug, Serialize)]
pub struct SearchResults {
    pub salons: Vec<salon::Model>,
    pub stylists: Vec<stylist::Model>,
    pub services: Vec<salon_service::Model>,
}

/// Upper bound on hits per entity.
pub const SEARCH_LIMIT: u64 = 20;

fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `LOWER(col) LIKE %needle% ESCAPE '\'` for each column, any of which may match.
pub(crate) fn contains_any<C: ColumnTrait>(cols: &[C], needle: &str) -> Condition {
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    cols.iter().fold(Condition::any(), |cond, col| {
        cond.add(Expr::expr(Func::lower(Expr::col(*col))).like(LikeExpr::new(pattern.clone()).escape('\\')))
    })
}

/// Case-insensitive substring search across salons, stylists and services.
pub async fn search(db: &DatabaseConnection, q: &str) -> Result<SearchResults, ServiceError> {
    let needle = q.trim();
    if needle.is_empty() {
        return Err(ServiceError::Validation("search query must not be empty".into()));
    }
    let salons = salon::Entity::find()
        .filter(contains_any(&[salon::Column::Name, salon::Column::Address, salon::Column::Description], needle))
        .order_by_asc(salon::Column::Name)
        .limit(SEARCH_LIMIT)
        .all(db)
        .await?;
    let stylists = stylist::Entity::find()
        .filter(contains_any(&[stylist::Column::Name, stylist::Column::Specialties], needle))
        .order_by_asc(stylist::Column::Name)
        .limit(SEARCH_LIMIT)
        .all(db)
        .await?;
    let services = salon_service::Entity::find()
        .filter(contains_any(&[salon_service::Column::Name, salon_service::Column::Description], needle))
        .order_by_asc(salon_service::Column::Name)
        .limit(SEARCH_LIMIT)
        .all(db)
        .await?;
    Ok(SearchResults { salons, stylists, services })
}
