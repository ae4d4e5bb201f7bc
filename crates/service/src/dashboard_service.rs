use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde::Serialize;

use models::{appointment, salon, user};

use crate::errors::ServiceError;
use crate::permissions::{ensure, Action, Actor, Resource};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardCounts {
    pub users: u64,
    pub salons: u64,
    pub appointments: u64,
}

pub async fn super_admin_dashboard(db: &DatabaseConnection, actor: &Actor) -> Result<DashboardCounts, ServiceError> {
    ensure(actor, &Resource::Dashboard, Action::Read)?;
    Ok(DashboardCounts {
        users: user::Entity::find().count(db).await?,
        salons: salon::Entity::find().count(db).await?,
        appointments: appointment::Entity::find().count(db).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::user::Role;
    use crate::test_support::{actor, fixture, get_db};

    #[tokio::test]
    async fn counts_for_super_admin_only() -> Result<(), anyhow::Error> {
        let db = get_db().await?;
        fixture(&db).await?;
        let admin = actor(&db, Role::Admin).await?;
        let root = actor(&db, Role::SuperAdmin).await?;

        assert_eq!(super_admin_dashboard(&db, &admin).await.unwrap_err().kind(), "forbidden");
        let counts = super_admin_dashboard(&db, &root).await?;
        // fixture owner and stylist, plus the two actors above
        assert_eq!(counts, DashboardCounts { users: 4, salons: 1, appointments: 0 });
        Ok(())
    }
}
