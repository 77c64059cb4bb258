use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::entities::group;
use crate::error::ApiResult;

#[derive(Clone)]
pub struct GroupRepository {
    db: DatabaseConnection,
}

impl GroupRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> ApiResult<Vec<group::Model>> {
        let groups = group::Entity::find()
            .order_by_asc(group::Column::Id)
            .all(&self.db)
            .await?;
        Ok(groups)
    }

    pub async fn find_by_id(&self, id: i32) -> ApiResult<Option<group::Model>> {
        Ok(group::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn exists(&self, id: i32) -> ApiResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }
}
