use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};

use super::{PaginatedResult, Pagination, Patch};
use crate::entities::{post, user};
use crate::error::ApiResult;

/// A post joined with its author's username.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub post: post::Model,
    pub author: String,
}

impl PostRecord {
    fn from_row((post, author): (post::Model, Option<user::Model>)) -> Self {
        Self {
            post,
            author: author.map(|u| u.username).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub text: String,
    pub image: Option<String>,
    pub group_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub text: Option<String>,
    pub image: Patch<String>,
    pub group_id: Patch<i32>,
}

#[derive(Clone)]
pub struct PostRepository {
    db: DatabaseConnection,
}

impl PostRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, page: Pagination) -> ApiResult<PaginatedResult<PostRecord>> {
        let total = post::Entity::find().count(&self.db).await?;
        let rows = post::Entity::find()
            .find_also_related(user::Entity)
            .order_by_asc(post::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?;
        Ok(PaginatedResult {
            items: rows.into_iter().map(PostRecord::from_row).collect(),
            total,
        })
    }

    pub async fn find_by_id(&self, id: i32) -> ApiResult<Option<PostRecord>> {
        let row = post::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?;
        Ok(row.map(PostRecord::from_row))
    }

    pub async fn exists(&self, id: i32) -> ApiResult<bool> {
        Ok(post::Entity::find_by_id(id).one(&self.db).await?.is_some())
    }

    pub async fn create(&self, author: &user::Model, input: NewPost) -> ApiResult<PostRecord> {
        let am = post::ActiveModel {
            text: Set(input.text),
            pub_date: Set(Utc::now().into()),
            author_id: Set(author.id),
            image: Set(input.image),
            group_id: Set(input.group_id),
            ..Default::default()
        };
        let created = am.insert(&self.db).await?;
        Ok(PostRecord {
            post: created,
            author: author.username.clone(),
        })
    }

    pub async fn update(&self, record: PostRecord, changes: PostChanges) -> ApiResult<PostRecord> {
        let PostRecord { post, author } = record;
        let mut am: post::ActiveModel = post.clone().into();
        if let Some(text) = changes.text {
            am.text = Set(text);
        }
        match changes.image {
            Patch::Keep => {}
            Patch::Clear => am.image = Set(None),
            Patch::Set(path) => am.image = Set(Some(path)),
        }
        match changes.group_id {
            Patch::Keep => {}
            Patch::Clear => am.group_id = Set(None),
            Patch::Set(id) => am.group_id = Set(Some(id)),
        }
        if !am.is_changed() {
            return Ok(PostRecord { post, author });
        }
        let updated = am.update(&self.db).await?;
        Ok(PostRecord {
            post: updated,
            author,
        })
    }

    pub async fn delete(&self, id: i32) -> ApiResult<bool> {
        let res = post::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
