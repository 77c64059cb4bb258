use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entities::{comment, user};
use crate::error::ApiResult;

/// A comment joined with its author's username.
#[derive(Debug, Clone)]
pub struct CommentRecord {
    pub comment: comment::Model,
    pub author: String,
}

impl CommentRecord {
    fn from_row((comment, author): (comment::Model, Option<user::Model>)) -> Self {
        Self {
            comment,
            author: author.map(|u| u.username).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i32,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentChanges {
    pub text: Option<String>,
}

#[derive(Clone)]
pub struct CommentRepository {
    db: DatabaseConnection,
}

impl CommentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_by_post(&self, post_id: i32) -> ApiResult<Vec<CommentRecord>> {
        let rows = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(user::Entity)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(CommentRecord::from_row).collect())
    }

    /// Looks a comment up only within the given post.
    pub async fn find_in_post(&self, post_id: i32, id: i32) -> ApiResult<Option<CommentRecord>> {
        let row = comment::Entity::find_by_id(id)
            .filter(comment::Column::PostId.eq(post_id))
            .find_also_related(user::Entity)
            .one(&self.db)
            .await?;
        Ok(row.map(CommentRecord::from_row))
    }

    pub async fn create(&self, author: &user::Model, input: NewComment) -> ApiResult<CommentRecord> {
        let am = comment::ActiveModel {
            author_id: Set(author.id),
            post_id: Set(input.post_id),
            text: Set(input.text),
            created: Set(Utc::now().into()),
            ..Default::default()
        };
        let created = am.insert(&self.db).await?;
        Ok(CommentRecord {
            comment: created,
            author: author.username.clone(),
        })
    }

    pub async fn update(
        &self,
        record: CommentRecord,
        changes: CommentChanges,
    ) -> ApiResult<CommentRecord> {
        let CommentRecord { comment, author } = record;
        let Some(text) = changes.text else {
            return Ok(CommentRecord { comment, author });
        };
        let mut am: comment::ActiveModel = comment.into();
        am.text = Set(text);
        let updated = am.update(&self.db).await?;
        Ok(CommentRecord {
            comment: updated,
            author,
        })
    }

    pub async fn delete(&self, id: i32) -> ApiResult<bool> {
        let res = comment::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
