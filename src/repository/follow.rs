use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};

use crate::entities::{follow, user};
use crate::error::ApiResult;

/// A follow edge with both sides resolved to usernames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowRecord {
    pub id: i32,
    pub user: String,
    pub following: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertFollow {
    Created(FollowRecord),
    /// The store rejected the edge as a duplicate.
    Duplicate,
}

#[derive(Clone)]
pub struct FollowRepository {
    db: DatabaseConnection,
}

impl FollowRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Edges where `user` is the follower. Every search term must appear in
    /// the follower's or the followed username. Both sides are folded with the
    /// database's `LOWER`, which on SQLite only folds ASCII letters.
    pub async fn list_for_user(
        &self,
        user: &user::Model,
        terms: &[String],
    ) -> ApiResult<Vec<FollowRecord>> {
        let mut query = follow::Entity::find()
            .filter(follow::Column::UserId.eq(user.id))
            .find_also_related(user::Entity)
            .order_by_asc(follow::Column::Id);

        let follower = Func::lower(Expr::val(user.username.clone()));
        let following = Func::lower(Expr::col((user::Entity, user::Column::Username)));
        for term in terms {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            let like = LikeExpr::new(pattern).escape('\\');
            query = query.filter(
                Condition::any()
                    .add(Expr::expr(follower.clone()).like(like.clone()))
                    .add(Expr::expr(following.clone()).like(like)),
            );
        }

        let rows = query.all(&self.db).await?;
        Ok(rows
            .into_iter()
            .map(|(edge, following)| FollowRecord {
                id: edge.id,
                user: user.username.clone(),
                following: following.map(|u| u.username).unwrap_or_default(),
            })
            .collect())
    }

    pub async fn exists(&self, user_id: i32, following_id: i32) -> ApiResult<bool> {
        let count = follow::Entity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::FollowingId.eq(following_id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(
        &self,
        user: &user::Model,
        following: &user::Model,
    ) -> ApiResult<InsertFollow> {
        let am = follow::ActiveModel {
            user_id: Set(user.id),
            following_id: Set(following.id),
            ..Default::default()
        };
        match am.insert(&self.db).await {
            Ok(edge) => Ok(InsertFollow::Created(FollowRecord {
                id: edge.id,
                user: user.username.clone(),
                following: following.username.clone(),
            })),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(InsertFollow::Duplicate)
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
