use std::sync::Arc;

use poem_openapi::param::Path;
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, OpenApi};

use super::{ApiTags, Deleted};
use crate::auth::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::permissions::{author_or_read_only, author_or_read_only_object, is_authenticated};
use crate::repository::{CommentChanges, CommentRecord, NewComment};
use crate::serializers::{CommentPatch, CommentRead, CommentWrite};
use crate::state::AppState;

#[derive(ApiResponse)]
enum CommentCreated {
    #[oai(status = 201)]
    Created(Json<CommentRead>),
}

/// Comments nested under `/posts/:post_id`.
pub struct CommentApi {
    state: Arc<AppState>,
}

impl CommentApi {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// The parent post must exist for every operation.
    async fn resolve_post(&self, post_id: i32) -> ApiResult<i32> {
        if self.state.posts.exists(post_id).await? {
            Ok(post_id)
        } else {
            Err(ApiError::NotFound)
        }
    }

    async fn get_object(&self, ctx: &RequestContext, post_id: i32, id: i32) -> ApiResult<CommentRecord> {
        author_or_read_only(ctx)?;
        let post_id = self.resolve_post(post_id).await?;
        let record = self
            .state
            .comments
            .find_in_post(post_id, id)
            .await?
            .ok_or(ApiError::NotFound)?;
        author_or_read_only_object(ctx, record.comment.author_id)?;
        Ok(record)
    }

    async fn apply(&self, record: CommentRecord, changes: CommentChanges) -> ApiResult<CommentRead> {
        let updated = self.state.comments.update(record, changes).await?;
        Ok(updated.into())
    }
}

#[OpenApi(tag = "ApiTags::Comments")]
impl CommentApi {
    /// List the comments of a post
    #[oai(path = "/posts/:post_id/comments", method = "get")]
    async fn list_comments(
        &self,
        ctx: RequestContext,
        Path(post_id): Path<i32>,
    ) -> poem::Result<Json<Vec<CommentRead>>> {
        author_or_read_only(&ctx)?;
        let post_id = self.resolve_post(post_id).await?;
        let comments = self.state.comments.list_by_post(post_id).await?;
        Ok(Json(comments.into_iter().map(CommentRead::from).collect()))
    }

    /// Retrieve a comment of a post
    #[oai(path = "/posts/:post_id/comments/:comment_id", method = "get")]
    async fn get_comment(
        &self,
        ctx: RequestContext,
        Path(post_id): Path<i32>,
        Path(comment_id): Path<i32>,
    ) -> poem::Result<Json<CommentRead>> {
        let record = self.get_object(&ctx, post_id, comment_id).await?;
        Ok(Json(record.into()))
    }

    /// Comment on a post as the current user
    #[oai(path = "/posts/:post_id/comments", method = "post")]
    async fn create_comment(
        &self,
        ctx: RequestContext,
        Path(post_id): Path<i32>,
        Json(input): Json<CommentWrite>,
    ) -> poem::Result<CommentCreated> {
        let author = is_authenticated(&ctx)?;
        let post_id = self.resolve_post(post_id).await?;
        let text = input.into_text()?;
        let record = self
            .state
            .comments
            .create(author, NewComment { post_id, text })
            .await?;
        tracing::info!(comment_id = record.comment.id, post_id, "comment created");
        Ok(CommentCreated::Created(Json(record.into())))
    }

    /// Replace a comment
    #[oai(path = "/posts/:post_id/comments/:comment_id", method = "put")]
    async fn update_comment(
        &self,
        ctx: RequestContext,
        Path(post_id): Path<i32>,
        Path(comment_id): Path<i32>,
        Json(input): Json<CommentWrite>,
    ) -> poem::Result<Json<CommentRead>> {
        let record = self.get_object(&ctx, post_id, comment_id).await?;
        let changes = CommentChanges {
            text: Some(input.into_text()?),
        };
        Ok(Json(self.apply(record, changes).await?))
    }

    /// Partially update a comment
    #[oai(path = "/posts/:post_id/comments/:comment_id", method = "patch")]
    async fn partial_update_comment(
        &self,
        ctx: RequestContext,
        Path(post_id): Path<i32>,
        Path(comment_id): Path<i32>,
        Json(input): Json<CommentPatch>,
    ) -> poem::Result<Json<CommentRead>> {
        let record = self.get_object(&ctx, post_id, comment_id).await?;
        let changes = input.into_changes()?;
        Ok(Json(self.apply(record, changes).await?))
    }

    /// Delete a comment
    #[oai(path = "/posts/:post_id/comments/:comment_id", method = "delete")]
    async fn delete_comment(
        &self,
        ctx: RequestContext,
        Path(post_id): Path<i32>,
        Path(comment_id): Path<i32>,
    ) -> poem::Result<Deleted> {
        let record = self.get_object(&ctx, post_id, comment_id).await?;
        if !self.state.comments.delete(record.comment.id).await? {
            return Err(ApiError::NotFound.into());
        }
        tracing::info!(comment_id, post_id, "comment deleted");
        Ok(Deleted::NoContent)
    }
}
