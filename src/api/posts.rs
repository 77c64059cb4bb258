use std::sync::Arc;

use poem_openapi::param::{Path, Query};
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, OpenApi};

use super::{ApiTags, Deleted};
use crate::auth::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::media::{DecodedImage, MediaStore};
use crate::pagination::page_links;
use crate::permissions::{author_or_read_only, author_or_read_only_object, is_authenticated};
use crate::repository::{NewPost, Patch, PostChanges, PostRecord};
use crate::serializers::{PostPage, PostPatch, PostRead, PostWrite, ValidatedPost};
use crate::routes::API_PREFIX;
use crate::state::AppState;

#[derive(ApiResponse)]
enum PostCreated {
    #[oai(status = 201)]
    Created(Json<PostRead>),
}

pub struct PostApi {
    state: Arc<AppState>,
}

impl PostApi {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Loads a post and applies the author-or-read-only object check.
    async fn get_object(&self, ctx: &RequestContext, id: i32) -> ApiResult<PostRecord> {
        author_or_read_only(ctx)?;
        let record = self.state.posts.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
        author_or_read_only_object(ctx, record.post.author_id)?;
        Ok(record)
    }

    async fn apply(&self, record: PostRecord, input: ValidatedPost) -> ApiResult<PostRead> {
        let changes = PostChanges {
            text: input.text,
            image: store_image(&self.state.media, input.image).await?,
            group_id: input.group,
        };
        let updated = self.state.posts.update(record, changes).await?;
        Ok(PostRead::from_record(updated, &self.state.media))
    }
}

#[OpenApi(tag = "ApiTags::Posts")]
impl PostApi {
    /// List posts, `limit`/`offset` paginated
    #[oai(path = "/posts", method = "get")]
    async fn list_posts(
        &self,
        ctx: RequestContext,
        Query(limit): Query<Option<u64>>,
        Query(offset): Query<Option<u64>>,
    ) -> poem::Result<Json<PostPage>> {
        author_or_read_only(&ctx)?;
        let page = self.state.pagination.window(limit, offset);
        let result = self.state.posts.list(page).await?;
        let (next, previous) = page_links(&format!("{API_PREFIX}/posts"), page, result.total);
        Ok(Json(PostPage {
            count: result.total,
            next,
            previous,
            results: result
                .items
                .into_iter()
                .map(|record| PostRead::from_record(record, &self.state.media))
                .collect(),
        }))
    }

    /// Retrieve a post
    #[oai(path = "/posts/:post_id", method = "get")]
    async fn get_post(&self, ctx: RequestContext, Path(post_id): Path<i32>) -> poem::Result<Json<PostRead>> {
        let record = self.get_object(&ctx, post_id).await?;
        Ok(Json(PostRead::from_record(record, &self.state.media)))
    }

    /// Create a post authored by the current user
    #[oai(path = "/posts", method = "post")]
    async fn create_post(&self, ctx: RequestContext, Json(input): Json<PostWrite>) -> poem::Result<PostCreated> {
        let author = is_authenticated(&ctx)?;
        let input = input.validate_with(&self.state.groups).await?;
        let image = match store_image(&self.state.media, input.image).await? {
            Patch::Set(path) => Some(path),
            Patch::Keep | Patch::Clear => None,
        };
        let group_id = match input.group {
            Patch::Set(id) => Some(id),
            Patch::Keep | Patch::Clear => None,
        };
        let record = self
            .state
            .posts
            .create(
                author,
                NewPost {
                    text: input.text.unwrap_or_default(),
                    image,
                    group_id,
                },
            )
            .await?;
        tracing::info!(post_id = record.post.id, author = %record.author, "post created");
        Ok(PostCreated::Created(Json(PostRead::from_record(
            record,
            &self.state.media,
        ))))
    }

    /// Replace a post
    #[oai(path = "/posts/:post_id", method = "put")]
    async fn update_post(
        &self,
        ctx: RequestContext,
        Path(post_id): Path<i32>,
        Json(input): Json<PostWrite>,
    ) -> poem::Result<Json<PostRead>> {
        let record = self.get_object(&ctx, post_id).await?;
        let input = input.validate_with(&self.state.groups).await?;
        Ok(Json(self.apply(record, input).await?))
    }

    /// Partially update a post
    #[oai(path = "/posts/:post_id", method = "patch")]
    async fn partial_update_post(
        &self,
        ctx: RequestContext,
        Path(post_id): Path<i32>,
        Json(input): Json<PostPatch>,
    ) -> poem::Result<Json<PostRead>> {
        let record = self.get_object(&ctx, post_id).await?;
        let input = input.validate_with(&self.state.groups).await?;
        Ok(Json(self.apply(record, input).await?))
    }

    /// Delete a post
    #[oai(path = "/posts/:post_id", method = "delete")]
    async fn delete_post(&self, ctx: RequestContext, Path(post_id): Path<i32>) -> poem::Result<Deleted> {
        let record = self.get_object(&ctx, post_id).await?;
        if !self.state.posts.delete(record.post.id).await? {
            return Err(ApiError::NotFound.into());
        }
        tracing::info!(post_id, "post deleted");
        Ok(Deleted::NoContent)
    }
}

async fn store_image(media: &MediaStore, image: Patch<DecodedImage>) -> ApiResult<Patch<String>> {
    Ok(match image {
        Patch::Keep => Patch::Keep,
        Patch::Clear => Patch::Clear,
        Patch::Set(image) => Patch::Set(media.save_post_image(&image).await?),
    })
}
