use std::sync::Arc;

use poem_openapi::param::Query;
use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, OpenApi};

use super::ApiTags;
use crate::auth::RequestContext;
use crate::permissions::is_authenticated;
use crate::repository::InsertFollow;
use crate::serializers::{ALREADY_FOLLOWING, FollowRead, FollowWrite, non_field_error};
use crate::state::AppState;

#[derive(ApiResponse)]
enum FollowCreated {
    #[oai(status = 201)]
    Created(Json<FollowRead>),
}

/// Follow edges of the current user. List and create only.
pub struct FollowApi {
    state: Arc<AppState>,
}

impl FollowApi {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

#[OpenApi(tag = "ApiTags::Follow")]
impl FollowApi {
    /// List who the current user follows, optionally filtered by `search`
    #[oai(path = "/follow", method = "get")]
    async fn list_follows(
        &self,
        ctx: RequestContext,
        Query(search): Query<Option<String>>,
    ) -> poem::Result<Json<Vec<FollowRead>>> {
        let user = is_authenticated(&ctx)?;
        let terms = search_terms(search.as_deref());
        let follows = self.state.follows.list_for_user(user, &terms).await?;
        Ok(Json(follows.into_iter().map(FollowRead::from).collect()))
    }

    /// Follow another user
    #[oai(path = "/follow", method = "post")]
    async fn create_follow(
        &self,
        ctx: RequestContext,
        Json(input): Json<FollowWrite>,
    ) -> poem::Result<FollowCreated> {
        let user = is_authenticated(&ctx)?;
        let following = input
            .validate_with(user, &self.state.users, &self.state.follows)
            .await?;
        match self.state.follows.create(user, &following).await? {
            InsertFollow::Created(record) => {
                tracing::info!(user = %record.user, following = %record.following, "follow created");
                Ok(FollowCreated::Created(Json(record.into())))
            }
            // Lost a race with a concurrent identical request.
            InsertFollow::Duplicate => Err(non_field_error(ALREADY_FOLLOWING).into()),
        }
    }
}

/// Splits a search string into terms on whitespace and commas.
fn search_terms(search: Option<&str>) -> Vec<String> {
    search
        .unwrap_or_default()
        .replace('\0', "")
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|term| !term.is_empty())
        .map(str::to_owned)
        .collect()
}
