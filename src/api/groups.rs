use std::sync::Arc;

use poem_openapi::OpenApi;
use poem_openapi::param::Path;
use poem_openapi::payload::Json;

use super::ApiTags;
use crate::auth::RequestContext;
use crate::error::ApiError;
use crate::serializers::GroupRead;
use crate::state::AppState;

/// Read-only projection: only GET (and HEAD) are routed, everything else is 405.
pub struct GroupApi {
    state: Arc<AppState>,
}

impl GroupApi {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

#[OpenApi(tag = "ApiTags::Groups")]
impl GroupApi {
    /// List groups
    #[oai(path = "/groups", method = "get")]
    async fn list_groups(&self, _ctx: RequestContext) -> poem::Result<Json<Vec<GroupRead>>> {
        let groups = self.state.groups.list().await?;
        Ok(Json(groups.into_iter().map(GroupRead::from).collect()))
    }

    /// Retrieve a group
    #[oai(path = "/groups/:id", method = "get")]
    async fn get_group(&self, _ctx: RequestContext, Path(id): Path<i32>) -> poem::Result<Json<GroupRead>> {
        let group = self.state.groups.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
        Ok(Json(group.into()))
    }
}
