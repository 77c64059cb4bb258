use poem_openapi::Object;
use validator::Validate;

use crate::entities::user;
use crate::error::{ApiError, ApiResult, FieldErrors, NON_FIELD_ERRORS};
use crate::repository::{FollowRecord, FollowRepository, UserRepository};

pub const SELF_FOLLOW: &str = "You cannot follow yourself.";
const NULL_RELATION: &str = "This field may not be null.";
pub const ALREADY_FOLLOWING: &str = "You are already following this user.";

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "snake_case")]
pub struct FollowRead {
    pub id: i32,
    /// Username of the follower.
    pub user: String,
    /// Username of the followed user.
    pub following: String,
}

impl From<FollowRecord> for FollowRead {
    fn from(record: FollowRecord) -> Self {
        Self {
            id: record.id,
            user: record.user,
            following: record.following,
        }
    }
}

/// Body of POST. The follower is always the requesting user.
#[derive(Object, Validate, Debug, Clone, Default)]
#[oai(rename_all = "snake_case")]
pub struct FollowWrite {
    /// Username to follow.
    #[validate(required(message = "This field is required."))]
    pub following: Option<String>,
}

impl FollowWrite {
    /// Resolves the followed user, then checks the edge is neither a
    /// self-follow nor already present.
    pub async fn validate_with(
        self,
        requester: &user::Model,
        users: &UserRepository,
        follows: &FollowRepository,
    ) -> ApiResult<user::Model> {
        self.validate()?;
        let username = self.following.unwrap_or_default();
        if username.is_empty() {
            return Err(ApiError::Validation(FieldErrors::single("following", NULL_RELATION)));
        }
        let following = match users.find_by_username(&username).await? {
            Some(user) => user,
            None => {
                return Err(ApiError::Validation(FieldErrors::single(
                    "following",
                    format!("Object with username={username} does not exist."),
                )));
            }
        };

        if following.id == requester.id {
            return Err(non_field_error(SELF_FOLLOW));
        }
        if follows.exists(requester.id, following.id).await? {
            return Err(non_field_error(ALREADY_FOLLOWING));
        }
        Ok(following)
    }
}

pub fn non_field_error(message: &str) -> ApiError {
    ApiError::Validation(FieldErrors::single(NON_FIELD_ERRORS, message))
}
