//! Resource controllers.

mod comments;
mod follow;
mod groups;
mod posts;

use poem_openapi::{ApiResponse, Tags};

pub use comments::CommentApi;
pub use follow::FollowApi;
pub use groups::GroupApi;
pub use posts::PostApi;

#[derive(Tags)]
enum ApiTags {
    /// Posts and their authors
    Posts,
    /// Read-only post groups
    Groups,
    /// Comments scoped to a post
    Comments,
    /// Subscriptions of the current user
    Follow,
}

#[derive(ApiResponse)]
pub enum Deleted {
    #[oai(status = 204)]
    NoContent,
}
