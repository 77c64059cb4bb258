//! Explicit query methods per entity, backed by sea-orm.

mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::{CommentChanges, CommentRecord, CommentRepository, NewComment};
pub use follow::{FollowRecord, FollowRepository, InsertFollow};
pub use group::GroupRepository;
pub use post::{NewPost, PostChanges, PostRecord, PostRepository};
pub use user::UserRepository;

/// Limit/offset window for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

/// A window of results together with the size of the full result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Three-state update for nullable columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}
