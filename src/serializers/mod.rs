//! Wire representations and request validation.
//!
//! Read objects expose every stored field with user references rendered as
//! usernames. Write objects carry only client-writable fields; unknown keys
//! such as `author` or `post` are ignored.

mod comment;
mod follow;
mod group;
mod post;

pub use comment::{CommentPatch, CommentRead, CommentWrite};
pub use follow::{ALREADY_FOLLOWING, FollowRead, FollowWrite, non_field_error};
pub use group::GroupRead;
pub use post::{PostPage, PostPatch, PostRead, PostWrite, ValidatedPost};

/// Trims surrounding whitespace the way text fields are stored.
fn trimmed(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_owned())
}
