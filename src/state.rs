use sea_orm::DatabaseConnection;

use crate::auth::JwtKeys;
use crate::config::{Config, PaginationConfig};
use crate::media::MediaStore;
use crate::repository::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub users: UserRepository,
    pub groups: GroupRepository,
    pub posts: PostRepository,
    pub comments: CommentRepository,
    pub follows: FollowRepository,
    pub jwt: JwtKeys,
    pub media: MediaStore,
    pub pagination: PaginationConfig,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        jwt: JwtKeys,
        media: MediaStore,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            users: UserRepository::new(db.clone()),
            groups: GroupRepository::new(db.clone()),
            posts: PostRepository::new(db.clone()),
            comments: CommentRepository::new(db.clone()),
            follows: FollowRepository::new(db),
            jwt,
            media,
            pagination,
        }
    }

    pub fn from_config(db: DatabaseConnection, config: &Config) -> Self {
        Self::new(
            db,
            JwtKeys::new(config.jwt_secret.as_bytes()),
            MediaStore::new(config.media_root.clone(), config.media_url.clone()),
            config.pagination,
        )
    }
}
