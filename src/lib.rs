//! Blog API: posts, read-only groups, comments nested under posts, and
//! follow edges between users.

pub mod api;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod media;
pub mod migration;
pub mod pagination;
pub mod permissions;
pub mod repository;
pub mod routes;
pub mod serializers;
pub mod state;

pub use routes::build_app;
pub use state::AppState;
