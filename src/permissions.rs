//! Per-request authorization predicates.

use poem::http::Method;

use crate::auth::RequestContext;
use crate::entities::user;
use crate::error::{ApiError, ApiResult};

pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Requires an authenticated user regardless of method.
pub fn is_authenticated(ctx: &RequestContext) -> ApiResult<&user::Model> {
    ctx.user.as_ref().ok_or(ApiError::NotAuthenticated)
}

/// View-level half of author-or-read-only: anonymous callers may only read.
pub fn author_or_read_only(ctx: &RequestContext) -> ApiResult<()> {
    if is_safe_method(&ctx.method) || ctx.user.is_some() {
        Ok(())
    } else {
        Err(ApiError::NotAuthenticated)
    }
}

/// Object-level half: unsafe methods require the caller to be the author.
pub fn author_or_read_only_object(ctx: &RequestContext, author_id: i32) -> ApiResult<()> {
    if is_safe_method(&ctx.method) {
        return Ok(());
    }
    match &ctx.user {
        Some(user) if user.id == author_id => Ok(()),
        Some(user) => {
            tracing::debug!(user_id = user.id, author_id, "mutation by non-author denied");
            Err(ApiError::PermissionDenied)
        }
        None => Err(ApiError::NotAuthenticated),
    }
}
