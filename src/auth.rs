//! Bearer-token authentication and the per-request context.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use poem::http::{HeaderMap, Method, StatusCode, header};
use poem::{FromRequest, Request, RequestBody};
use serde::{Deserialize, Serialize};

use crate::entities::user;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Claims carried by access tokens minted by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    pub exp: i64,
}

/// HS256 keys shared with the identity provider.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn issue(&self, user_id: i32, ttl: Duration) -> jsonwebtoken::errors::Result<String> {
        let claims = Claims {
            user_id,
            exp: (Utc::now() + ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    pub fn verify(&self, token: &str) -> jsonwebtoken::errors::Result<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

/// Who is calling and how. Handlers receive this instead of reading
/// ambient request state.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub user: Option<user::Model>,
}

impl<'a> FromRequest<'a> for RequestContext {
    async fn from_request(req: &'a Request, _body: &mut RequestBody) -> poem::Result<Self> {
        let state = req.data::<Arc<AppState>>().ok_or_else(|| {
            poem::Error::from_string("application state missing", StatusCode::INTERNAL_SERVER_ERROR)
        })?;
        let user = match bearer_token(req.headers())? {
            Some(token) => Some(authenticate(state, token).await?),
            None => None,
        };
        Ok(Self {
            method: req.method().clone(),
            user,
        })
    }
}

/// Returns the token of an `Authorization: Bearer` header. Other schemes
/// are left to other authenticators and yield `None`.
fn bearer_token(headers: &HeaderMap) -> ApiResult<Option<&str>> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| ApiError::InvalidToken)?;
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(Some(token)),
        (Some(scheme), _, _) if scheme.eq_ignore_ascii_case("bearer") => Err(ApiError::InvalidToken),
        _ => Ok(None),
    }
}

async fn authenticate(state: &AppState, token: &str) -> ApiResult<user::Model> {
    let claims = state.jwt.verify(token).map_err(|err| {
        tracing::debug!(error = %err, "rejected bearer token");
        ApiError::InvalidToken
    })?;
    state
        .users
        .find_by_id(claims.user_id)
        .await?
        .ok_or(ApiError::InvalidToken)
}
