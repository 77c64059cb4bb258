//! The route table, built once at start-up.

use std::sync::Arc;

use poem::endpoint::StaticFilesEndpoint;
use poem::error::ResponseError;
use poem::middleware::{Cors, NormalizePath, Tracing, TrailingSlash};
use poem::{Endpoint, EndpointExt, Response, Route};
use poem_openapi::OpenApiService;
use poem_openapi::error::{ParseParamError, ParsePathError, ParseRequestPayloadError};

use crate::api::{CommentApi, FollowApi, GroupApi, PostApi};
use crate::error::{ApiError, FieldErrors, NON_FIELD_ERRORS};
use crate::state::AppState;

pub const API_PREFIX: &str = "/api/v1";

pub fn build_app(state: Arc<AppState>) -> impl Endpoint<Output = Response> {
    let apis = (
        PostApi::new(state.clone()),
        GroupApi::new(state.clone()),
        CommentApi::new(state.clone()),
        FollowApi::new(state.clone()),
    );
    let api = OpenApiService::new(apis, "Yatube API", env!("CARGO_PKG_VERSION")).server(API_PREFIX);
    let ui = api.swagger_ui();
    let spec = api.spec_endpoint();
    let media = StaticFilesEndpoint::new(state.media.root());

    Route::new()
        .nest(API_PREFIX, api)
        .nest("/docs", ui)
        .at("/openapi.json", spec)
        .nest("/media", media)
        .catch_error(path_error)
        .catch_error(param_error)
        .catch_error(payload_error)
        .with(NormalizePath::new(TrailingSlash::Trim))
        .with(Cors::new())
        .with(Tracing)
        .data(state)
        .map_to_response()
}

/// A path id that does not parse names no object.
async fn path_error(err: ParsePathError) -> Response {
    tracing::debug!(param = err.name, reason = %err.reason, "unparsable path parameter");
    ApiError::NotFound.as_response()
}

async fn param_error(err: ParseParamError) -> Response {
    ApiError::Validation(FieldErrors::single(err.name, err.reason)).as_response()
}

/// Malformed bodies and mistyped fields are reported as non-field errors.
async fn payload_error(err: ParseRequestPayloadError) -> Response {
    ApiError::Validation(FieldErrors::single(NON_FIELD_ERRORS, err.reason)).as_response()
}
