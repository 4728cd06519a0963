use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    application::{admin::posts::AdminPostError, auth::AuthorizationError, error::HttpError},
    infra::http::repo_error_to_http,
    presentation::views::render_post_not_found_response,
};

pub(super) fn admin_post_error(source: &'static str, err: AdminPostError) -> Response {
    match err {
        AdminPostError::Unauthorized(AuthorizationError::Unauthenticated) => HttpError::new(
            source,
            StatusCode::UNAUTHORIZED,
            "Sign-in required",
            "anonymous caller",
        )
        .into_response(),
        AdminPostError::Unauthorized(AuthorizationError::Forbidden) => HttpError::new(
            source,
            StatusCode::FORBIDDEN,
            "Administrator access required",
            "signed-in caller is not the administrator",
        )
        .into_response(),
        AdminPostError::NotFound { slug } => render_post_not_found_response(&slug),
        AdminPostError::UnknownIntent(value) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Unknown intent",
            format!("unknown intent `{value}`"),
        )
        .into_response(),
        err @ AdminPostError::Conflict { .. } => HttpError::from_error(
            source,
            StatusCode::CONFLICT,
            "Slug already in use",
            &err,
        )
        .into_response(),
        AdminPostError::Repo(repo) => repo_error_to_http(source, repo).into_response(),
    }
}
