use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};

use crate::{
    application::{
        error::HttpError,
        posts::{PostService, PostViewError},
    },
    presentation::views::{
        PostTemplate, PostsTemplate, render_not_found_response, render_template_response,
    },
};

use super::{
    HealthProbe, RouterState,
    admin::build_admin_router,
    db_health_response,
    middleware::{log_responses, set_request_context},
    repo_error_to_http,
};

#[derive(Clone)]
pub struct HttpState {
    pub posts: Arc<PostService>,
    pub health: Arc<dyn HealthProbe>,
}

/// Public pages plus the admin editor under `/admin`, on one listener.
pub fn build_router(state: RouterState) -> Router {
    let public_routes = Router::new()
        .route("/", get(index))
        .route("/posts", get(posts_index))
        .route("/posts/{slug}", get(post_detail))
        .route("/_health/db", get(public_health));

    public_routes
        .nest("/admin", build_admin_router())
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn index() -> Redirect {
    Redirect::to("/posts")
}

async fn posts_index(State(state): State<HttpState>) -> Response {
    match state.posts.list().await {
        Ok(posts) => render_template_response(PostsTemplate { posts }, StatusCode::OK),
        Err(err) => repo_error_to_http("infra::http::public::posts_index", err).into_response(),
    }
}

async fn post_detail(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    const SOURCE: &str = "infra::http::public::post_detail";

    match state.posts.view(&slug).await {
        Ok(post) => render_template_response(PostTemplate { post }, StatusCode::OK),
        Err(PostViewError::NotFound { .. }) => render_not_found_response(),
        Err(PostViewError::Repo(err)) => repo_error_to_http(SOURCE, err).into_response(),
        Err(err @ PostViewError::Render(_)) => HttpError::from_error(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to render post",
            &err,
        )
        .into_response(),
    }
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.health_check().await)
}

async fn fallback() -> Response {
    render_not_found_response()
}
