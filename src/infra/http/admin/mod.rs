mod posts;

use std::sync::Arc;

use axum::{Router, routing::get};

use crate::application::admin::posts::AdminPostService;

use super::RouterState;

#[derive(Clone)]
pub struct AdminState {
    pub posts: Arc<AdminPostService>,
}

pub(super) fn build_admin_router() -> Router<RouterState> {
    Router::new()
        .route("/posts", get(posts::admin_posts))
        .route(
            "/posts/{slug}",
            get(posts::admin_post_editor).post(posts::admin_post_submit),
        )
}
