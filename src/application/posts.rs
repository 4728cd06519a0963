//! Public, ungated read path: listings and rendered post pages.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::application::render::{RenderError, RenderService};
use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::posts::PostListing;

#[derive(Debug, Error)]
pub enum PostViewError {
    #[error("post `{slug}` not found")]
    NotFound { slug: String },
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Display payload for a single post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub title: String,
    pub html: String,
}

#[derive(Clone)]
pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    renderer: Arc<dyn RenderService>,
}

impl PostService {
    pub fn new(reader: Arc<dyn PostsRepo>, renderer: Arc<dyn RenderService>) -> Self {
        Self { reader, renderer }
    }

    pub async fn list(&self) -> Result<Vec<PostListing>, RepoError> {
        self.reader.list_posts().await
    }

    pub async fn view(&self, slug: &str) -> Result<PostView, PostViewError> {
        let post = self
            .reader
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| PostViewError::NotFound {
                slug: slug.to_string(),
            })?;

        let html = self.renderer.render(&post.markdown)?;
        debug!(
            target = "postdesk::posts",
            slug = %post.slug,
            html_bytes = html.len(),
            "rendered post"
        );

        Ok(PostView {
            title: post.title,
            html,
        })
    }
}
