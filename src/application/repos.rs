//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::posts::{Post, PostListing};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Read side of the post store. Lookups are exact-match on slug.
#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Every post in creation order, without markdown bodies.
    async fn list_posts(&self) -> Result<Vec<PostListing>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;
}

/// Write side of the post store. Implementations must enforce slug uniqueness
/// atomically; callers are responsible for validation and authorization.
#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Fails with [`RepoError::Duplicate`] when the slug is taken.
    async fn insert_post(&self, post: Post) -> Result<Post, RepoError>;

    /// Replace all fields of the post stored under `slug`. The replacement may
    /// carry a different slug; a collision yields [`RepoError::Duplicate`] and a
    /// missing key yields [`RepoError::NotFound`].
    async fn update_post(&self, slug: &str, post: Post) -> Result<Post, RepoError>;

    /// Fails with [`RepoError::NotFound`] when nothing was removed.
    async fn delete_post(&self, slug: &str) -> Result<(), RepoError>;
}
