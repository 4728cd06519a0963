use async_trait::async_trait;

use crate::application::repos::{PostsRepo, RepoError};
use crate::domain::posts::{Post, PostListing};
use crate::infra::db::map_sqlx_error;

use super::super::PostgresRepositories;
use super::types::{PostListingRow, PostRow};

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(&self) -> Result<Vec<PostListing>, RepoError> {
        let rows = sqlx::query_as::<_, PostListingRow>(
            r#"
            SELECT slug, title
            FROM posts
            ORDER BY id
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostListing::from).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT slug, title, markdown
            FROM posts
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Post::from))
    }
}
