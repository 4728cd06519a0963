use async_trait::async_trait;

use crate::application::repos::{PostsWriteRepo, RepoError};
use crate::domain::posts::Post;
use crate::infra::db::map_sqlx_error;

use super::super::PostgresRepositories;
use super::types::PostRow;

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn insert_post(&self, post: Post) -> Result<Post, RepoError> {
        let Post {
            slug,
            title,
            markdown,
        } = post;

        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (slug, title, markdown)
            VALUES ($1, $2, $3)
            RETURNING slug, title, markdown
            "#,
        )
        .bind(slug)
        .bind(title)
        .bind(markdown)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(Post::from(row))
    }

    async fn update_post(&self, slug: &str, post: Post) -> Result<Post, RepoError> {
        let Post {
            slug: new_slug,
            title,
            markdown,
        } = post;

        // Single statement: the unique index rejects a rename onto a taken slug.
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            UPDATE posts
            SET slug = $2,
                title = $3,
                markdown = $4,
                updated_at = now()
            WHERE slug = $1
            RETURNING slug, title, markdown
            "#,
        )
        .bind(slug)
        .bind(new_slug)
        .bind(title)
        .bind(markdown)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        row.map(Post::from).ok_or(RepoError::NotFound)
    }

    async fn delete_post(&self, slug: &str) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE slug = $1")
            .bind(slug)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
