use crate::domain::posts::{Post, PostListing};

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) slug: String,
    pub(crate) title: String,
    pub(crate) markdown: String,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            slug: row.slug,
            title: row.title,
            markdown: row.markdown,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostListingRow {
    pub(crate) slug: String,
    pub(crate) title: String,
}

impl From<PostListingRow> for PostListing {
    fn from(row: PostListingRow) -> Self {
        Self {
            slug: row.slug,
            title: row.title,
        }
    }
}
