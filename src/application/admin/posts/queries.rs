use crate::application::auth::CallerContext;
use crate::domain::posts::{Post, PostListing};

use super::service::AdminPostService;
use super::types::{AdminPostError, EditorTarget};

impl AdminPostService {
    pub async fn list(&self, caller: &CallerContext) -> Result<Vec<PostListing>, AdminPostError> {
        self.authorize(caller, "list")?;
        Ok(self.reader.list_posts().await?)
    }

    /// Load the post behind an editor route; `None` for the blank `new` form.
    pub async fn view_editor(
        &self,
        caller: &CallerContext,
        route_slug: &str,
    ) -> Result<Option<Post>, AdminPostError> {
        self.authorize(caller, "view")?;

        match EditorTarget::from_route(route_slug) {
            EditorTarget::New => Ok(None),
            EditorTarget::Existing(slug) => match self.reader.find_by_slug(&slug).await? {
                Some(post) => Ok(Some(post)),
                None => Err(AdminPostError::NotFound { slug }),
            },
        }
    }
}
