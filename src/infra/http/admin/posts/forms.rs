use serde::Deserialize;

use crate::application::admin::posts::MutationRequest;
use crate::domain::posts::PostDraft;

/// Editor submission; every field is optional so missing inputs surface as
/// field errors instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct AdminPostForm {
    pub(crate) intent: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) slug: Option<String>,
    pub(crate) markdown: Option<String>,
}

impl AdminPostForm {
    pub(crate) fn into_request(self) -> MutationRequest {
        MutationRequest {
            intent: self.intent,
            draft: PostDraft {
                title: self.title,
                slug: self.slug,
                markdown: self.markdown,
            },
        }
    }
}
