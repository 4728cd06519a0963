//! Admin page templates and the editor form model.

use askama::Template;

use crate::application::admin::posts::{ADMIN_POSTS_PATH, EditorTarget, Intent};
use crate::domain::posts::{FieldErrors, NEW_POST_SENTINEL, PostDraft, PostField, PostListing};

#[derive(Template)]
#[template(path = "admin/posts.html")]
pub struct AdminPostsTemplate {
    pub posts: Vec<PostListing>,
}

#[derive(Template)]
#[template(path = "admin/editor.html")]
pub struct AdminEditorTemplate {
    pub view: AdminEditorView,
}

#[derive(Debug, Clone, Default)]
pub struct EditorFieldView {
    pub value: String,
    pub error: Option<String>,
}

/// One entry of the error summary above the form; `field` is the input id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorErrorView {
    pub field: String,
    pub message: String,
}

/// Everything the editor form needs: echoed input plus per-field errors.
#[derive(Debug, Clone)]
pub struct AdminEditorView {
    pub heading: String,
    pub action: String,
    pub is_new: bool,
    pub submit_intent: &'static str,
    pub submit_label: &'static str,
    pub title: EditorFieldView,
    pub slug: EditorFieldView,
    pub markdown: EditorFieldView,
    pub summary: Vec<EditorErrorView>,
}

impl AdminEditorView {
    pub fn new(target: &EditorTarget, draft: &PostDraft, errors: &FieldErrors) -> Self {
        let (heading, route_slug, submit_intent, submit_label) = match target {
            EditorTarget::New => (
                "New post".to_string(),
                NEW_POST_SENTINEL,
                Intent::Create,
                "Create post",
            ),
            EditorTarget::Existing(slug) => {
                (format!("Edit {slug}"), slug.as_str(), Intent::Update, "Save post")
            }
        };

        let field = |field: PostField, value: &Option<String>| EditorFieldView {
            value: value.clone().unwrap_or_default(),
            error: errors.get(field).map(str::to_string),
        };

        Self {
            heading,
            action: format!("{ADMIN_POSTS_PATH}/{route_slug}"),
            is_new: target.is_new(),
            submit_intent: submit_intent.as_str(),
            submit_label,
            title: field(PostField::Title, &draft.title),
            slug: field(PostField::Slug, &draft.slug),
            markdown: field(PostField::Markdown, &draft.markdown),
            summary: errors
                .iter()
                .map(|(field, message)| EditorErrorView {
                    field: field.to_string(),
                    message: message.to_string(),
                })
                .collect(),
        }
    }

    pub fn blank() -> Self {
        Self::new(&EditorTarget::New, &PostDraft::default(), &FieldErrors::new())
    }
}
