//! Post entity, candidate drafts, and the field validator.
//!
//! A [`Post`] is only ever built from a [`PostDraft`] that passed [`validate`],
//! so a persisted post never carries an empty slug, title or markdown body.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};

/// Route parameter that selects the blank editor instead of a stored post.
pub const NEW_POST_SENTINEL: &str = "new";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub markdown: String,
}

/// Lightweight listing row; never carries the markdown body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostListing {
    pub slug: String,
    pub title: String,
}

impl From<&Post> for PostListing {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
        }
    }
}

/// Candidate field values exactly as a caller submitted them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub markdown: Option<String>,
}

impl PostDraft {
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        markdown: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            slug: Some(slug.into()),
            markdown: Some(markdown.into()),
        }
    }

    /// Validate and convert into a [`Post`]; the error mapping is never empty on `Err`.
    pub fn into_post(self) -> Result<Post, FieldErrors> {
        let errors = validate(&self);

        match (self.title, self.slug, self.markdown) {
            (Some(title), Some(slug), Some(markdown)) if errors.is_empty() => Ok(Post {
                slug,
                title,
                markdown,
            }),
            _ => Err(errors),
        }
    }

    fn value(&self, field: PostField) -> Option<&str> {
        match field {
            PostField::Title => self.title.as_deref(),
            PostField::Slug => self.slug.as_deref(),
            PostField::Markdown => self.markdown.as_deref(),
        }
    }
}

impl From<&Post> for PostDraft {
    fn from(post: &Post) -> Self {
        Self::new(&post.title, &post.slug, &post.markdown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PostField {
    Title,
    Slug,
    Markdown,
}

impl PostField {
    pub const ALL: [PostField; 3] = [PostField::Title, PostField::Slug, PostField::Markdown];

    pub fn as_str(self) -> &'static str {
        match self {
            PostField::Title => "title",
            PostField::Slug => "slug",
            PostField::Markdown => "markdown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PostField::Title => "Title",
            PostField::Slug => "Slug",
            PostField::Markdown => "Markdown",
        }
    }
}

impl fmt::Display for PostField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-field error messages, keyed in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: BTreeMap<PostField, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: PostField, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    pub fn get(&self, field: PostField) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PostField, &str)> {
        self.entries
            .iter()
            .map(|(field, message)| (*field, message.as_str()))
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field.as_str(), message)?;
        }
        map.end()
    }
}

/// Check that every field is present and non-empty.
pub fn validate(draft: &PostDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();

    for field in PostField::ALL {
        let present = draft
            .value(field)
            .is_some_and(|value| !value.is_empty());
        if !present {
            errors.insert(field, format!("{} is required", field.label()));
        }
    }

    errors
}

pub fn is_reserved_slug(slug: &str) -> bool {
    slug == NEW_POST_SENTINEL
}

/// Slugs appear verbatim in URLs, so only `[A-Za-z0-9_-]` is accepted.
pub fn is_url_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

/// Slug rules beyond presence: URL-safe characters and not the editor sentinel.
pub fn check_slug(slug: &str) -> Option<String> {
    if is_reserved_slug(slug) {
        Some(format!("Slug `{NEW_POST_SENTINEL}` is reserved"))
    } else if !is_url_safe_slug(slug) {
        Some("Slug may only contain letters, digits, `-` and `_`".to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_draft_has_no_errors() {
        let draft = PostDraft::new("Hello", "hello", "# Hi");
        assert!(validate(&draft).is_empty());
    }

    #[test]
    fn missing_fields_are_reported_with_labels() {
        let draft = PostDraft {
            title: None,
            slug: Some(String::new()),
            markdown: Some("body".to_string()),
        };

        let errors = validate(&draft);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(PostField::Title), Some("Title is required"));
        assert_eq!(errors.get(PostField::Slug), Some("Slug is required"));
        assert_eq!(errors.get(PostField::Markdown), None);
    }

    #[test]
    fn whitespace_values_are_present() {
        assert!(validate(&PostDraft::new(" ", "t", "m")).is_empty());
        assert!(validate(&PostDraft::new("t", "t", "\n\t")).is_empty());
    }

    #[test]
    fn into_post_keeps_submitted_values() {
        let post = PostDraft::new("Hello", "hello", "# Hi")
            .into_post()
            .expect("valid draft");

        assert_eq!(post.slug, "hello");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.markdown, "# Hi");
    }

    #[test]
    fn into_post_refuses_empty_draft() {
        let errors = PostDraft::default().into_post().expect_err("empty draft");
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn field_errors_serialize_by_field_name() {
        let errors = validate(&PostDraft::new("t", "", "m"));
        let json = serde_json::to_value(&errors).expect("serialize");
        assert_eq!(json, serde_json::json!({ "slug": "Slug is required" }));
    }

    #[test]
    fn sentinel_slug_is_reserved() {
        assert!(is_reserved_slug("new"));
        assert!(!is_reserved_slug("news"));
        assert_eq!(
            check_slug("new").as_deref(),
            Some("Slug `new` is reserved")
        );
    }

    #[test]
    fn slugs_must_be_url_safe() {
        assert_eq!(check_slug("trail-riding_with-onewheel2"), None);
        assert!(check_slug("has space").is_some());
        assert!(check_slug("a/b").is_some());
        assert!(check_slug("ünicode").is_some());
    }
}
