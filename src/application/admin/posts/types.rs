use std::str::FromStr;

use thiserror::Error;

use crate::application::auth::AuthorizationError;
use crate::application::repos::RepoError;
use crate::domain::posts::{FieldErrors, NEW_POST_SENTINEL, PostDraft};

/// Where every successful mutation sends the caller.
pub const ADMIN_POSTS_PATH: &str = "/admin/posts";

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),
    #[error("post `{slug}` not found")]
    NotFound { slug: String },
    #[error("a post with slug `{slug}` already exists")]
    Conflict { slug: String },
    #[error("unknown intent `{0}`")]
    UnknownIntent(String),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Create,
    Update,
    Delete,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Create => "create",
            Intent::Update => "update",
            Intent::Delete => "delete",
        }
    }

    /// Parse the optional form field; blank means "not specified".
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, AdminPostError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some),
        }
    }
}

impl FromStr for Intent {
    type Err = AdminPostError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "create" => Ok(Intent::Create),
            "update" => Ok(Intent::Update),
            "delete" => Ok(Intent::Delete),
            other => Err(AdminPostError::UnknownIntent(other.to_string())),
        }
    }
}

/// The editor route parameter: the `new` sentinel or an existing slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorTarget {
    New,
    Existing(String),
}

impl EditorTarget {
    pub fn from_route(slug: &str) -> Self {
        if slug == NEW_POST_SENTINEL {
            EditorTarget::New
        } else {
            EditorTarget::Existing(slug.to_string())
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, EditorTarget::New)
    }

    /// The sentinel always creates and never looks at the intent field.
    /// Elsewhere only an explicit `delete` deletes and any other known intent
    /// updates the post under the route slug.
    pub(crate) fn resolve(
        &self,
        raw_intent: Option<&str>,
    ) -> Result<ResolvedMutation<'_>, AdminPostError> {
        match self {
            EditorTarget::New => Ok(ResolvedMutation::Create),
            EditorTarget::Existing(slug) => match Intent::parse_optional(raw_intent)? {
                Some(Intent::Delete) => Ok(ResolvedMutation::Delete(slug)),
                _ => Ok(ResolvedMutation::Update(slug)),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ResolvedMutation<'a> {
    Create,
    Update(&'a str),
    Delete(&'a str),
}

impl ResolvedMutation<'_> {
    pub(crate) fn intent(&self) -> Intent {
        match self {
            ResolvedMutation::Create => Intent::Create,
            ResolvedMutation::Update(_) => Intent::Update,
            ResolvedMutation::Delete(_) => Intent::Delete,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MutationRequest {
    pub intent: Option<String>,
    pub draft: PostDraft,
}

/// In-band results of a mutation. Field errors are a normal outcome so the
/// caller can re-display the form; everything else is an [`AdminPostError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Redirect { location: &'static str },
    Invalid { errors: FieldErrors, draft: PostDraft },
}

impl MutationOutcome {
    pub fn to_listing() -> Self {
        MutationOutcome::Redirect {
            location: ADMIN_POSTS_PATH,
        }
    }

    pub(crate) fn label(&self) -> &'static str {
        match self {
            MutationOutcome::Redirect { .. } => "saved",
            MutationOutcome::Invalid { .. } => "invalid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_route_always_creates() {
        let target = EditorTarget::from_route("new");
        assert!(target.is_new());
        for intent in [None, Some("update"), Some("delete"), Some("publish")] {
            assert_eq!(
                target.resolve(intent).expect("sentinel"),
                ResolvedMutation::Create
            );
        }
    }

    #[test]
    fn existing_route_updates_unless_deleting() {
        let target = EditorTarget::from_route("hello");
        assert_eq!(
            target.resolve(None).expect("none"),
            ResolvedMutation::Update("hello")
        );
        assert_eq!(
            target.resolve(Some("create")).expect("create"),
            ResolvedMutation::Update("hello")
        );
        assert_eq!(
            target.resolve(Some("delete")).expect("delete"),
            ResolvedMutation::Delete("hello")
        );
    }

    #[test]
    fn existing_route_rejects_unknown_intent() {
        let target = EditorTarget::from_route("hello");
        let err = target.resolve(Some("publish")).expect_err("unknown");
        assert!(matches!(err, AdminPostError::UnknownIntent(value) if value == "publish"));
    }

    #[test]
    fn intent_parsing_treats_blank_as_absent() {
        assert_eq!(Intent::parse_optional(None).expect("none"), None);
        assert_eq!(Intent::parse_optional(Some(" ")).expect("blank"), None);
        assert_eq!(
            Intent::parse_optional(Some("delete")).expect("delete"),
            Some(Intent::Delete)
        );
    }

    #[test]
    fn unknown_intent_is_rejected() {
        let err = Intent::parse_optional(Some("publish")).expect_err("unknown");
        assert!(matches!(err, AdminPostError::UnknownIntent(value) if value == "publish"));
    }
}
