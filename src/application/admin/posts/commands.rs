use tracing::{debug, info};

use crate::application::auth::CallerContext;
use crate::application::repos::RepoError;
use crate::domain::posts::{Post, PostDraft, PostField, check_slug, validate};

use super::service::AdminPostService;
use super::types::{
    AdminPostError, EditorTarget, MutationOutcome, MutationRequest, ResolvedMutation,
};

impl AdminPostService {
    /// Run one create/update/delete submission for the editor at `route_slug`.
    ///
    /// Order is fixed: admin gate, intent, validation, store. Nothing reaches
    /// the store when the gate or validation refuses the request.
    pub async fn submit_mutation(
        &self,
        caller: &CallerContext,
        route_slug: &str,
        request: MutationRequest,
    ) -> Result<MutationOutcome, AdminPostError> {
        self.authorize(caller, "submit")?;

        let target = EditorTarget::from_route(route_slug);
        let mutation = target.resolve(request.intent.as_deref())?;
        let intent = mutation.intent();

        let result = match mutation {
            ResolvedMutation::Create => self.create(request.draft).await,
            ResolvedMutation::Update(slug) => self.update(slug, request.draft).await,
            ResolvedMutation::Delete(slug) => self.delete(slug).await,
        };

        let outcome = match &result {
            Ok(outcome) => outcome.label(),
            Err(AdminPostError::NotFound { .. }) => "not_found",
            Err(AdminPostError::Conflict { .. }) => "conflict",
            Err(_) => "error",
        };
        metrics::counter!(
            "postdesk_post_mutations_total",
            "intent" => intent.as_str(),
            "outcome" => outcome
        )
        .increment(1);

        result
    }

    async fn create(&self, draft: PostDraft) -> Result<MutationOutcome, AdminPostError> {
        let post = match checked_post(draft) {
            Ok(post) => post,
            Err(outcome) => return Ok(outcome),
        };

        let slug = post.slug.clone();
        self.writer
            .insert_post(post)
            .await
            .map_err(|err| match err {
                RepoError::Duplicate { .. } => AdminPostError::Conflict { slug: slug.clone() },
                other => AdminPostError::Repo(other),
            })?;

        info!(target = "postdesk::admin::posts", slug = %slug, "post created");
        Ok(MutationOutcome::to_listing())
    }

    async fn update(
        &self,
        current_slug: &str,
        draft: PostDraft,
    ) -> Result<MutationOutcome, AdminPostError> {
        let post = match checked_post(draft) {
            Ok(post) => post,
            Err(outcome) => return Ok(outcome),
        };

        let new_slug = post.slug.clone();
        self.writer
            .update_post(current_slug, post)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => AdminPostError::NotFound {
                    slug: current_slug.to_string(),
                },
                RepoError::Duplicate { .. } => AdminPostError::Conflict {
                    slug: new_slug.clone(),
                },
                other => AdminPostError::Repo(other),
            })?;

        info!(
            target = "postdesk::admin::posts",
            slug = %current_slug,
            new_slug = %new_slug,
            "post updated"
        );
        Ok(MutationOutcome::to_listing())
    }

    async fn delete(&self, slug: &str) -> Result<MutationOutcome, AdminPostError> {
        self.writer.delete_post(slug).await.map_err(|err| match err {
            RepoError::NotFound => AdminPostError::NotFound {
                slug: slug.to_string(),
            },
            other => AdminPostError::Repo(other),
        })?;

        info!(target = "postdesk::admin::posts", slug = %slug, "post deleted");
        Ok(MutationOutcome::to_listing())
    }
}

/// Validate a draft, folding slug format rules into the same error mapping.
fn checked_post(draft: PostDraft) -> Result<Post, MutationOutcome> {
    let mut errors = validate(&draft);
    if errors.get(PostField::Slug).is_none()
        && let Some(message) = draft.slug.as_deref().and_then(check_slug)
    {
        errors.insert(PostField::Slug, message);
    }

    if !errors.is_empty() {
        debug!(
            target = "postdesk::admin::posts",
            fields = errors.len(),
            "draft rejected by validation"
        );
        return Err(MutationOutcome::Invalid { errors, draft });
    }

    draft
        .clone()
        .into_post()
        .map_err(|errors| MutationOutcome::Invalid { errors, draft })
}
