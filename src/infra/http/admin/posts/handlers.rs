use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    application::{
        admin::posts::{AdminPostError, EditorTarget, MutationOutcome},
        error::ErrorReport,
    },
    domain::posts::{FieldErrors, PostDraft, PostField},
    infra::http::{Caller, admin::AdminState},
    presentation::{
        admin::views::{AdminEditorTemplate, AdminEditorView, AdminPostsTemplate},
        views::render_template_response,
    },
};

use super::{errors::admin_post_error, forms::AdminPostForm};

pub(crate) async fn admin_posts(
    State(state): State<AdminState>,
    Caller(caller): Caller,
) -> Response {
    match state.posts.list(&caller).await {
        Ok(posts) => render_template_response(AdminPostsTemplate { posts }, StatusCode::OK),
        Err(err) => admin_post_error("infra::http::admin::posts::admin_posts", err),
    }
}

pub(crate) async fn admin_post_editor(
    State(state): State<AdminState>,
    Caller(caller): Caller,
    Path(slug): Path<String>,
) -> Response {
    let target = EditorTarget::from_route(&slug);

    match state.posts.view_editor(&caller, &slug).await {
        Ok(Some(post)) => editor_response(
            &target,
            &PostDraft::from(&post),
            &FieldErrors::new(),
            StatusCode::OK,
        ),
        Ok(None) => render_template_response(
            AdminEditorTemplate {
                view: AdminEditorView::blank(),
            },
            StatusCode::OK,
        ),
        Err(err) => admin_post_error("infra::http::admin::posts::admin_post_editor", err),
    }
}

pub(crate) async fn admin_post_submit(
    State(state): State<AdminState>,
    Caller(caller): Caller,
    Path(slug): Path<String>,
    Form(form): Form<AdminPostForm>,
) -> Response {
    const SOURCE: &str = "infra::http::admin::posts::admin_post_submit";

    let request = form.into_request();
    let submitted = request.draft.clone();
    let target = EditorTarget::from_route(&slug);

    match state.posts.submit_mutation(&caller, &slug, request).await {
        Ok(MutationOutcome::Redirect { location }) => Redirect::to(location).into_response(),
        Ok(MutationOutcome::Invalid { errors, draft }) => {
            editor_response(&target, &draft, &errors, StatusCode::OK)
        }
        Err(err @ AdminPostError::Conflict { .. }) => {
            let mut errors = FieldErrors::new();
            errors.insert(PostField::Slug, err.to_string());
            let mut response = editor_response(&target, &submitted, &errors, StatusCode::CONFLICT);
            ErrorReport::from_error(SOURCE, StatusCode::CONFLICT, &err).attach(&mut response);
            response
        }
        Err(err) => admin_post_error(SOURCE, err),
    }
}

fn editor_response(
    target: &EditorTarget,
    draft: &PostDraft,
    errors: &FieldErrors,
    status: StatusCode,
) -> Response {
    render_template_response(
        AdminEditorTemplate {
            view: AdminEditorView::new(target, draft, errors),
        },
        status,
    )
}
