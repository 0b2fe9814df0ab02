//! Comment create/edit/delete. Every outcome other than a validation error
//! or a missing row lands back on the post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::domain::Comment;
use blogicum_core::forms::CommentForm;
use blogicum_core::policy;
use blogicum_shared::dto::FormResponse;

use super::{Submitted, post_url, redirect};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /posts/{post_id}/comment/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: Submitted<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    let text = body.into_inner().clean()?;
    let comment = state
        .comments
        .save(Comment::new(post.id, identity.user_id, text))
        .await?;

    tracing::info!(comment_id = %comment.id, post_id = %post.id, "Comment added");
    Ok(redirect(&post_url(post.id)))
}

/// GET /posts/{post_id}/comment/{comment_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = match own_comment(&state, &identity, post_id, comment_id).await? {
        Ok(comment) => comment,
        Err(denied) => return Ok(denied),
    };

    Ok(HttpResponse::Ok().json(FormResponse {
        form: CommentForm::from_comment(&comment),
    }))
}

/// POST /posts/{post_id}/comment/{comment_id}/edit/
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: Submitted<CommentForm>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let mut comment = match own_comment(&state, &identity, post_id, comment_id).await? {
        Ok(comment) => comment,
        Err(denied) => return Ok(denied),
    };

    comment.text = body.into_inner().clean()?;
    state.comments.save(comment).await?;

    tracing::info!(comment_id = %comment_id, "Comment updated");
    Ok(redirect(&post_url(post_id)))
}

/// POST /posts/{post_id}/comment/{comment_id}/delete/
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    if let Err(denied) = own_comment(&state, &identity, post_id, comment_id).await? {
        return Ok(denied);
    }

    state.comments.delete(comment_id).await?;

    tracing::info!(comment_id = %comment_id, "Comment deleted");
    Ok(redirect(&post_url(post_id)))
}

/// The comment when it sits under `post_id` and `identity` wrote it.
async fn own_comment(
    state: &AppState,
    identity: &Identity,
    post_id: Uuid,
    comment_id: Uuid,
) -> AppResult<Result<Comment, HttpResponse>> {
    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|comment| comment.post_id == post_id)
        .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

    if let Err(err) = policy::require_author(&comment, identity.user_id) {
        tracing::debug!(comment_id = %comment_id, user_id = %identity.user_id, "{}", err);
        return Ok(Err(redirect(&post_url(post_id))));
    }

    Ok(Ok(comment))
}
