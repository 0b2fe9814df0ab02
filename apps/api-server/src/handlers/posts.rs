//! Post pages: the index, detail, and the author's create/edit/delete forms.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::domain::Post;
use blogicum_core::forms::{CommentForm, FormErrors, INVALID_CHOICE, PostForm, PostInput};
use blogicum_core::policy;
use blogicum_core::visibility::{PostFilter, can_view};
use blogicum_shared::dto::{FormResponse, PostDetailResponse};

use super::{PageQuery, Submitted, post_url, profile_url, redirect, views};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /
pub async fn index(state: web::Data<AppState>, query: web::Query<PageQuery>) -> AppResult<HttpResponse> {
    let filter = PostFilter::published(Utc::now());
    let page = state
        .posts
        .find_page(&filter, state.paginator, query.request())
        .await?;

    Ok(HttpResponse::Ok().json(views::page(page)))
}

/// GET /posts/{post_id}/
///
/// Hidden posts are reported as missing to everyone but their author.
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let summary = state
        .posts
        .find_summary(post_id)
        .await?
        .filter(|summary| {
            can_view(
                &summary.post,
                summary.category.as_ref(),
                identity.user_id(),
                Utc::now(),
            )
        })
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    let comments = state.comments.find_by_post(post_id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: views::post(summary),
        comments: comments.into_iter().map(views::comment).collect(),
        form: CommentForm::default(),
    }))
}

/// GET /posts/create/
pub async fn create_form(_identity: Identity) -> HttpResponse {
    HttpResponse::Ok().json(FormResponse {
        form: PostForm::initial(Utc::now()),
    })
}

/// POST /posts/create/
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: Submitted<PostForm>,
) -> AppResult<HttpResponse> {
    let author = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let input = clean(&state, body.into_inner()).await?;
    let post = state.posts.save(input.into_post(author.id)).await?;

    tracing::info!(post_id = %post.id, author = %author, "Post created");
    Ok(redirect(&profile_url(&author.username)))
}

/// GET /posts/{post_id}/edit/
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = match own_post(&state, &identity, path.into_inner()).await? {
        Ok(post) => post,
        Err(denied) => return Ok(denied),
    };

    Ok(HttpResponse::Ok().json(FormResponse {
        form: PostForm::from_post(&post),
    }))
}

/// POST /posts/{post_id}/edit/
pub async fn update(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    body: Submitted<PostForm>,
) -> AppResult<HttpResponse> {
    let mut post = match own_post(&state, &identity, path.into_inner()).await? {
        Ok(post) => post,
        Err(denied) => return Ok(denied),
    };

    clean(&state, body.into_inner()).await?.apply(&mut post);
    let post = state.posts.save(post).await?;

    tracing::info!(post_id = %post.id, "Post updated");
    Ok(redirect(&post_url(post.id)))
}

/// POST /posts/{post_id}/delete/
pub async fn delete(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = match own_post(&state, &identity, path.into_inner()).await? {
        Ok(post) => post,
        Err(denied) => return Ok(denied),
    };

    state.posts.delete(post.id).await?;

    tracing::info!(post_id = %post.id, "Post deleted");
    Ok(redirect("/"))
}

/// The post behind `post_id` when `identity` wrote it. Anyone else,
/// signed in or not, gets the redirect back to the post instead.
async fn own_post(
    state: &AppState,
    identity: &OptionalIdentity,
    post_id: Uuid,
) -> AppResult<Result<Post, HttpResponse>> {
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    let Some(identity) = &identity.0 else {
        return Ok(Err(redirect(&post_url(post_id))));
    };

    if let Err(err) = policy::require_author(&post, identity.user_id) {
        tracing::debug!(post_id = %post_id, user_id = %identity.user_id, "{}", err);
        return Ok(Err(redirect(&post_url(post_id))));
    }

    Ok(Ok(post))
}

/// Validate a submitted post, including that its category and location exist.
async fn clean(state: &AppState, form: PostForm) -> AppResult<PostInput> {
    let mut missing = FormErrors::new();
    if let Some(category_id) = form.category() {
        if state.categories.find_by_id(category_id).await?.is_none() {
            missing.add("category_id", INVALID_CHOICE);
        }
    }
    if let Some(location_id) = form.location() {
        if state.locations.find_by_id(location_id).await?.is_none() {
            missing.add("location_id", INVALID_CHOICE);
        }
    }

    match form.clean() {
        Ok(input) => missing.into_result(input).map_err(AppError::from),
        Err(mut errors) => {
            errors.merge(missing);
            Err(AppError::from(errors))
        }
    }
}
