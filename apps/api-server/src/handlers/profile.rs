//! User profile page and the owner's profile form.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::DomainError;
use blogicum_core::domain::User;
use blogicum_core::forms::{FormErrors, ProfileForm};
use blogicum_core::visibility::PostFilter;
use blogicum_shared::dto::{FormResponse, ProfilePageResponse};

use super::{PageQuery, Submitted, profile_url, redirect, views};
use crate::middleware::auth::{Identity, OptionalIdentity, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /profile/{username}/
///
/// The owner sees all of their posts; everyone else only the public ones.
pub async fn profile(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();
    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| DomainError::not_found("user", &username))?;

    let filter = PostFilter::profile(user.id, identity.user_id(), Utc::now());
    let page = state
        .posts
        .find_page(&filter, state.paginator, query.request())
        .await?;

    Ok(HttpResponse::Ok().json(ProfilePageResponse {
        profile: views::profile(&user),
        posts: views::page(page),
    }))
}

/// GET /profile/edit/
pub async fn edit_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = current_user(&state, &identity).await?;

    Ok(HttpResponse::Ok().json(FormResponse {
        form: ProfileForm::from_user(&user),
    }))
}

/// POST /profile/edit/
///
/// A rename re-issues the session so later requests carry the new username.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: Submitted<ProfileForm>,
) -> AppResult<HttpResponse> {
    let mut user = current_user(&state, &identity).await?;
    let input = body.into_inner().clean()?;

    if input.username != user.username
        && state.users.find_by_username(&input.username).await?.is_some()
    {
        return Err(FormErrors::single("username", "A user with that username already exists.").into());
    }

    input.apply(&mut user);
    let user = state.users.save(user).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "Profile updated");

    let token = state.tokens.generate_token(user.id, &user.username)?;
    let mut response = redirect(&profile_url(&user.username));
    response.add_cookie(&session_cookie(token, state.tokens.expiration_seconds()))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}

/// The signed-in user's row. A session that outlived its user is no session.
async fn current_user(state: &AppState, identity: &Identity) -> AppResult<User> {
    state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}
