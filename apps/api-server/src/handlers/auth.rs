//! Registration and session handlers.

use actix_web::{HttpResponse, web};

use blogicum_core::domain::User;
use blogicum_core::forms::{FormErrors, RegistrationForm};
use blogicum_shared::dto::{AuthResponse, LoginRequest};

use super::Submitted;
use crate::middleware::auth::{expired_session_cookie, session_cookie};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /auth/registration/
pub async fn register(
    state: web::Data<AppState>,
    body: Submitted<RegistrationForm>,
) -> AppResult<HttpResponse> {
    let input = body.into_inner().clean()?;

    if state.users.find_by_username(&input.username).await?.is_some() {
        return Err(FormErrors::single("username", "A user with that username already exists.").into());
    }

    let password_hash = state.passwords.hash(&input.password)?;
    let user = state
        .users
        .save(User::new(input.username, input.email, password_hash))
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");
    session_response(&state, &user, HttpResponse::Created())
}

/// POST /auth/login/
pub async fn login(
    state: web::Data<AppState>,
    body: Submitted<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %req.username, "Rejected login");
        return Err(AppError::Unauthorized);
    }

    session_response(&state, &user, HttpResponse::Ok())
}

/// POST /auth/logout/
pub async fn logout() -> HttpResponse {
    HttpResponse::NoContent()
        .cookie(expired_session_cookie())
        .finish()
}

/// The token in the body for API clients and in a cookie for browsers.
fn session_response(
    state: &AppState,
    user: &User,
    mut builder: actix_web::HttpResponseBuilder,
) -> AppResult<HttpResponse> {
    let access_token = state.tokens.generate_token(user.id, &user.username)?;
    let expires_in = state.tokens.expiration_seconds();

    Ok(builder
        .cookie(session_cookie(access_token.clone(), expires_in))
        .json(AuthResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: expires_in.max(0) as u64,
            username: user.username.clone(),
        }))
}
