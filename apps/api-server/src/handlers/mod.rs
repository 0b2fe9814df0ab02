//! HTTP handlers and route configuration.

mod auth;
mod categories;
mod comments;
mod health;
mod posts;
mod profile;
mod views;

#[cfg(test)]
mod tests;

use std::future::Future;
use std::pin::Pin;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, http::header, mime, web};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::middleware::error::{AppError, AppResult};

/// Body of a write request, as JSON or as an HTML form submission.
///
/// The `Content-Type` picks the decoder, so a bad form body reports the form
/// error rather than a JSON one.
pub(crate) struct Submitted<T>(T);

impl<T> Submitted<T> {
    pub(crate) fn into_inner(self) -> T {
        self.0
    }
}

impl<T> FromRequest for Submitted<T>
where
    T: DeserializeOwned + 'static,
{
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if req.content_type() == mime::APPLICATION_WWW_FORM_URLENCODED.essence_str() {
            let form = web::Form::<T>::from_request(req, payload);
            Box::pin(async move { Ok(Submitted(form.await?.into_inner())) })
        } else {
            let json = web::Json::<T>::from_request(req, payload);
            Box::pin(async move { Ok(Submitted(json.await?.into_inner())) })
        }
    }
}

/// Query string of paginated listings.
#[derive(Debug, Deserialize)]
pub(crate) struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    pub(crate) fn request(&self) -> blogicum_core::pagination::PageRequest {
        blogicum_core::pagination::PageRequest::parse(self.page.as_deref())
    }
}

pub(crate) fn post_url(post_id: Uuid) -> String {
    format!("/posts/{post_id}/")
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/profile/{username}/")
}

/// `302 Found` to `location`.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, req| AppError::NotFound(format!("{}: {err}", req.path())).into()),
    )
    .app_data(
        web::JsonConfig::default().error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::FormConfig::default().error_handler(|err, _| AppError::BadRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(posts::index))
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/posts")
            // Registered before `/{post_id}/` so "create" is never read as an ID.
            .service(
                web::resource("/create/")
                    .route(web::get().to(posts::create_form))
                    .route(web::post().to(posts::create)),
            )
            .route("/{post_id}/", web::get().to(posts::detail))
            .service(
                web::resource("/{post_id}/edit/")
                    .route(web::get().to(posts::edit_form))
                    .route(web::post().to(posts::update)),
            )
            .route("/{post_id}/delete/", web::post().to(posts::delete))
            .route("/{post_id}/comment/", web::post().to(comments::create))
            .service(
                web::resource("/{post_id}/comment/{comment_id}/edit/")
                    .route(web::get().to(comments::edit_form))
                    .route(web::post().to(comments::update)),
            )
            .route(
                "/{post_id}/comment/{comment_id}/delete/",
                web::post().to(comments::delete),
            ),
    )
    .route("/category/{slug}/", web::get().to(categories::category_posts))
    .service(
        web::resource("/profile/edit/")
            .route(web::get().to(profile::edit_form))
            .route(web::post().to(profile::update)),
    )
    .route("/profile/{username}/", web::get().to(profile::profile))
    .service(
        web::scope("/auth")
            .route("/registration/", web::post().to(auth::register))
            .route("/login/", web::post().to(auth::login))
            .route("/logout/", web::post().to(auth::logout)),
    )
    .default_service(web::to(not_found));
}

/// Fallback for unknown routes.
async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    Err(AppError::NotFound(format!("No route for {}", req.path())))
}
