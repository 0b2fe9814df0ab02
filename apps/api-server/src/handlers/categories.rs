//! Category listing.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::DomainError;
use blogicum_core::visibility::PostFilter;
use blogicum_shared::dto::CategoryPageResponse;

use super::{PageQuery, views};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /category/{slug}/
///
/// An unpublished category is a 404 for everyone, authors included.
pub async fn category_posts(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();
    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .filter(|category| category.is_published())
        .ok_or_else(|| DomainError::not_found("category", &slug))?;

    let filter = PostFilter::in_category(category.id, Utc::now());
    let page = state
        .posts
        .find_page(&filter, state.paginator, query.request())
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPageResponse {
        category: views::category(category),
        posts: views::page(page),
    }))
}
