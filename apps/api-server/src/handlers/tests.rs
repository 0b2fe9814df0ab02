use std::sync::Arc;

use actix_web::{
    App,
    http::{StatusCode, header},
    test, web,
};
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Value, json};

use blogicum_core::domain::{Category, Comment, Post, User};
use blogicum_core::ports::{BaseRepository, CommentRepository};
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::middleware::auth::SESSION_COOKIE;
use crate::state::AppState;

struct Fixture {
    store: InMemoryStore,
    state: AppState,
}

impl Fixture {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let state = AppState::in_memory(
            store.clone(),
            Arc::new(JwtTokenService::new(JwtConfig::default())),
            Arc::new(Argon2PasswordService::new()),
        );
        Self { store, state }
    }

    /// A saved user and the `Authorization` header value for them.
    async fn user(&self, username: &str) -> (User, String) {
        let user = self
            .store
            .users()
            .save(User::new(username.into(), String::new(), "not-a-hash".into()))
            .await
            .unwrap();
        let token = self.state.tokens.generate_token(user.id, &user.username).unwrap();
        (user, format!("Bearer {token}"))
    }

    async fn post_at(&self, author: &User, pub_date: DateTime<Utc>) -> Post {
        self.save_post(Post::new(author.id, "Title".into(), "Text".into(), pub_date))
            .await
    }

    async fn visible_post(&self, author: &User) -> Post {
        self.post_at(author, Utc::now() - TimeDelta::hours(1)).await
    }

    async fn save_post(&self, post: Post) -> Post {
        self.store.posts().save(post).await.unwrap()
    }

    async fn category(&self, slug: &str, is_published: bool) -> Category {
        let mut category = Category::new(slug.to_uppercase(), "About".into(), slug.into());
        category.publication.is_published = is_published;
        self.store.categories().save(category).await.unwrap()
    }

    async fn comment(&self, post: &Post, author: &User, text: &str) -> Comment {
        self.store
            .comments()
            .save(Comment::new(post.id, author.id, text.into()))
            .await
            .unwrap()
    }

    async fn comment_count(&self, post: &Post) -> usize {
        self.store.comments().find_by_post(post.id).await.unwrap().len()
    }
}

macro_rules! app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($fixture.state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn location<B>(res: &actix_web::dev::ServiceResponse<B>) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[actix_rt::test]
async fn test_future_post_is_hidden_from_others_but_not_its_author() {
    let fx = Fixture::new();
    let (a, auth_a) = fx.user("anna").await;
    let (_b, auth_b) = fx.user("boris").await;
    let post = fx.post_at(&a, Utc::now() + TimeDelta::days(1)).await;
    let app = app!(fx);
    let uri = format!("/posts/{}/", post.id);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, auth_b))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri(&uri).to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((header::AUTHORIZATION, auth_a))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["post"]["id"], post.id.to_string());
    assert_eq!(body["form"]["text"], "");
}

#[actix_rt::test]
async fn test_unpublished_post_and_hidden_category_are_not_found() {
    let fx = Fixture::new();
    let (author, _) = fx.user("anna").await;
    let hidden = fx.category("drafts", false).await;

    let mut unpublished = Post::new(author.id, "Draft".into(), "...".into(), Utc::now());
    unpublished.publication.is_published = false;
    let unpublished = fx.save_post(unpublished).await;

    let mut in_hidden = Post::new(author.id, "Filed".into(), "...".into(), Utc::now());
    in_hidden.category_id = Some(hidden.id);
    let in_hidden = fx.save_post(in_hidden).await;

    let app = app!(fx);
    for post in [unpublished, in_hidden] {
        let req = test::TestRequest::get()
            .uri(&format!("/posts/{}/", post.id))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["status"], 404);
    }
}

#[actix_rt::test]
async fn test_index_lists_public_posts_with_comment_counts() {
    let fx = Fixture::new();
    let (author, _) = fx.user("anna").await;
    let (reader, _) = fx.user("boris").await;
    let visible = fx.visible_post(&author).await;
    fx.post_at(&author, Utc::now() + TimeDelta::days(1)).await;
    fx.comment(&visible, &reader, "first").await;
    fx.comment(&visible, &author, "second").await;
    let app = app!(fx);

    let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;

    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], visible.id.to_string());
    assert_eq!(body["items"][0]["comment_count"], 2);
    assert_eq!(body["items"][0]["author"]["username"], "anna");
}

#[actix_rt::test]
async fn test_index_pagination_clamps_page_numbers() {
    let fx = Fixture::new();
    let (author, _) = fx.user("anna").await;
    for hours in 1..=12 {
        fx.post_at(&author, Utc::now() - TimeDelta::hours(hours)).await;
    }
    let app = app!(fx);

    for (query, page, items) in [
        ("", 1, 10),
        ("?page=2", 2, 2),
        ("?page=99", 2, 2),
        ("?page=0", 1, 10),
        ("?page=abc", 1, 10),
        ("?page=99999999999999999999", 2, 2),
    ] {
        let req = test::TestRequest::get().uri(&format!("/{query}")).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["page"], page, "query {query:?}");
        assert_eq!(body["num_pages"], 2);
        assert_eq!(body["items"].as_array().unwrap().len(), items, "query {query:?}");
    }
}

#[actix_rt::test]
async fn test_empty_comment_is_rejected_without_a_write() {
    let fx = Fixture::new();
    let (author, auth) = fx.user("anna").await;
    let post = fx.visible_post(&author).await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({ "text": "" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"]["text"][0], "This field is required.");
    assert_eq!(fx.comment_count(&post).await, 0);
}

#[actix_rt::test]
async fn test_comment_is_added_and_redirects_to_post() {
    let fx = Fixture::new();
    let (author, _) = fx.user("anna").await;
    let (_, auth) = fx.user("boris").await;
    let post = fx.visible_post(&author).await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/", post.id))
        .insert_header((header::AUTHORIZATION, auth))
        .set_form(&[("text", "Nice view")])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/posts/{}/", post.id));
    assert_eq!(fx.comment_count(&post).await, 1);
}

#[actix_rt::test]
async fn test_anonymous_writes_redirect_to_login() {
    let fx = Fixture::new();
    let (author, _) = fx.user("anna").await;
    let post = fx.visible_post(&author).await;
    let app = app!(fx);

    let req = test::TestRequest::get().uri("/posts/create/").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/auth/login/?next=%2Fposts%2Fcreate%2F");

    let comment_uri = format!("/posts/{}/comment/", post.id);
    let req = test::TestRequest::post()
        .uri(&comment_uri)
        .set_json(json!({ "text": "hi" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert!(location(&res).starts_with("/auth/login/?next=%2Fposts%2F"));
    assert_eq!(fx.comment_count(&post).await, 0);

    let req = test::TestRequest::get().uri("/profile/edit/").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(location(&res), "/auth/login/?next=%2Fprofile%2Fedit%2F");
}

#[actix_rt::test]
async fn test_only_the_author_can_edit_or_delete_a_post() {
    let fx = Fixture::new();
    let (author, author_auth) = fx.user("anna").await;
    let (_, stranger_auth) = fx.user("boris").await;
    let post = fx.visible_post(&author).await;
    let app = app!(fx);
    let detail = format!("/posts/{}/", post.id);
    let edit = json!({ "title": "Hijacked", "text": "x", "pub_date": Utc::now() });

    // Anonymous and stranger are both sent back to the post.
    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .set_json(&edit)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), detail);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header((header::AUTHORIZATION, stranger_auth.clone()))
        .set_json(&edit)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(location(&res), detail);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", post.id))
        .insert_header((header::AUTHORIZATION, stranger_auth.clone()))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), detail);

    // Even the edit page is a redirect, never a 403.
    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header((header::AUTHORIZATION, stranger_auth))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), detail);

    let unchanged = fx.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(unchanged.title, "Title");

    // The author gets the current values, then saves new ones.
    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header((header::AUTHORIZATION, author_auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["form"]["title"], "Title");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header((header::AUTHORIZATION, author_auth))
        .set_json(json!({ "title": "Baikal", "text": "Ice", "pub_date": post.pub_date }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), detail);

    let updated = fx.store.posts().find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(updated.title, "Baikal");
    assert_eq!(updated.author_id, author.id);
}

#[actix_rt::test]
async fn test_deleting_a_post_removes_its_comments() {
    let fx = Fixture::new();
    let (author, auth) = fx.user("anna").await;
    let post = fx.visible_post(&author).await;
    let comment = fx.comment(&post, &author, "mine").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", post.id))
        .insert_header((header::AUTHORIZATION, auth))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/");
    assert!(fx.store.posts().find_by_id(post.id).await.unwrap().is_none());
    assert!(fx.store.comments().find_by_id(comment.id).await.unwrap().is_none());
}

#[actix_rt::test]
async fn test_create_post_from_form_submission() {
    let fx = Fixture::new();
    let (author, auth) = fx.user("anna").await;
    let category = fx.category("travel", true).await;
    let app = app!(fx);

    let req = test::TestRequest::get()
        .uri("/posts/create/")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body["form"]["pub_date"].is_string());
    assert_eq!(body["form"]["is_published"], true);

    let category_id = category.id.to_string();
    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .insert_header((header::AUTHORIZATION, auth))
        .set_form(&[
            ("title", "Altai"),
            ("text", "Mountains"),
            ("pub_date", "2024-03-01T10:00:00Z"),
            ("category_id", category_id.as_str()),
        ])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/profile/anna/");

    let req = test::TestRequest::get().uri("/category/travel/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["category"]["slug"], "travel");
    assert_eq!(body["posts"]["total"], 1);
    assert_eq!(body["posts"]["items"][0]["author"]["id"], author.id.to_string());
}

#[actix_rt::test]
async fn test_create_post_reports_invalid_fields() {
    let fx = Fixture::new();
    let (author, auth) = fx.user("anna").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({
            "title": "",
            "text": "Body",
            "pub_date": Utc::now(),
            "category_id": uuid::Uuid::new_v4(),
        }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert!(body["errors"]["title"].is_array());
    assert!(body["errors"]["category_id"].is_array());

    let req = test::TestRequest::get().uri("/profile/anna/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["profile"]["id"], author.id.to_string());
    assert_eq!(body["posts"]["total"], 0);
}

#[actix_rt::test]
async fn test_malformed_post_values_are_field_errors() {
    let fx = Fixture::new();
    let (_, auth) = fx.user("anna").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({
            "title": "Altai",
            "text": "Mountains",
            "pub_date": "tomorrow",
            "category_id": "not-a-uuid",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"]["pub_date"][0], "Enter a valid date/time.");
    assert_eq!(
        body["errors"]["category_id"][0],
        "Select a valid choice. That choice is not one of the available choices."
    );

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .insert_header((header::AUTHORIZATION, auth))
        .set_form(&[("title", "Altai"), ("pub_date", "yesterday")])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert!(body["errors"]["text"].is_array());
    assert!(body["errors"]["pub_date"].is_array());
}

#[actix_rt::test]
async fn test_browser_form_with_local_time_and_checkbox() {
    let fx = Fixture::new();
    let (author, auth) = fx.user("anna").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .insert_header((header::AUTHORIZATION, auth))
        .set_form(&[
            ("title", "Altai"),
            ("text", "Mountains"),
            ("pub_date", "2024-03-01T10:00"),
            ("is_published", "on"),
            ("category_id", ""),
        ])
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/profile/anna/");

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["author"]["id"], author.id.to_string());
    assert_eq!(body["items"][0]["title"], "Altai");
}

#[actix_rt::test]
async fn test_only_the_author_can_change_a_comment() {
    let fx = Fixture::new();
    let (author, author_auth) = fx.user("anna").await;
    let (_, stranger_auth) = fx.user("boris").await;
    let post = fx.visible_post(&author).await;
    let other_post = fx.visible_post(&author).await;
    let comment = fx.comment(&post, &author, "original").await;
    let app = app!(fx);
    let edit_uri = format!("/posts/{}/comment/{}/edit/", post.id, comment.id);

    let req = test::TestRequest::post()
        .uri(&edit_uri)
        .insert_header((header::AUTHORIZATION, stranger_auth.clone()))
        .set_json(json!({ "text": "vandalised" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), format!("/posts/{}/", post.id));

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/{}/delete/", post.id, comment.id))
        .insert_header((header::AUTHORIZATION, stranger_auth))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);
    assert_eq!(fx.comment_count(&post).await, 1);

    // Addressed through the wrong post it does not exist.
    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/comment/{}/edit/", other_post.id, comment.id))
        .insert_header((header::AUTHORIZATION, author_auth.clone()))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&edit_uri)
        .insert_header((header::AUTHORIZATION, author_auth.clone()))
        .set_json(json!({ "text": "edited" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FOUND);
    let stored = fx.store.comments().find_by_id(comment.id).await.unwrap().unwrap();
    assert_eq!(stored.text, "edited");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/comment/{}/delete/", post.id, comment.id))
        .insert_header((header::AUTHORIZATION, author_auth))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(location(&res), format!("/posts/{}/", post.id));
    assert_eq!(fx.comment_count(&post).await, 0);
}

#[actix_rt::test]
async fn test_category_page_hides_unpublished_categories() {
    let fx = Fixture::new();
    let (author, _) = fx.user("anna").await;
    let hidden = fx.category("hidden", false).await;
    let mut post = Post::new(author.id, "T".into(), "T".into(), Utc::now());
    post.category_id = Some(hidden.id);
    fx.save_post(post).await;
    let app = app!(fx);

    for uri in ["/category/hidden/", "/category/missing/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}

#[actix_rt::test]
async fn test_profile_shows_owner_everything_and_others_public_posts() {
    let fx = Fixture::new();
    let (owner, owner_auth) = fx.user("anna").await;
    let (_, other_auth) = fx.user("boris").await;
    fx.visible_post(&owner).await;
    fx.post_at(&owner, Utc::now() + TimeDelta::days(3)).await;
    let app = app!(fx);

    for (auth, total) in [(owner_auth, 2), (other_auth, 1)] {
        let req = test::TestRequest::get()
            .uri("/profile/anna/")
            .insert_header((header::AUTHORIZATION, auth))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["posts"]["total"], total);
    }

    let req = test::TestRequest::get().uri("/profile/nobody/").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_profile_edit_renames_and_rejects_taken_usernames() {
    let fx = Fixture::new();
    let (user, auth) = fx.user("anna").await;
    fx.user("boris").await;
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/profile/edit/")
        .insert_header((header::AUTHORIZATION, auth.clone()))
        .set_json(json!({ "username": "boris" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/profile/edit/")
        .insert_header((header::AUTHORIZATION, auth))
        .set_json(json!({ "username": "anna.k", "first_name": "Anna" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(location(&res), "/profile/anna.k/");
    assert!(res.response().cookies().any(|c| c.name() == SESSION_COOKIE));

    let renamed = fx.store.users().find_by_id(user.id).await.unwrap().unwrap();
    assert_eq!(renamed.username, "anna.k");
    assert_eq!(renamed.first_name, "Anna");
}

#[actix_rt::test]
async fn test_registration_login_and_logout() {
    let fx = Fixture::new();
    let app = app!(fx);

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_json(json!({
            "username": "reader",
            "email": "reader@example.com",
            "password": "long-enough",
            "password_confirmation": "long-enough",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({ "username": "reader", "password": "wrong-password" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({ "username": "reader", "password": "long-enough" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = res
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
        .unwrap();
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["username"], "reader");
    assert_eq!(body["token_type"], "Bearer");

    // The cookie alone is a session.
    let req = test::TestRequest::get()
        .uri("/posts/create/")
        .cookie(cookie)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post().uri("/auth/logout/").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let removal = res
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap();
    assert_eq!(removal.value(), "");
}

#[actix_rt::test]
async fn test_unknown_routes_and_bad_ids_are_json_404s() {
    let fx = Fixture::new();
    let app = app!(fx);

    for uri in ["/nowhere/", "/posts/not-a-uuid/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "{uri}");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["title"], "Not Found");
    }

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}
