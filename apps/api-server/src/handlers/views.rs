//! Domain values as wire DTOs.

use blogicum_core::domain::{AuthorRef, Category, CommentView, Location, PostSummary, User};
use blogicum_core::pagination::Page;
use blogicum_shared::dto::{
    AuthorResponse, CategoryResponse, CommentResponse, LocationResponse, PageResponse,
    PostResponse, ProfileResponse,
};

pub(crate) fn author(author: AuthorRef) -> AuthorResponse {
    AuthorResponse {
        id: author.id,
        username: author.username,
    }
}

pub(crate) fn profile(user: &User) -> ProfileResponse {
    ProfileResponse {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        date_joined: user.created_at,
    }
}

pub(crate) fn category(category: Category) -> CategoryResponse {
    CategoryResponse {
        title: category.title,
        description: category.description,
        slug: category.slug,
    }
}

fn location(location: Location) -> LocationResponse {
    LocationResponse {
        name: location.name,
    }
}

pub(crate) fn post(summary: PostSummary) -> PostResponse {
    let PostSummary {
        post,
        author: post_author,
        category: post_category,
        location: post_location,
        comment_count,
    } = summary;

    PostResponse {
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        image: post.image,
        is_published: post.publication.is_published,
        created_at: post.publication.created_at,
        author: author(post_author),
        category: post_category.map(category),
        location: post_location.map(location),
        comment_count,
    }
}

pub(crate) fn comment(view: CommentView) -> CommentResponse {
    CommentResponse {
        id: view.comment.id,
        text: view.comment.text,
        created_at: view.comment.creation.created_at,
        author: author(view.author),
    }
}

pub(crate) fn page(page: Page<PostSummary>) -> PageResponse<PostResponse> {
    let (has_next, has_previous) = (page.has_next(), page.has_previous());
    let page = page.map(post);

    PageResponse {
        items: page.items,
        page: page.number,
        num_pages: page.num_pages,
        total: page.total,
        has_next,
        has_previous,
    }
}
