//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use blogicum_core::domain::{
    AuthorRef, Category, CommentView, Location, Post, PostSummary, Publication, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{Page, PageRequest, Paginator};
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};
use blogicum_core::visibility::{Audience, PostFilter};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::location::{self, Entity as LocationEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<LocationEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(%username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

/// A post row annotated with the number of its comments.
#[derive(Debug, FromQueryResult)]
struct PostRow {
    id: Uuid,
    author_id: Uuid,
    title: String,
    text: String,
    pub_date: DateTimeWithTimeZone,
    image: Option<String>,
    location_id: Option<Uuid>,
    category_id: Option<Uuid>,
    is_published: bool,
    created_at: DateTimeWithTimeZone,
    comment_count: i64,
}

impl PostRow {
    fn into_post(self) -> (Post, u64) {
        let post = Post {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            text: self.text,
            pub_date: self.pub_date.into(),
            image: self.image,
            location_id: self.location_id,
            category_id: self.category_id,
            publication: Publication {
                is_published: self.is_published,
                created_at: self.created_at.into(),
            },
        };
        (post, self.comment_count.max(0) as u64)
    }
}

/// Posts joined with their (optional) category so that category
/// publication can take part in the filter.
fn filtered_posts(filter: &PostFilter) -> Select<PostEntity> {
    let mut condition = Condition::all();
    if let Some(author_id) = filter.author_id {
        condition = condition.add(post::Column::AuthorId.eq(author_id));
    }
    if let Some(category_id) = filter.category_id {
        condition = condition.add(post::Column::CategoryId.eq(category_id));
    }
    if let Audience::Public { now } = filter.audience {
        condition = condition
            .add(post::Column::IsPublished.eq(true))
            .add(post::Column::PubDate.lte(now))
            .add(
                Condition::any()
                    .add(post::Column::CategoryId.is_null())
                    .add(category::Column::IsPublished.eq(true)),
            );
    }

    PostEntity::find()
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .filter(condition)
}

/// Add the comment count column and newest-first ordering.
fn with_comment_count(select: Select<PostEntity>) -> Select<PostEntity> {
    select
        .column_as(
            Expr::col((CommentEntity, comment::Column::Id)).count(),
            "comment_count",
        )
        .join(JoinType::LeftJoin, post::Relation::Comments.def())
        .group_by(post::Column::Id)
        .order_by_desc(post::Column::PubDate)
        .order_by_desc(post::Column::CreatedAt)
}

impl PostgresPostRepository {
    /// Attach authors, categories and locations to counted rows.
    async fn summarize(&self, rows: Vec<PostRow>) -> Result<Vec<PostSummary>, RepoError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let author_ids: Vec<Uuid> = rows.iter().map(|row| row.author_id).collect();
        let category_ids: Vec<Uuid> = rows.iter().filter_map(|row| row.category_id).collect();
        let location_ids: Vec<Uuid> = rows.iter().filter_map(|row| row.location_id).collect();

        let authors: HashMap<Uuid, AuthorRef> = UserEntity::find()
            .filter(user::Column::Id.is_in(author_ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|model| {
                (
                    model.id,
                    AuthorRef {
                        id: model.id,
                        username: model.username,
                    },
                )
            })
            .collect();

        let categories: HashMap<Uuid, Category> = if category_ids.is_empty() {
            HashMap::new()
        } else {
            CategoryEntity::find()
                .filter(category::Column::Id.is_in(category_ids))
                .all(&self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|model| (model.id, model.into()))
                .collect()
        };

        let locations: HashMap<Uuid, Location> = if location_ids.is_empty() {
            HashMap::new()
        } else {
            LocationEntity::find()
                .filter(location::Column::Id.is_in(location_ids))
                .all(&self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|model| (model.id, model.into()))
                .collect()
        };

        rows.into_iter()
            .map(|row| {
                let (post, comment_count) = row.into_post();
                let author = authors
                    .get(&post.author_id)
                    .cloned()
                    .ok_or_else(|| RepoError::Query(format!("author of post {} missing", post.id)))?;
                Ok(PostSummary {
                    category: post.category_id.and_then(|id| categories.get(&id).cloned()),
                    location: post.location_id.and_then(|id| locations.get(&id).cloned()),
                    author,
                    comment_count,
                    post,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_page(
        &self,
        filter: &PostFilter,
        paginator: Paginator,
        request: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let total = filtered_posts(filter)
            .count(&self.db)
            .await
            .map_err(map_db_err)?;
        let window = paginator.window(total, request);

        let rows = with_comment_count(filtered_posts(filter))
            .offset(window.offset)
            .limit(window.limit)
            .into_model::<PostRow>()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        tracing::debug!(
            total,
            page = window.number,
            rows = rows.len(),
            "Loaded post page"
        );

        Ok(Page::new(self.summarize(rows).await?, window, total))
    }

    async fn find_summary(&self, id: Uuid) -> Result<Option<PostSummary>, RepoError> {
        let row = with_comment_count(PostEntity::find().filter(post::Column::Id.eq(id)))
            .into_model::<PostRow>()
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match row {
            Some(row) => Ok(self.summarize(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = author.ok_or_else(|| {
                    RepoError::Query(format!("author of comment {} missing", comment.id))
                })?;
                Ok(CommentView {
                    author: AuthorRef {
                        id: author.id,
                        username: author.username,
                    },
                    comment: comment.into(),
                })
            })
            .collect()
    }
}
