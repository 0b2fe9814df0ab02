//! In-memory repositories - used when no database is configured and in tests.
//!
//! All repositories handed out by one [`InMemoryStore`] share the same tables,
//! and enforce the same uniqueness, reference and cascade rules as the
//! PostgreSQL schema. Data is lost on process restart.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{
    AuthorRef, Category, Comment, CommentView, Location, Post, PostSummary, User,
};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{Page, PageRequest, Paginator};
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
use blogicum_core::visibility::PostFilter;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    locations: HashMap<Uuid, Location>,
    categories: HashMap<Uuid, Category>,
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

impl Tables {
    fn remove_post(&mut self, post_id: Uuid) {
        self.posts.remove(&post_id);
        self.comments.retain(|_, comment| comment.post_id != post_id);
    }

    fn summarize(&self, post: &Post) -> Result<PostSummary, RepoError> {
        let author = self
            .users
            .get(&post.author_id)
            .map(AuthorRef::from)
            .ok_or_else(|| RepoError::Query(format!("author of post {} missing", post.id)))?;

        Ok(PostSummary {
            author,
            category: post
                .category_id
                .and_then(|id| self.categories.get(&id).cloned()),
            location: post
                .location_id
                .and_then(|id| self.locations.get(&id).cloned()),
            comment_count: self
                .comments
                .values()
                .filter(|comment| comment.post_id == post.id)
                .count() as u64,
            post: post.clone(),
        })
    }
}

/// A record kept in one of the in-memory tables.
trait Stored: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn table(tables: &Tables) -> &HashMap<Uuid, Self>;
    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self>;

    /// Reject records that break uniqueness or point at missing rows.
    fn check(&self, _tables: &Tables) -> Result<(), RepoError> {
        Ok(())
    }

    /// Remove or detach whatever depends on the deleted record.
    fn cascade(_id: Uuid, _tables: &mut Tables) {}
}

impl Stored for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.users
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.users
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .users
            .values()
            .any(|other| other.id != self.id && other.username == self.username)
        {
            return Err(RepoError::Constraint(format!(
                "username '{}' already taken",
                self.username
            )));
        }
        Ok(())
    }

    fn cascade(id: Uuid, tables: &mut Tables) {
        let authored: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|post| post.author_id == id)
            .map(|post| post.id)
            .collect();
        for post_id in authored {
            tables.remove_post(post_id);
        }
        tables.comments.retain(|_, comment| comment.author_id != id);
    }
}

impl Stored for Location {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.locations
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.locations
    }

    fn cascade(id: Uuid, tables: &mut Tables) {
        for post in tables.posts.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
    }
}

impl Stored for Category {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.categories
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.categories
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if tables
            .categories
            .values()
            .any(|other| other.id != self.id && other.slug == self.slug)
        {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already taken",
                self.slug
            )));
        }
        Ok(())
    }

    fn cascade(id: Uuid, tables: &mut Tables) {
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
    }
}

impl Stored for Post {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.posts
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.posts
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.users.contains_key(&self.author_id) {
            return Err(RepoError::Constraint("post author does not exist".into()));
        }
        if self
            .category_id
            .is_some_and(|id| !tables.categories.contains_key(&id))
        {
            return Err(RepoError::Constraint("post category does not exist".into()));
        }
        if self
            .location_id
            .is_some_and(|id| !tables.locations.contains_key(&id))
        {
            return Err(RepoError::Constraint("post location does not exist".into()));
        }
        Ok(())
    }

    fn cascade(id: Uuid, tables: &mut Tables) {
        tables.remove_post(id);
    }
}

impl Stored for Comment {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(tables: &Tables) -> &HashMap<Uuid, Self> {
        &tables.comments
    }

    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self> {
        &mut tables.comments
    }

    fn check(&self, tables: &Tables) -> Result<(), RepoError> {
        if !tables.posts.contains_key(&self.post_id) {
            return Err(RepoError::Constraint("comment post does not exist".into()));
        }
        if !tables.users.contains_key(&self.author_id) {
            return Err(RepoError::Constraint("comment author does not exist".into()));
        }
        Ok(())
    }
}

/// Shared in-memory tables; hands out one repository per entity.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn repository<T>(&self) -> InMemoryRepository<T> {
        InMemoryRepository {
            tables: self.tables.clone(),
            _entity: PhantomData,
        }
    }

    pub fn users(&self) -> InMemoryUserRepository {
        self.repository()
    }

    pub fn locations(&self) -> InMemoryLocationRepository {
        self.repository()
    }

    pub fn categories(&self) -> InMemoryCategoryRepository {
        self.repository()
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        self.repository()
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        self.repository()
    }
}

/// Repository over one table of an [`InMemoryStore`].
pub struct InMemoryRepository<T> {
    tables: Arc<RwLock<Tables>>,
    _entity: PhantomData<fn() -> T>,
}

pub type InMemoryUserRepository = InMemoryRepository<User>;
pub type InMemoryLocationRepository = InMemoryRepository<Location>;
pub type InMemoryCategoryRepository = InMemoryRepository<Category>;
pub type InMemoryPostRepository = InMemoryRepository<Post>;
pub type InMemoryCommentRepository = InMemoryRepository<Comment>;

#[async_trait]
impl<T: Stored> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        let tables = self.tables.read().await;
        Ok(T::table(&tables).get(&id).cloned())
    }

    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let mut tables = self.tables.write().await;
        entity.check(&tables)?;
        T::table_mut(&mut tables).insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if T::table_mut(&mut tables).remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        T::cascade(id, &mut tables);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }
}

#[async_trait]
impl LocationRepository for InMemoryLocationRepository {}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .find(|category| category.slug == slug)
            .cloned())
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_page(
        &self,
        filter: &PostFilter,
        paginator: Paginator,
        request: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let tables = self.tables.read().await;

        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| {
                let category = post.category_id.and_then(|id| tables.categories.get(&id));
                filter.matches(post, category)
            })
            .collect();
        posts.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then(b.publication.created_at.cmp(&a.publication.created_at))
        });

        let page = paginator.paginate(posts, request);
        let items = page
            .items
            .iter()
            .map(|post| tables.summarize(post))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page {
            items,
            number: page.number,
            num_pages: page.num_pages,
            total: page.total,
        })
    }

    async fn find_summary(&self, id: Uuid) -> Result<Option<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        tables
            .posts
            .get(&id)
            .map(|post| tables.summarize(post))
            .transpose()
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let tables = self.tables.read().await;

        let mut comments: Vec<&Comment> = tables
            .comments
            .values()
            .filter(|comment| comment.post_id == post_id)
            .collect();
        comments.sort_by_key(|comment| comment.creation.created_at);

        comments
            .into_iter()
            .map(|comment| {
                let author = tables.users.get(&comment.author_id).ok_or_else(|| {
                    RepoError::Query(format!("author of comment {} missing", comment.id))
                })?;
                Ok(CommentView {
                    comment: comment.clone(),
                    author: AuthorRef::from(author),
                })
            })
            .collect()
    }
}
