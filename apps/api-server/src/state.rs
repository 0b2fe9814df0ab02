//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::pagination::Paginator;
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PasswordService, PostRepository,
    TokenService, UserRepository,
};
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

use crate::config::AppConfig;

#[cfg(feature = "postgres")]
use blogicum_infra::{DatabaseConfig, DatabaseConnections};
#[cfg(feature = "postgres")]
use blogicum_infra::database::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
    PostgresPostRepository, PostgresUserRepository,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub paginator: Paginator,
    /// Which store backs the repositories, reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    /// State whose repositories all share one in-memory store.
    pub fn in_memory(
        store: InMemoryStore,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Self {
        Self {
            users: Arc::new(store.users()),
            locations: Arc::new(store.locations()),
            categories: Arc::new(store.categories()),
            posts: Arc::new(store.posts()),
            comments: Arc::new(store.comments()),
            tokens,
            passwords,
            paginator: Paginator::default(),
            storage: "memory",
        }
    }

    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        if let Some(state) = Self::persistent(config, tokens.clone(), passwords.clone()).await {
            tracing::info!("Application state initialized (postgres)");
            return state;
        }

        tracing::info!("Application state initialized (memory)");
        Self::in_memory(InMemoryStore::new(), tokens, passwords)
    }

    /// PostgreSQL-backed state, or `None` when no database is usable.
    #[cfg(feature = "postgres")]
    async fn persistent(
        config: &AppConfig,
        tokens: Arc<dyn TokenService>,
        passwords: Arc<dyn PasswordService>,
    ) -> Option<Self> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return None;
        };

        let db = match Self::connect(db_config).await {
            Ok(connections) => connections.main,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return None;
            }
        };

        Some(Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            locations: Arc::new(PostgresLocationRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db)),
            tokens,
            passwords,
            paginator: Paginator::default(),
            storage: "postgres",
        })
    }

    #[cfg(not(feature = "postgres"))]
    async fn persistent(
        _config: &AppConfig,
        _tokens: Arc<dyn TokenService>,
        _passwords: Arc<dyn PasswordService>,
    ) -> Option<Self> {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        None
    }

    #[cfg(feature = "postgres")]
    async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnections, migration::DbErr> {
        use migration::MigratorTrait;

        let connections = DatabaseConnections::init(config).await?;
        if config.auto_migrate {
            migration::Migrator::up(&connections.main, None).await?;
            tracing::info!("Database migrations applied");
        }
        Ok(connections)
    }
}
