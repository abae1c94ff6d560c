//! Application state - shared across all handlers.

use std::sync::Arc;

use warikan_core::ports::{
    AuthorRepository, EntryRepository, GroupRepository, PaymentRepository, UserRepository,
};
use warikan_infra::MemoryDatabase;

use crate::config::{ApiSettings, AppConfig};

/// Which backend the repositories talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Postgres,
    Memory,
}

impl Storage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Storage::Postgres => "postgres",
            Storage::Memory => "memory",
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub authors: Arc<dyn AuthorRepository>,
    pub entries: Arc<dyn EntryRepository>,
    pub settings: ApiSettings,
    pub storage: Storage,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            use warikan_infra::database::{
                DatabaseConfig, PostgresAuthorRepository, PostgresEntryRepository,
                PostgresGroupRepository, PostgresPaymentRepository, PostgresUserRepository,
                connect,
            };

            if let Some(settings) = &config.database {
                let mut db_config = DatabaseConfig::new(settings.url.clone());
                db_config.max_connections = settings.max_connections;
                db_config.min_connections = settings.min_connections;

                match connect(&db_config).await {
                    Ok(conn) => {
                        tracing::info!("Application state initialized (postgres)");
                        return Self {
                            users: Arc::new(PostgresUserRepository::new(conn.clone())),
                            groups: Arc::new(PostgresGroupRepository::new(conn.clone())),
                            payments: Arc::new(PostgresPaymentRepository::new(conn.clone())),
                            authors: Arc::new(PostgresAuthorRepository::new(conn.clone())),
                            entries: Arc::new(PostgresEntryRepository::new(conn)),
                            settings: config.api.clone(),
                            storage: Storage::Postgres,
                        };
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repositories");
        }

        let state = Self::in_memory(config.api.clone());
        tracing::info!("Application state initialized (memory)");
        state
    }

    /// State backed by a fresh in-memory store.
    pub fn in_memory(settings: ApiSettings) -> Self {
        let db = MemoryDatabase::new();
        Self {
            users: Arc::new(db.users()),
            groups: Arc::new(db.groups()),
            payments: Arc::new(db.payments()),
            authors: Arc::new(db.authors()),
            entries: Arc::new(db.entries()),
            settings,
            storage: Storage::Memory,
        }
    }
}
