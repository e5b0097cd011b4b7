//! Application state - shared across all handlers.

use std::sync::Arc;

use tokio::sync::RwLock;

use tandang_core::domain::Post;
use tandang_core::error::RepoError;
use tandang_core::ports::{ObjectStore, PostRepository, StorageError};
use tandang_infra::{LocalObjectStore, SessionBroadcast};

#[cfg(feature = "postgres")]
use tandang_infra::PostgresPostRepository;

use crate::config::AppConfig;
use crate::sessions::StudioSessions;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    pub storage: Arc<dyn ObjectStore>,
    pub events: Arc<SessionBroadcast>,
    pub sessions: StudioSessions,
    /// True when the post store is the in-memory fallback.
    pub demo_mode: bool,
}

/// In-memory post repository for when the database is not configured.
/// Posts live for the process lifetime only.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

#[async_trait::async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, new_post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;
        if posts.iter().any(|p| p.slug == new_post.slug) {
            return Err(RepoError::Constraint(
                "A post with this slug already exists".to_string(),
            ));
        }
        posts.push(new_post.clone());
        Ok(new_post)
    }

    async fn recent_published(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let posts = self.posts.read().await;
        let mut published: Vec<Post> = posts.iter().filter(|p| p.is_published).cloned().collect();
        published.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        published.truncate(limit as usize);
        Ok(published)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let posts = self.posts.read().await;
        Ok(posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn list_published(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Post>, u64), RepoError> {
        let posts = self.posts.read().await;
        let mut published: Vec<Post> = posts.iter().filter(|p| p.is_published).cloned().collect();
        published.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = published.len() as u64;
        let page = published
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();
        Ok((page, total))
    }
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Result<Self, StorageError> {
        let storage: Arc<dyn ObjectStore> = Arc::new(
            LocalObjectStore::new(config.media_dir.clone(), config.public_base_url.clone())
                .await?,
        );

        #[cfg(feature = "postgres")]
        let (posts, demo_mode): (Arc<dyn PostRepository>, bool) = {
            if config.database_configured() {
                match tandang_infra::database::connect(&config.database).await {
                    Ok(conn) => (Arc::new(PostgresPostRepository::new(conn)), false),
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        (Arc::new(InMemoryPostRepository::default()), true)
                    }
                }
            } else {
                tracing::warn!(
                    "DATABASE_URL not set or left at the placeholder. Running in demo mode."
                );
                (Arc::new(InMemoryPostRepository::default()), true)
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (posts, demo_mode): (Arc<dyn PostRepository>, bool) = {
            tracing::info!("Built without postgres feature - using in-memory repository");
            (Arc::new(InMemoryPostRepository::default()), true)
        };

        tracing::info!(demo_mode, "Application state initialized");

        Ok(Self {
            posts,
            storage,
            events: Arc::new(SessionBroadcast::default()),
            sessions: StudioSessions::default(),
            demo_mode,
        })
    }
}
