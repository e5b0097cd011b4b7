use async_trait::async_trait;

use crate::domain::Post;
use crate::error::RepoError;

/// Post repository. Posts are insert-once and read-only afterwards, so the
/// contract has no update or delete.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post. Slug uniqueness is enforced by the store and
    /// surfaces as a constraint error.
    async fn insert(&self, post: Post) -> Result<Post, RepoError>;

    /// Up to `limit` published posts, newest first.
    async fn recent_published(&self, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Look up a single post by its slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Published posts, newest first, with the total count for pagination.
    async fn list_published(&self, limit: u64, offset: u64)
    -> Result<(Vec<Post>, u64), RepoError>;
}
