//! PostgreSQL post repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use tandang_core::domain::Post;
use tandang_core::error::RepoError;
use tandang_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity};

/// PostgreSQL post repository.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn map_insert_err(e: sea_orm::DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("A post with this slug already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, new_post: Post) -> Result<Post, RepoError> {
        tracing::debug!(slug = %new_post.slug, "Inserting post");

        let active: post::ActiveModel = new_post.into();
        let model = active.insert(&self.db).await.map_err(map_insert_err)?;

        Ok(model.into())
    }

    async fn recent_published(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::IsPublished.eq(true))
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn list_published(
        &self,
        limit: u64,
        offset: u64,
    ) -> Result<(Vec<Post>, u64), RepoError> {
        let published = PostEntity::find().filter(post::Column::IsPublished.eq(true));

        let total = published
            .clone()
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let result = published
            .order_by_desc(post::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok((result.into_iter().map(Into::into).collect(), total))
    }
}
