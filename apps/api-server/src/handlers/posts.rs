//! Public reading surface: front-page listing, post detail, archive.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use tandang_core::domain::{Post, sample_posts};
use tandang_shared::dto::{ArchiveResponse, ListingResponse, PostResponse, PostSummary};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// The front page shows at most six posts.
const LISTING_LIMIT: u64 = 6;

const ARCHIVE_DEFAULT_LIMIT: u64 = 20;
const ARCHIVE_MAX_LIMIT: u64 = 100;

fn summary(post: &Post, wide: bool) -> PostSummary {
    PostSummary {
        id: post.id.to_string(),
        title: post.title.clone(),
        slug: post.slug.clone(),
        category: post.category.as_str().to_string(),
        excerpt: post.excerpt.clone(),
        cover_image_url: post.cover_image_url.clone(),
        created_at: post.created_at.to_rfc3339(),
        wide,
    }
}

fn full(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.to_string(),
        title: post.title.clone(),
        slug: post.slug.clone(),
        category: post.category.as_str().to_string(),
        excerpt: post.excerpt.clone(),
        content: post.content.clone(),
        cover_image_url: post.cover_image_url.clone(),
        is_published: post.is_published,
        created_at: post.created_at.to_rfc3339(),
    }
}

/// GET /api/posts
///
/// Two-source resolution: the repository first; on error or an empty result
/// the built-in sample set, so the page is never empty. Fetch failures are
/// logged, never surfaced.
pub async fn list(state: web::Data<AppState>) -> HttpResponse {
    let (posts, fallback) = match state.posts.recent_published(LISTING_LIMIT).await {
        Ok(posts) if !posts.is_empty() => (posts, false),
        Ok(_) => (sample_posts(), true),
        Err(e) => {
            tracing::error!("Listing fetch failed: {}", e);
            (sample_posts(), true)
        }
    };

    // The chaotic bento grid: the 1st and 4th cards span two columns.
    let posts = posts
        .iter()
        .enumerate()
        .map(|(i, p)| summary(p, i == 0 || i == 3))
        .collect();

    HttpResponse::Ok().json(ListingResponse { posts, fallback })
}

/// GET /api/posts/{slug}
///
/// Detail view behind `/article/{slug}`. The sample set backs unknown slugs
/// whenever the store misses, matching the listing fallback.
pub async fn detail(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let stored = match state.posts.find_by_slug(&slug).await {
        Ok(found) => found,
        Err(e) => {
            tracing::error!("Detail fetch failed: {}", e);
            None
        }
    };

    let post = stored
        .or_else(|| sample_posts().into_iter().find(|p| p.slug == slug))
        .ok_or_else(|| AppError::NotFound(format!("No post with slug {slug}")))?;

    Ok(HttpResponse::Ok().json(full(&post)))
}

#[derive(Debug, Deserialize)]
pub struct ArchiveQuery {
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

/// GET /api/archive
pub async fn archive(
    state: web::Data<AppState>,
    query: web::Query<ArchiveQuery>,
) -> AppResult<HttpResponse> {
    let limit = query
        .limit
        .unwrap_or(ARCHIVE_DEFAULT_LIMIT)
        .min(ARCHIVE_MAX_LIMIT);
    let offset = query.offset.unwrap_or(0);

    let (posts, total) = state.posts.list_published(limit, offset).await?;

    Ok(HttpResponse::Ok().json(ArchiveResponse {
        posts: posts.iter().map(|p| summary(p, false)).collect(),
        limit,
        offset,
        total,
    }))
}
