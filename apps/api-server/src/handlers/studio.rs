//! The Studio: upload and submission endpoints over the pipeline.
//!
//! Every route here sits behind the auth gate (`Identity` extractor). The
//! per-session pipeline mutex is held for state transitions only; storage
//! and database round trips run with the lock released so a concurrent
//! request still gets its in-flight rejection instead of queueing.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use tandang_core::domain::Category;
use tandang_core::ports::StorageError;
use tandang_shared::dto::{StudioStatusResponse, SubmitRequest, SubmitResponse, UploadResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Cover images are small; refuse anything above this.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub filename: Option<String>,
}

/// Collision-resistant storage key: timestamp, random suffix, original
/// extension.
fn storage_key(filename: &str) -> String {
    let ext: String = filename
        .rsplit('.')
        .next()
        .unwrap_or("bin")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect();
    let ext = if ext.is_empty() { "bin".to_string() } else { ext };

    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}.{}", Utc::now().timestamp_millis(), &suffix[..8], ext)
}

/// POST /api/studio/upload?filename=...
///
/// Raw image bytes in the body. One upload in flight per session; the URL is
/// committed to form state only after both the write and the URL resolution
/// succeed.
pub async fn upload(
    identity: Identity,
    state: web::Data<AppState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let session = state.sessions.open(&identity.subject).await;

    {
        let mut pipeline = session.lock().await;
        pipeline.begin_upload()?;

        let filename_missing = query
            .filename
            .as_deref()
            .map(str::trim)
            .unwrap_or("")
            .is_empty();
        if filename_missing || body.is_empty() {
            pipeline.fail_upload();
            return Err(AppError::BadRequest(
                "You must select an image to upload.".to_string(),
            ));
        }
        if body.len() > MAX_UPLOAD_BYTES {
            pipeline.fail_upload();
            return Err(AppError::PayloadTooLarge(format!(
                "Image exceeds the {MAX_UPLOAD_BYTES} byte limit"
            )));
        }
    }

    let filename = query.filename.as_deref().unwrap_or_default();
    let key = storage_key(filename);

    let uploaded: Result<String, StorageError> = async {
        state.storage.put(&key, &body).await?;
        Ok(state.storage.public_url(&key))
    }
    .await;

    let mut pipeline = session.lock().await;
    match uploaded {
        Ok(url) => {
            tracing::info!(handle = %identity.handle, key = %key, "Cover image secured");
            pipeline.complete_upload(url.clone());
            Ok(HttpResponse::Ok().json(UploadResponse {
                status: pipeline.status().to_string(),
                key,
                url,
            }))
        }
        Err(e) => {
            tracing::error!("Cover upload failed: {}", e);
            pipeline.fail_upload();
            Err(e.into())
        }
    }
}

/// POST /api/studio/submit
///
/// Validates the assembled form, performs the single insert (publication
/// forced), and answers with the narrative plus a deferred navigation hint.
/// On failure the form stays populated for a manual retry.
pub async fn submit(
    identity: Identity,
    state: web::Data<AppState>,
    body: web::Json<SubmitRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let category: Category = req
        .category
        .parse()
        .map_err(|e: tandang_core::DomainError| AppError::Validation(e.to_string()))?;

    let session = state.sessions.open(&identity.subject).await;

    let draft = {
        let mut pipeline = session.lock().await;

        pipeline.set_title(&req.title);
        if let Some(slug) = req.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            pipeline.set_slug(slug);
        }
        pipeline.set_category(category);
        pipeline.set_excerpt(&req.excerpt);
        pipeline.set_content(&req.content);
        if let Some(url) = req.cover_image_url.as_deref().filter(|u| !u.is_empty()) {
            pipeline.set_cover_image(url);
        }

        pipeline.begin_submit()?
    };

    let new_post = match draft.into_post() {
        Ok(post) => post,
        Err(e) => {
            session.lock().await.fail_submit();
            return Err(e.into());
        }
    };
    let slug = new_post.slug.clone();
    let inserted = state.posts.insert(new_post).await;

    let mut pipeline = session.lock().await;
    match inserted {
        Ok(post) => {
            tracing::info!(handle = %identity.handle, slug = %post.slug, "Post published");
            let nav = pipeline.complete_submit(&post.slug);
            Ok(HttpResponse::Created().json(SubmitResponse {
                status: pipeline.status().to_string(),
                slug: post.slug,
                location: nav.location,
                redirect_after_ms: nav.delay_ms,
            }))
        }
        Err(e) => {
            tracing::error!(slug = %slug, "Post insert failed: {}", e);
            pipeline.fail_submit();
            Err(e.into())
        }
    }
}

/// GET /api/studio/status
///
/// The current narrative and retained form fields for this editing session.
pub async fn status(identity: Identity, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let session = state.sessions.open(&identity.subject).await;
    let pipeline = session.lock().await;
    let form = pipeline.form();

    Ok(HttpResponse::Ok().json(StudioStatusResponse {
        status: pipeline.status().to_string(),
        title: form.title.clone(),
        slug: form.slug.clone(),
        category: form.category.as_str().to_string(),
        excerpt: form.excerpt.clone(),
        content: form.content.clone(),
        cover_image_url: form.cover_image_url.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use std::sync::Arc;

    use tandang_core::pipeline::{REDIRECT_GRACE_MS, narrative};
    use tandang_core::ports::{OAuthIdentity, TokenService};
    use tandang_infra::auth::{JwtConfig, JwtTokenService};
    use tandang_infra::{LocalObjectStore, SessionBroadcast};

    use crate::sessions::StudioSessions;
    use crate::state::{AppState, InMemoryPostRepository};

    async fn test_state() -> AppState {
        let dir = std::env::temp_dir().join(format!("tandang-studio-{}", uuid::Uuid::new_v4()));
        AppState {
            posts: Arc::new(InMemoryPostRepository::default()),
            storage: Arc::new(
                LocalObjectStore::new(dir, "http://zine.test")
                    .await
                    .unwrap(),
            ),
            events: Arc::new(SessionBroadcast::default()),
            sessions: StudioSessions::default(),
            demo_mode: true,
        }
    }

    fn token_service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".into(),
            expiration_hours: 1,
            issuer: "test".into(),
        }))
    }

    fn bearer(tokens: &Arc<dyn TokenService>) -> String {
        let token = tokens
            .issue_token(&OAuthIdentity {
                provider_id: "1337".into(),
                handle: "sangar".into(),
                email: "sangar@example.com".into(),
            })
            .unwrap();
        format!("Bearer {token}")
    }

    macro_rules! studio_app {
        ($state:expr, $tokens:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .app_data(web::Data::new($tokens.clone()))
                    .route("/api/studio/status", web::get().to(status))
                    .route("/api/studio/upload", web::post().to(upload))
                    .route("/api/studio/submit", web::post().to(submit)),
            )
            .await
        };
    }

    fn submit_body(slug: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "title": "NOISE ARCHITECTURE",
            "slug": slug,
            "category": "Musik",
            "excerpt": "short",
            "content": "# body",
        })
    }

    #[actix_web::test]
    async fn test_studio_routes_are_gated() {
        let state = test_state().await;
        let tokens = token_service();
        let app = studio_app!(state, tokens);

        let req = test::TestRequest::get().uri("/api/studio/status").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_upload_secures_image_and_status_narrative() {
        let state = test_state().await;
        let tokens = token_service();
        let app = studio_app!(state, tokens);
        let auth = bearer(&tokens);

        let req = test::TestRequest::post()
            .uri("/api/studio/upload?filename=cover.png")
            .insert_header(("Authorization", auth.clone()))
            .set_payload(&b"pngbytes"[..])
            .to_request();
        let body: UploadResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.status, narrative::IMAGE_SECURED);
        assert!(body.url.contains("/media/"));
        assert!(body.url.ends_with(".png"));

        let req = test::TestRequest::get()
            .uri("/api/studio/status")
            .insert_header(("Authorization", auth))
            .to_request();
        let status: StudioStatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status.cover_image_url, Some(body.url));
    }

    #[actix_web::test]
    async fn test_empty_upload_is_an_input_error() {
        let state = test_state().await;
        let tokens = token_service();
        let app = studio_app!(state, tokens);
        let auth = bearer(&tokens);

        let req = test::TestRequest::post()
            .uri("/api/studio/upload?filename=cover.png")
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/api/studio/status")
            .insert_header(("Authorization", auth))
            .to_request();
        let status: StudioStatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status.status, narrative::UPLOAD_FAILED);
        assert_eq!(status.cover_image_url, None);
    }

    #[actix_web::test]
    async fn test_submit_publishes_and_defers_navigation() {
        let state = test_state().await;
        let tokens = token_service();
        let app = studio_app!(state, tokens);
        let auth = bearer(&tokens);

        let req = test::TestRequest::post()
            .uri("/api/studio/submit")
            .insert_header(("Authorization", auth))
            .set_json(submit_body(None))
            .to_request();
        let body: SubmitResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.status, narrative::COMPLETE);
        assert_eq!(body.slug, "noise-architecture");
        assert_eq!(body.location, "/article/noise-architecture");
        assert_eq!(body.redirect_after_ms, REDIRECT_GRACE_MS);

        let stored = state
            .posts
            .find_by_slug("noise-architecture")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.is_published);
    }

    #[actix_web::test]
    async fn test_missing_required_fields_block_the_insert() {
        let state = test_state().await;
        let tokens = token_service();
        let app = studio_app!(state, tokens);
        let auth = bearer(&tokens);

        let req = test::TestRequest::post()
            .uri("/api/studio/submit")
            .insert_header(("Authorization", auth))
            .set_json(serde_json::json!({
                "title": "",
                "category": "Musik",
                "content": "body",
            }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let (posts, _) = state.posts.list_published(10, 0).await.unwrap();
        assert!(posts.is_empty());
    }

    #[actix_web::test]
    async fn test_failed_insert_keeps_the_form_for_retry() {
        let state = test_state().await;
        let tokens = token_service();
        let app = studio_app!(state, tokens);
        let auth = bearer(&tokens);

        // First submission claims the slug.
        let req = test::TestRequest::post()
            .uri("/api/studio/submit")
            .insert_header(("Authorization", auth.clone()))
            .set_json(submit_body(None))
            .to_request();
        test::call_service(&app, req).await;

        // Second submission with the same slug hits the uniqueness constraint.
        let req = test::TestRequest::post()
            .uri("/api/studio/submit")
            .insert_header(("Authorization", auth.clone()))
            .set_json(submit_body(None))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::get()
            .uri("/api/studio/status")
            .insert_header(("Authorization", auth))
            .to_request();
        let status: StudioStatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(status.status, narrative::FATAL);
        assert_eq!(status.title, "NOISE ARCHITECTURE");
        assert_eq!(status.slug, "noise-architecture");
        assert_eq!(status.content, "# body");
    }

    #[actix_web::test]
    async fn test_storage_keys_carry_extension_and_differ() {
        let a = storage_key("cover.png");
        let b = storage_key("cover.png");
        assert!(a.ends_with(".png"));
        assert_ne!(a, b);
        assert_eq!(storage_key("no-extension").split('.').count(), 2);
    }
}
