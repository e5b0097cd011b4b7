//! Serves uploaded objects - the target of `ObjectStore::public_url`.

use actix_web::{HttpResponse, web};

use crate::middleware::error::AppResult;
use crate::state::AppState;

fn content_type(key: &str) -> &'static str {
    match key.rsplit('.').next().unwrap_or_default() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// GET /media/{key}
///
/// Key hygiene (no separators, no dot-dot) is enforced by the store itself.
pub async fn serve(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let key = path.into_inner();
    let bytes = state.storage.get(&key).await?;

    Ok(HttpResponse::Ok()
        .content_type(content_type(&key))
        .body(bytes))
}
