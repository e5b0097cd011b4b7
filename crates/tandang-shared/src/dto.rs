//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// One post in the listing grid or archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub excerpt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub created_at: String,
    /// Two-column grid slot; the listing marks items 0 and 3 wide.
    pub wide: bool,
}

/// Front-page listing: up to six posts, with a flag telling the client the
/// built-in sample set was substituted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingResponse {
    pub posts: Vec<PostSummary>,
    pub fallback: bool,
}

/// Full post body for the detail route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub excerpt: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
    pub is_published: bool,
    pub created_at: String,
}

/// Paginated archive listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveResponse {
    pub posts: Vec<PostSummary>,
    pub limit: u64,
    pub offset: u64,
    pub total: u64,
}

/// Full submission payload from the Studio form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub title: String,
    /// Manual slug override; omitted means "derive from the title".
    #[serde(default)]
    pub slug: Option<String>,
    pub category: String,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    /// Cover URL echoed back from a completed upload.
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

/// Result of a successful submission: the status narrative plus a deferred
/// navigation hint for the new post's detail route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub status: String,
    pub slug: String,
    pub location: String,
    pub redirect_after_ms: u64,
}

/// Result of a completed cover upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub key: String,
    pub url: String,
}

/// Current Studio session state: narrative plus the retained form fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioStatusResponse {
    pub status: String,
    pub title: String,
    pub slug: String,
    pub category: String,
    pub excerpt: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

/// Response containing a session token after OAuth sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// The signed-in user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub handle: String,
    pub email: String,
}
