use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// The four sections of the zine. Fixed taxonomy, not admin-configurable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[default]
    Musik,
    Visual,
    Event,
    Journal,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Musik,
        Category::Visual,
        Category::Event,
        Category::Journal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Musik => "Musik",
            Category::Visual => "Visual",
            Category::Event => "Event",
            Category::Journal => "Journal",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Musik" => Ok(Category::Musik),
            "Visual" => Ok(Category::Visual),
            "Event" => Ok(Category::Event),
            "Journal" => Ok(Category::Journal),
            other => Err(DomainError::Validation(format!(
                "Unknown category: {other}"
            ))),
        }
    }
}

/// Post entity - a single published content item.
///
/// Posts are created exactly once through the submission pipeline and are
/// read-only thereafter; there is no edit or delete surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub category: Category,
    pub excerpt: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new published post with generated ID and timestamp.
    pub fn new(
        title: String,
        slug: String,
        category: Category,
        excerpt: String,
        content: String,
        cover_image_url: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            category,
            excerpt,
            content,
            cover_image_url,
            is_published: true,
            created_at: Utc::now(),
        }
    }
}

/// Derive a URL-safe slug from a title: lowercase, spaces to hyphens,
/// everything outside `[a-z0-9_-]` stripped.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// The built-in demo dataset: rendered whenever the backend is unreachable,
/// unconfigured, or holds no posts, so the reading surface is never empty.
pub fn sample_posts() -> Vec<Post> {
    let samples = [
        (
            "NOISE ARCHITECTURE",
            "noise-architecture",
            Category::Musik,
            "Exploring the brutalist sounds of downtown Jakarta.",
            "https://picsum.photos/800/800?random=1",
        ),
        (
            "VISUAL RIOT 2024",
            "visual-riot",
            Category::Visual,
            "A retrospective on photocopy art culture.",
            "https://picsum.photos/600/800?random=2",
        ),
        (
            "UNDERGROUND TYPES",
            "underground-types",
            Category::Visual,
            "Why Helvetica is dead and what comes next.",
            "https://picsum.photos/800/600?random=3",
        ),
        (
            "SYNTH WAVES",
            "synth-waves",
            Category::Musik,
            "Analog modular synthesis in the digital age.",
            "https://picsum.photos/700/700?random=4",
        ),
        (
            "CONCRETE DREAMS",
            "concrete-dreams",
            Category::Visual,
            "Brutalism in web design.",
            "https://picsum.photos/900/600?random=5",
        ),
        (
            "GLITCH PROTOCOL",
            "glitch-protocol",
            Category::Event,
            "Embracing errors as an aesthetic choice.",
            "https://picsum.photos/600/900?random=6",
        ),
    ];

    samples
        .into_iter()
        .map(|(title, slug, category, excerpt, cover)| {
            Post::new(
                title.to_string(),
                slug.to_string(),
                category,
                excerpt.to_string(),
                "...".to_string(),
                Some(cover.to_string()),
            )
        })
        .collect()
}
