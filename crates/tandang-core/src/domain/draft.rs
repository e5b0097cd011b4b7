use serde::{Deserialize, Serialize};

use crate::domain::{Category, Post, slugify};
use crate::error::DomainError;

/// The unsaved form payload assembled by the submission pipeline.
///
/// A missing or empty slug is derived from the title; a present slug is a
/// manual override and is taken verbatim.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub slug: Option<String>,
    pub category: Category,
    pub excerpt: String,
    pub content: String,
    pub cover_image_url: Option<String>,
}

impl PostDraft {
    /// The slug this draft will persist under.
    pub fn resolved_slug(&self) -> String {
        match &self.slug {
            Some(s) if !s.trim().is_empty() => s.trim().to_string(),
            _ => slugify(&self.title),
        }
    }

    /// Required-field preconditions: title, content, and the resolved slug
    /// must be non-empty. Checked before any persistence call is issued.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.title.trim().is_empty() {
            return Err(DomainError::Validation("Title must not be empty".into()));
        }
        if self.content.trim().is_empty() {
            return Err(DomainError::Validation("Content must not be empty".into()));
        }
        if self.resolved_slug().is_empty() {
            return Err(DomainError::Validation("Slug must not be empty".into()));
        }
        Ok(())
    }

    /// Materialize the draft as a published post. Publication is forced:
    /// there is no draft workflow.
    pub fn into_post(self) -> Result<Post, DomainError> {
        self.validate()?;
        let slug = self.resolved_slug();
        Ok(Post::new(
            self.title,
            slug,
            self.category,
            self.excerpt,
            self.content,
            self.cover_image_url,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PostDraft {
        PostDraft {
            title: "NOISE ARCHITECTURE".into(),
            slug: None,
            category: Category::Musik,
            excerpt: "short".into(),
            content: "body".into(),
            cover_image_url: None,
        }
    }

    #[test]
    fn slug_is_derived_when_absent() {
        assert_eq!(draft().resolved_slug(), "noise-architecture");
    }

    #[test]
    fn manual_slug_wins_over_derivation() {
        let mut d = draft();
        d.slug = Some("custom-slug".into());
        assert_eq!(d.resolved_slug(), "custom-slug");
    }

    #[test]
    fn empty_title_or_content_is_rejected() {
        let mut d = draft();
        d.title = "  ".into();
        assert!(d.validate().is_err());

        let mut d = draft();
        d.content = String::new();
        assert!(d.validate().is_err());
    }

    #[test]
    fn symbol_only_title_leaves_no_slug() {
        let mut d = draft();
        d.title = "!!!".into();
        assert!(matches!(d.validate(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn into_post_forces_publication() {
        let post = draft().into_post().unwrap();
        assert!(post.is_published);
        assert_eq!(post.slug, "noise-architecture");
    }
}
