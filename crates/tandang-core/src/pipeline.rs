//! The Studio submission pipeline.
//!
//! A state machine over one editing session: image upload, slug derivation,
//! validation, and the insert handshake, with a human-readable status
//! narrative. The narrative is purely observational; it drives no logic.

use thiserror::Error;

use crate::domain::{Category, PostDraft, slugify};
use crate::error::DomainError;

/// Status narrative strings shown in the Studio status monitor.
pub mod narrative {
    pub const READY: &str = "READY_TO_TRANSMIT";
    pub const UPLOADING: &str = "UPLOADING_BINARY_DATA...";
    pub const IMAGE_SECURED: &str = "IMAGE_SECURED. READY.";
    pub const UPLOAD_FAILED: &str = "UPLOAD_FAILED";
    pub const SUBMITTING: &str = "INITIATING_DATABASE_INJECTION...";
    pub const COMPLETE: &str = "TRANSMISSION_COMPLETE.";
    pub const FATAL: &str = "FATAL_ERROR: TRANSMISSION_FAILED";
}

/// Fixed grace period before the client navigates to the new post, so the
/// success narrative can be read. A navigation hint, never a server sleep.
pub const REDIRECT_GRACE_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unauthenticated,
    Idle,
    Uploading,
    IdleWithAsset,
    Submitting,
    Submitted,
    Failed,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("No identity session; sign in first")]
    NotSignedIn,

    #[error("An upload is already in flight")]
    UploadInFlight,

    #[error("A submission is already in flight")]
    SubmitInFlight,

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Form field state, owned exclusively by one pipeline instance for the
/// duration of an editing session.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub title: String,
    pub slug: String,
    pub category: Category,
    pub excerpt: String,
    pub content: String,
    pub cover_image_url: Option<String>,
    slug_edited: bool,
}

/// One editing session's state machine:
/// `Unauthenticated → Idle → Uploading → IdleWithAsset → Submitting →
/// Submitted | Failed`.
#[derive(Debug, Clone)]
pub struct SubmissionPipeline {
    phase: Phase,
    narrative: &'static str,
    form: PostForm,
}

impl Default for SubmissionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl SubmissionPipeline {
    pub fn new() -> Self {
        Self {
            phase: Phase::Unauthenticated,
            narrative: narrative::READY,
            form: PostForm::default(),
        }
    }

    /// A pipeline that has already passed the auth gate.
    pub fn signed_in() -> Self {
        let mut pipeline = Self::new();
        pipeline.sign_in();
        pipeline
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &'static str {
        self.narrative
    }

    pub fn form(&self) -> &PostForm {
        &self.form
    }

    /// Session appeared: open the gate.
    pub fn sign_in(&mut self) {
        if self.phase == Phase::Unauthenticated {
            self.phase = Phase::Idle;
        }
    }

    /// Title keystroke. Re-derives the slug continuously until the slug has
    /// been edited by hand, then leaves the manual value alone.
    pub fn set_title(&mut self, title: &str) {
        self.form.title = title.to_string();
        if !self.form.slug_edited {
            self.form.slug = slugify(title);
        }
    }

    /// Manual slug edit: stops auto-derivation for the rest of the session.
    pub fn set_slug(&mut self, slug: &str) {
        self.form.slug = slug.to_string();
        self.form.slug_edited = true;
    }

    pub fn set_category(&mut self, category: Category) {
        self.form.category = category;
    }

    pub fn set_excerpt(&mut self, excerpt: &str) {
        self.form.excerpt = excerpt.to_string();
    }

    pub fn set_content(&mut self, content: &str) {
        self.form.content = content.to_string();
    }

    /// Restore a previously uploaded cover (a client echoing form state).
    pub fn set_cover_image(&mut self, url: &str) {
        self.form.cover_image_url = Some(url.to_string());
        if matches!(self.phase, Phase::Idle) {
            self.phase = Phase::IdleWithAsset;
        }
    }

    /// Enter the uploading state. At most one upload may be in flight per
    /// session; a second attempt is rejected without touching storage.
    pub fn begin_upload(&mut self) -> Result<(), PipelineError> {
        match self.phase {
            Phase::Unauthenticated => Err(PipelineError::NotSignedIn),
            Phase::Uploading => Err(PipelineError::UploadInFlight),
            Phase::Submitting => Err(PipelineError::SubmitInFlight),
            _ => {
                self.phase = Phase::Uploading;
                self.narrative = narrative::UPLOADING;
                Ok(())
            }
        }
    }

    /// Upload and URL resolution both succeeded: commit the URL.
    pub fn complete_upload(&mut self, url: String) {
        self.form.cover_image_url = Some(url);
        self.phase = Phase::IdleWithAsset;
        self.narrative = narrative::IMAGE_SECURED;
    }

    /// Upload or URL resolution failed: reset to idle. The previous cover
    /// URL, if any, stays untouched; no partial URL is ever committed.
    pub fn fail_upload(&mut self) {
        self.phase = if self.form.cover_image_url.is_some() {
            Phase::IdleWithAsset
        } else {
            Phase::Idle
        };
        self.narrative = narrative::UPLOAD_FAILED;
    }

    /// Validate the form and enter the submitting state, yielding the draft
    /// to persist. Validation failure blocks before any persistence call and
    /// leaves phase, narrative, and form untouched.
    pub fn begin_submit(&mut self) -> Result<PostDraft, PipelineError> {
        match self.phase {
            Phase::Unauthenticated => return Err(PipelineError::NotSignedIn),
            Phase::Uploading => return Err(PipelineError::UploadInFlight),
            Phase::Submitting => return Err(PipelineError::SubmitInFlight),
            _ => {}
        }

        let draft = PostDraft {
            title: self.form.title.clone(),
            slug: Some(self.form.slug.clone()),
            category: self.form.category,
            excerpt: self.form.excerpt.clone(),
            content: self.form.content.clone(),
            cover_image_url: self.form.cover_image_url.clone(),
        };
        draft.validate()?;

        self.phase = Phase::Submitting;
        self.narrative = narrative::SUBMITTING;
        Ok(draft)
    }

    /// Insert succeeded: emit the navigation hint for the new post's detail
    /// route, deferred by the fixed grace period.
    pub fn complete_submit(&mut self, slug: &str) -> Navigation {
        self.phase = Phase::Submitted;
        self.narrative = narrative::COMPLETE;
        Navigation {
            location: format!("/article/{slug}"),
            delay_ms: REDIRECT_GRACE_MS,
        }
    }

    /// Insert failed: the form stays populated for a manual retry.
    pub fn fail_submit(&mut self) {
        self.phase = Phase::Failed;
        self.narrative = narrative::FATAL;
    }
}

/// Client-side navigation hint issued after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub location: String,
    pub delay_ms: u64,
}
