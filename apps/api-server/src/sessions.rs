//! Studio editing sessions.
//!
//! One submission pipeline per authenticated identity, created on the first
//! Studio request and dropped at sign-out. The pipeline owns the form state
//! for the duration of the editing session; the mutex is held across state
//! transitions only, never across network I/O.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use tandang_core::pipeline::SubmissionPipeline;

#[derive(Clone, Default)]
pub struct StudioSessions {
    inner: Arc<RwLock<HashMap<String, Arc<Mutex<SubmissionPipeline>>>>>,
}

impl StudioSessions {
    /// The editing session for an identity, opened past the auth gate.
    pub async fn open(&self, subject: &str) -> Arc<Mutex<SubmissionPipeline>> {
        {
            let sessions = self.inner.read().await;
            if let Some(session) = sessions.get(subject) {
                return session.clone();
            }
        }

        let mut sessions = self.inner.write().await;
        sessions
            .entry(subject.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SubmissionPipeline::signed_in())))
            .clone()
    }

    /// Drop an identity's editing session (sign-out teardown).
    pub async fn close(&self, subject: &str) {
        self.inner.write().await.remove(subject);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandang_core::pipeline::Phase;

    #[tokio::test]
    async fn test_open_is_idempotent_per_subject() {
        let sessions = StudioSessions::default();
        let a = sessions.open("1337").await;
        a.lock().await.set_title("KEEP ME");

        let b = sessions.open("1337").await;
        assert_eq!(b.lock().await.form().title, "KEEP ME");
    }

    #[tokio::test]
    async fn test_close_discards_form_state() {
        let sessions = StudioSessions::default();
        sessions.open("1337").await.lock().await.set_title("GONE");
        sessions.close("1337").await;

        let fresh = sessions.open("1337").await;
        let fresh = fresh.lock().await;
        assert_eq!(fresh.form().title, "");
        assert_eq!(fresh.phase(), Phase::Idle);
    }
}
