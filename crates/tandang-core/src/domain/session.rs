use serde::{Deserialize, Serialize};

/// Sign-in and sign-out notifications.
///
/// The identity provider bridge reports session changes asynchronously
/// through a broadcast, never as a direct return value of the sign-in call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    SignedIn { handle: String, email: String },
    SignedOut { handle: String },
}
