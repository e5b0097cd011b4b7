//! Session-change notification.

mod broadcast;

pub use broadcast::{SessionBroadcast, Subscription};
