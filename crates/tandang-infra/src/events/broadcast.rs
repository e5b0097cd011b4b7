//! In-process session-event broadcast.
//!
//! Sign-in and sign-out are reported asynchronously to whoever is listening.
//! Subscribers hold an explicit `Subscription`; dropping it releases the
//! receiver, so acquisition and release are scoped to the subscriber's
//! lifetime rather than living in ambient global state.

use tokio::sync::broadcast;

use tandang_core::domain::SessionEvent;

pub struct SessionBroadcast {
    tx: broadcast::Sender<SessionEvent>,
}

impl SessionBroadcast {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish a session change. Returns the number of live subscribers;
    /// zero listeners is not an error.
    pub fn publish(&self, event: SessionEvent) -> usize {
        match self.tx.send(event) {
            Ok(receivers) => {
                tracing::debug!(receivers, "Session event published");
                receivers
            }
            Err(_) => {
                tracing::debug!("Session event published with no subscribers");
                0
            }
        }
    }

    /// Acquire a subscription handle. Events published after this call are
    /// delivered until the handle is dropped.
    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for SessionBroadcast {
    fn default() -> Self {
        Self::new(16)
    }
}

/// A live session-event subscription. Dropping it unsubscribes.
pub struct Subscription {
    rx: broadcast::Receiver<SessionEvent>,
}

impl Subscription {
    /// Next event, or `None` once the broadcaster is gone. A slow subscriber
    /// that lagged past the channel capacity skips to the oldest retained
    /// event rather than erroring out.
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session event subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_events() {
        let bus = SessionBroadcast::default();
        let mut sub = bus.subscribe();

        bus.publish(SessionEvent::SignedIn {
            handle: "sangar".into(),
            email: "sangar@example.com".into(),
        });

        match sub.recv().await {
            Some(SessionEvent::SignedIn { handle, .. }) => assert_eq!(handle, "sangar"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_dropping_subscription_releases_receiver() {
        let bus = SessionBroadcast::default();
        let sub = bus.subscribe();
        assert_eq!(
            bus.publish(SessionEvent::SignedOut {
                handle: "sangar".into()
            }),
            1
        );

        drop(sub);
        assert_eq!(
            bus.publish(SessionEvent::SignedOut {
                handle: "sangar".into()
            }),
            0
        );
    }
}
