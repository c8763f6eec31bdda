//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`PortfolioEvent`]s,
//! shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use folio_core::types::DbId;

/// A domain event describing a portfolio change.
///
/// Constructed via [`PortfolioEvent::new`] and enriched with the
/// builder methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioEvent {
    /// Dot-separated event name, e.g. `"portfolio.updated"`.
    pub event_type: String,

    /// The portfolio the event concerns.
    pub portfolio_id: Option<DbId>,

    /// Id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl PortfolioEvent {
    /// Create a new event with only the required `event_type`.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            portfolio_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the portfolio the event concerns.
    pub fn with_portfolio(mut self, portfolio_id: DbId) -> Self {
        self.portfolio_id = Some(portfolio_id);
        self
    }

    /// Attach the acting user.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so any number of subscribers can
/// independently receive every published [`PortfolioEvent`].
pub struct EventBus {
    sender: broadcast::Sender<PortfolioEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are
    /// dropped and slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With zero receivers the event is silently dropped.
    pub fn publish(&self, event: PortfolioEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<PortfolioEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscriber_receives_published_event() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            PortfolioEvent::new("portfolio.updated")
                .with_portfolio(42)
                .with_actor(7),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.event_type, "portfolio.updated");
        assert_eq!(event.portfolio_id, Some(42));
        assert_eq!(event.actor_user_id, Some(7));
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_silent() {
        let bus = EventBus::default();
        // No receiver; must not panic or error.
        bus.publish(PortfolioEvent::new("portfolio.deleted"));
    }

    #[tokio::test]
    async fn each_subscriber_gets_every_event() {
        let bus = EventBus::default();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(PortfolioEvent::new("portfolio.created").with_portfolio(1));

        assert_eq!(a.recv().await.unwrap().portfolio_id, Some(1));
        assert_eq!(b.recv().await.unwrap().portfolio_id, Some(1));
    }
}
