//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`PortalEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use kiss_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// PortalEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred in the portal.
///
/// Constructed via [`PortalEvent::new`] and enriched with the builder
/// methods [`with_source`](PortalEvent::with_source),
/// [`with_actor`](PortalEvent::with_actor), and
/// [`with_payload`](PortalEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalEvent {
    /// Dot-separated event name, e.g. `"ticket.created"`.
    pub event_type: String,

    /// Optional source entity kind (e.g. `"ticket"`, `"survey"`).
    pub source_entity_type: Option<String>,

    /// Optional source entity database id.
    pub source_entity_id: Option<DbId>,

    /// Optional id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl PortalEvent {
    /// Create a new event with only the required `event_type`.
    ///
    /// All optional fields default to `None` / empty object.
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach a source entity to the event.
    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    /// Attach the acting user.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Attach a JSON payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Broadcast channel capacity. Slow subscribers past this many buffered
/// events start seeing `Lagged` errors rather than blocking publishers.
const BUS_CAPACITY: usize = 256;

/// Publish/subscribe hub for [`PortalEvent`]s.
pub struct EventBus {
    sender: broadcast::Sender<PortalEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(BUS_CAPACITY);
        Self { sender }
    }
}

impl EventBus {
    /// Publish an event to all current subscribers.
    ///
    /// Delivery is best-effort: with no subscribers the event is dropped,
    /// which only happens during startup/shutdown windows.
    pub fn publish(&self, event: PortalEvent) {
        let event_type = event.event_type.clone();
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(%event_type, receivers, "Published event");
            }
            Err(_) => {
                tracing::warn!(%event_type, "Event published with no subscribers");
            }
        }
    }

    /// Create a new subscription receiving all events published after this
    /// call.
    pub fn subscribe(&self) -> broadcast::Receiver<PortalEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            PortalEvent::new("ticket.created")
                .with_source("ticket", 42)
                .with_actor(7)
                .with_payload(serde_json::json!({ "ticket_number": "KISS-202608-0001" })),
        );

        let event = rx.recv().await.expect("event should arrive");
        assert_eq!(event.event_type, "ticket.created");
        assert_eq!(event.source_entity_type.as_deref(), Some("ticket"));
        assert_eq!(event.source_entity_id, Some(42));
        assert_eq!(event.actor_user_id, Some(7));
        assert_eq!(event.payload["ticket_number"], "KISS-202608-0001");
    }

    #[tokio::test]
    async fn publish_without_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(PortalEvent::new("qr.scanned"));
    }
}
