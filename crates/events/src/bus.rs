//! In-process broadcast of domain events.
//!
//! Handlers publish after their own work is staged; subscribers (the
//! notification router) run on their own tasks, so a slow SMTP server
//! never holds a request open.

use chrono::{DateTime, Utc};
use hyperion_core::feed::EVENT_NEWS_PENDING_APPROVAL;
use hyperion_core::types::DbId;
use serde::Serialize;
use tokio::sync::broadcast;

/// Something that happened and that another part of Hyperion reacts to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HyperionEvent {
    /// A news was submitted and waits for a feed admin.
    NewsPendingApproval {
        news_id: DbId,
        module: String,
        entity: String,
        title: String,
        submitted_by: Option<DbId>,
    },
}

impl HyperionEvent {
    /// Stable dotted name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            HyperionEvent::NewsPendingApproval { .. } => EVENT_NEWS_PENDING_APPROVAL,
        }
    }
}

/// An event with the instant it was published.
#[derive(Debug, Clone, Serialize)]
pub struct Published {
    #[serde(flatten)]
    pub event: HyperionEvent,
    pub published_at: DateTime<Utc>,
}

const CHANNEL_CAPACITY: usize = 256;

/// Fan-out hub shared as `Arc<EventBus>`.
///
/// Receivers that fall more than the channel capacity behind lose the
/// oldest events and see `RecvError::Lagged`.
pub struct EventBus {
    tx: broadcast::Sender<Published>,
}

impl EventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tx: broadcast::channel(capacity).0,
        }
    }

    /// Broadcast `event`; returns how many subscribers will see it.
    pub fn publish(&self, event: HyperionEvent) -> usize {
        let name = event.name();
        let published = Published {
            event,
            published_at: Utc::now(),
        };
        match self.tx.send(published) {
            Ok(receivers) => receivers,
            Err(_) => {
                tracing::debug!(event = name, "Event published with no subscriber");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Published> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn pending(title: &str) -> HyperionEvent {
        HyperionEvent::NewsPendingApproval {
            news_id: Uuid::new_v4(),
            module: "feed".into(),
            entity: "BDE".into(),
            title: title.into(),
            submitted_by: None,
        }
    }

    #[tokio::test]
    async fn every_subscriber_gets_the_event() {
        let bus = EventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();
        let event = pending("Gala");

        assert_eq!(bus.publish(event.clone()), 2);

        assert_eq!(first.recv().await.unwrap().event, event);
        assert_eq!(second.recv().await.unwrap().event, event);
    }

    #[test]
    fn publishing_without_subscribers_is_a_no_op() {
        assert_eq!(EventBus::default().publish(pending("Orphan")), 0);
    }

    #[test]
    fn serializes_with_kind_tag() {
        let published = Published {
            event: pending("Gala"),
            published_at: Utc::now(),
        };
        let json = serde_json::to_value(&published).unwrap();

        assert_eq!(json["kind"], "news_pending_approval");
        assert_eq!(json["title"], "Gala");
        assert!(json["published_at"].is_string());
        assert_eq!(pending("x").name(), "feed.news.pending_approval");
    }

    #[tokio::test]
    async fn dropping_the_bus_closes_receivers() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();
        drop(bus);
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Closed)
        ));
    }
}
