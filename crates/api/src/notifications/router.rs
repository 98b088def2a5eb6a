//! Turns bus events into emails for the group in charge.

use std::sync::Arc;

use hyperion_core::groups::GROUP_FEED_ADMIN;
use hyperion_core::types::DbId;
use hyperion_db::repositories::MembershipRepo;
use hyperion_db::DbPool;
use hyperion_events::{EmailError, HyperionEvent, MailKind, Mailer, Published};
use tera::Context;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::broadcast::Receiver;

#[derive(Debug, thiserror::Error)]
enum NotifyError {
    #[error("recipient lookup failed: {0}")]
    Lookup(#[from] sqlx::Error),
    #[error(transparent)]
    Email(#[from] EmailError),
}

/// An email to send to every member of a group.
struct GroupMail {
    group_id: DbId,
    kind: MailKind,
    context: Context,
}

/// What each event turns into, if anything.
fn plan(event: &HyperionEvent) -> Option<GroupMail> {
    match event {
        HyperionEvent::NewsPendingApproval {
            entity,
            title,
            module,
            ..
        } => {
            let mut context = Context::new();
            context.insert("entity", entity);
            context.insert("title", title);
            context.insert("module", module);
            Some(GroupMail {
                group_id: GROUP_FEED_ADMIN,
                kind: MailKind::FeedApprovalRequired,
                context,
            })
        }
    }
}

pub struct NotificationRouter {
    pool: DbPool,
    mailer: Arc<Mailer>,
}

impl NotificationRouter {
    pub fn new(pool: DbPool, mailer: Arc<Mailer>) -> Self {
        Self { pool, mailer }
    }

    /// Consume events until every [`EventBus`](hyperion_events::EventBus)
    /// handle is dropped. Delivery failures are logged, never retried.
    pub async fn run(self, mut events: Receiver<Published>) {
        loop {
            let published = match events.recv().await {
                Ok(published) => published,
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "Notification router fell behind");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            let Some(mail) = plan(&published.event) else {
                continue;
            };
            if let Err(e) = self.deliver(mail).await {
                tracing::error!(event = published.event.name(), error = %e, "Notification failed");
            }
        }
        tracing::info!("Notification router stopped");
    }

    async fn deliver(&self, mail: GroupMail) -> Result<(), NotifyError> {
        let recipients = MembershipRepo::emails_in_group(&self.pool, mail.group_id).await?;
        if recipients.is_empty() {
            tracing::warn!(group_id = %mail.group_id, "Nobody to notify");
            return Ok(());
        }
        self.mailer.send(&recipients, mail.kind, &mail.context).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn pending_news_mails_feed_admins() {
        let mail = plan(&HyperionEvent::NewsPendingApproval {
            news_id: Uuid::new_v4(),
            module: "raid".into(),
            entity: "BDE".into(),
            title: "Soirée".into(),
            submitted_by: None,
        })
        .unwrap();

        assert_eq!(mail.group_id, GROUP_FEED_ADMIN);
        assert_eq!(mail.kind, MailKind::FeedApprovalRequired);
        assert_eq!(mail.context.get("entity"), Some(&json!("BDE")));
        assert_eq!(mail.context.get("title"), Some(&json!("Soirée")));
    }
}
