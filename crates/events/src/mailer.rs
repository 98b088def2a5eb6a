//! Outgoing email.
//!
//! A [`Mailer`] renders a [`MailKind`] and relays it through SMTP. Without
//! `SMTP_HOST` it runs in log-only mode, which is what development and the
//! test suite use.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tera::Context;

use crate::templates::{MailKind, MailTemplates, RenderedEmail};

#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Cannot build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("Cannot render template: {0}")]
    Template(#[from] tera::Error),
}

/// SMTP relay settings.
///
/// | Env var         | Default                  |
/// |-----------------|--------------------------|
/// | `SMTP_HOST`     | unset: log-only mode     |
/// | `SMTP_PORT`     | `587` (STARTTLS)         |
/// | `SMTP_FROM`     | `Hyperion <noreply@hyperion.local>` |
/// | `SMTP_USER`     | none                     |
/// | `SMTP_PASSWORD` | none                     |
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from: String,
    pub credentials: Option<(String, String)>,
}

impl SmtpConfig {
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok().filter(|h| !h.is_empty())?;
        let port = match std::env::var("SMTP_PORT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Ignoring invalid SMTP_PORT");
                587
            }),
            Err(_) => 587,
        };
        let credentials = std::env::var("SMTP_USER")
            .ok()
            .zip(std::env::var("SMTP_PASSWORD").ok());

        Some(Self {
            host,
            port,
            from: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "Hyperion <noreply@hyperion.local>".to_string()),
            credentials,
        })
    }
}

struct Relay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Relay {
    fn connect(config: SmtpConfig) -> Result<Self, EmailError> {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port);
        if let Some((user, password)) = config.credentials {
            builder = builder.credentials(Credentials::new(user, password));
        }
        Ok(Self {
            transport: builder.build(),
            from: config.from.parse()?,
        })
    }

    async fn send(&self, to: &str, email: &RenderedEmail) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(&email.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;
        self.transport.send(message).await?;
        Ok(())
    }
}

/// Renders and sends the platform's emails. Shared as `Arc<Mailer>`.
pub struct Mailer {
    templates: MailTemplates,
    relay: Option<Relay>,
}

impl Mailer {
    /// `None` selects log-only mode.
    pub fn new(smtp: Option<SmtpConfig>) -> Result<Self, EmailError> {
        Ok(Self {
            templates: MailTemplates::new()?,
            relay: smtp.map(Relay::connect).transpose()?,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.relay.is_some()
    }

    /// Send `kind` to each recipient separately, so addresses never leak
    /// between recipients.
    ///
    /// Every recipient is attempted; the first failure is returned.
    pub async fn send(
        &self,
        recipients: &[String],
        kind: MailKind,
        context: &Context,
    ) -> Result<(), EmailError> {
        let email = self.templates.render(kind, context)?;

        let Some(relay) = &self.relay else {
            for to in recipients {
                tracing::info!(%to, subject = %email.subject, body = %email.body, "Email (log-only)");
            }
            return Ok(());
        };

        let mut outcome = Ok(());
        for to in recipients {
            match relay.send(to, &email).await {
                Ok(()) => tracing::info!(%to, subject = %email.subject, "Email sent"),
                Err(e) => {
                    tracing::warn!(%to, error = %e, "Email not delivered");
                    if outcome.is_ok() {
                        outcome = Err(e);
                    }
                }
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approval_context() -> Context {
        let mut context = Context::new();
        context.insert("entity", "BDE");
        context.insert("title", "Gala");
        context
    }

    #[tokio::test]
    async fn log_only_mailer_accepts_mail() {
        let mailer = Mailer::new(None).unwrap();
        assert!(!mailer.is_configured());

        let sent = mailer
            .send(
                &["admin@etu.ec-lyon.fr".to_string()],
                MailKind::FeedApprovalRequired,
                &approval_context(),
            )
            .await;
        assert!(sent.is_ok());
    }

    #[tokio::test]
    async fn template_errors_come_first() {
        let mailer = Mailer::new(None).unwrap();
        let sent = mailer
            .send(&[], MailKind::AccountActivation, &Context::new())
            .await;
        assert!(matches!(sent, Err(EmailError::Template(_))));
    }

    #[tokio::test]
    async fn bad_sender_address_is_rejected_at_startup() {
        let config = SmtpConfig {
            host: "localhost".into(),
            port: 2525,
            from: "not an address".into(),
            credentials: None,
        };
        assert!(matches!(Mailer::new(Some(config)), Err(EmailError::Address(_))));
    }
}
