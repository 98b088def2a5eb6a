//! Email templates embedded at compile time and rendered with Tera.

use tera::{Context, Tera};

/// Emails the platform knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailKind {
    AccountActivation,
    AccountExists,
    ResetPassword,
    FeedApprovalRequired,
}

impl MailKind {
    pub const ALL: [MailKind; 4] = [
        MailKind::AccountActivation,
        MailKind::AccountExists,
        MailKind::ResetPassword,
        MailKind::FeedApprovalRequired,
    ];

    /// Name of the Tera template.
    pub fn template_name(self) -> &'static str {
        match self {
            MailKind::AccountActivation => "account_activation.txt",
            MailKind::AccountExists => "account_exists.txt",
            MailKind::ResetPassword => "reset_password.txt",
            MailKind::FeedApprovalRequired => "feed_approval_required.txt",
        }
    }

    pub fn subject(self) -> &'static str {
        match self {
            MailKind::AccountActivation => "Hyperion - Activate your account",
            MailKind::AccountExists => "Hyperion - You already have an account",
            MailKind::ResetPassword => "Hyperion - Reset your password",
            MailKind::FeedApprovalRequired => "🔔 Feed - a news require approval",
        }
    }

    fn source(self) -> &'static str {
        match self {
            MailKind::AccountActivation => include_str!("../templates/account_activation.txt"),
            MailKind::AccountExists => include_str!("../templates/account_exists.txt"),
            MailKind::ResetPassword => include_str!("../templates/reset_password.txt"),
            MailKind::FeedApprovalRequired => {
                include_str!("../templates/feed_approval_required.txt")
            }
        }
    }
}

/// A rendered email ready for delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
}

/// The compiled template set.
pub struct MailTemplates {
    tera: Tera,
}

impl MailTemplates {
    /// Compile every embedded template.
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(
            MailKind::ALL
                .iter()
                .map(|kind| (kind.template_name(), kind.source())),
        )?;
        Ok(Self { tera })
    }

    /// Render `kind` with the given context.
    pub fn render(&self, kind: MailKind, context: &Context) -> Result<RenderedEmail, tera::Error> {
        let body = self.tera.render(kind.template_name(), context)?;
        Ok(RenderedEmail {
            subject: kind.subject().to_string(),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_templates_compile() {
        assert!(MailTemplates::new().is_ok());
    }

    #[test]
    fn feed_approval_mentions_entity_and_title() {
        let templates = MailTemplates::new().unwrap();
        let mut context = Context::new();
        context.insert("entity", "BDE");
        context.insert("title", "Gala <2026>");

        let email = templates
            .render(MailKind::FeedApprovalRequired, &context)
            .unwrap();
        assert_eq!(email.subject, "🔔 Feed - a news require approval");
        // Text templates are not HTML-escaped.
        assert!(email.body.starts_with("BDE has created Gala <2026>"));
    }

    #[test]
    fn activation_email_contains_token() {
        let templates = MailTemplates::new().unwrap();
        let mut context = Context::new();
        context.insert("app_name", "Hyperion");
        context.insert("base_url", "http://localhost:8000");
        context.insert("activation_token", "abc123");
        context.insert("ttl_hours", &24);

        let email = templates
            .render(MailKind::AccountActivation, &context)
            .unwrap();
        assert!(email.body.contains("abc123"));
        assert!(email.body.contains("24 hours"));
    }

    #[test]
    fn missing_variable_is_an_error() {
        let templates = MailTemplates::new().unwrap();
        let result = templates.render(MailKind::ResetPassword, &Context::new());
        assert!(result.is_err());
    }
}
