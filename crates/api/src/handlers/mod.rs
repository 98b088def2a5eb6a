//! HTTP handlers, one module per resource.

use hyperion_events::MailKind;
use tera::Context;

use crate::state::AppState;

pub mod auth;
pub mod competition;
pub mod feed;
pub mod groups;
pub mod raid;
pub mod schools;
pub mod sdec_facturation;
pub mod users;

/// Name shown in account emails.
const APP_NAME: &str = "Hyperion";

/// Base template context shared by account emails.
pub(crate) fn mail_context(state: &AppState) -> Context {
    let mut context = Context::new();
    context.insert("app_name", APP_NAME);
    context.insert("base_url", &state.config.base_url);
    context
}

/// Send an email, logging failures instead of surfacing them. Account
/// endpoints answer the same way whether or not the mail left.
pub(crate) async fn send_mail(state: &AppState, to: &str, kind: MailKind, context: &Context) {
    if let Err(e) = state.mailer.send(&[to.to_string()], kind, context).await {
        tracing::error!(error = %e, kind = ?kind, "Failed to send account email");
    }
}
