//! Hyperion event bus and email infrastructure.
//!
//! - [`EventBus`] is the in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`HyperionEvent`] enumerates the domain events.
//! - [`templates`] renders the embedded Tera email templates.
//! - [`mailer`] sends rendered emails over SMTP, or logs them when SMTP is
//!   not configured.

pub mod bus;
pub mod mailer;
pub mod templates;

pub use bus::{EventBus, HyperionEvent, Published};
pub use mailer::{EmailError, Mailer, SmtpConfig};
pub use templates::{MailKind, MailTemplates, RenderedEmail};
