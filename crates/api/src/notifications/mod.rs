//! Notification routing infrastructure.
//!
//! The [`NotificationRouter`] subscribes to the event bus and turns the
//! events that need a human into emails.

pub mod router;

pub use router::NotificationRouter;
