//! Hyperion domain layer.
//!
//! Zero-IO building blocks shared by the repository and HTTP layers:
//! identifier types, the domain error enum, well-known groups, and the
//! pure rules of each module (feed approval, invoicing, raid registration,
//! competition licence parsing).

pub mod competition;
pub mod error;
pub mod facturation;
pub mod feed;
pub mod groups;
pub mod raid;
pub mod schools;
pub mod search;
pub mod types;
pub mod users;
