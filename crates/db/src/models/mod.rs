//! Row models and request DTOs.
//!
//! Each module holds the `FromRow` entity structs for its tables plus the
//! `Create*` / `Update*` DTOs accepted by the repositories.

pub mod competition;
pub mod core_data;
pub mod group;
pub mod news;
pub mod raid;
pub mod school;
pub mod sdec_facturation;
pub mod session;
pub mod user;
