//! Request extractors: [`auth::AuthUser`] for any signed-in caller and the
//! group guards in [`rbac`].

pub mod auth;
pub mod rbac;
