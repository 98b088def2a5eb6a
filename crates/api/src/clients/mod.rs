//! Outbound HTTP clients.

pub mod ffsu;
