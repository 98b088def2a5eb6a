//! Credentials: Argon2id [`password`] hashes and [`jwt`] session tokens.

pub mod jwt;
pub mod password;
