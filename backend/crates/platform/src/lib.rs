//! Platform Crate - Technical Infrastructure
//!
//! Shared technical foundations for the account service:
//! - Password hashing (Argon2id with a tunable cost)
//! - HMAC signing and Base64 helpers
//! - Cookie building and extraction

pub mod cookie;
pub mod crypto;
pub mod password;
