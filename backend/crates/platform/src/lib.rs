//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, Base64)
//! - Password hashing (Argon2id)
//! - Cookie management
//! - Query-string percent encoding

pub mod cookie;
pub mod crypto;
pub mod encode;
pub mod password;
