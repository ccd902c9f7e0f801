//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (CSPRNG bytes, base64url, HMAC-SHA256 token signing)
//! - Password hashing (Argon2id with a configurable work factor)
//! - Cookie header parsing and `Set-Cookie` construction

pub mod cookie;
pub mod crypto;
pub mod password;
