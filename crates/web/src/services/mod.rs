//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Admin credential verification and password hashing

pub mod auth;

pub use auth::{AuthError, CredentialVerifier, DatabaseVerifier};
