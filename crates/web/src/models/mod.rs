//! Domain models for the web crate.
//!
//! Submission types live in `support-desk-core`; this module holds the admin
//! account and the values kept in the session.

pub mod admin_user;
pub mod session;

pub use admin_user::AdminUser;
pub use session::{CurrentAdmin, Notice, NoticeLevel, keys as session_keys};
