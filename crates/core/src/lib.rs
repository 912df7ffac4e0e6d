//! Support Desk Core - Shared types library.
//!
//! This crate provides the domain types used by every Support Desk component:
//! - `web` - Public submission form and admin listing
//! - `cli` - Command-line tools for migrations and admin accounts
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP. Row encoding for `SQLite` is available behind the `sqlite`
//! feature.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, and submission categories
//! - [`submission`] - Submission records and the form validator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod submission;
pub mod types;

pub use submission::{
    Field, NewSubmission, Submission, SubmissionInput, ValidationError, ValidationErrors,
};
pub use types::*;
