//! Support Desk web library.
//!
//! Serves the public submission form and the admin inbox. The binary in
//! `main.rs` only wires configuration, telemetry, and the listener; every
//! handler lives here so the router can be driven directly in tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
