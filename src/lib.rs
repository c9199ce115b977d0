//! Token pair service library
//!
//! Issues short-lived signed access tokens paired with single-use opaque
//! refresh tokens, and rotates them with replay detection.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
