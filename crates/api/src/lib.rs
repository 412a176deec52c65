//! LimaCentro HTTP API.
//!
//! Axum server exposing the public directory, the owner listing surface,
//! the moderation endpoints, and the presence counter. The library exposes
//! [`router::build_app_router`] so the binary and the integration tests
//! share one middleware stack.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
