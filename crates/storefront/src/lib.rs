//! Quire Storefront library.
//!
//! Public pages and the key-gated read API, exposed as a library so the
//! router can be exercised in-process by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::StorefrontConfig;
pub use routes::router;
pub use state::AppState;
