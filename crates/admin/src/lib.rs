//! Quire Admin library.
//!
//! Content, category and API-access management, exposed as a library so the
//! router can be exercised in-process by tests.
//!
//! # Security
//!
//! The admin panel has no login. It binds to 127.0.0.1 by default and must
//! only be reachable from trusted networks.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod routes;
pub mod state;

pub use config::AdminConfig;
pub use routes::router;
pub use state::AppState;
