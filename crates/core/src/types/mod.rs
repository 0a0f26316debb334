//! Core types for Quire.
//!
//! This module provides type-safe wrappers for the CMS domain.

pub mod api_config;
pub mod category;
pub mod content;
pub mod id;
pub mod validation;

pub use api_config::{ApiConfig, WILDCARD_ORIGIN};
pub use category::Category;
pub use content::{Content, ContentUpdate, NewContent};
pub use id::*;
pub use validation::ValidationError;
