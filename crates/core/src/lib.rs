//! Quire Core - Shared domain types.
//!
//! This crate provides the types used across all Quire components:
//! - `store` - Flat-file JSON persistence
//! - `storefront` - Public site and read API
//! - `admin` - Content administration panel
//! - `cli` - Command-line tools for operators
//!
//! # Architecture
//!
//! The core crate contains only types and validation rules - no I/O and no
//! HTTP. Persistence lives in `quire-store`.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, content and category records, API access policy

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
