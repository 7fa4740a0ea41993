//! UC Drop Core - Shared types library.
//!
//! This crate provides common types used across all UC Drop components:
//! - `storefront` - Public-facing top-up storefront and checkout API
//! - `integration-tests` - End-to-end tests against the running storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no stores.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, and
//!   order/payment statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
