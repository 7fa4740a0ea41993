//! Business services for the storefront.

pub mod auth;
pub mod orders;
pub mod player;
