//! Domain models for the storefront.

pub mod api;
pub mod order;
pub mod product;
pub mod session;

pub use api::ApiEnvelope;
pub use order::Order;
pub use product::Product;
pub use session::{CurrentAdmin, keys as session_keys};
