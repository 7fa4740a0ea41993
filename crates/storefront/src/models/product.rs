//! Product model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ucdrop_core::{CurrencyCode, Price, ProductId, price::discount_percent};

/// A purchasable UC bundle.
///
/// Products are immutable once listed; the catalog is the only writer and
/// it normalizes `discount_percent` on load, so a stale value in a catalog
/// file can never disagree with the two prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    /// Amount of UC delivered to the player account.
    pub uc_amount: u32,
    /// Original listed price.
    pub price: Decimal,
    /// Discounted price actually charged (<= `price`).
    pub discount_price: Decimal,
    /// Advertised discount percentage, derived from the two prices.
    #[serde(default)]
    pub discount_percent: u8,
    /// Currency all prices are denominated in.
    #[serde(default)]
    pub currency: CurrencyCode,
}

impl Product {
    /// The price actually charged, as a displayable [`Price`].
    #[must_use]
    pub const fn charge(&self) -> Price {
        Price::new(self.discount_price, self.currency)
    }

    /// The original listed price, as a displayable [`Price`].
    #[must_use]
    pub const fn original(&self) -> Price {
        Price::new(self.price, self.currency)
    }

    /// Recompute the derived discount percentage from the two prices.
    pub fn normalize(&mut self) {
        self.discount_percent = discount_percent(self.price, self.discount_price);
    }
}
