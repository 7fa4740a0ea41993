//! Product Catalog Service.
//!
//! Products are created and edited by an external admin collaborator, not by
//! this service; the catalog here is a read-only listing loaded once at
//! startup. The built-in seed covers the standard UC bundles; a JSON file
//! (`CATALOG_PATH`) can replace it wholesale.

use std::collections::HashMap;
use std::path::Path;

use rust_decimal::Decimal;
use thiserror::Error;

use ucdrop_core::{CurrencyCode, ProductId};

use crate::models::Product;

/// Errors that can occur while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("catalog contains duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error("catalog product {0} has discount price above list price")]
    DiscountAbovePrice(ProductId),
    #[error("catalog is empty")]
    Empty,
}

/// Read-only product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
    by_id: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Build a catalog from a product list.
    ///
    /// Derived fields are normalized and basic pricing sanity is enforced.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the list is empty, has duplicate ids, or
    /// contains a discount price above the list price.
    pub fn new(mut products: Vec<Product>) -> Result<Self, CatalogError> {
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut by_id = HashMap::with_capacity(products.len());
        for (idx, product) in products.iter_mut().enumerate() {
            if product.discount_price > product.price {
                return Err(CatalogError::DiscountAbovePrice(product.id.clone()));
            }
            product.normalize();
            if by_id.insert(product.id.clone(), idx).is_some() {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        Ok(Self { products, by_id })
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed, or if
    /// the parsed list fails validation.
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&raw)?;
        Self::new(products)
    }

    /// The built-in seed: the standard TRY-priced UC bundles.
    #[must_use]
    #[allow(clippy::missing_panics_doc)]
    pub fn seeded() -> Self {
        #[allow(clippy::unwrap_used)] // static seed
        Self::new(default_bundles()).unwrap()
    }

    /// All listed products, in listing order.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.by_id.get(id).and_then(|&idx| self.products.get(idx))
    }

    /// Number of listed products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products (never true after construction).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

fn bundle(id: &str, uc: u32, price_cents: i64, discount_cents: i64) -> Product {
    Product {
        id: ProductId::new(id),
        title: format!("{uc} UC"),
        uc_amount: uc,
        price: Decimal::new(price_cents, 2),
        discount_price: Decimal::new(discount_cents, 2),
        discount_percent: 0,
        currency: CurrencyCode::TRY,
    }
}

fn default_bundles() -> Vec<Product> {
    vec![
        bundle("uc-60", 60, 39_99, 35_99),
        bundle("uc-325", 325, 189_99, 169_99),
        bundle("uc-660", 660, 379_99, 329_99),
        bundle("uc-1800", 1800, 949_99, 849_99),
        bundle("uc-3850", 3850, 1_899_99, 1_649_99),
        bundle("uc-8100", 8100, 3_799_99, 3_299_99),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_catalog_is_valid() {
        let catalog = Catalog::seeded();
        assert_eq!(catalog.len(), 6);
        assert!(!catalog.is_empty());
        // Every bundle is genuinely discounted
        for product in catalog.list() {
            assert!(product.discount_price < product.price);
            assert!(product.discount_percent > 0);
        }
    }

    #[test]
    fn test_get_by_id() {
        let catalog = Catalog::seeded();
        let product = catalog.get(&ProductId::new("uc-660")).unwrap();
        assert_eq!(product.uc_amount, 660);
        assert!(catalog.get(&ProductId::new("uc-999")).is_none());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(Catalog::new(vec![]), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let products = vec![bundle("p1", 60, 100, 90), bundle("p1", 325, 200, 180)];
        assert!(matches!(
            Catalog::new(products),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_rejects_discount_above_price() {
        let products = vec![bundle("p1", 60, 100, 150)];
        assert!(matches!(
            Catalog::new(products),
            Err(CatalogError::DiscountAbovePrice(_))
        ));
    }

    #[test]
    fn test_normalizes_discount_percent_on_load() {
        // Whatever the file claims, the derived value wins
        let mut product = bundle("p1", 660, 100_00, 80_00);
        product.discount_percent = 99;
        let catalog = Catalog::new(vec![product]).unwrap();
        assert_eq!(
            catalog.get(&ProductId::new("p1")).unwrap().discount_percent,
            20
        );
    }
}
