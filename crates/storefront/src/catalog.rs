//! Static product catalog.
//!
//! The catalog is loaded once at startup, either from a JSON file named in
//! configuration or from the catalog bundled with this crate, and is
//! read-only afterwards. It backs the product detail view and is the
//! fallback source for catalog pagination whenever the remote API fails.

use std::collections::HashSet;
use std::path::Path;

use thiserror::Error;
use tracing::info;
use yammi_core::{Product, ProductId};

/// Catalog shipped with the crate.
const BUNDLED_CATALOG: &str = include_str!("../data/products.json");

/// Errors that can occur while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// Catalog content is not a JSON array of products.
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an id.
    #[error("duplicate product id {0}")]
    DuplicateId(ProductId),
}

/// Fixed, ordered product list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two products share an id.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(product.id) {
                return Err(CatalogError::DuplicateId(product.id));
            }
        }
        Ok(Self { products })
    }

    /// Parse a catalog from a JSON array.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the JSON is invalid or ids repeat.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// The catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the bundled file is invalid.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load the catalog from `path`, or the bundled catalog if `None`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read or parsed.
    pub async fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog = match path {
            Some(path) => {
                let json = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| CatalogError::Read {
                        path: path.display().to_string(),
                        source,
                    })?;
                Self::from_json(&json)?
            }
            None => Self::bundled()?,
        };

        info!(products = catalog.len(), "Catalog loaded");
        Ok(catalog)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog has no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Products in `[start, end)`, clamped to the catalog bounds.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &[Product] {
        let end = end.min(self.products.len());
        self.products.get(start..end).unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.len(), 25);
        assert!(catalog.find(ProductId::new(1)).is_some());
    }

    #[test]
    fn test_bundled_sale_prices_are_not_above_original() {
        let catalog = Catalog::bundled().unwrap();
        for product in catalog.products() {
            assert!(product.sale_price <= product.original_price, "{}", product.name);
        }
    }

    #[test]
    fn test_slice_clamps() {
        let catalog = Catalog::bundled().unwrap();
        assert_eq!(catalog.slice(0, 10).len(), 10);
        assert_eq!(catalog.slice(20, 30).len(), 5);
        assert!(catalog.slice(30, 40).is_empty());
    }

    #[test]
    fn test_find_missing() {
        let catalog = Catalog::bundled().unwrap();
        assert!(catalog.find(ProductId::new(999)).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"[
            {"id":1,"name":"A","originalPrice":1,"discountRate":0,"salePrice":1,"image":"","description":""},
            {"id":1,"name":"B","originalPrice":1,"discountRate":0,"salePrice":1,"image":"","description":""}
        ]"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::DuplicateId(id)) if id == ProductId::new(1)
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = Catalog::load(Some(Path::new("/nonexistent/products.json")))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(
            &path,
            r#"[{"id":9,"name":"Hotteok","originalPrice":3000,"discountRate":0,"salePrice":3000,"image":"","description":""}]"#,
        )
        .unwrap();

        let catalog = Catalog::load(Some(&path)).await.unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find(ProductId::new(9)).unwrap().name, "Hotteok");
    }
}
