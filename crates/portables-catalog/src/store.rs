//! # Catalog Store
//!
//! Read-only lookups over categories and products.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Startup                                                                │
//! │    StaticCatalog::builtin()          (no catalog configured)           │
//! │    StaticCatalog::from_json_file(p)  (catalog.path / env override)     │
//! │          │                                                              │
//! │          ▼  validate: unique ids, 0 <= price <= MAX_PRICE_CENTS        │
//! │    Arc<dyn CatalogStore>  ──► shared by every request handler          │
//! │                                                                         │
//! │  Requests                                                               │
//! │    list_categories()  get_category(id)  get_product(id)                │
//! │    (never mutate; no locking needed)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Document Format
//! ```json
//! {
//!   "categories": [
//!     {
//!       "id": 1,
//!       "name": "Mobile Devices",
//!       "image": "/images/phone.jpg",
//!       "description": "Portable communication devices",
//!       "products": [
//!         { "id": 1001, "name": "iPhone 15 Pro", "priceCents": 99999 },
//!         { "id": 1002, "name": "Samsung Galaxy S23", "price": "899.99" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//! A product gives either `priceCents` or an exact decimal `price`.

use std::collections::HashMap;
use std::path::Path;

use portables_core::validation::validate_price_cents;
use portables_core::{Category, CategorySummary, Money, Product, ValidationError};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{CatalogError, CatalogResult};
use crate::seed::builtin_categories;

// =============================================================================
// Trait
// =============================================================================

/// Source of catalog data.
///
/// Implementations are immutable after construction and shared across
/// request handlers.
pub trait CatalogStore: Send + Sync {
    /// Every category without products, in catalog order.
    fn list_categories(&self) -> Vec<CategorySummary>;

    /// One category with its products.
    fn get_category(&self, id: i64) -> CatalogResult<Category>;

    /// One product, wherever it is listed.
    fn get_product(&self, id: i64) -> CatalogResult<Product>;
}

// =============================================================================
// Static Catalog
// =============================================================================

/// In-memory catalog with id indexes.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    categories: Vec<Category>,
    category_index: HashMap<i64, usize>,
    product_index: HashMap<i64, Product>,
}

impl StaticCatalog {
    /// Builds a catalog, rejecting duplicate ids and out-of-range prices.
    pub fn new(categories: Vec<Category>) -> CatalogResult<Self> {
        let mut category_index = HashMap::with_capacity(categories.len());
        let mut product_index = HashMap::new();

        for (position, category) in categories.iter().enumerate() {
            if category_index.insert(category.id, position).is_some() {
                return Err(CatalogError::DuplicateId {
                    entity: "category",
                    id: category.id,
                });
            }

            for product in &category.products {
                validate_price_cents(product.price_cents).map_err(|_| {
                    CatalogError::InvalidPrice {
                        product_id: product.id,
                        price_cents: product.price_cents,
                    }
                })?;

                if product_index.insert(product.id, product.clone()).is_some() {
                    return Err(CatalogError::DuplicateId {
                        entity: "product",
                        id: product.id,
                    });
                }
            }
        }

        Ok(StaticCatalog {
            categories,
            category_index,
            product_index,
        })
    }

    /// The catalog the storefront ships with.
    pub fn builtin() -> Self {
        let categories = builtin_categories();
        let category_index = categories
            .iter()
            .enumerate()
            .map(|(position, c)| (c.id, position))
            .collect();
        let product_index = categories
            .iter()
            .flat_map(|c| c.products.iter())
            .map(|p| (p.id, p.clone()))
            .collect();

        StaticCatalog {
            categories,
            category_index,
            product_index,
        }
    }

    /// Parses a catalog document.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        let categories = document
            .categories
            .into_iter()
            .map(CategoryDocument::into_category)
            .collect::<CatalogResult<Vec<_>>>()?;

        let catalog = StaticCatalog::new(categories)?;
        debug!(
            categories = catalog.category_count(),
            products = catalog.product_count(),
            "Parsed catalog document"
        );
        Ok(catalog)
    }

    /// Reads and parses a catalog document from disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json_str(&json)?;
        info!(
            path = %path.display(),
            categories = catalog.category_count(),
            products = catalog.product_count(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn product_count(&self) -> usize {
        self.product_index.len()
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CatalogStore for StaticCatalog {
    fn list_categories(&self) -> Vec<CategorySummary> {
        self.categories.iter().map(Category::summary).collect()
    }

    fn get_category(&self, id: i64) -> CatalogResult<Category> {
        self.category_index
            .get(&id)
            .map(|&position| self.categories[position].clone())
            .ok_or(CatalogError::CategoryNotFound(id))
    }

    fn get_product(&self, id: i64) -> CatalogResult<Product> {
        self.product_index
            .get(&id)
            .cloned()
            .ok_or(CatalogError::ProductNotFound(id))
    }
}

// =============================================================================
// Catalog Documents
// =============================================================================

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    categories: Vec<CategoryDocument>,
}

#[derive(Debug, Deserialize)]
struct CategoryDocument {
    id: i64,
    name: String,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    products: Vec<ProductDocument>,
}

impl CategoryDocument {
    fn into_category(self) -> CatalogResult<Category> {
        let products = self
            .products
            .into_iter()
            .map(ProductDocument::into_product)
            .collect::<CatalogResult<Vec<_>>>()?;

        Ok(Category {
            id: self.id,
            name: self.name,
            image: self.image,
            description: self.description,
            products,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductDocument {
    id: i64,
    name: String,
    #[serde(default)]
    price_cents: Option<i64>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    specs: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl ProductDocument {
    fn into_product(self) -> CatalogResult<Product> {
        let price_cents = match (self.price_cents, self.price.as_deref()) {
            (Some(cents), _) => cents,
            (None, Some(decimal)) => decimal
                .parse::<Money>()
                .map_err(|source| CatalogError::PriceFormat {
                    product_id: self.id,
                    source,
                })?
                .cents(),
            (None, None) => {
                return Err(CatalogError::PriceFormat {
                    product_id: self.id,
                    source: ValidationError::Required {
                        field: "price".to_string(),
                    },
                })
            }
        };

        Ok(Product {
            id: self.id,
            name: self.name,
            price_cents,
            specs: self.specs,
            image: self.image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookups() {
        let catalog = StaticCatalog::builtin();

        let summaries = catalog.list_categories();
        let names: Vec<&str> = summaries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Mobile Devices", "Computers", "Smart Home", "Wearables"]
        );

        let smart_home = catalog.get_category(3).unwrap();
        assert_eq!(smart_home.products.len(), 3);
        assert_eq!(smart_home.products[0].name, "Amazon Echo Dot");

        let iphone = catalog.get_product(1001).unwrap();
        assert_eq!(iphone.price_cents, 99999);
        assert_eq!(iphone.image.as_deref(), Some("/images/iphone.jpg"));
    }

    #[test]
    fn test_unknown_ids() {
        let catalog = StaticCatalog::builtin();
        assert!(matches!(
            catalog.get_category(99),
            Err(CatalogError::CategoryNotFound(99))
        ));
        assert!(matches!(
            catalog.get_product(5001),
            Err(CatalogError::ProductNotFound(5001))
        ));
    }

    #[test]
    fn test_builtin_passes_validation() {
        let catalog = StaticCatalog::new(builtin_categories()).unwrap();
        assert_eq!(catalog.category_count(), 4);
        assert_eq!(catalog.product_count(), 12);
    }

    #[test]
    fn test_from_json_str() {
        let catalog = StaticCatalog::from_json_str(
            r#"{
                "categories": [{
                    "id": 7,
                    "name": "Audio",
                    "products": [
                        { "id": 7001, "name": "Earbuds", "priceCents": 12999 },
                        { "id": 7002, "name": "Speaker", "price": "89.5", "specs": "Bluetooth 5.3" }
                    ]
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(catalog.get_product(7001).unwrap().price_cents, 12999);
        assert_eq!(catalog.get_product(7002).unwrap().price_cents, 8950);
        assert_eq!(catalog.list_categories()[0].image, None);
    }

    #[test]
    fn test_rejects_duplicate_product() {
        let err = StaticCatalog::from_json_str(
            r#"{"categories": [
                {"id": 1, "name": "A", "products": [{"id": 10, "name": "x", "priceCents": 1}]},
                {"id": 2, "name": "B", "products": [{"id": 10, "name": "y", "priceCents": 2}]}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::DuplicateId {
                entity: "product",
                id: 10
            }
        ));
    }

    #[test]
    fn test_rejects_duplicate_category() {
        let err = StaticCatalog::from_json_str(
            r#"{"categories": [{"id": 1, "name": "A"}, {"id": 1, "name": "B"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { entity: "category", .. }));
    }

    #[test]
    fn test_rejects_bad_prices() {
        let negative = StaticCatalog::from_json_str(
            r#"{"categories": [{"id": 1, "name": "A", "products": [{"id": 1, "name": "x", "priceCents": -5}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(negative, CatalogError::InvalidPrice { .. }));

        let huge = StaticCatalog::from_json_str(&format!(
            r#"{{"categories": [{{"id": 1, "name": "A", "products": [{{"id": 1, "name": "x", "priceCents": {}}}]}}]}}"#,
            i64::MAX
        ))
        .unwrap_err();
        assert!(matches!(huge, CatalogError::InvalidPrice { price_cents, .. } if price_cents == i64::MAX));

        let inexact = StaticCatalog::from_json_str(
            r#"{"categories": [{"id": 1, "name": "A", "products": [{"id": 1, "name": "x", "price": "1.999"}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(inexact, CatalogError::PriceFormat { .. }));

        let missing = StaticCatalog::from_json_str(
            r#"{"categories": [{"id": 1, "name": "A", "products": [{"id": 1, "name": "x"}]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(missing, CatalogError::PriceFormat { .. }));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            StaticCatalog::from_json_str("{not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            StaticCatalog::from_json_file("/definitely/not/here/catalog.json"),
            Err(CatalogError::Load(_))
        ));
    }

    #[test]
    fn test_usable_as_trait_object() {
        let store: std::sync::Arc<dyn CatalogStore> = std::sync::Arc::new(StaticCatalog::builtin());
        assert_eq!(store.list_categories().len(), 4);
    }
}
