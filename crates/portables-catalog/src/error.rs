//! # Catalog Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Unknown id / bad catalog document                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogError (this module) ← Adds context and categorization          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in storefront-api) ← 404 for unknown ids, 500 otherwise     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use portables_core::ValidationError;
use thiserror::Error;

/// Catalog lookup and loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No category with this id.
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    /// No product with this id in any category.
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Two categories, or two products, share an id.
    ///
    /// ## When This Occurs
    /// - A catalog document lists the same product under two categories
    /// - Copy-paste slip when editing catalog.json
    #[error("Duplicate {entity} id: {id}")]
    DuplicateId { entity: &'static str, id: i64 },

    /// A product price is negative or above `MAX_PRICE_CENTS`.
    #[error("Product {product_id} has invalid price: {price_cents} cents")]
    InvalidPrice { product_id: i64, price_cents: i64 },

    /// A product price is missing or is not an exact decimal amount.
    #[error("Product {product_id} has unreadable price: {source}")]
    PriceFormat {
        product_id: i64,
        source: ValidationError,
    },

    /// The catalog file could not be read.
    #[error("Failed to read catalog: {0}")]
    Load(#[from] std::io::Error),

    /// The catalog document is not valid JSON for a catalog.
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

impl CatalogError {
    /// True for unknown category/product ids.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::CategoryNotFound(_) | CatalogError::ProductNotFound(_)
        )
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CatalogError::ProductNotFound(42).to_string(),
            "Product not found: 42"
        );
        assert_eq!(
            CatalogError::DuplicateId {
                entity: "product",
                id: 1001
            }
            .to_string(),
            "Duplicate product id: 1001"
        );
    }

    #[test]
    fn test_not_found_family() {
        assert!(CatalogError::CategoryNotFound(9).is_not_found());
        assert!(CatalogError::ProductNotFound(9).is_not_found());
        assert!(!CatalogError::InvalidPrice {
            product_id: 1,
            price_cents: -1
        }
        .is_not_found());
    }
}
