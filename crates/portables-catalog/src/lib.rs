//! # portables-catalog: Catalog Store for SmartPortables
//!
//! Categories and products, looked up by id. The catalog is loaded once at
//! startup and never changes while the server runs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     SmartPortables Data Flow                            │
//! │                                                                         │
//! │  HTTP handler (GET /api/products/1001, POST /api/cart)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                portables-catalog (THIS CRATE)                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ CatalogStore  │    │ StaticCatalog │    │    seed      │  │   │
//! │  │   │   (trait)     │◄───│  id indexes   │◄───│  4 × 3 items │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                                │   │
//! │  │                          catalog.json (optional)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use portables_catalog::{CatalogStore, StaticCatalog};
//!
//! let catalog = StaticCatalog::builtin();
//! let pixel = catalog.get_product(1003).unwrap();
//! assert_eq!(pixel.name, "Google Pixel 8");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CatalogError, CatalogResult};
pub use store::{CatalogStore, StaticCatalog};
