//! # Domain Types
//!
//! Core domain types used throughout the SmartPortables storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    Product      │   │    LineItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id             │──►│  product_id     │       │
//! │  │  name, image    │   │  name           │   │  name           │       │
//! │  │  description    │   │  price_cents    │   │  unit_price     │       │
//! │  │  products       │   │  specs, image   │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                        │ snapshot       │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │    TaxRate      │   │  CustomerInfo   │──►│     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  name, email    │   │  order_id       │       │
//! │  │  900 = 9%       │   │  phone, zip     │   │  items, totals  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Every type serializes with camelCase field names, the shape the
//! storefront client reads (`priceCents`, `zipCode`, `orderId`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 900 bps = 9% (ZIP codes starting with 8)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A product offered in the catalog.
///
/// Catalog data is read-only for the lifetime of the process; the ledger
/// copies what it needs from here at add time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier, unique across all categories.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Short hardware summary (screen size, memory, ...).
    #[serde(default)]
    pub specs: Option<String>,

    /// Image reference. Delivering the image is someone else's job.
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// A category without its products, as listed on the landing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A category with its full product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Category {
    /// Drops the product list.
    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
            description: self.description.clone(),
        }
    }

    /// Finds a product of this category by id.
    pub fn product(&self, product_id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One product and its quantity in a ledger.
///
/// ## Price Freezing
/// Name and unit price are copied from the product when the line is
/// created. The ledger only ever replaces a line with a new value
/// (see [`LineItem::with_quantity`]); it never mutates one in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: i64,
    pub name: String,
    pub unit_price_cents: i64,
    /// Always at least 1 while the line lives in a ledger.
    pub quantity: i64,
}

impl LineItem {
    /// Creates a line item from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        LineItem {
            product_id: product.id,
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
        }
    }

    /// Returns a copy of this line with a different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: i64) -> Self {
        LineItem {
            quantity,
            ..self.clone()
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Contact and shipping details entered at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub zip_code: String,
}

/// Customer as recorded on an order: validated details plus the optional
/// signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub zip_code: String,
    pub user_id: Option<String>,
}

impl OrderCustomer {
    pub fn new(info: CustomerInfo, user_id: Option<String>) -> Self {
        OrderCustomer {
            name: info.name,
            email: info.email,
            phone: info.phone,
            zip_code: info.zip_code,
            user_id,
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A frozen order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: i64,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub line_total_cents: i64,
}

impl From<&LineItem> for OrderLine {
    fn from(item: &LineItem) -> Self {
        OrderLine {
            product_id: item.product_id,
            name: item.name.clone(),
            unit_price_cents: item.unit_price_cents,
            quantity: item.quantity,
            line_total_cents: item.line_total().cents(),
        }
    }
}

/// A submitted order.
///
/// ## Immutability
/// Built once from a ledger snapshot and never edited afterwards. Later
/// changes to the ledger or the catalog do not reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Human-readable order number (`ORD-YYMMDD-HHMMSS-NNNNNN`).
    pub order_id: String,

    pub customer: OrderCustomer,

    pub items: Vec<OrderLine>,

    pub subtotal_cents: i64,

    pub tax_cents: i64,

    /// Subtotal + tax.
    pub total_cents: i64,

    /// Rate applied, in basis points (derived from the ZIP code).
    pub tax_rate_bps: u32,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|l| l.quantity).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel() -> Product {
        Product {
            id: 1003,
            name: "Google Pixel 8".to_string(),
            price_cents: 79999,
            specs: Some("6.2\" OLED".to_string()),
            image: Some("/images/pixel.jpg".to_string()),
        }
    }

    #[test]
    fn test_line_item_freezes_product_data() {
        let mut product = pixel();
        let line = LineItem::from_product(&product, 2);

        product.price_cents = 1;
        product.name = "Renamed".to_string();

        assert_eq!(line.unit_price_cents, 79999);
        assert_eq!(line.name, "Google Pixel 8");
        assert_eq!(line.line_total().cents(), 159998);
    }

    #[test]
    fn test_with_quantity_returns_new_value() {
        let line = LineItem::from_product(&pixel(), 1);
        let bumped = line.with_quantity(4);

        assert_eq!(line.quantity, 1);
        assert_eq!(bumped.quantity, 4);
        assert_eq!(bumped.product_id, line.product_id);
    }

    #[test]
    fn test_product_wire_format_is_camel_case() {
        let json = serde_json::to_value(pixel()).unwrap();
        assert_eq!(json["priceCents"], 79999);
        assert_eq!(json["image"], "/images/pixel.jpg");
    }

    #[test]
    fn test_customer_deserializes_without_phone() {
        let customer: CustomerInfo = serde_json::from_str(
            r#"{"name":"Ada","email":"ada@example.com","zipCode":"90210"}"#,
        )
        .unwrap();
        assert_eq!(customer.zip_code, "90210");
        assert!(customer.phone.is_none());
    }

    #[test]
    fn test_category_summary_and_lookup() {
        let category = Category {
            id: 1,
            name: "Mobile Devices".to_string(),
            image: Some("/images/phone.jpg".to_string()),
            description: Some("Portable communication devices".to_string()),
            products: vec![pixel()],
        };

        assert_eq!(category.summary().name, "Mobile Devices");
        assert!(category.product(1003).is_some());
        assert!(category.product(9999).is_none());
    }

    #[test]
    fn test_tax_rate_percentage() {
        let rate = TaxRate::from_bps(900);
        assert_eq!(rate.bps(), 900);
        assert!((rate.percentage() - 9.0).abs() < f64::EPSILON);
        assert!(TaxRate::default().is_zero());
    }
}
