//! # Built-in Catalog
//!
//! The catalog the storefront ships with when no catalog file is
//! configured: four categories with three products each.
//!
//! ## Id Scheme
//! ```text
//! Category 1 Mobile Devices ──► products 1001..1003
//! Category 2 Computers      ──► products 2001..2003
//! Category 3 Smart Home     ──► products 3001..3003
//! Category 4 Wearables      ──► products 4001..4003
//! ```

use portables_core::{Category, Money, Product};

/// (id, name, price, specs, image)
type ProductRow = (i64, &'static str, Money, &'static str, &'static str);

/// (id, name, image, description, products)
type CategoryRow = (
    i64,
    &'static str,
    &'static str,
    &'static str,
    &'static [ProductRow],
);

const fn price(dollars: i64, cents: i64) -> Money {
    Money::from_major_minor(dollars, cents)
}

const CATEGORIES: &[CategoryRow] = &[
    (
        1,
        "Mobile Devices",
        "/images/phone.jpg",
        "Portable communication devices",
        &[
            (1001, "iPhone 15 Pro", price(999, 99), "6.1\" Super Retina XDR", "/images/iphone.jpg"),
            (1002, "Samsung Galaxy S23", price(899, 99), "6.1\" Dynamic AMOLED", "/images/galaxy.jpg"),
            (1003, "Google Pixel 8", price(799, 99), "6.2\" OLED", "/images/pixel.jpg"),
        ],
    ),
    (
        2,
        "Computers",
        "/images/laptop.jpg",
        "Computing devices for work and gaming",
        &[
            (2001, "MacBook Pro 16\"", price(2499, 99), "M3 Pro, 16GB RAM", "/images/macbook.jpg"),
            (2002, "Dell XPS 15", price(1899, 99), "Intel i7, 16GB RAM", "/images/dell.jpg"),
            (2003, "iMac 24\"", price(1499, 99), "M3, 8GB RAM", "/images/imac.jpg"),
        ],
    ),
    (
        3,
        "Smart Home",
        "/images/voiceassistant.jpg",
        "Smart home devices and assistants",
        &[
            (3001, "Amazon Echo Dot", price(49, 99), "4th Gen", "/images/echo.jpg"),
            (3002, "Google Nest Mini", price(39, 99), "2nd Gen", "/images/nest.jpg"),
            (3003, "Philips Hue Starter Kit", price(199, 99), "3 bulbs + bridge", "/images/hue.jpg"),
        ],
    ),
    (
        4,
        "Wearables",
        "/images/wearabletech.jpg",
        "Wearable technology devices",
        &[
            (4001, "Apple Watch Series 9", price(399, 99), "45mm GPS", "/images/applewatch.jpg"),
            (4002, "Samsung Galaxy Watch 6", price(349, 99), "44mm", "/images/galaxywatch.jpg"),
            (4003, "Fitbit Charge 6", price(159, 99), "Advanced health tracking", "/images/fitbit.jpg"),
        ],
    ),
];

/// Materializes the built-in categories.
pub fn builtin_categories() -> Vec<Category> {
    CATEGORIES
        .iter()
        .map(|&(id, name, image, description, products)| Category {
            id,
            name: name.to_string(),
            image: Some(image.to_string()),
            description: Some(description.to_string()),
            products: products
                .iter()
                .map(|&(id, name, price, specs, image)| Product {
                    id,
                    name: name.to_string(),
                    price_cents: price.cents(),
                    specs: Some(specs.to_string()),
                    image: Some(image.to_string()),
                })
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_categories_of_three() {
        let categories = builtin_categories();
        assert_eq!(categories.len(), 4);
        assert!(categories.iter().all(|c| c.products.len() == 3));
    }

    #[test]
    fn test_prices_are_exact_cents() {
        let categories = builtin_categories();
        let macbook = categories[1].product(2001).unwrap();
        assert_eq!(macbook.price_cents, 249999);
        assert_eq!(macbook.price().to_string(), "$2499.99");
    }

    #[test]
    fn test_product_ids_follow_category() {
        for category in builtin_categories() {
            for product in &category.products {
                assert_eq!(product.id / 1000, category.id);
            }
        }
    }
}
