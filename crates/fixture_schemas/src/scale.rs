//! Scale presets and the fixed e-commerce schema built from them.

use serde_json::{json, Value};

/// Generation scale presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// ~200 total rows
    Small,
    /// ~4,000 total rows
    Medium,
    /// ~100,000 total rows
    Large,
    /// ~600,000 total rows (for throughput testing)
    XLarge,
}

impl Scale {
    pub fn customers(&self) -> u64 {
        match self {
            Scale::Small => 10,
            Scale::Medium => 100,
            Scale::Large => 1_000,
            Scale::XLarge => 5_000,
        }
    }

    pub fn orders_per_customer(&self) -> u64 {
        match self {
            Scale::Small => 3,
            Scale::Medium => 5,
            Scale::Large => 10,
            Scale::XLarge => 10,
        }
    }

    pub fn items_per_order(&self) -> u64 {
        match self {
            Scale::Small => 4,
            Scale::Medium => 6,
            Scale::Large => 8,
            Scale::XLarge => 10,
        }
    }

    pub fn addresses_per_customer(&self) -> u64 {
        match self {
            Scale::Small => 2,
            Scale::Medium => 2,
            Scale::Large => 3,
            Scale::XLarge => 3,
        }
    }

    pub fn products(&self) -> u64 {
        match self {
            Scale::Small => 20,
            Scale::Medium => 500,
            Scale::Large => 5_000,
            Scale::XLarge => 20_000,
        }
    }

    /// Expected rows per table of [`ecommerce`], in declaration order.
    pub fn ecommerce_row_counts(&self) -> Vec<(&'static str, u64)> {
        let customers = self.customers();
        let orders = customers * self.orders_per_customer();
        vec![
            ("customers", customers),
            ("addresses", customers * self.addresses_per_customer()),
            ("orders", orders),
            ("order_items", orders * self.items_per_order()),
            ("products", self.products()),
        ]
    }
}

impl std::str::FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Ok(Scale::Small),
            "medium" | "m" => Ok(Scale::Medium),
            "large" | "l" => Ok(Scale::Large),
            "xlarge" | "xl" | "x" => Ok(Scale::XLarge),
            _ => Err(format!(
                "Unknown scale: {}. Use small, medium, large, or xlarge",
                s
            )),
        }
    }
}

/// A customers → orders → order_items shop, plus addresses and a product catalog.
///
/// Uses every generator kind at least once.
pub fn ecommerce(scale: Scale) -> Value {
    json!({
        "tables": [
            {
                "name": "customers",
                "rows": scale.customers(),
                "columns": [
                    { "name": "id", "type": "int", "generator": { "increment": true } },
                    { "name": "code", "type": "varchar",
                      "generator": { "random": { "length": 8, "prefix": "CUS-" } } },
                    { "name": "tier", "generator": { "predefined_list": ["bronze", "silver", "gold"] } },
                    { "name": "country", "generator": { "hardcoded": "NL" } }
                ]
            },
            {
                "name": "addresses",
                "parent": "customers",
                "rows_per_parent": scale.addresses_per_customer(),
                "columns": [
                    { "name": "id", "generator": { "table_increment": true } },
                    { "name": "customer_id", "generator": { "parent_key": "id" } },
                    { "name": "kind", "generator": { "predefined_list": ["billing", "shipping"] } }
                ]
            },
            {
                "name": "orders",
                "parent": "customers",
                "rows_per_parent": scale.orders_per_customer(),
                "columns": [
                    { "name": "id", "type": "int", "generator": { "table_increment": true } },
                    { "name": "customer_id", "type": "int", "generator": { "parent_key": "id" } },
                    { "name": "line", "generator": { "increment": true } },
                    { "name": "status",
                      "generator": { "predefined_list": ["new", "paid", "shipped", "cancelled"] } }
                ]
            },
            {
                "name": "order_items",
                "parent": "orders",
                "rows_per_parent": scale.items_per_order(),
                "columns": [
                    { "name": "order_id", "generator": { "parent_key": "id" } },
                    { "name": "position", "generator": { "increment": true } },
                    { "name": "sku", "generator": { "random": { "length": 6, "prefix": "SKU-" } } }
                ]
            },
            {
                "name": "products",
                "rows": scale.products(),
                "columns": [
                    { "name": "id", "generator": { "increment": true } },
                    { "name": "name", "generator": { "random": { "length": 12 } } },
                    { "name": "currency", "generator": { "hardcoded": "EUR" } }
                ]
            }
        ]
    })
}
