//! Cart domain model

use serde::{Deserialize, Serialize};

/// A shopping cart owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: u64,
    #[serde(default)]
    pub user_id: u64,
    #[serde(default)]
    pub products: Vec<CartProductItem>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub discounted_total: f64,
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub total_quantity: u64,
}

/// One line in a cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartProductItem {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub quantity: u64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default, alias = "discountedTotal")]
    pub discounted_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Cart {
    /// Recompute the summary fields from the product lines
    pub fn recompute_totals(&mut self) {
        let mut total = 0.0;
        let mut discounted = 0.0;
        let mut quantity = 0;
        for line in &mut self.products {
            line.total = round_cents(line.price * line.quantity as f64);
            line.discounted_price =
                round_cents(line.total * (1.0 - line.discount_percentage / 100.0));
            total += line.total;
            discounted += line.discounted_price;
            quantity += line.quantity;
        }
        self.total = round_cents(total);
        self.discounted_total = round_cents(discounted);
        self.total_products = self.products.len() as u64;
        self.total_quantity = quantity;
    }

    /// Quantity of a given product in this cart, if present
    pub fn quantity_of(&self, product_id: u64) -> Option<u64> {
        self.products
            .iter()
            .find(|line| line.id == product_id)
            .map(|line| line.quantity)
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Wrapper for cart list responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartsResponse {
    #[serde(default)]
    pub carts: Vec<Cart>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

/// `{id, quantity}` pair sent when adding to or updating a cart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: u64,
    pub quantity: u64,
}

impl CartLine {
    pub fn new(id: u64, quantity: u64) -> Self {
        Self { id, quantity }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartRequest {
    pub user_id: u64,
    pub products: Vec<CartLine>,
}

/// Body of a cart update
///
/// `merge` is only sent when set; without it the server replaces the lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCartRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merge: Option<bool>,
    pub products: Vec<CartLine>,
}

impl UpdateCartRequest {
    pub fn merge(products: Vec<CartLine>) -> Self {
        Self {
            merge: Some(true),
            products,
        }
    }

    pub fn replace(products: Vec<CartLine>) -> Self {
        Self {
            merge: None,
            products,
        }
    }

    pub fn is_merge(&self) -> bool {
        self.merge.unwrap_or(false)
    }
}
