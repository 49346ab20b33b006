//! Product domain model

use serde::{Deserialize, Serialize};

use super::result::{Error, Result};

/// A catalogue product as returned by the remote API
///
/// Only `id` and `title` are guaranteed; a freshly created product echoes
/// back just the submitted fields, so everything else is defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warranty_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_information: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reviews: Vec<Review>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_order_quantity: Option<u32>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub rating: f64,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub reviewer_email: Option<String>,
}

impl Product {
    /// Minimal product with just an id and title
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            category: String::new(),
            price: 0.0,
            discount_percentage: 0.0,
            rating: 0.0,
            stock: 0,
            tags: Vec::new(),
            brand: None,
            sku: None,
            weight: None,
            dimensions: None,
            warranty_information: None,
            shipping_information: None,
            availability_status: None,
            reviews: Vec::new(),
            return_policy: None,
            minimum_order_quantity: None,
            images: Vec::new(),
            thumbnail: None,
        }
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Price after the advertised discount, rounded to cents
    pub fn discounted_price(&self) -> f64 {
        let discounted = self.price * (1.0 - self.discount_percentage / 100.0);
        (discounted * 100.0).round() / 100.0
    }

    /// Merge an edit form into this product (the optimistic local update)
    pub fn apply(&mut self, patch: &ProductPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(discount) = patch.discount_percentage {
            self.discount_percentage = discount;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
        if let Some(brand) = &patch.brand {
            self.brand = Some(brand.clone());
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
    }
}

/// Wrapper for product list responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

impl ProductsResponse {
    pub fn from_products(products: Vec<Product>) -> Self {
        let total = products.len() as u64;
        Self {
            products,
            total,
            skip: 0,
            limit: total,
        }
    }
}

/// Partial product used as the edit form and as the update body
///
/// Unset fields are left out of the request entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&Product> for ProductPatch {
    fn from(product: &Product) -> Self {
        Self {
            title: Some(product.title.clone()),
            description: Some(product.description.clone()),
            price: Some(product.price),
            discount_percentage: Some(product.discount_percentage),
            stock: Some(product.stock),
            brand: product.brand.clone(),
            category: Some(product.category.clone()),
        }
    }
}

/// Body of a create-product request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub brand: String,
    pub stock: i64,
}

/// Add-product form, holding fields exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub title: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub brand: String,
    pub stock: String,
}

/// Field selector for [`ProductForm::set`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Title,
    Description,
    Price,
    Category,
    Brand,
    Stock,
}

pub const REQUIRED_FIELDS_MESSAGE: &str =
    "Please fill in all required fields (Title, Price, Category)";

impl ProductForm {
    pub fn set(&mut self, field: ProductField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProductField::Title => self.title = value,
            ProductField::Description => self.description = value,
            ProductField::Price => self.price = value,
            ProductField::Category => self.category = value,
            ProductField::Brand => self.brand = value,
            ProductField::Stock => self.stock = value,
        }
    }

    /// Check required fields and convert to a request body
    ///
    /// Title, price and category are required. Stock falls back to 0 when
    /// it is blank or not an integer.
    pub fn validate(&self) -> Result<NewProduct> {
        let title = self.title.trim();
        let price = self.price.trim();
        let category = self.category.trim();

        if title.is_empty() || price.is_empty() || category.is_empty() {
            return Err(Error::validation(REQUIRED_FIELDS_MESSAGE));
        }

        let price: f64 = price
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite())
            .ok_or_else(|| Error::validation("Price must be a number"))?;

        Ok(NewProduct {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            price,
            category: category.to_string(),
            brand: self.brand.trim().to_string(),
            stock: self.stock.trim().parse().unwrap_or(0),
        })
    }
}

/// Human label for a category slug ("smartphones" -> "Smartphones")
pub fn category_label(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
