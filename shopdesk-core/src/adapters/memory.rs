//! In-process shop used for demo mode and as a test double
//!
//! Serves a small seeded catalogue without touching the network. Unlike the
//! public demo API, mutations are kept for the lifetime of the value, so a
//! deleted cart really disappears from later listings. Every call is
//! recorded together with the credential it carried.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::result::{Error, Result};
use crate::domain::{
    AddCartRequest, AuthToken, Cart, CartLine, CartProductItem, CartsResponse, DeleteResponse,
    LoginRequest, LoginResponse, NewProduct, Product, ProductPatch, ProductsResponse, TokenPair,
    UpdateCartRequest, User,
};
use crate::ports::ShopApi;

/// A call observed by [`InMemoryShop`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListProducts,
    SearchProducts(String),
    GetProduct(u64),
    CreateProduct(String),
    UpdateProduct(u64),
    DeleteProduct(u64),
    ListCategories,
    ProductsByCategory(String),
    ListCarts,
    GetCart(u64),
    AddCart(u64),
    UpdateCart { id: u64, merge: bool },
    DeleteCart(u64),
    Login(String),
    CurrentUser,
    RefreshAuth,
}

struct ShopState {
    products: Vec<Product>,
    categories: Vec<String>,
    carts: Vec<Cart>,
    accounts: Vec<(User, String)>,
    tokens: HashMap<String, u64>,
    issued: u64,
    failure: Option<(u16, Option<String>)>,
    call_failures: Vec<(ApiCall, u16, Option<String>)>,
    calls: Vec<ApiCall>,
    credentials_seen: Vec<Option<String>>,
}

/// Offline [`ShopApi`] implementation
pub struct InMemoryShop {
    state: Mutex<ShopState>,
    latency: Option<Duration>,
}

impl InMemoryShop {
    /// Empty shop with no products, carts or accounts
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(ShopState {
                products: Vec::new(),
                categories: Vec::new(),
                carts: Vec::new(),
                accounts: Vec::new(),
                tokens: HashMap::new(),
                issued: 0,
                failure: None,
                call_failures: Vec::new(),
                calls: Vec::new(),
                credentials_seen: Vec::new(),
            }),
            latency: None,
        }
    }

    /// Shop seeded with a demo catalogue, one cart and two accounts
    ///
    /// Cart 1 belongs to user 1 and holds product 144 once. The account
    /// `emilys` / `emilyspass` is user 1.
    pub fn seeded() -> Self {
        let shop = Self::empty();
        if let Ok(mut state) = shop.state.lock() {
            state.products = seed_products();
            state.categories = vec![
                "beauty".to_string(),
                "fragrances".to_string(),
                "groceries".to_string(),
                "smartphones".to_string(),
                "sports-accessories".to_string(),
            ];
            state.accounts = seed_accounts();
            let mut cart = Cart {
                id: 1,
                user_id: 1,
                products: Vec::new(),
                total: 0.0,
                discounted_total: 0.0,
                total_products: 0,
                total_quantity: 0,
            };
            apply_lines(&state.products, &mut cart, &[CartLine::new(144, 1)], false).ok();
            state.carts.push(cart);
        }
        shop
    }

    /// Delay every call, to exercise loading states and request overlap
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every following call fail with the given status
    pub fn fail_with(&self, status: u16, message: Option<&str>) {
        if let Ok(mut state) = self.state.lock() {
            state.failure = Some((status, message.map(str::to_string)));
        }
    }

    /// Make every following occurrence of `call` fail; other calls succeed
    pub fn fail_call(&self, call: ApiCall, status: u16, message: Option<&str>) {
        if let Ok(mut state) = self.state.lock() {
            state
                .call_failures
                .push((call, status, message.map(str::to_string)));
        }
    }

    pub fn clear_failure(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.failure = None;
            state.call_failures.clear();
        }
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.state.lock().map(|s| s.calls.clone()).unwrap_or_default()
    }

    /// Credential carried by each call, parallel to [`calls`](Self::calls)
    pub fn credentials_seen(&self) -> Vec<Option<String>> {
        self.state
            .lock()
            .map(|s| s.credentials_seen.clone())
            .unwrap_or_default()
    }

    pub fn reset_calls(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.calls.clear();
            state.credentials_seen.clear();
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, ShopState>> {
        self.state
            .lock()
            .map_err(|_| Error::storage("in-memory shop state is poisoned"))
    }

    /// Record the call, wait out the latency, then apply any forced failure
    async fn enter(&self, call: ApiCall, auth: Option<&AuthToken>) -> Result<()> {
        {
            let mut state = self.lock()?;
            state.calls.push(call.clone());
            state
                .credentials_seen
                .push(auth.map(|t| t.as_str().to_string()));
        }

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let state = self.lock()?;
        let targeted = state
            .call_failures
            .iter()
            .find(|(failing, _, _)| *failing == call)
            .map(|(_, status, message)| (*status, message.clone()));
        match targeted.or_else(|| state.failure.clone()) {
            Some((status, message)) => Err(Error::http(status, message)),
            None => Ok(()),
        }
    }

    fn issue_token(state: &mut ShopState, user_id: u64) -> AuthToken {
        state.issued += 1;
        let token = format!("demo-token-{}-{}", user_id, state.issued);
        state.tokens.insert(token.clone(), user_id);
        AuthToken::new(token)
    }

    fn authenticated_user(state: &ShopState, auth: Option<&AuthToken>) -> Result<User> {
        let unauthorized = || Error::Unauthorized {
            message: Some("Invalid/expired Token!".to_string()),
        };
        let user_id = auth
            .and_then(|t| state.tokens.get(t.as_str()))
            .ok_or_else(unauthorized)?;
        state
            .accounts
            .iter()
            .find(|(u, _)| u.id == *user_id)
            .map(|(u, _)| u.clone())
            .ok_or_else(unauthorized)
    }
}

impl Default for InMemoryShop {
    fn default() -> Self {
        Self::seeded()
    }
}

fn product_not_found(id: u64) -> Error {
    Error::http(404, Some(format!("Product with id '{}' not found", id)))
}

fn cart_not_found(id: u64) -> Error {
    Error::http(404, Some(format!("Cart with id '{}' not found", id)))
}

/// Apply `lines` to a cart: merge replaces quantities of existing products
/// and appends new ones, otherwise the cart's lines are replaced.
fn apply_lines(products: &[Product], cart: &mut Cart, lines: &[CartLine], merge: bool) -> Result<()> {
    if !merge {
        cart.products.clear();
    }
    for line in lines {
        let product = products
            .iter()
            .find(|p| p.id == line.id)
            .ok_or_else(|| product_not_found(line.id))?;
        match cart.products.iter_mut().find(|item| item.id == line.id) {
            Some(item) => item.quantity = line.quantity,
            None => cart.products.push(CartProductItem {
                id: product.id,
                title: product.title.clone(),
                price: product.price,
                quantity: line.quantity,
                total: 0.0,
                discount_percentage: product.discount_percentage,
                discounted_price: 0.0,
                thumbnail: product.thumbnail.clone(),
            }),
        }
    }
    cart.recompute_totals();
    Ok(())
}

fn matches_search(product: &Product, query: &str) -> bool {
    let query = query.to_lowercase();
    product.title.to_lowercase().contains(&query)
        || product.description.to_lowercase().contains(&query)
}

#[async_trait]
impl ShopApi for InMemoryShop {
    async fn list_products(
        &self,
        auth: Option<&AuthToken>,
        query: Option<&str>,
    ) -> Result<ProductsResponse> {
        match query.filter(|q| !q.is_empty()) {
            Some(q) => {
                self.enter(ApiCall::SearchProducts(q.to_string()), auth).await?;
                let state = self.lock()?;
                let found = state
                    .products
                    .iter()
                    .filter(|p| matches_search(p, q))
                    .cloned()
                    .collect();
                Ok(ProductsResponse::from_products(found))
            }
            None => {
                self.enter(ApiCall::ListProducts, auth).await?;
                let state = self.lock()?;
                Ok(ProductsResponse::from_products(state.products.clone()))
            }
        }
    }

    async fn get_product(&self, auth: Option<&AuthToken>, id: u64) -> Result<Product> {
        self.enter(ApiCall::GetProduct(id), auth).await?;
        let state = self.lock()?;
        state
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| product_not_found(id))
    }

    async fn create_product(
        &self,
        auth: Option<&AuthToken>,
        product: &NewProduct,
    ) -> Result<Product> {
        self.enter(ApiCall::CreateProduct(product.title.clone()), auth)
            .await?;
        let mut state = self.lock()?;
        let id = state.products.iter().map(|p| p.id).max().unwrap_or(0) + 1;

        let mut created = Product::new(id, product.title.clone());
        created.description = product.description.clone();
        created.price = product.price;
        created.category = product.category.clone();
        created.brand = Some(product.brand.clone()).filter(|b| !b.is_empty());
        created.stock = product.stock;

        if !state.categories.contains(&created.category) {
            state.categories.push(created.category.clone());
            state.categories.sort();
        }
        state.products.push(created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        auth: Option<&AuthToken>,
        id: u64,
        patch: &ProductPatch,
    ) -> Result<Product> {
        self.enter(ApiCall::UpdateProduct(id), auth).await?;
        let mut state = self.lock()?;
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| product_not_found(id))?;
        product.apply(patch);
        Ok(product.clone())
    }

    async fn delete_product(&self, auth: Option<&AuthToken>, id: u64) -> Result<DeleteResponse> {
        self.enter(ApiCall::DeleteProduct(id), auth).await?;
        let mut state = self.lock()?;
        let index = state
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| product_not_found(id))?;
        state.products.remove(index);
        Ok(DeleteResponse {
            id,
            is_deleted: true,
            deleted_on: None,
        })
    }

    async fn list_categories(&self, auth: Option<&AuthToken>) -> Result<Vec<String>> {
        self.enter(ApiCall::ListCategories, auth).await?;
        Ok(self.lock()?.categories.clone())
    }

    async fn products_by_category(
        &self,
        auth: Option<&AuthToken>,
        category: &str,
    ) -> Result<ProductsResponse> {
        self.enter(ApiCall::ProductsByCategory(category.to_string()), auth)
            .await?;
        let state = self.lock()?;
        let found = state
            .products
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect();
        Ok(ProductsResponse::from_products(found))
    }

    async fn list_carts(&self, auth: Option<&AuthToken>) -> Result<CartsResponse> {
        self.enter(ApiCall::ListCarts, auth).await?;
        let state = self.lock()?;
        let total = state.carts.len() as u64;
        Ok(CartsResponse {
            carts: state.carts.clone(),
            total,
            skip: 0,
            limit: total,
        })
    }

    async fn get_cart(&self, auth: Option<&AuthToken>, id: u64) -> Result<Cart> {
        self.enter(ApiCall::GetCart(id), auth).await?;
        let state = self.lock()?;
        state
            .carts
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| cart_not_found(id))
    }

    async fn add_cart(&self, auth: Option<&AuthToken>, request: &AddCartRequest) -> Result<Cart> {
        self.enter(ApiCall::AddCart(request.user_id), auth).await?;
        let mut state = self.lock()?;
        let mut cart = Cart {
            id: state.carts.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            user_id: request.user_id,
            products: Vec::new(),
            total: 0.0,
            discounted_total: 0.0,
            total_products: 0,
            total_quantity: 0,
        };
        apply_lines(&state.products, &mut cart, &request.products, false)?;
        state.carts.push(cart.clone());
        Ok(cart)
    }

    async fn update_cart(
        &self,
        auth: Option<&AuthToken>,
        id: u64,
        request: &UpdateCartRequest,
    ) -> Result<Cart> {
        self.enter(
            ApiCall::UpdateCart {
                id,
                merge: request.is_merge(),
            },
            auth,
        )
        .await?;
        let mut guard = self.lock()?;
        let state = &mut *guard;
        let cart = state
            .carts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| cart_not_found(id))?;

        // Work on a copy so a bad product id leaves the cart untouched
        let mut updated = cart.clone();
        apply_lines(&state.products, &mut updated, &request.products, request.is_merge())?;
        *cart = updated.clone();
        Ok(updated)
    }

    async fn delete_cart(&self, auth: Option<&AuthToken>, id: u64) -> Result<DeleteResponse> {
        self.enter(ApiCall::DeleteCart(id), auth).await?;
        let mut state = self.lock()?;
        let index = state
            .carts
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| cart_not_found(id))?;
        state.carts.remove(index);
        Ok(DeleteResponse {
            id,
            is_deleted: true,
            deleted_on: None,
        })
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        self.enter(ApiCall::Login(credentials.username.clone()), None)
            .await?;
        let mut state = self.lock()?;
        let user = state
            .accounts
            .iter()
            .find(|(u, password)| u.username == credentials.username && *password == credentials.password)
            .map(|(u, _)| u.clone())
            .ok_or_else(|| Error::http(400, Some("Invalid credentials".to_string())))?;

        let token = Self::issue_token(&mut state, user.id);
        Ok(LoginResponse {
            token,
            refresh_token: Some(format!("demo-refresh-{}", user.id)),
            user,
        })
    }

    async fn current_user(&self, auth: Option<&AuthToken>) -> Result<User> {
        self.enter(ApiCall::CurrentUser, auth).await?;
        let state = self.lock()?;
        Self::authenticated_user(&state, auth)
    }

    async fn refresh_auth(&self, auth: Option<&AuthToken>) -> Result<TokenPair> {
        self.enter(ApiCall::RefreshAuth, auth).await?;
        let mut state = self.lock()?;
        let user = Self::authenticated_user(&state, auth)?;
        let token = Self::issue_token(&mut state, user.id);
        Ok(TokenPair {
            token,
            refresh_token: Some(format!("demo-refresh-{}", user.id)),
        })
    }
}

fn seed_product(
    id: u64,
    title: &str,
    category: &str,
    price: f64,
    discount: f64,
    stock: i64,
    brand: Option<&str>,
) -> Product {
    let mut product = Product::new(id, title);
    product.category = category.to_string();
    product.price = price;
    product.discount_percentage = discount;
    product.stock = stock;
    product.brand = brand.map(str::to_string);
    product.rating = 4.5;
    product.availability_status = Some(if stock < 10 { "Low Stock" } else { "In Stock" }.to_string());
    product
}

fn seed_products() -> Vec<Product> {
    let mut products = vec![
        seed_product(1, "Essence Mascara Lash Princess", "beauty", 9.99, 7.17, 5, Some("Essence")),
        seed_product(2, "Eyeshadow Palette with Mirror", "beauty", 19.99, 5.5, 44, Some("Glamour Beauty")),
        seed_product(6, "Calvin Klein CK One", "fragrances", 49.99, 0.32, 17, Some("Calvin Klein")),
        seed_product(7, "Chanel Coco Noir Eau De", "fragrances", 129.99, 18.64, 41, Some("Chanel")),
        seed_product(16, "Apple", "groceries", 1.99, 12.62, 7, None),
        seed_product(121, "iPhone 5s", "smartphones", 199.99, 12.91, 25, Some("Apple")),
        seed_product(122, "iPhone 6", "smartphones", 299.99, 9.69, 60, Some("Apple")),
        seed_product(144, "Cricket Helmet", "sports-accessories", 44.99, 11.47, 37, Some("Circket Pro")),
    ];
    products[0].description =
        "Popular mascara known for its volumizing and lengthening effects.".to_string();
    products[4].description = "Fresh and crisp apples, perfect for snacking.".to_string();
    products
}

fn seed_accounts() -> Vec<(User, String)> {
    let mut emily = User::new(1, "emilys");
    emily.first_name = Some("Emily".to_string());
    emily.last_name = Some("Johnson".to_string());
    emily.email = Some("emily.johnson@x.dummyjson.com".to_string());

    let mut michael = User::new(2, "michaelw");
    michael.first_name = Some("Michael".to_string());
    michael.last_name = Some("Williams".to_string());

    vec![
        (emily, "emilyspass".to_string()),
        (michael, "michaelwpass".to_string()),
    ]
}
