//! Shop API port - remote catalogue, carts and auth

use async_trait::async_trait;

use crate::domain::result::Result;
use crate::domain::{
    AddCartRequest, AuthToken, Cart, CartsResponse, DeleteResponse, LoginRequest, LoginResponse,
    NewProduct, Product, ProductPatch, ProductsResponse, TokenPair, UpdateCartRequest, User,
};

/// Remote shop abstraction
///
/// One method per resource operation. Every call except `login` takes the
/// current credential explicitly; `None` sends the request unauthenticated.
/// Implementations never retry and never refresh credentials on their own.
#[async_trait]
pub trait ShopApi: Send + Sync {
    // === Products ===

    /// List all products, or search when `query` is non-empty
    async fn list_products(
        &self,
        auth: Option<&AuthToken>,
        query: Option<&str>,
    ) -> Result<ProductsResponse>;

    async fn get_product(&self, auth: Option<&AuthToken>, id: u64) -> Result<Product>;

    /// Create a product; the server answers with a synthetic id
    async fn create_product(&self, auth: Option<&AuthToken>, product: &NewProduct)
        -> Result<Product>;

    async fn update_product(
        &self,
        auth: Option<&AuthToken>,
        id: u64,
        patch: &ProductPatch,
    ) -> Result<Product>;

    async fn delete_product(&self, auth: Option<&AuthToken>, id: u64) -> Result<DeleteResponse>;

    // === Categories ===

    /// Category slugs in server order
    async fn list_categories(&self, auth: Option<&AuthToken>) -> Result<Vec<String>>;

    async fn products_by_category(
        &self,
        auth: Option<&AuthToken>,
        category: &str,
    ) -> Result<ProductsResponse>;

    // === Carts ===

    async fn list_carts(&self, auth: Option<&AuthToken>) -> Result<CartsResponse>;

    async fn get_cart(&self, auth: Option<&AuthToken>, id: u64) -> Result<Cart>;

    async fn add_cart(&self, auth: Option<&AuthToken>, request: &AddCartRequest) -> Result<Cart>;

    /// Update a cart's lines; the merge flag is passed through unverified
    async fn update_cart(
        &self,
        auth: Option<&AuthToken>,
        id: u64,
        request: &UpdateCartRequest,
    ) -> Result<Cart>;

    async fn delete_cart(&self, auth: Option<&AuthToken>, id: u64) -> Result<DeleteResponse>;

    // === Auth ===

    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse>;

    async fn current_user(&self, auth: Option<&AuthToken>) -> Result<User>;

    /// Exchange the current credential for a fresh one (manual only)
    async fn refresh_auth(&self, auth: Option<&AuthToken>) -> Result<TokenPair>;
}
