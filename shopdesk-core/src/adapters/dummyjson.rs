//! DummyJSON API client
//!
//! Async HTTP client for the DummyJSON e-commerce demo API: products,
//! categories, carts and auth. Every request gets a fixed 10 second timeout
//! and a JSON content type. Mutations are accepted by the server but never
//! persisted.
//!
//! API Documentation: https://dummyjson.com/docs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use url::Url;

use crate::domain::result::{Error, Result};
use crate::domain::{
    AddCartRequest, AuthToken, Cart, CartsResponse, DeleteResponse, LoginRequest, LoginResponse,
    NewProduct, Product, ProductPatch, ProductsResponse, TokenPair, UpdateCartRequest, User,
};
use crate::ports::ShopApi;
use crate::services::LoggingService;

/// Default production API URL
pub const DUMMYJSON_BASE_URL: &str = "https://dummyjson.com";

/// Fixed per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// DummyJSON API client
pub struct DummyJsonClient {
    client: Client,
    base_url: Url,
    logger: Option<Arc<LoggingService>>,
}

impl DummyJsonClient {
    /// Create a client for the public DummyJSON host
    pub fn new() -> Result<Self> {
        Self::new_with_base_url(DUMMYJSON_BASE_URL)
    }

    /// Create a client for a custom host (mock servers, mirrors)
    pub fn new_with_base_url(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!("Invalid base URL '{}'", base_url)));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            logger: None,
        })
    }

    /// Record 401 answers as `request_unauthorized` events
    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("Invalid base URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        auth: Option<&AuthToken>,
    ) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        let builder = self.client.request(method, url);
        Ok(match auth {
            Some(token) => builder.bearer_auth(token.as_str()),
            None => builder,
        })
    }

    /// Execute a request and decode a JSON body
    ///
    /// Non-2xx answers become `Error::Http` (or `Error::Unauthorized` for
    /// 401) carrying the body's `message` field when there is one.
    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let request = builder.build().map_err(|e| self.map_request_error(e))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if status.is_success() {
            return serde_json::from_slice(&body)
                .map_err(|e| Error::Decode(format!("{} {}: {}", method, path, e)));
        }

        let message = error_message(&body);
        if status.as_u16() == 401 {
            self.report_unauthorized(method.as_str(), &path, message.as_deref());
        }
        Err(Error::http(status.as_u16(), message))
    }

    /// 401 diagnostic; the failure itself is propagated unchanged
    fn report_unauthorized(&self, method: &str, path: &str, message: Option<&str>) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_unauthorized(method, path, message);
        }
    }

    /// Map request errors to user-friendly messages
    fn map_request_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::transport(format!(
                "Connection timed out after {} seconds",
                REQUEST_TIMEOUT.as_secs()
            ))
        } else if error.is_connect() {
            Error::transport(format!(
                "Unable to connect to {}",
                self.base_url.host_str().unwrap_or("the shop API")
            ))
        } else {
            Error::transport(format!("Shop API request failed: {}", error))
        }
    }
}

/// `message` field of an error body, if the body is JSON and has one
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<JsonValue>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

#[async_trait]
impl ShopApi for DummyJsonClient {
    async fn list_products(
        &self,
        auth: Option<&AuthToken>,
        query: Option<&str>,
    ) -> Result<ProductsResponse> {
        let builder = match query.filter(|q| !q.is_empty()) {
            Some(q) => self
                .request(Method::GET, &["products", "search"], auth)?
                .query(&[("q", q)]),
            None => self.request(Method::GET, &["products"], auth)?,
        };
        self.send(builder).await
    }

    async fn get_product(&self, auth: Option<&AuthToken>, id: u64) -> Result<Product> {
        let id = id.to_string();
        self.send(self.request(Method::GET, &["products", &id], auth)?)
            .await
    }

    async fn create_product(
        &self,
        auth: Option<&AuthToken>,
        product: &NewProduct,
    ) -> Result<Product> {
        let builder = self
            .request(Method::POST, &["products", "add"], auth)?
            .json(product);
        self.send(builder).await
    }

    async fn update_product(
        &self,
        auth: Option<&AuthToken>,
        id: u64,
        patch: &ProductPatch,
    ) -> Result<Product> {
        let id = id.to_string();
        let builder = self
            .request(Method::PUT, &["products", &id], auth)?
            .json(patch);
        self.send(builder).await
    }

    async fn delete_product(&self, auth: Option<&AuthToken>, id: u64) -> Result<DeleteResponse> {
        let id = id.to_string();
        self.send(self.request(Method::DELETE, &["products", &id], auth)?)
            .await
    }

    async fn list_categories(&self, auth: Option<&AuthToken>) -> Result<Vec<String>> {
        self.send(self.request(Method::GET, &["products", "category-list"], auth)?)
            .await
    }

    async fn products_by_category(
        &self,
        auth: Option<&AuthToken>,
        category: &str,
    ) -> Result<ProductsResponse> {
        self.send(self.request(Method::GET, &["products", "category", category], auth)?)
            .await
    }

    async fn list_carts(&self, auth: Option<&AuthToken>) -> Result<CartsResponse> {
        self.send(self.request(Method::GET, &["carts"], auth)?).await
    }

    async fn get_cart(&self, auth: Option<&AuthToken>, id: u64) -> Result<Cart> {
        let id = id.to_string();
        self.send(self.request(Method::GET, &["carts", &id], auth)?)
            .await
    }

    async fn add_cart(&self, auth: Option<&AuthToken>, request: &AddCartRequest) -> Result<Cart> {
        let builder = self
            .request(Method::POST, &["carts", "add"], auth)?
            .json(request);
        self.send(builder).await
    }

    async fn update_cart(
        &self,
        auth: Option<&AuthToken>,
        id: u64,
        request: &UpdateCartRequest,
    ) -> Result<Cart> {
        let id = id.to_string();
        let builder = self
            .request(Method::PUT, &["carts", &id], auth)?
            .json(request);
        self.send(builder).await
    }

    async fn delete_cart(&self, auth: Option<&AuthToken>, id: u64) -> Result<DeleteResponse> {
        let id = id.to_string();
        self.send(self.request(Method::DELETE, &["carts", &id], auth)?)
            .await
    }

    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let builder = self
            .request(Method::POST, &["auth", "login"], None)?
            .json(credentials);
        self.send(builder).await
    }

    async fn current_user(&self, auth: Option<&AuthToken>) -> Result<User> {
        self.send(self.request(Method::GET, &["auth", "me"], auth)?)
            .await
    }

    async fn refresh_auth(&self, auth: Option<&AuthToken>) -> Result<TokenPair> {
        self.send(self.request(Method::GET, &["auth", "refresh"], auth)?)
            .await
    }
}
