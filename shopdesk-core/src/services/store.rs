//! Global product store and the hook that fills it
//!
//! A single reducer-driven container for the last fetched product list.
//! Subscribers observe changes through a `tokio::sync::watch` channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::{watch, OnceCell};

use crate::domain::Product;
use crate::services::auth::AuthService;
use crate::services::catalog::{ProductCatalog, ProductQuery};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductState {
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    SetProducts(Vec<Product>),
}

fn reduce(state: &mut ProductState, action: StoreAction) {
    match action {
        StoreAction::SetProducts(products) => state.products = products,
    }
}

pub struct ProductStore {
    state: watch::Sender<ProductState>,
}

impl ProductStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ProductState::default());
        Self { state }
    }

    pub fn dispatch(&self, action: StoreAction) {
        self.state.send_modify(|state| reduce(state, action));
    }

    pub fn state(&self) -> ProductState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ProductState> {
        self.state.subscribe()
    }
}

impl Default for ProductStore {
    fn default() -> Self {
        Self::new()
    }
}

/// What a consumer of the hook renders
#[derive(Debug, Clone, PartialEq)]
pub struct ProductsView {
    pub products: Vec<Product>,
    pub loading: bool,
    pub error: Option<String>,
}

/// Loads the full product list into the store on first use
///
/// Every later call returns the store's current list without fetching.
pub struct ProductsHook {
    store: Arc<ProductStore>,
    catalog: Arc<ProductCatalog>,
    auth: Arc<AuthService>,
    loaded: OnceCell<()>,
    loading: AtomicBool,
    error: Mutex<Option<String>>,
}

impl ProductsHook {
    pub fn new(
        store: Arc<ProductStore>,
        catalog: Arc<ProductCatalog>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            store,
            catalog,
            auth,
            loaded: OnceCell::new(),
            loading: AtomicBool::new(false),
            error: Mutex::new(None),
        }
    }

    pub async fn use_products(&self) -> ProductsView {
        self.loaded.get_or_init(|| self.load()).await;
        self.view()
    }

    /// Current state without triggering a fetch
    pub fn view(&self) -> ProductsView {
        ProductsView {
            products: self.store.state().products,
            loading: self.loading.load(Ordering::SeqCst),
            error: self.error.lock().ok().and_then(|e| e.clone()),
        }
    }

    async fn load(&self) {
        self.loading.store(true, Ordering::SeqCst);
        self.set_error(None);

        let token = self.auth.token();
        match self.catalog.products(token.as_ref(), &ProductQuery::All).await {
            Ok(products) => self
                .store
                .dispatch(StoreAction::SetProducts(products.as_ref().clone())),
            Err(e) => self.set_error(Some(e.to_string())),
        }

        self.loading.store(false, Ordering::SeqCst);
    }

    fn set_error(&self, error: Option<String>) {
        if let Ok(mut current) = self.error.lock() {
            *current = error;
        }
    }
}
