//! ShopDesk Core - client, session and page logic for a DummyJSON shop
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: Products, carts, users and the session token
//! - **ports**: Trait definitions for external dependencies (ShopApi, SessionStore, Prompt)
//! - **services**: Auth, catalog cache, product store, debounce, logging
//! - **adapters**: Concrete implementations (DummyJSON over reqwest, demo shop, session file)
//! - **pages**: Per-page controllers with loading, error and content state

pub mod adapters;
pub mod config;
pub mod domain;
mod log_migrations;
pub mod pages;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use adapters::{DummyJsonClient, FileSessionStore, InMemoryShop};
use config::Config;
use ports::{Prompt, ShopApi};
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::Error;
pub use domain::{Cart, Product, Session, User};
pub use pages::{PageContext, PageView, Route};

/// Main context for ShopDesk operations
///
/// Wires one API client, the persisted session and the shared caches
/// together. Pages get their collaborators through [`ShopContext::page_context`].
pub struct ShopContext {
    pub config: Config,
    pub api: Arc<dyn ShopApi>,
    pub auth: Arc<AuthService>,
    pub catalog: Arc<ProductCatalog>,
    pub product_store: Arc<ProductStore>,
    pub logger: Option<Arc<LoggingService>>,
}

impl ShopContext {
    /// Open the context stored in `app_dir`
    ///
    /// Demo mode uses the seeded in-process shop; otherwise requests go to
    /// the configured base URL. The event log is optional: if logs.duckdb
    /// cannot be opened the context still works without it.
    pub fn open(app_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        std::fs::create_dir_all(app_dir)?;
        let config = Config::load(app_dir)?;

        let logger = LoggingService::new(app_dir, entry_point, env!("CARGO_PKG_VERSION"))
            .ok()
            .map(Arc::new);

        let api: Arc<dyn ShopApi> = if config.demo_mode {
            Arc::new(InMemoryShop::seeded())
        } else {
            let client = DummyJsonClient::new_with_base_url(&config.base_url)?;
            match &logger {
                Some(logger) => Arc::new(client.with_logger(Arc::clone(logger))),
                None => Arc::new(client),
            }
        };

        let sessions = Arc::new(FileSessionStore::new(app_dir));
        let auth = Arc::new(AuthService::open(
            Arc::clone(&api),
            sessions,
            logger.clone(),
        )?);

        Ok(Self::from_parts(config, api, auth, logger))
    }

    /// Assemble a context from already-built parts
    pub fn from_parts(
        config: Config,
        api: Arc<dyn ShopApi>,
        auth: Arc<AuthService>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        let catalog = Arc::new(ProductCatalog::new(Arc::clone(&api)));
        Self {
            config,
            api,
            auth,
            catalog,
            product_store: Arc::new(ProductStore::new()),
            logger,
        }
    }

    /// Collaborators for a page controller
    pub fn page_context(&self, prompt: Arc<dyn Prompt>) -> PageContext {
        PageContext {
            api: Arc::clone(&self.api),
            catalog: Arc::clone(&self.catalog),
            auth: Arc::clone(&self.auth),
            prompt,
            logger: self.logger.clone(),
        }
    }

    /// Hook that fills the global product store on first use
    pub fn products_hook(&self) -> ProductsHook {
        ProductsHook::new(
            Arc::clone(&self.product_store),
            Arc::clone(&self.catalog),
            Arc::clone(&self.auth),
        )
    }
}
