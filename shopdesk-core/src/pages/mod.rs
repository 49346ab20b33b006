//! Page controllers
//!
//! Each page owns its local state (entity, loading flag, error string, form
//! fields), calls the API on mount or interaction and exposes exactly one of
//! loader, error or content through [`PageView`]. Failures never escape a
//! page: they become a user-facing string and a `page_error` log event.

use std::fmt;
use std::sync::Arc;

use crate::domain::result::Error;
use crate::domain::AuthToken;
use crate::ports::{Prompt, ShopApi};
use crate::services::{AuthService, LoggingService, ProductCatalog};

mod cart_details;
mod carts;
mod categories;
mod login;
mod product_details;
mod product_list;

pub use cart_details::{CartDetailsPage, CartItemForm};
pub use carts::{AddCartForm, CartsPage};
pub use categories::CategoriesPage;
pub use login::LoginPage;
pub use product_details::ProductDetailsPage;
pub use product_list::{ProductListPage, SearchTicks};

/// Everything a page needs from the outside world
#[derive(Clone)]
pub struct PageContext {
    pub api: Arc<dyn ShopApi>,
    pub catalog: Arc<ProductCatalog>,
    pub auth: Arc<AuthService>,
    pub prompt: Arc<dyn Prompt>,
    pub logger: Option<Arc<LoggingService>>,
}

impl PageContext {
    /// Credential for the next request
    pub fn token(&self) -> Option<AuthToken> {
        self.auth.token()
    }

    /// Record the error string a page is about to show
    pub(crate) fn report(&self, page: &str, message: &str, err: &Error) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_page_error(page, message, Some(&err.to_string()));
        }
    }
}

/// What a page renders, in priority order loading > error > content
#[derive(Debug, PartialEq)]
pub enum PageView<'a, T: ?Sized> {
    Loading,
    Error(&'a str),
    Ready(&'a T),
}

impl<T: ?Sized> Clone for PageView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for PageView<'_, T> {}

impl<'a, T: ?Sized> PageView<'a, T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&'a str> {
        match self {
            Self::Error(message) => Some(*message),
            _ => None,
        }
    }

    pub fn content(&self) -> Option<&'a T> {
        match self {
            Self::Ready(content) => Some(*content),
            _ => None,
        }
    }
}

/// Loading flag plus error string, shared by every page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageStatus {
    loading: bool,
    error: Option<String>,
}

impl PageStatus {
    /// Status of a page that starts out loading
    pub fn loading() -> Self {
        Self {
            loading: true,
            error: None,
        }
    }

    /// Start a load; a previous error is cleared so the user can retry
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn finish(&mut self) {
        self.loading = false;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Resolve the view; `missing` is shown when there is nothing to render
    pub fn view<'a, T: ?Sized>(&'a self, content: Option<&'a T>, missing: &'a str) -> PageView<'a, T> {
        if self.loading {
            PageView::Loading
        } else if let Some(error) = &self.error {
            PageView::Error(error)
        } else {
            match content {
                Some(content) => PageView::Ready(content),
                None => PageView::Error(missing),
            }
        }
    }
}

/// Navigation targets a page can request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Products,
    Product(u64),
    Categories,
    Carts,
    Cart(u64),
    Login,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/home".to_string(),
            Route::Products => "/products".to_string(),
            Route::Product(id) => format!("/products/{}", id),
            Route::Categories => "/categories".to_string(),
            Route::Carts => "/carts".to_string(),
            Route::Cart(id) => format!("/carts/{}", id),
            Route::Login => "/login".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
