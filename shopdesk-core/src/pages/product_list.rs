use tokio::sync::mpsc;

use crate::domain::{Product, ProductField, ProductForm, REQUIRED_FIELDS_MESSAGE};
use crate::pages::{PageContext, PageStatus, PageView};
use crate::services::{Debouncer, ProductQuery, ALL_CATEGORIES, SEARCH_DEBOUNCE};

const PAGE: &str = "product_list";

/// Debounced search values; feed each into
/// [`ProductListPage::apply_debounced_search`]
pub type SearchTicks = mpsc::UnboundedReceiver<String>;

/// Product grid with category filter, debounced search and an add form
pub struct ProductListPage {
    ctx: PageContext,
    products: Vec<Product>,
    categories: Vec<String>,
    selected_category: String,
    search_input: String,
    debounced_search: String,
    status: PageStatus,
    form: Option<ProductForm>,
    form_error: Option<String>,
    debouncer: Debouncer<String>,
}

impl ProductListPage {
    pub fn new(ctx: PageContext) -> (Self, SearchTicks) {
        let (debouncer, ticks) = Debouncer::new(SEARCH_DEBOUNCE);
        let page = Self {
            ctx,
            products: Vec::new(),
            categories: Vec::new(),
            selected_category: ALL_CATEGORIES.to_string(),
            search_input: String::new(),
            debounced_search: String::new(),
            status: PageStatus::loading(),
            form: None,
            form_error: None,
            debouncer,
        };
        (page, ticks)
    }

    /// Fetch the unfiltered list and the categories together
    pub async fn mount(&mut self) {
        self.status.begin();
        let token = self.ctx.token();
        let (products, categories) = tokio::join!(
            self.ctx.catalog.products(token.as_ref(), &ProductQuery::All),
            self.ctx.catalog.categories(token.as_ref()),
        );
        match (products, categories) {
            (Ok(products), Ok(categories)) => {
                self.products = products.to_vec();
                self.categories = categories.to_vec();
            }
            (Err(e), _) | (_, Err(e)) => {
                self.ctx.report(PAGE, "Failed to fetch data", &e);
                self.status.fail("Failed to fetch data");
            }
        }
        self.status.finish();
    }

    /// The query the current filters resolve to
    pub fn current_query(&self) -> ProductQuery {
        ProductQuery::from_filters(&self.selected_category, &self.debounced_search)
    }

    /// Reload the list for the current filters
    pub async fn refresh(&mut self) {
        let query = self.current_query();
        self.status.begin();
        let token = self.ctx.token();
        match self.ctx.catalog.products(token.as_ref(), &query).await {
            Ok(products) => self.products = products.to_vec(),
            Err(e) => {
                let message = query.failure_message();
                self.ctx.report(PAGE, message, &e);
                self.status.fail(message);
            }
        }
        self.status.finish();
    }

    pub async fn select_category(&mut self, category: &str) {
        if self.selected_category == category {
            return;
        }
        self.selected_category = category.to_string();
        self.refresh().await;
    }

    /// Record a keystroke; the search runs once input has been quiet for
    /// the debounce period
    pub fn type_search(&mut self, input: &str) {
        self.search_input = input.to_string();
        self.debouncer.push(self.search_input.clone());
    }

    /// Apply a value delivered on [`SearchTicks`]
    pub async fn apply_debounced_search(&mut self, value: String) {
        if self.debounced_search == value {
            return;
        }
        self.debounced_search = value;
        self.refresh().await;
    }

    /// Search immediately, skipping the debounce
    pub async fn search_now(&mut self, query: &str) {
        self.debouncer.cancel();
        self.search_input = query.to_string();
        self.apply_debounced_search(query.to_string()).await;
    }

    pub fn is_search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Apply the newest search not yet applied, whether it is still waiting
    /// out the delay or already sits unread in `ticks`
    ///
    /// Returns false when there was nothing left to apply.
    pub async fn finish_search(&mut self, ticks: &mut SearchTicks) -> bool {
        let mut latest = None;
        while let Ok(value) = ticks.try_recv() {
            latest = Some(value);
        }
        if self.is_search_pending() {
            if let Some(value) = ticks.recv().await {
                latest = Some(value);
            }
        }

        match latest {
            Some(value) => {
                self.apply_debounced_search(value).await;
                true
            }
            None => false,
        }
    }

    // === Add product form ===

    pub fn open_add_form(&mut self) {
        if self.form.is_none() {
            self.form = Some(ProductForm::default());
        }
    }

    /// Close the form and reset its fields
    pub fn cancel_add_form(&mut self) {
        self.form = None;
        self.form_error = None;
    }

    pub fn set_field(&mut self, field: ProductField, value: impl Into<String>) {
        self.form.get_or_insert_with(ProductForm::default).set(field, value);
    }

    /// Validate and create the product, then refetch the list
    ///
    /// Validation failures set the form error and send nothing. The
    /// created product is shown even though the server does not keep it.
    pub async fn submit_new_product(&mut self) -> Option<Product> {
        let form = self.form.clone().unwrap_or_default();
        let new_product = match form.validate() {
            Ok(product) => product,
            Err(e) => {
                self.form_error = Some(e.user_message(REQUIRED_FIELDS_MESSAGE));
                return None;
            }
        };

        self.status.begin();
        self.form_error = None;
        let token = self.ctx.token();

        let created = match self.ctx.api.create_product(token.as_ref(), &new_product).await {
            Ok(created) => created,
            Err(e) => {
                self.ctx.report(PAGE, "Failed to create product", &e);
                self.status.fail("Failed to create product");
                self.status.finish();
                return None;
            }
        };

        self.ctx.prompt.notify(&format!(
            "Product \"{}\" created successfully with ID: {}! (Note: This is a mock API - the product won't persist on the server)",
            new_product.title, created.id
        ));
        self.cancel_add_form();
        self.ctx.catalog.invalidate();

        let query = self.current_query();
        match self.ctx.catalog.products(token.as_ref(), &query).await {
            Ok(products) => {
                self.products = products.to_vec();
                if !self.products.iter().any(|p| p.id == created.id) {
                    self.products.push(created.clone());
                }
            }
            Err(e) => {
                self.ctx.report(PAGE, "Failed to create product", &e);
                self.status.fail("Failed to create product");
            }
        }
        self.status.finish();
        Some(created)
    }

    // === View ===

    pub fn view(&self) -> PageView<'_, [Product]> {
        self.status.view(Some(self.products.as_slice()), "")
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn selected_category(&self) -> &str {
        &self.selected_category
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    pub fn form(&self) -> Option<&ProductForm> {
        self.form.as_ref()
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }
}
