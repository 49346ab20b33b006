use crate::domain::{category_label, Product};
use crate::pages::{PageContext, PageStatus, PageView};
use crate::services::ProductQuery;

const PAGE: &str = "categories";

/// Category list; selecting one shows its products
pub struct CategoriesPage {
    ctx: PageContext,
    categories: Vec<String>,
    selected: Option<String>,
    products: Vec<Product>,
    status: PageStatus,
}

impl CategoriesPage {
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            categories: Vec::new(),
            selected: None,
            products: Vec::new(),
            status: PageStatus::loading(),
        }
    }

    pub async fn mount(&mut self) {
        self.status.begin();
        let token = self.ctx.token();
        match self.ctx.catalog.categories(token.as_ref()).await {
            Ok(categories) => self.categories = categories.to_vec(),
            Err(e) => {
                self.ctx.report(PAGE, "Failed to fetch categories", &e);
                self.status.fail("Failed to fetch categories");
            }
        }
        self.status.finish();
    }

    pub async fn select(&mut self, category: &str) {
        self.selected = Some(category.to_string());
        self.products.clear();
        self.status.begin();

        let token = self.ctx.token();
        let query = ProductQuery::Category(category.to_string());
        match self.ctx.catalog.products(token.as_ref(), &query).await {
            Ok(products) => self.products = products.to_vec(),
            Err(e) => {
                self.ctx
                    .report(PAGE, "Failed to fetch products for this category", &e);
                self.status.fail("Failed to fetch products for this category");
            }
        }
        self.status.finish();
    }

    /// Return to the category list
    pub fn back(&mut self) {
        self.selected = None;
        self.products.clear();
        self.status.clear_error();
    }

    pub fn title(&self) -> String {
        match &self.selected {
            Some(category) => format!("{} Products", category_label(category)),
            None => "Categories".to_string(),
        }
    }

    pub fn view(&self) -> PageView<'_, Self> {
        self.status.view(Some(self), "")
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }
}
