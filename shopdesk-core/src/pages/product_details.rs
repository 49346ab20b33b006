use crate::domain::{Product, ProductPatch};
use crate::pages::{PageContext, PageStatus, PageView, Route};

const PAGE: &str = "product_details";

const DELETE_CONFIRMATION: &str =
    "Are you sure you want to delete this product? This action cannot be undone.";

/// One product with inline edit and delete
pub struct ProductDetailsPage {
    ctx: PageContext,
    product_id: Option<u64>,
    product: Option<Product>,
    status: PageStatus,
    editing: bool,
    form: ProductPatch,
}

impl ProductDetailsPage {
    pub fn new(ctx: PageContext, product_id: Option<u64>) -> Self {
        Self {
            ctx,
            product_id,
            product: None,
            status: PageStatus::loading(),
            editing: false,
            form: ProductPatch::default(),
        }
    }

    pub async fn mount(&mut self) {
        let Some(id) = self.product_id else {
            self.status.fail("No product ID provided");
            self.status.finish();
            return;
        };

        self.status.begin();
        let token = self.ctx.token();
        match self.ctx.api.get_product(token.as_ref(), id).await {
            Ok(product) => {
                self.form = ProductPatch::from(&product);
                self.product = Some(product);
            }
            Err(e) => {
                self.ctx.report(PAGE, "Failed to fetch product details", &e);
                self.status.fail("Failed to fetch product details");
            }
        }
        self.status.finish();
    }

    // === Editing ===

    pub fn start_edit(&mut self) {
        if self.product.is_some() {
            self.editing = true;
        }
    }

    /// Leave edit mode and restore the form from the loaded product
    pub fn cancel_edit(&mut self) {
        self.editing = false;
        if let Some(product) = &self.product {
            self.form = ProductPatch::from(product);
        }
    }

    pub fn form_mut(&mut self) -> &mut ProductPatch {
        &mut self.form
    }

    /// Send the edit form and merge it into the displayed product
    ///
    /// Returns false when nothing was saved.
    pub async fn save(&mut self) -> bool {
        let (Some(id), Some(_)) = (self.product_id, &self.product) else {
            return false;
        };

        self.status.begin();
        let token = self.ctx.token();
        let saved = match self.ctx.api.update_product(token.as_ref(), id, &self.form).await {
            Ok(_) => {
                if let Some(product) = self.product.as_mut() {
                    product.apply(&self.form);
                    self.ctx.prompt.notify(&format!(
                        "Product \"{}\" updated successfully! (Note: This is a mock API - changes won't persist on the server)",
                        product.title
                    ));
                }
                self.editing = false;
                self.ctx.catalog.invalidate();
                true
            }
            Err(e) => {
                self.ctx.report(PAGE, "Failed to update product", &e);
                self.status.fail("Failed to update product");
                false
            }
        };
        self.status.finish();
        saved
    }

    /// Ask for confirmation, then delete
    ///
    /// Returns the route to navigate to on success. Declining sends nothing.
    pub async fn delete(&mut self) -> Option<Route> {
        let id = self.product_id?;
        if !self.ctx.prompt.confirm(DELETE_CONFIRMATION) {
            return None;
        }

        self.status.begin();
        let token = self.ctx.token();
        let route = match self.ctx.api.delete_product(token.as_ref(), id).await {
            Ok(deleted) => {
                let title = self
                    .product
                    .as_ref()
                    .map(|p| p.title.as_str())
                    .unwrap_or("");
                let notice = if deleted.is_deleted {
                    format!(
                        "Product \"{}\" has been deleted successfully! (Note: This is a mock API - the product still exists on the server)",
                        title
                    )
                } else {
                    "Delete operation completed, but the product may still appear in the list (mock API behavior)".to_string()
                };
                self.ctx.prompt.notify(&notice);
                self.ctx.catalog.invalidate();
                Some(Route::Products)
            }
            Err(e) => {
                self.ctx
                    .report(PAGE, "Failed to delete product. Please try again.", &e);
                self.status.fail("Failed to delete product. Please try again.");
                None
            }
        };
        self.status.finish();
        route
    }

    // === View ===

    pub fn view(&self) -> PageView<'_, Product> {
        self.status.view(self.product.as_ref(), "Product not found")
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn form(&self) -> &ProductPatch {
        &self.form
    }
}
