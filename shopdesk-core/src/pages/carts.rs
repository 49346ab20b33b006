use crate::domain::{AddCartRequest, Cart, CartLine};
use crate::pages::{PageContext, PageStatus, PageView};

const PAGE: &str = "carts";

/// Fields of the add-cart form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddCartForm {
    pub user_id: u64,
    pub product_id: u64,
    pub quantity: u64,
}

impl AddCartForm {
    /// Defaults: the logged-in user (or user 1), product 144, quantity 1
    pub fn for_user(user_id: Option<u64>) -> Self {
        Self {
            user_id: user_id.unwrap_or(1),
            product_id: 144,
            quantity: 1,
        }
    }

    fn request(&self) -> AddCartRequest {
        AddCartRequest {
            user_id: self.user_id,
            products: vec![CartLine::new(self.product_id, self.quantity)],
        }
    }
}

/// All carts plus a quick add form
pub struct CartsPage {
    ctx: PageContext,
    carts: Vec<Cart>,
    status: PageStatus,
    pub form: AddCartForm,
}

impl CartsPage {
    pub fn new(ctx: PageContext) -> Self {
        let user_id = ctx.auth.logged_in_user().map(|u| u.id);
        Self {
            ctx,
            carts: Vec::new(),
            status: PageStatus::loading(),
            form: AddCartForm::for_user(user_id),
        }
    }

    pub async fn load(&mut self) {
        self.status.begin();
        let token = self.ctx.token();
        match self.ctx.api.list_carts(token.as_ref()).await {
            Ok(response) => self.carts = response.carts,
            Err(e) => {
                let message = e.user_message("Failed to load carts");
                self.ctx.report(PAGE, &message, &e);
                self.status.fail(message);
            }
        }
        self.status.finish();
    }

    /// Create a cart from the form, then reload the list
    ///
    /// The new cart stays visible even when the reload does not include it.
    pub async fn submit_add_cart(&mut self) -> Option<Cart> {
        self.status.begin();
        let token = self.ctx.token();

        let created = match self.ctx.api.add_cart(token.as_ref(), &self.form.request()).await {
            Ok(cart) => cart,
            Err(e) => {
                let message = e.user_message("Failed to add cart");
                self.ctx.report(PAGE, &message, &e);
                self.status.fail(message);
                self.status.finish();
                return None;
            }
        };

        match self.ctx.api.list_carts(token.as_ref()).await {
            Ok(response) => self.carts = response.carts,
            Err(e) => {
                let message = e.user_message("Failed to load carts");
                self.ctx.report(PAGE, &message, &e);
                self.status.fail(message);
            }
        }
        if !self.carts.iter().any(|c| c.id == created.id) {
            self.carts.insert(0, created.clone());
        }

        self.ctx.prompt.notify("Cart added.");
        self.status.finish();
        Some(created)
    }

    /// The error replaces the list only while there is nothing to show
    pub fn view(&self) -> PageView<'_, [Cart]> {
        if self.carts.is_empty() {
            self.status.view(Some(self.carts.as_slice()), "")
        } else {
            PageView::Ready(self.carts.as_slice())
        }
    }

    /// Inline error, shown above a non-empty list
    pub fn error(&self) -> Option<&str> {
        self.status.error()
    }

    pub fn is_loading(&self) -> bool {
        self.status.is_loading()
    }

    pub fn carts(&self) -> &[Cart] {
        &self.carts
    }
}
