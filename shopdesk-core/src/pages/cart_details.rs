use crate::domain::{Cart, CartLine, UpdateCartRequest};
use crate::pages::{PageContext, PageStatus, PageView, Route};

const PAGE: &str = "cart_details";

/// Fields of the add-item form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemForm {
    pub product_id: u64,
    pub quantity: u64,
}

impl Default for CartItemForm {
    fn default() -> Self {
        Self {
            product_id: 1,
            quantity: 1,
        }
    }
}

/// One cart: its lines, an add-item form and delete
pub struct CartDetailsPage {
    ctx: PageContext,
    cart_id: Option<u64>,
    cart: Option<Cart>,
    status: PageStatus,
    saving: bool,
    pub form: CartItemForm,
}

impl CartDetailsPage {
    pub fn new(ctx: PageContext, cart_id: Option<u64>) -> Self {
        Self {
            ctx,
            cart_id,
            cart: None,
            status: PageStatus::loading(),
            saving: false,
            form: CartItemForm::default(),
        }
    }

    pub async fn mount(&mut self) {
        let Some(id) = self.cart_id else {
            self.status.fail("No cart id");
            self.status.finish();
            return;
        };

        self.status.begin();
        self.load(id).await;
        self.status.finish();
    }

    /// Fetch the cart; false when the page is left showing an error
    async fn load(&mut self, id: u64) -> bool {
        let token = self.ctx.token();
        match self.ctx.api.get_cart(token.as_ref(), id).await {
            Ok(cart) => {
                self.cart = Some(cart);
                true
            }
            Err(e) => {
                let message = e.user_message("Failed to load cart");
                self.ctx.report(PAGE, &message, &e);
                self.status.fail(message);
                false
            }
        }
    }

    /// Merge the form's line into the cart, then reload it
    pub async fn add_item(&mut self) -> bool {
        let Some(id) = self.cart_id else {
            return false;
        };

        self.saving = true;
        self.status.clear_error();
        let token = self.ctx.token();
        let request = UpdateCartRequest::merge(vec![CartLine::new(
            self.form.product_id,
            self.form.quantity,
        )]);

        let saved = match self.ctx.api.update_cart(token.as_ref(), id, &request).await {
            Ok(_) => {
                let reloaded = self.load(id).await;
                if reloaded {
                    self.ctx.prompt.notify("Cart updated (mock API).");
                }
                reloaded
            }
            Err(e) => {
                let message = e.user_message("Failed to update cart");
                self.ctx.report(PAGE, &message, &e);
                self.status.fail(message);
                false
            }
        };
        self.saving = false;
        saved
    }

    /// Confirm, delete, and navigate back to the cart list
    pub async fn delete(&mut self) -> Option<Route> {
        let id = self.cart_id?;
        if !self.ctx.prompt.confirm("Delete this cart?") {
            return None;
        }

        self.saving = true;
        let token = self.ctx.token();
        let route = match self.ctx.api.delete_cart(token.as_ref(), id).await {
            Ok(_) => Some(Route::Carts),
            Err(e) => {
                let message = e.user_message("Failed to delete cart");
                self.ctx.report(PAGE, &message, &e);
                self.status.fail(message);
                None
            }
        };
        self.saving = false;
        route
    }

    pub fn view(&self) -> PageView<'_, Cart> {
        self.status.view(self.cart.as_ref(), "Cart not found")
    }

    pub fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&str> {
        self.status.error()
    }
}
