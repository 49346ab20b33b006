//! Carts command - list carts and add a new one

use anyhow::{bail, Result};
use clap::Subcommand;
use shopdesk_core::pages::CartsPage;

use super::{get_context, page_context};
use crate::output;

#[derive(Subcommand)]
pub enum CartsCommands {
    /// Create a cart holding one product
    Add {
        /// Owner (defaults to the logged-in user, else 1)
        #[arg(long)]
        user_id: Option<u64>,
        #[arg(long)]
        product_id: Option<u64>,
        #[arg(long)]
        quantity: Option<u64>,
    },
}

pub async fn run(command: Option<CartsCommands>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let mut page = CartsPage::new(page_context(&ctx, false));

    let spinner = output::spinner("Loading carts...");
    page.load().await;
    output::finish_spinner(spinner);

    if let Some(CartsCommands::Add {
        user_id,
        product_id,
        quantity,
    }) = command
    {
        if let Some(user_id) = user_id {
            page.form.user_id = user_id;
        }
        if let Some(product_id) = product_id {
            page.form.product_id = product_id;
        }
        if let Some(quantity) = quantity {
            page.form.quantity = quantity;
        }

        match page.submit_add_cart().await {
            Some(cart) => output::cart_detail(&cart),
            None => bail!("{}", page.error().unwrap_or("Failed to add cart")),
        }
        return Ok(());
    }

    if json {
        return output::render(page.view(), |carts| {
            if let Ok(text) = serde_json::to_string_pretty(carts) {
                println!("{}", text);
            }
        });
    }

    output::navbar(ctx.auth.logged_in_user().as_ref());
    if let Some(message) = page.error() {
        output::error(message);
    }
    output::render(page.view(), output::carts_table)
}
