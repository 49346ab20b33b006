//! Cart command - inspect, extend or delete one cart

use anyhow::{bail, Result};
use clap::Subcommand;
use shopdesk_core::pages::CartDetailsPage;

use super::{get_context, page_context};
use crate::output;

#[derive(Subcommand)]
pub enum CartCommands {
    /// Show a cart's lines and totals
    Show {
        id: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Merge a product into the cart
    AddItem {
        id: u64,
        #[arg(long, default_value = "1")]
        product_id: u64,
        #[arg(long, default_value = "1")]
        quantity: u64,
    },
    /// Delete the cart
    Delete {
        id: u64,
    },
}

fn cart_id(command: &CartCommands) -> u64 {
    match command {
        CartCommands::Show { id, .. } | CartCommands::AddItem { id, .. } | CartCommands::Delete { id } => *id,
    }
}

pub async fn run(command: CartCommands, yes: bool) -> Result<()> {
    let ctx = get_context()?;
    let mut page = CartDetailsPage::new(page_context(&ctx, yes), Some(cart_id(&command)));

    let spinner = output::spinner("Loading cart...");
    page.mount().await;
    output::finish_spinner(spinner);
    output::render(page.view(), |_| {})?;

    match command {
        CartCommands::Show { json, .. } => {
            if json {
                return output::render(page.view(), |cart| {
                    if let Ok(text) = serde_json::to_string_pretty(cart) {
                        println!("{}", text);
                    }
                });
            }
            output::render(page.view(), output::cart_detail)
        }
        CartCommands::AddItem {
            product_id,
            quantity,
            ..
        } => {
            page.form.product_id = product_id;
            page.form.quantity = quantity;
            if !page.add_item().await {
                bail!("{}", page.error().unwrap_or("Failed to update cart"));
            }
            output::render(page.view(), output::cart_detail)
        }
        CartCommands::Delete { .. } => match page.delete().await {
            Some(route) => {
                output::success(&format!("Cart deleted. Back to {}", route));
                Ok(())
            }
            None => match page.error() {
                Some(message) => bail!("{}", message),
                None => {
                    output::warning("Cancelled");
                    Ok(())
                }
            },
        },
    }
}
