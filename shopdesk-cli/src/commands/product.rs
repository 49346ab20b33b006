//! Product command - show, create, update and delete one product

use anyhow::{bail, Result};
use clap::Subcommand;
use dialoguer::Input;
use shopdesk_core::domain::ProductField;
use shopdesk_core::pages::{ProductDetailsPage, ProductListPage};

use super::{get_context, page_context};
use crate::output;

#[derive(Subcommand)]
pub enum ProductCommands {
    /// Show one product
    Show {
        id: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product (title, price and category are required)
    Create {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        stock: Option<String>,
    },
    /// Edit a product; only the given fields change
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        stock: Option<i64>,
    },
    /// Delete a product
    Delete {
        id: u64,
    },
}

pub async fn run(command: ProductCommands, yes: bool) -> Result<()> {
    let ctx = get_context()?;

    match command {
        ProductCommands::Show { id, json } => {
            let mut page = ProductDetailsPage::new(page_context(&ctx, yes), Some(id));
            let spinner = output::spinner("Loading product...");
            page.mount().await;
            output::finish_spinner(spinner);

            if json {
                return output::render(page.view(), |product| {
                    if let Ok(text) = serde_json::to_string_pretty(product) {
                        println!("{}", text);
                    }
                });
            }
            output::render(page.view(), output::product_detail)
        }
        ProductCommands::Create {
            title,
            price,
            category,
            description,
            brand,
            stock,
        } => {
            let interactive = atty::is(atty::Stream::Stdin);
            let (mut page, _ticks) = ProductListPage::new(page_context(&ctx, yes));
            page.open_add_form();

            let required = [
                (ProductField::Title, "Title", title),
                (ProductField::Price, "Price", price),
                (ProductField::Category, "Category", category),
            ];
            for (field, label, value) in required {
                let value = match value {
                    Some(value) => value,
                    None if interactive => Input::new()
                        .with_prompt(label)
                        .allow_empty(true)
                        .interact_text()?,
                    None => String::new(),
                };
                page.set_field(field, value);
            }
            let optional = [
                (ProductField::Description, description),
                (ProductField::Brand, brand),
                (ProductField::Stock, stock),
            ];
            for (field, value) in optional {
                if let Some(value) = value {
                    page.set_field(field, value);
                }
            }

            if page.submit_new_product().await.is_some() {
                return Ok(());
            }
            if let Some(message) = page.form_error() {
                bail!("{}", message);
            }
            output::render(page.view(), |_| {})
        }
        ProductCommands::Update {
            id,
            title,
            price,
            category,
            description,
            brand,
            stock,
        } => {
            let mut page = ProductDetailsPage::new(page_context(&ctx, yes), Some(id));
            page.mount().await;
            output::render(page.view(), |_| {})?;

            page.start_edit();
            let form = page.form_mut();
            if title.is_some() {
                form.title = title;
            }
            if price.is_some() {
                form.price = price;
            }
            if category.is_some() {
                form.category = category;
            }
            if description.is_some() {
                form.description = description;
            }
            if brand.is_some() {
                form.brand = brand;
            }
            if stock.is_some() {
                form.stock = stock;
            }

            if !page.save().await {
                return output::render(page.view(), |_| {});
            }
            output::render(page.view(), output::product_detail)
        }
        ProductCommands::Delete { id } => {
            let mut page = ProductDetailsPage::new(page_context(&ctx, yes), Some(id));
            page.mount().await;
            output::render(page.view(), |_| {})?;

            match page.delete().await {
                Some(route) => {
                    output::success(&format!("Back to {}", route));
                    Ok(())
                }
                None => match page.view().error() {
                    Some(message) => bail!("{}", message),
                    None => {
                        output::warning("Cancelled");
                        Ok(())
                    }
                },
            }
        }
    }
}
