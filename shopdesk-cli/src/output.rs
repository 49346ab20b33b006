//! Output formatting utilities

use std::time::Duration;

use anyhow::{bail, Result};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use shopdesk_core::domain::category_label;
use shopdesk_core::{Cart, PageView, Product, User};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Loader shown while a page fetches; None when stdout is not a terminal
pub fn spinner(msg: &str) -> Option<ProgressBar> {
    if atty::isnt(atty::Stream::Stdout) {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(msg.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    Some(bar)
}

pub fn finish_spinner(bar: Option<ProgressBar>) {
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
}

/// Render a page view: content goes to `render`, an error fails the command
pub fn render<T: ?Sized>(view: PageView<'_, T>, render: impl FnOnce(&T)) -> Result<()> {
    match view {
        PageView::Loading => {
            info("Loading...");
            Ok(())
        }
        PageView::Error(message) => bail!("{}", message),
        PageView::Ready(content) => {
            render(content);
            Ok(())
        }
    }
}

/// Navigation links, with the user's name when logged in
pub fn navbar(user: Option<&User>) {
    let links = ["Home", "Products", "Categories", "Carts"].join(" | ");
    let account = match user {
        Some(user) => format!("{} (Logout)", user.display_name()),
        None => "Login".to_string(),
    };
    println!("{} | {}", links.bold(), account.dimmed());
    println!();
}

fn price(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn products_table(products: &[Product]) {
    if products.is_empty() {
        println!("{}", "No products found.".dimmed());
        return;
    }

    let mut table = create_table();
    table.set_header(vec!["ID", "Title", "Category", "Price", "Stock"]);
    for product in products {
        let stock = if product.in_stock() {
            Cell::new(product.stock)
        } else {
            Cell::new("out of stock")
        };
        table.add_row(vec![
            Cell::new(product.id),
            Cell::new(&product.title),
            Cell::new(category_label(&product.category)),
            Cell::new(price(product.price)),
            stock,
        ]);
    }
    println!("{}", table);
}

pub fn product_detail(product: &Product) {
    println!("{}", product.title.bold());
    if !product.description.is_empty() {
        println!("{}", product.description.dimmed());
    }
    println!();

    let mut table = create_table();
    table.add_row(vec!["ID".to_string(), product.id.to_string()]);
    table.add_row(vec!["Category".to_string(), category_label(&product.category)]);
    if let Some(brand) = &product.brand {
        table.add_row(vec!["Brand".to_string(), brand.clone()]);
    }
    table.add_row(vec!["Price".to_string(), price(product.price)]);
    if product.discount_percentage > 0.0 {
        table.add_row(vec![
            "Discounted".to_string(),
            format!(
                "{} (-{:.2}%)",
                price(product.discounted_price()),
                product.discount_percentage
            ),
        ]);
    }
    table.add_row(vec!["Stock".to_string(), product.stock.to_string()]);
    table.add_row(vec!["Rating".to_string(), format!("{:.2}", product.rating)]);
    println!("{}", table);
}

pub fn categories_list(categories: &[String]) {
    if categories.is_empty() {
        println!("{}", "No categories found.".dimmed());
        return;
    }
    for category in categories {
        println!("  • {} {}", category_label(category), format!("({})", category).dimmed());
    }
}

pub fn carts_table(carts: &[Cart]) {
    if carts.is_empty() {
        println!("{}", "No carts found.".dimmed());
        return;
    }

    let mut table = create_table();
    table.set_header(vec!["ID", "User", "Products", "Quantity", "Total", "Discounted"]);
    for cart in carts {
        table.add_row(vec![
            cart.id.to_string(),
            cart.user_id.to_string(),
            cart.total_products.to_string(),
            cart.total_quantity.to_string(),
            price(cart.total),
            price(cart.discounted_total),
        ]);
    }
    println!("{}", table);
}

pub fn cart_detail(cart: &Cart) {
    println!("{}", format!("Cart #{} (user {})", cart.id, cart.user_id).bold());
    println!();

    let mut table = create_table();
    table.set_header(vec!["ID", "Title", "Price", "Quantity", "Total"]);
    for line in &cart.products {
        table.add_row(vec![
            line.id.to_string(),
            line.title.clone(),
            price(line.price),
            line.quantity.to_string(),
            price(line.total),
        ]);
    }
    println!("{}", table);
    println!(
        "Total: {}  Discounted: {}",
        price(cart.total),
        price(cart.discounted_total).green()
    );
}
