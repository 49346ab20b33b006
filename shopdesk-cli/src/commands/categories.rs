//! Categories command - list categories or one category's products

use anyhow::Result;
use colored::Colorize;
use shopdesk_core::pages::CategoriesPage;

use super::{get_context, page_context};
use crate::output;

pub async fn run(name: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let mut page = CategoriesPage::new(page_context(&ctx, false));

    let spinner = output::spinner("Loading categories...");
    page.mount().await;
    if let Some(name) = &name {
        page.select(name).await;
    }
    output::finish_spinner(spinner);

    if json {
        return output::render(page.view(), |page| {
            let text = match page.selected() {
                Some(_) => serde_json::to_string_pretty(page.products()),
                None => serde_json::to_string_pretty(page.categories()),
            };
            if let Ok(text) = text {
                println!("{}", text);
            }
        });
    }

    output::navbar(ctx.auth.logged_in_user().as_ref());
    output::render(page.view(), |page| {
        println!("{}", page.title().bold());
        match page.selected() {
            Some(_) => output::products_table(page.products()),
            None => output::categories_list(page.categories()),
        }
    })
}
