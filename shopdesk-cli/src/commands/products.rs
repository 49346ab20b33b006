//! Products command - list, filter and search the catalogue

use anyhow::Result;
use shopdesk_core::pages::ProductListPage;

use super::{get_context, page_context};
use crate::output;

pub async fn run(category: Option<String>, search: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let (mut page, _ticks) = ProductListPage::new(page_context(&ctx, false));

    let spinner = output::spinner("Loading products...");
    page.mount().await;
    if let Some(category) = &category {
        page.select_category(category).await;
    }
    if let Some(search) = &search {
        page.search_now(search).await;
    }
    output::finish_spinner(spinner);

    if json {
        return output::render(page.view(), |products| {
            if let Ok(text) = serde_json::to_string_pretty(products) {
                println!("{}", text);
            }
        });
    }

    output::navbar(ctx.auth.logged_in_user().as_ref());
    output::render(page.view(), |products| {
        println!("Category: {}", page.selected_category());
        output::products_table(products);
    })
}
