//! Search command - interactive product search
//!
//! Each line read from stdin replaces the search input. Lines arriving in
//! quick succession are coalesced; results print once input has been quiet
//! for the debounce period.

use anyhow::Result;
use colored::Colorize;
use shopdesk_core::pages::ProductListPage;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::{get_context, page_context};
use crate::output;

pub async fn run(category: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    let (mut page, mut ticks) = ProductListPage::new(page_context(&ctx, false));

    page.mount().await;
    if let Some(category) = &category {
        page.select_category(category).await;
    }
    output::render(page.view(), |_| {})?;

    if atty::is(atty::Stream::Stdin) {
        println!("{}", "Type to search, Ctrl-D to quit.".dimmed());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => page.type_search(line.trim()),
                None => break,
            },
            Some(value) = ticks.recv() => show(&mut page, value).await,
        }
    }

    // Input closed with a search not yet shown
    if page.finish_search(&mut ticks).await {
        print_results(&page);
    }
    Ok(())
}

async fn show(page: &mut ProductListPage, value: String) {
    page.apply_debounced_search(value).await;
    print_results(page);
}

fn print_results(page: &ProductListPage) {
    let heading = match page.search_input() {
        "" => "All products".to_string(),
        query => format!("Results for \"{}\"", query),
    };
    println!("{}", heading.bold());
    if let Err(e) = output::render(page.view(), output::products_table) {
        output::error(&e.to_string());
    }
}
