//! CLI command implementations

pub mod auth;
pub mod cart;
pub mod carts;
pub mod categories;
pub mod demo;
pub mod logs;
pub mod product;
pub mod products;
pub mod search;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use dialoguer::Confirm;
use shopdesk_core::pages::PageContext;
use shopdesk_core::ports::Prompt;
use shopdesk_core::services::{EntryPoint, LoggingService};
use shopdesk_core::ShopContext;

use crate::output;

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let dir = get_dir().ok()?;
    std::fs::create_dir_all(&dir).ok()?;
    LoggingService::new(&dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION")).ok()
}

/// App directory from `SHOPDESK_DIR`, or `~/.shopdesk`
pub fn get_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("SHOPDESK_DIR") {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir()
        .map(|home| home.join(".shopdesk"))
        .ok_or_else(|| anyhow!("Could not find home directory"))
}

/// Open the shop context for a command
pub fn get_context() -> Result<ShopContext> {
    let dir = get_dir()?;
    ShopContext::open(&dir, EntryPoint::Cli)
        .with_context(|| format!("Failed to open shop context in {:?}", dir))
}

/// Page collaborators with a terminal (or auto-confirming) prompt
pub fn page_context(ctx: &ShopContext, yes: bool) -> PageContext {
    ctx.page_context(Arc::new(TerminalPrompt { assume_yes: yes }))
}

/// Confirmation and notices on the terminal
///
/// Declines when stdin is not a terminal unless `assume_yes` is set.
pub struct TerminalPrompt {
    pub assume_yes: bool,
}

impl Prompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        if atty::isnt(atty::Stream::Stdin) {
            return false;
        }
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .unwrap_or(false)
    }

    fn notify(&self, message: &str) {
        output::info(message);
    }
}
