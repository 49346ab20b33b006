//! Auth commands - login, logout, whoami and manual token refresh

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::{Input, Password};
use shopdesk_core::pages::LoginPage;
use shopdesk_core::Error;

use super::get_context;
use crate::output;

pub async fn login(username: Option<String>, password: Option<String>) -> Result<()> {
    let ctx = get_context()?;
    let interactive = atty::is(atty::Stream::Stdin);
    let mut page = LoginPage::new(ctx.auth.clone());

    page.username = match username {
        Some(username) => username,
        None if interactive => Input::new()
            .with_prompt("Username")
            .allow_empty(true)
            .interact_text()?,
        None => String::new(),
    };
    page.password = match password {
        Some(password) => password,
        None if interactive => Password::new()
            .with_prompt("Password")
            .allow_empty_password(true)
            .interact()?,
        None => String::new(),
    };

    match page.submit().await {
        Some(route) => {
            let name = page.user().map(|u| u.display_name()).unwrap_or_default();
            output::success(&format!("Logged in as {}", name));
            println!("{}", format!("Next: {}", route).dimmed());
            Ok(())
        }
        None => bail!("{}", page.error().unwrap_or("login failed. please try again.")),
    }
}

pub fn logout() -> Result<()> {
    let ctx = get_context()?;
    if !ctx.auth.is_logged_in() {
        output::warning("Not logged in");
        return Ok(());
    }
    ctx.auth.logout()?;
    output::success("Logged out");
    Ok(())
}

/// Ask the server who the stored token belongs to
pub async fn whoami(json: bool) -> Result<()> {
    let ctx = get_context()?;

    let user = match ctx.auth.current_user().await {
        Ok(user) => user,
        Err(e @ Error::Unauthorized { .. }) => bail!("{}. Run 'shop login' first.", e),
        Err(e) => return Err(e.into()),
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&user)?);
        return Ok(());
    }

    println!("{}", user.display_name().bold());
    println!("  Username: {}", user.username);
    if let Some(email) = &user.email {
        println!("  Email: {}", email);
    }
    println!("  ID: {}", user.id);
    Ok(())
}

pub async fn refresh() -> Result<()> {
    let ctx = get_context()?;
    ctx.auth.refresh().await?;
    output::success("Session refreshed");
    Ok(())
}
