//! Demo command - manage demo mode

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_dir;
use shopdesk_core::services::DemoService;

#[derive(Subcommand)]
pub enum DemoCommands {
    /// Use the built-in offline shop
    #[command(name = "on")]
    On,
    /// Go back to the remote API
    #[command(name = "off")]
    Off,
    /// Show demo mode status
    Status,
}

pub fn run(command: Option<DemoCommands>) -> Result<()> {
    let dir = get_dir()?;
    std::fs::create_dir_all(&dir)?;
    let demo_service = DemoService::new(&dir);

    match command {
        Some(DemoCommands::On) => {
            demo_service.enable()?;
            println!("{}", "Demo mode enabled".green());
            println!("You have been logged out. Demo login: emilys / emilyspass");
        }
        Some(DemoCommands::Off) => {
            demo_service.disable()?;
            println!("{}", "Demo mode disabled".yellow());
            println!("You have been logged out.");
        }
        Some(DemoCommands::Status) | None => {
            if demo_service.is_enabled()? {
                println!("Demo mode is {}", "ON".green());
            } else {
                println!("Demo mode is {}", "OFF".yellow());
            }
        }
    }
    Ok(())
}
