mod api;
mod cli;
mod config;
mod form;
mod models;
mod report;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use api::HttpStore;
use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    // Config edits never touch the network
    if let Some(Commands::Config { endpoint }) = &cli.command {
        return handlers::handle_config(&mut config, endpoint.as_deref());
    }

    debug!("Using endpoint {}", config.endpoint.url);
    let store = HttpStore::connect(&config.endpoint.url, config.endpoint.timeout_secs)
        .context("Building HTTP client")?;

    match cli.command {
        Some(Commands::Summary) => handlers::handle_summary(&store)?,
        Some(Commands::List { search, maintenance }) => {
            handlers::handle_list(&store, search.as_deref(), maintenance)?;
        }
        Some(Commands::Days { mosque_code, maintenance }) => {
            handlers::handle_days(&store, &mosque_code, maintenance)?;
        }
        Some(Commands::Submit {
            file,
            maintenance,
            password,
        }) => {
            handlers::handle_submit(&store, &config, &file, maintenance, password.as_deref())?;
        }
        Some(Commands::Review {
            record_id,
            status,
            maintenance,
            admin_password,
        }) => {
            handlers::handle_review(
                &store,
                &config,
                &record_id,
                &status,
                maintenance,
                admin_password.as_deref(),
            )?;
        }
        Some(Commands::Export) => handlers::handle_export(&store)?,
        Some(Commands::Config { .. }) => unreachable!(),

        // No subcommand → launch TUI
        None => tui::app::run(&store, config)?,
    }

    Ok(())
}
