mod cli;
mod client;
mod commands;
mod config;
mod observability;
mod output;
mod wire;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use taskhub_core::{DynWorkspace, Handle};

use cli::{Cli, Commands, ConfigCommands};
use client::NotionClient;
use config::ConfigStore;
use output::print_error;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the environment may already be set.
    let _ = dotenvy::dotenv();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    observability::init_tracing(&cli.log_level);

    let store = ConfigStore::default_location();
    let profile = &cli.profile;

    match &cli.command {
        Commands::Config(args) => {
            let store = store?;
            match &args.command {
                ConfigCommands::Show => commands::config::show(&store, profile)?,
                ConfigCommands::Set(set) => {
                    commands::config::set(&store, profile, &set.key, &set.value)?
                }
            }
        }
        Commands::Bootstrap(args) => {
            let (client, root) = connect(&cli, store.ok().as_ref())?;
            commands::bootstrap::run(client.as_ref(), &root, args).await?;
        }
        Commands::Plan(args) => {
            let (client, root) = connect(&cli, store.ok().as_ref())?;
            commands::plan::run(client.as_ref(), &root, args).await?;
        }
    }

    Ok(())
}

/// Resolves settings and builds the Notion client. Fails before any remote call.
///
/// Without a home directory there is no profile file, so flags and
/// environment alone must supply the settings.
fn connect(cli: &Cli, store: Option<&ConfigStore>) -> Result<(DynWorkspace, Handle)> {
    let profile = config::load_profile_or_default(store, &cli.profile)?;
    let settings = config::resolve(
        cli.token.as_deref(),
        cli.root_page.as_deref(),
        cli.api_url.as_deref(),
        &profile,
    )?;
    tracing::debug!(api_url = %settings.api_url, profile = %cli.profile, "Resolved settings");

    let client = NotionClient::new(
        &settings.api_url,
        &settings.token,
        Duration::from_secs(cli.timeout_secs),
    )?;
    let client: DynWorkspace = Arc::new(client);
    Ok((client, Handle::page(settings.root_page)))
}
