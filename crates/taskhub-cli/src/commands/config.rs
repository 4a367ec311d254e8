use anyhow::Result;
use colored::Colorize;

use crate::client::DEFAULT_API_URL;
use crate::config::ConfigStore;
use crate::output::print_success;

pub fn show(store: &ConfigStore, profile: &str) -> Result<()> {
    let cfg = store.load_profile(profile)?;
    println!("{}: {}", "Config".cyan(), store.path().display());
    println!("{}: {}", "Profile".cyan(), profile);
    println!(
        "{}: {}",
        "Root page".cyan(),
        cfg.root_page.as_deref().unwrap_or("(not set)")
    );
    println!(
        "{}: {}",
        "API URL".cyan(),
        cfg.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    );
    Ok(())
}

pub fn set(store: &ConfigStore, profile: &str, key: &str, value: &str) -> Result<()> {
    let mut cfg = store.load_profile(profile)?;
    cfg.set(key, value)?;
    store.save_profile(profile, &cfg)?;
    print_success(&format!("Set {key} = {value}"));
    Ok(())
}
