use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "taskhub")]
#[command(about = "Task Hub: provision a projects and tasks dashboard in Notion")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Notion integration token
    #[arg(long, global = true, env = "NOTION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Id of the page the hub is created under (overrides config)
    #[arg(long, global = true, env = "ROOT_PAGE_ID")]
    pub root_page: Option<String>,

    /// Notion API base URL (overrides config)
    #[arg(long, global = true, env = "NOTION_API_URL")]
    pub api_url: Option<String>,

    /// Config profile name
    #[arg(short, long, global = true, env = "TASKHUB_PROFILE", default_value = "default")]
    pub profile: String,

    /// HTTP request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or repair the Task Hub under the root page
    Bootstrap(RunArgs),
    /// Show what bootstrap would change without writing anything
    Plan(RunArgs),
    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Do not append the database links and tips to the dashboard
    #[arg(long)]
    pub skip_links: bool,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current config
    Show,
    /// Set config value
    Set(ConfigSetArgs),
}

#[derive(clap::Args)]
pub struct ConfigSetArgs {
    /// Key to set (root_page, api_url)
    pub key: String,
    /// Value
    pub value: String,
}
