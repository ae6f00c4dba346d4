use clap::Parser;

use crate::types::LogLevel;
use crate::workshop::client::DEFAULT_API_URL;

#[derive(Parser, Debug)]
#[command(
    name = "workshop-sync",
    about = "Download Steam Workshop collections and items, fetching only what changed",
    after_help = "<ID> can be a collection or a single file; collections are expanded recursively."
)]
pub struct Cli {
    /// Steamworks Web API key.
    /// WARNING: passing via --apikey is visible in process listings.
    /// Prefer the WSDL_APIKEY environment variable instead.
    #[arg(long, env = "WSDL_APIKEY", hide_env_values = true)]
    pub apikey: Option<String>,

    /// Path to the <gamedir>/addons/workshop folder
    #[arg(long, env = "WSDL_PREFIX", default_value = "./workshop")]
    pub prefix: String,

    /// Filename storing the state of downloaded files (kept inside the prefix)
    #[arg(long, env = "WSDL_MANIFEST", default_value = "workshopmanifest.json")]
    pub manifest: String,

    /// One or more Workshop collection or file IDs (space separated in the env var)
    #[arg(value_name = "ID", env = "WSDL_SEEDS", value_delimiter = ' ')]
    pub seeds: Vec<String>,

    /// Seconds to wait before each metadata request
    #[arg(long, env = "WSDL_REQUEST_DELAY", default_value_t = 5)]
    pub request_delay: u64,

    /// GetDetails endpoint of the Web API
    #[arg(long, env = "WSDL_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Resolve and list items, then exit without syncing
    #[arg(long)]
    pub list_only: bool,

    /// Report what would be downloaded without touching any files
    #[arg(long)]
    pub dry_run: bool,

    /// Disable progress bar
    #[arg(long)]
    pub no_progress_bar: bool,

    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}
