use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// A required setting was not supplied by flag or environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please specify an API key (--apikey or WSDL_APIKEY)")]
    MissingApiKey,
    #[error("Please specify a prefix (--prefix or WSDL_PREFIX)")]
    MissingPrefix,
    #[error("Please specify a filename for the manifest (--manifest or WSDL_MANIFEST)")]
    MissingManifest,
    #[error("Please specify one or more items to download (as arguments or WSDL_SEEDS)")]
    MissingSeeds,
}

/// Application configuration.
pub struct Config {
    pub api_key: String,
    pub api_url: String,
    /// Destination folder for `<id>.vpk` / `<id>.jpg` and the manifest.
    pub prefix: PathBuf,
    pub manifest_path: PathBuf,
    pub seeds: Vec<String>,
    pub request_delay: Duration,

    pub list_only: bool,
    pub dry_run: bool,
    pub no_progress_bar: bool,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("prefix", &self.prefix)
            .field("manifest_path", &self.manifest_path)
            .field("seeds", &self.seeds)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Treat missing and blank values alike; an exported-but-empty env var
/// shouldn't count as configured.
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_cli(cli: crate::cli::Cli) -> Result<Self, ConfigError> {
        let api_key = non_blank(cli.apikey).ok_or(ConfigError::MissingApiKey)?;
        let prefix = non_blank(Some(cli.prefix)).ok_or(ConfigError::MissingPrefix)?;
        let manifest = non_blank(Some(cli.manifest)).ok_or(ConfigError::MissingManifest)?;

        // WSDL_SEEDS splitting on single spaces leaves empty pieces for runs
        // of whitespace.
        let seeds: Vec<String> = cli
            .seeds
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if seeds.is_empty() {
            return Err(ConfigError::MissingSeeds);
        }

        let prefix = expand_tilde(&prefix);
        let manifest_path = prefix.join(manifest);

        Ok(Self {
            api_key,
            api_url: cli.api_url,
            prefix,
            manifest_path,
            seeds,
            request_delay: Duration::from_secs(cli.request_delay),
            list_only: cli.list_only,
            dry_run: cli.dry_run,
            no_progress_bar: cli.no_progress_bar,
        })
    }

    pub fn sync_config(&self) -> crate::download::SyncConfig {
        crate::download::SyncConfig {
            prefix: self.prefix.clone(),
            dry_run: self.dry_run,
            no_progress_bar: self.no_progress_bar,
        }
    }
}
