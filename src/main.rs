//! `resilient-fetch` command line tool.
//!
//! Fetches one JSON document with retries and a timeout, then prints either
//! the data or a user-facing failure message.
//!
//! ```text
//! CLI flags ─┐
//!            ├─▶ FetcherConfig ─▶ logging::init
//! config.toml┘         │
//!                      ├─▶ FetchRequest
//!                      └─▶ ResilientFetcher (reqwest session)
//!                                │
//!                                ▼
//!                          FetchOutcome ─▶ stdout (JSON) | stderr (message)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use resilient_fetch::config::validation::validate_config;
use resilient_fetch::config::{load_config, ConfigError, FetcherConfig};
use resilient_fetch::observability::logging;
use resilient_fetch::{FetchOutcome, ResilientFetcher};

const CONFIG_FAILURE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "resilient-fetch")]
#[command(about = "Fetch JSON over HTTP with retries, timeouts and classified failures", long_about = None)]
struct Cli {
    /// URL to fetch (defaults to `url` from the config file)
    url: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-attempt timeout in seconds
    #[arg(long)]
    timeout: Option<f64>,

    /// Retries after the first attempt
    #[arg(long)]
    max_retries: Option<u32>,

    /// Exponential backoff base, in seconds
    #[arg(long)]
    backoff_factor: Option<f64>,

    /// Retryable status code (repeatable, replaces the configured set)
    #[arg(long = "retry-status", value_name = "CODE")]
    retry_status: Vec<u16>,

    /// Fail with a request error once retries are exhausted
    #[arg(long)]
    raise_on_status: bool,

    /// Append failures to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Console log filter (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Load the config file (or defaults) and apply flag overrides.
    fn resolve(&self) -> Result<FetcherConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => FetcherConfig::default(),
        };

        if let Some(url) = &self.url {
            config.url = Some(url.clone());
        }
        if let Some(timeout) = self.timeout {
            config.request.timeout_secs = timeout;
        }
        if let Some(max_retries) = self.max_retries {
            config.request.max_retries = max_retries;
        }
        if let Some(factor) = self.backoff_factor {
            config.request.backoff_factor = factor;
        }
        if !self.retry_status.is_empty() {
            config.request.retryable_status_codes = self.retry_status.clone();
        }
        if self.raise_on_status {
            config.request.raise_on_status = true;
        }
        if let Some(path) = &self.log_file {
            config.logging.file = Some(path.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::from(CONFIG_FAILURE);
        }
    };

    if let Err(e) = logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::from(CONFIG_FAILURE);
    }

    let Some(url) = config.url.clone() else {
        eprintln!("No URL given on the command line or in the config file");
        return ExitCode::from(CONFIG_FAILURE);
    };

    let request = match config.request.to_request(url) {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Invalid request: {e}");
            return ExitCode::from(CONFIG_FAILURE);
        }
    };

    let fetcher = match ResilientFetcher::from_config(&config.client) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {e}");
            return ExitCode::from(CONFIG_FAILURE);
        }
    };

    tracing::info!(
        url = %request.url(),
        timeout = ?request.timeout(),
        max_retries = request.max_retries(),
        "Fetching"
    );

    let outcome = fetcher.fetch(&request).await;
    let code = match &outcome {
        FetchOutcome::Success { data } => {
            match serde_json::to_string_pretty(data) {
                Ok(text) => println!("{text}"),
                Err(_) => println!("{data}"),
            }
            ExitCode::SUCCESS
        }
        FetchOutcome::Failure { kind, .. } => {
            eprintln!("{}", kind.user_message());
            ExitCode::FAILURE
        }
    };

    println!("API call execution complete.");
    code
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "resilient-fetch",
            "https://example.test/users?page=2",
            "--timeout",
            "2.5",
            "--max-retries",
            "1",
            "--retry-status",
            "429",
            "--retry-status",
            "503",
            "--raise-on-status",
        ])
        .unwrap();

        let config = cli.resolve().unwrap();
        assert_eq!(config.url.as_deref(), Some("https://example.test/users?page=2"));
        assert_eq!(config.request.timeout_secs, 2.5);
        assert_eq!(config.request.max_retries, 1);
        assert_eq!(config.request.retryable_status_codes, vec![429, 503]);
        assert!(config.request.raise_on_status);
        assert_eq!(config.request.backoff_factor, 1.0);
    }

    #[test]
    fn test_invalid_override_is_rejected() {
        let cli = Cli::try_parse_from(["resilient-fetch", "http://localhost", "--timeout", "0"]).unwrap();
        assert!(matches!(cli.resolve(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_url_is_optional() {
        let cli = Cli::try_parse_from(["resilient-fetch"]).unwrap();
        assert!(cli.resolve().unwrap().url.is_none());
    }
}
