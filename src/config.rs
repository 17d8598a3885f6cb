use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::theme::Theme;

/// solport - Solana NFT Portfolio Terminal Viewer
///
/// Browse the NFTs owned by a wallet address and check its SOL balance.
/// Configuration priority: CLI args > Environment variables > Config file > Defaults
#[derive(Parser, Debug)]
#[command(name = "solport")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Solana NFT Portfolio Terminal Viewer", long_about = None)]
pub struct CliArgs {
    /// Portfolio backend base URL
    #[arg(long, env = "PORTFOLIO_API_URL")]
    pub api_url: Option<String>,

    /// Wallet address to connect on startup (base58 public key)
    #[arg(short, long, env = "WALLET_ADDRESS")]
    pub wallet: Option<String>,

    /// HTTP request timeout in milliseconds (1000-60000)
    #[arg(long, env = "REQUEST_TIMEOUT_MS")]
    pub request_timeout_ms: Option<u64>,

    /// Balance fetch attempts before giving up (1-10)
    #[arg(long, env = "BALANCE_RETRIES")]
    pub balance_retries: Option<u32>,

    /// Base delay between balance retries in milliseconds (100-10000)
    #[arg(long, env = "RETRY_DELAY_MS")]
    pub retry_delay_ms: Option<u64>,

    /// Quiet period before a typed search term applies, in milliseconds (0-5000)
    #[arg(long, env = "SEARCH_DEBOUNCE_MS")]
    pub search_debounce_ms: Option<u64>,

    /// Target UI rendering FPS (1-120)
    #[arg(long, env = "RENDER_FPS")]
    pub render_fps: Option<u32>,

    /// Color theme: nord or green-phosphor
    #[arg(long, env = "SOLPORT_THEME")]
    pub theme: Option<Theme>,

    /// Path to a TOML config file
    #[arg(long, env = "SOLPORT_CONFIG", default_value = "solport.toml")]
    pub config: String,
}

/// Optional config-file layer; every field can also come from CLI/env.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    wallet: Option<String>,
    request_timeout_ms: Option<u64>,
    balance_retries: Option<u32>,
    retry_delay_ms: Option<u64>,
    search_debounce_ms: Option<u64>,
    render_fps: Option<u32>,
    theme: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub wallet: Option<String>,
    pub request_timeout: Duration,
    pub balance_retries: u32,
    pub retry_delay: Duration,
    pub search_debounce: Duration,
    pub render_fps: u32,
    pub theme: Theme,
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

fn read_file_config(path: &str) -> Result<FileConfig> {
    if !Path::new(path).exists() {
        return Ok(FileConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {path}: {e}"))?;
    toml::from_str(&raw).map_err(|e| anyhow!("invalid config file {path}: {e}"))
}

/// Load configuration from CLI args, environment variables, and the
/// optional config file. Priority: CLI/env (clap merges those two) >
/// file > defaults.
pub fn load() -> Result<Config> {
    let args = CliArgs::parse();
    from_args(args)
}

fn from_args(args: CliArgs) -> Result<Config> {
    let file = read_file_config(&args.config)?;

    let api_url = args
        .api_url
        .or(file.api_url)
        .unwrap_or_else(|| "http://127.0.0.1:8787".to_string());
    validate_url(&api_url, "PORTFOLIO_API_URL")?;

    let wallet = args.wallet.or(file.wallet);

    let request_timeout_ms = args
        .request_timeout_ms
        .or(file.request_timeout_ms)
        .unwrap_or(8000);
    let request_timeout_ms =
        validate_in_range(request_timeout_ms, 1000, 60000, "REQUEST_TIMEOUT_MS")?;

    let balance_retries = args.balance_retries.or(file.balance_retries).unwrap_or(3);
    let balance_retries = validate_in_range(balance_retries, 1, 10, "BALANCE_RETRIES")?;

    let retry_delay_ms = args.retry_delay_ms.or(file.retry_delay_ms).unwrap_or(500);
    let retry_delay_ms = validate_in_range(retry_delay_ms, 100, 10000, "RETRY_DELAY_MS")?;

    let search_debounce_ms = args
        .search_debounce_ms
        .or(file.search_debounce_ms)
        .unwrap_or(300);
    let search_debounce_ms =
        validate_in_range(search_debounce_ms, 0, 5000, "SEARCH_DEBOUNCE_MS")?;

    let render_fps = args.render_fps.or(file.render_fps).unwrap_or(30);
    let render_fps = validate_in_range(render_fps, 1, 120, "RENDER_FPS")?;

    let theme = match args.theme {
        Some(theme) => theme,
        None => file
            .theme
            .as_deref()
            .map(|s| s.parse().map_err(|e: String| anyhow!(e)))
            .transpose()?
            .unwrap_or_default(),
    };

    Ok(Config {
        api_url,
        wallet,
        request_timeout: Duration::from_millis(request_timeout_ms),
        balance_retries,
        retry_delay: Duration::from_millis(retry_delay_ms),
        search_debounce: Duration::from_millis(search_debounce_ms),
        render_fps,
        theme,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_args() -> CliArgs {
        CliArgs {
            api_url: Some("https://api.example.com".into()),
            wallet: None,
            request_timeout_ms: None,
            balance_retries: None,
            retry_delay_ms: None,
            search_debounce_ms: None,
            render_fps: None,
            theme: None,
            config: "/nonexistent/solport.toml".into(),
        }
    }

    #[test]
    fn defaults_fill_unset_fields() {
        let cfg = from_args(bare_args()).unwrap();
        assert_eq!(cfg.request_timeout, Duration::from_millis(8000));
        assert_eq!(cfg.balance_retries, 3);
        assert_eq!(cfg.search_debounce, Duration::from_millis(300));
        assert_eq!(cfg.render_fps, 30);
        assert_eq!(cfg.theme, Theme::Nord);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut args = bare_args();
        args.render_fps = Some(500);
        assert!(from_args(args).is_err());

        let mut args = bare_args();
        args.request_timeout_ms = Some(10);
        assert!(from_args(args).is_err());
    }

    #[test]
    fn non_http_api_url_is_rejected() {
        let mut args = bare_args();
        args.api_url = Some("ftp://api.example.com".into());
        assert!(from_args(args).is_err());
    }
}
