//! Configuration loader and application settings.

use crate::errors::{AppError, Result};
use tracing::warn;
use url::Url;

/// Uniswap v3 mainnet subgraph on the retired hosted service.
///
/// The hosted service no longer answers queries, so real runs must set
/// `SUBGRAPH_URL`, typically to a decentralized-network gateway URL such as
/// `https://gateway.thegraph.com/api/<api-key>/subgraphs/id/<subgraph-id>`.
pub const DEFAULT_SUBGRAPH_URL: &str =
    "https://api.thegraph.com/subgraphs/name/uniswap/uniswap-v3";
/// Uniswap V3 USDC/WETH 0.05%
pub const DEFAULT_POOL_ID: &str = "0x88e6a0c2ddd26feeb64f039a2c41296fcb3f5640";
/// WETH
pub const DEFAULT_TOKEN_ID: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
pub const DEFAULT_LOOKBACK_DAYS: i64 = 7;
/// A century; keeps the window arithmetic well inside chrono's range.
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;
/// The Graph caps `first` at 1000.
pub const MAX_PAGE_SIZE: u32 = 1000;
pub const DEFAULT_MAX_PAGES: u32 = 5;
/// The Graph rejects `skip` values above 5000.
pub const MAX_SKIP: u32 = 5000;

/// Consolidated application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// GraphQL endpoint of the subgraph.
    pub subgraph_url: Url,
    /// Pool inspected by `pool-snapshots`.
    pub pool_id: String,
    /// Token whose pools are inspected by `token-snapshots` and `user-snapshots`.
    pub token_id: String,
    /// Owner allow-list for `user-snapshots`. Empty means everyone.
    pub user_addresses: Vec<String>,
    /// Size of the rolling snapshot window.
    pub lookback_days: i64,
    pub page_size: u32,
    pub max_pages: u32,
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to the built-in defaults.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let subgraph_url = match get("SUBGRAPH_URL") {
            Some(raw) => Url::parse(&raw)?,
            None => {
                warn!(
                    url = DEFAULT_SUBGRAPH_URL,
                    "[CONFIG] SUBGRAPH_URL not set, using the retired hosted-service endpoint"
                );
                Url::parse(DEFAULT_SUBGRAPH_URL)?
            }
        };
        let pool_id = get("POOL_ID")
            .unwrap_or_else(|| DEFAULT_POOL_ID.into())
            .to_lowercase();
        let token_id = get("TOKEN_ID")
            .unwrap_or_else(|| DEFAULT_TOKEN_ID.into())
            .to_lowercase();
        let user_addresses = get("USER_ADDRESSES")
            .map(|raw| parse_address_list(&raw))
            .unwrap_or_default();

        let lookback_days =
            parse_or("LOOKBACK_DAYS", get("LOOKBACK_DAYS"), DEFAULT_LOOKBACK_DAYS)?;
        if !(1..=MAX_LOOKBACK_DAYS).contains(&lookback_days) {
            return Err(AppError::Config(format!(
                "LOOKBACK_DAYS must be within 1..={MAX_LOOKBACK_DAYS}, got {lookback_days}"
            )));
        }

        let page_size =
            parse_or("SUBGRAPH_PAGE_SIZE", get("SUBGRAPH_PAGE_SIZE"), MAX_PAGE_SIZE)?;
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(AppError::Config(format!(
                "SUBGRAPH_PAGE_SIZE must be within 1..={MAX_PAGE_SIZE}, got {page_size}"
            )));
        }

        let max_pages =
            parse_or("SUBGRAPH_MAX_PAGES", get("SUBGRAPH_MAX_PAGES"), DEFAULT_MAX_PAGES)?;
        if max_pages == 0 {
            return Err(AppError::Config("SUBGRAPH_MAX_PAGES must be at least 1".into()));
        }
        // the last page is requested with skip = page_size * (max_pages - 1)
        let last_skip = u64::from(page_size) * u64::from(max_pages - 1);
        if last_skip > u64::from(MAX_SKIP) {
            return Err(AppError::Config(format!(
                "SUBGRAPH_PAGE_SIZE={page_size} with SUBGRAPH_MAX_PAGES={max_pages} \
                 would skip {last_skip} rows, the subgraph allows at most {MAX_SKIP}"
            )));
        }

        Ok(Self {
            subgraph_url,
            pool_id,
            token_id,
            user_addresses,
            lookback_days,
            page_size,
            max_pages,
        })
    }
}

/// Split a comma separated address list, dropping blanks.
pub fn parse_address_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(v) => v
            .parse()
            .map_err(|e| AppError::Config(format!("{key}={v:?}: {e}"))),
        None => Ok(default),
    }
}
