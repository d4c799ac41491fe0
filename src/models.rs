//! Subgraph entities shared throughout the application.
//!
//! `BigInt` fields arrive as JSON strings and are decoded into integers.
//! Token amounts (`BigDecimal` in the subgraph schema) stay as strings and are
//! parsed with [`parse_amount`] where arithmetic is needed.

use bigdecimal::BigDecimal;
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::str::FromStr;

/// ERC-20 token descriptor attached to a pool.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub id: String,
    pub name: String,
    pub symbol: String,
    #[serde(deserialize_with = "de_number")]
    pub decimals: u32,
}

/// `{ id }` reference to another entity.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EntityRef {
    pub id: String,
}

/// Liquidity pool snapshot as served by the subgraph.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: String,
    pub token0: Token,
    pub token1: Token,
    /// Fee in hundredths of a basis point (500 = 0.05%).
    #[serde(deserialize_with = "de_number")]
    pub fee_tier: u32,
    #[serde(deserialize_with = "de_number")]
    pub liquidity: u128,
    /// Null until the pool is initialised.
    #[serde(default, deserialize_with = "de_opt_number")]
    pub tick: Option<i64>,
    #[serde(rename = "volumeUSD", default)]
    pub volume_usd: String,
    #[serde(rename = "totalValueLockedUSD", default)]
    pub total_value_locked_usd: String,
    #[serde(deserialize_with = "de_number")]
    pub tx_count: u64,
}

impl Pool {
    /// `WETH/USDC` style label.
    pub fn pair(&self) -> String {
        format!("{}/{}", self.token0.symbol, self.token1.symbol)
    }

    /// Fee tier as a percentage, e.g. 500 -> 0.05.
    pub fn fee_percent(&self) -> f64 {
        self.fee_tier as f64 / 10_000.0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tick {
    #[serde(rename = "tickIdx", deserialize_with = "de_number")]
    pub index: i64,
}

/// Liquidity position (NFT) held in a pool.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub owner: String,
    #[serde(deserialize_with = "de_number")]
    pub liquidity: u128,
    #[serde(default)]
    pub deposited_token0: String,
    #[serde(default)]
    pub deposited_token1: String,
    #[serde(default)]
    pub withdrawn_token0: String,
    #[serde(default)]
    pub withdrawn_token1: String,
    #[serde(default)]
    pub collected_fees_token0: String,
    #[serde(default)]
    pub collected_fees_token1: String,
    pub tick_lower: Tick,
    pub tick_upper: Tick,
    pub pool: EntityRef,
}

impl Position {
    pub fn is_active(&self) -> bool {
        self.liquidity > 0
    }
}

/// Point-in-time observation of a position.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSnapshot {
    pub id: String,
    pub owner: String,
    pub pool: EntityRef,
    pub position: EntityRef,
    #[serde(deserialize_with = "de_number")]
    pub block_number: u64,
    #[serde(deserialize_with = "de_number")]
    pub timestamp: i64,
    #[serde(deserialize_with = "de_number")]
    pub liquidity: u128,
    #[serde(default)]
    pub deposited_token0: String,
    #[serde(default)]
    pub deposited_token1: String,
    #[serde(default)]
    pub withdrawn_token0: String,
    #[serde(default)]
    pub withdrawn_token1: String,
    #[serde(default)]
    pub collected_fees_token0: String,
    #[serde(default)]
    pub collected_fees_token1: String,
}

/// Largest decimal exponent, in either direction, accepted from subgraph strings.
pub const MAX_DECIMAL_EXPONENT: i64 = 256;

/// Parse a decimal string.
///
/// Exponent notation is accepted only while the value stays within
/// [`MAX_DECIMAL_EXPONENT`] digits of the decimal point; rescaling anything
/// larger would expand it digit by digit.
pub fn parse_decimal(raw: &str) -> Option<BigDecimal> {
    let value = BigDecimal::from_str(raw.trim()).ok()?;
    let (_, scale) = value.as_bigint_and_exponent();
    (scale.abs() <= MAX_DECIMAL_EXPONENT).then_some(value)
}

/// Parse a subgraph decimal string; empty, malformed or out-of-range input counts as zero.
pub fn parse_amount(raw: &str) -> BigDecimal {
    parse_decimal(raw).unwrap_or_default()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

impl NumberOrString {
    fn parse<T>(self) -> Result<T, String>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = match self {
            NumberOrString::Number(n) => n.to_string(),
            NumberOrString::String(s) => s,
        };
        raw.trim()
            .parse::<T>()
            .map_err(|e| format!("invalid number {raw:?}: {e}"))
    }
}

fn de_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    NumberOrString::deserialize(deserializer)?
        .parse()
        .map_err(serde::de::Error::custom)
}

fn de_opt_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::parse)
        .transpose()
        .map_err(serde::de::Error::custom)
}
