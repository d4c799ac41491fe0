//! Console reports built from subgraph data.
//!
//! Each report is fetched with a `fetch` constructor and rendered through
//! `Display`, so the text can be checked without a network.

pub mod pool;
pub mod token;
pub mod user;

pub use pool::PoolReport;
pub use token::TokenReport;
pub use user::UserReport;

use crate::format::{format_timestamp, format_token_amount, format_usd, short_address};
use crate::models::{Pool, PositionSnapshot};
use crate::snapshots::SnapshotStats;
use std::fmt;

const RULE: &str = "════════════════════════════════════════════════════════════";
const THIN_RULE: &str = "────────────────────────────────────────────────────────────";

fn write_title(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "{RULE}")?;
    writeln!(f, "{title}")?;
    writeln!(f, "{RULE}")
}

fn write_pool_header(f: &mut fmt::Formatter<'_>, pool: &Pool) -> fmt::Result {
    writeln!(f, "🏊 {} ({:.2}% fee)", pool.pair(), pool.fee_percent())?;
    writeln!(f, "   Pool:      {}", pool.id)?;
    writeln!(
        f,
        "   Tokens:    {} ({}, {} decimals) / {} ({}, {} decimals)",
        pool.token0.symbol,
        short_address(&pool.token0.id),
        pool.token0.decimals,
        pool.token1.symbol,
        short_address(&pool.token1.id),
        pool.token1.decimals
    )?;
    writeln!(f, "   Liquidity: {}", pool.liquidity)?;
    match pool.tick {
        Some(tick) => writeln!(f, "   Tick:      {tick}")?,
        None => writeln!(f, "   Tick:      uninitialised")?,
    }
    writeln!(f, "   Volume:    {}", format_usd(&pool.volume_usd))?;
    writeln!(f, "   TVL:       {}", format_usd(&pool.total_value_locked_usd))?;
    writeln!(f, "   Txs:       {}", pool.tx_count)
}

/// One-line rendering of a snapshot's deltas.
fn write_snapshot_line(
    f: &mut fmt::Formatter<'_>,
    indent: &str,
    snap: &PositionSnapshot,
    symbols: (&str, &str),
) -> fmt::Result {
    writeln!(
        f,
        "{indent}{} | block {} | liq {} | +{} {} / +{} {} | -{} {} / -{} {} | fees {} {} / {} {}",
        format_timestamp(snap.timestamp),
        snap.block_number,
        snap.liquidity,
        format_token_amount(&snap.deposited_token0),
        symbols.0,
        format_token_amount(&snap.deposited_token1),
        symbols.1,
        format_token_amount(&snap.withdrawn_token0),
        symbols.0,
        format_token_amount(&snap.withdrawn_token1),
        symbols.1,
        format_token_amount(&snap.collected_fees_token0),
        symbols.0,
        format_token_amount(&snap.collected_fees_token1),
        symbols.1,
    )
}

fn write_window(f: &mut fmt::Formatter<'_>, since: i64) -> fmt::Result {
    writeln!(f, "Window: since {}", format_timestamp(since))
}

fn write_stats(f: &mut fmt::Formatter<'_>, stats: &SnapshotStats) -> fmt::Result {
    writeln!(f, "{THIN_RULE}")?;
    writeln!(f, "📊 Summary")?;
    writeln!(f, "   Snapshots: {}", stats.snapshots)?;
    writeln!(f, "   Pools:     {}", stats.pools)?;
    writeln!(f, "   Users:     {}", stats.owners)?;
    writeln!(f, "   Positions: {}", stats.positions)?;
    if let (Some(earliest), Some(latest)) = (stats.earliest, stats.latest) {
        writeln!(
            f,
            "   Range:     {} → {}",
            format_timestamp(earliest),
            format_timestamp(latest)
        )?;
    }
    if let Some((owner, count)) = &stats.most_active_owner {
        writeln!(f, "   Most active: {owner} ({count} snapshots)")?;
    }
    Ok(())
}

/// Token symbols of a pool, or placeholders when the pool is unknown.
fn symbols(pool: Option<&Pool>) -> (&str, &str) {
    pool.map(|p| (p.token0.symbol.as_str(), p.token1.symbol.as_str()))
        .unwrap_or(("token0", "token1"))
}
