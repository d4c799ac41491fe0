//! Position-centric report for an allow-list of users.

use super::{symbols, write_snapshot_line, write_stats, write_title, write_window};
use crate::errors::Result;
use crate::format::{format_decimal, format_timestamp};
use crate::models::{Pool, PositionSnapshot};
use crate::snapshots::{
    PositionSummary, SnapshotStats, TIMELINE_LIMIT, filter_by_owners, group_by_pool_and_owner,
    significant_events,
};
use crate::subgraph::SubgraphClient;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct UserReport {
    pub token_id: String,
    pub allow_list: Vec<String>,
    pub pools: Vec<Pool>,
    /// Snapshots already restricted to the allow-list.
    pub snapshots: Vec<PositionSnapshot>,
    pub since: i64,
}

impl UserReport {
    pub async fn fetch(
        client: &SubgraphClient,
        token_id: &str,
        allow_list: &[String],
        since: i64,
    ) -> Result<Self> {
        let pools = client.fetch_pools_for_token(token_id).await?;
        if pools.is_empty() {
            warn!(token_id, "[REPORT] no pools hold this token");
        }
        let pool_ids: Vec<String> = pools.iter().map(|p| p.id.clone()).collect();
        let fetched = client.fetch_snapshots(&pool_ids, since).await?;
        let total = fetched.len();
        let snapshots = filter_by_owners(fetched, allow_list);
        info!(
            token_id,
            users = allow_list.len(),
            fetched = total,
            kept = snapshots.len(),
            "[REPORT] user data ready"
        );
        Ok(Self {
            token_id: token_id.to_lowercase(),
            allow_list: allow_list.to_vec(),
            pools,
            snapshots,
            since,
        })
    }

    fn pool(&self, pool_id: &str) -> Option<&Pool> {
        self.pools.iter().find(|p| p.id == pool_id)
    }
}

impl fmt::Display for UserReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_title(f, "👥 User Position Report")?;
        writeln!(f, "Token:  {}", self.token_id)?;
        if self.allow_list.is_empty() {
            writeln!(f, "Users:  all")?;
        } else {
            writeln!(f, "Users:  {}", self.allow_list.join(", "))?;
        }
        write_window(f, self.since)?;

        if self.snapshots.is_empty() {
            writeln!(f)?;
            writeln!(f, "no snapshots for these users in window")?;
        }

        for group in group_by_pool_and_owner(&self.snapshots) {
            let pool = self.pool(&group.pool_id);
            writeln!(f)?;
            match pool {
                Some(p) => writeln!(f, "🏊 {} ({})", p.pair(), p.id)?,
                None => writeln!(f, "🏊 {}", group.pool_id)?,
            }
            for owner in &group.owners {
                writeln!(f, "   👤 {}", owner.owner)?;
                for position in owner.positions() {
                    write_summary(f, &position.summary(), symbols(pool))?;
                    let timeline = significant_events(&position.snapshots, TIMELINE_LIMIT);
                    if timeline.events.is_empty() {
                        writeln!(f, "         no deposits, withdrawals or fees")?;
                    }
                    for event in &timeline.events {
                        write_snapshot_line(f, "         ", event, symbols(pool))?;
                    }
                    if timeline.remaining > 0 {
                        writeln!(f, "         ... and {} more events", timeline.remaining)?;
                    }
                }
            }
        }

        write_stats(f, &SnapshotStats::from_snapshots(&self.snapshots))
    }
}

fn write_summary(
    f: &mut fmt::Formatter<'_>,
    s: &PositionSummary,
    (sym0, sym1): (&str, &str),
) -> fmt::Result {
    writeln!(
        f,
        "      📍 #{} - {} snapshots ({} → {})",
        s.position_id,
        s.snapshot_count,
        format_timestamp(s.first_seen),
        format_timestamp(s.last_seen)
    )?;
    writeln!(
        f,
        "         Liquidity: current {} | max {}",
        s.current_liquidity, s.max_liquidity
    )?;
    writeln!(
        f,
        "         Deposited: {} {sym0} / {} {sym1}",
        format_decimal(&s.total_deposited0),
        format_decimal(&s.total_deposited1)
    )?;
    writeln!(
        f,
        "         Withdrawn: {} {sym0} / {} {sym1}",
        format_decimal(&s.total_withdrawn0),
        format_decimal(&s.total_withdrawn1)
    )?;
    writeln!(
        f,
        "         Fees:      {} {sym0} / {} {sym1}",
        format_decimal(&s.total_fees0),
        format_decimal(&s.total_fees1)
    )?;
    writeln!(
        f,
        "         Net:       {} {sym0} / {} {sym1}",
        format_decimal(&s.net0()),
        format_decimal(&s.net1())
    )
}
