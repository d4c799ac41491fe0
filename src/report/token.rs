//! Token report: every pool holding the token, snapshots by owner and position.

use super::{
    symbols, write_pool_header, write_snapshot_line, write_stats, write_title, write_window,
};
use crate::errors::Result;
use crate::models::{Pool, PositionSnapshot};
use crate::snapshots::{PoolGroup, SnapshotStats, group_by_pool_and_owner};
use crate::subgraph::SubgraphClient;
use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct TokenReport {
    pub token_id: String,
    pub pools: Vec<Pool>,
    pub snapshots: Vec<PositionSnapshot>,
    pub since: i64,
}

impl TokenReport {
    /// Discover the token's pools, then load their snapshots.
    pub async fn fetch(client: &SubgraphClient, token_id: &str, since: i64) -> Result<Self> {
        let pools = client.fetch_pools_for_token(token_id).await?;
        if pools.is_empty() {
            warn!(token_id, "[REPORT] no pools hold this token");
        }
        let pool_ids: Vec<String> = pools.iter().map(|p| p.id.clone()).collect();
        let snapshots = client.fetch_snapshots(&pool_ids, since).await?;
        info!(
            token_id,
            pools = pools.len(),
            snapshots = snapshots.len(),
            "[REPORT] token data ready"
        );
        Ok(Self {
            token_id: token_id.to_lowercase(),
            pools,
            snapshots,
            since,
        })
    }
}

impl fmt::Display for TokenReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_title(f, "🪙 Token Snapshot Report")?;
        writeln!(f, "Token:  {}", self.token_id)?;
        write_window(f, self.since)?;
        writeln!(f, "Pools:  {}", self.pools.len())?;

        let groups = group_by_pool_and_owner(&self.snapshots);
        for pool in &self.pools {
            writeln!(f)?;
            write_pool_header(f, pool)?;
            match groups.iter().find(|g| g.pool_id == pool.id) {
                Some(group) => write_pool_group(f, group, Some(pool))?,
                None => writeln!(f, "   no snapshots in window")?,
            }
        }
        // snapshots whose pool was not part of the discovery result
        for group in groups
            .iter()
            .filter(|g| !self.pools.iter().any(|p| p.id == g.pool_id))
        {
            writeln!(f)?;
            writeln!(f, "🏊 {}", group.pool_id)?;
            write_pool_group(f, group, None)?;
        }

        write_stats(f, &SnapshotStats::from_snapshots(&self.snapshots))
    }
}

fn write_pool_group(
    f: &mut fmt::Formatter<'_>,
    group: &PoolGroup,
    pool: Option<&Pool>,
) -> fmt::Result {
    writeln!(
        f,
        "   🕒 {} snapshots from {} users",
        group.snapshot_count(),
        group.owners.len()
    )?;
    for owner in &group.owners {
        writeln!(f, "   👤 {} ({} snapshots)", owner.owner, owner.snapshots.len())?;
        for position in owner.positions() {
            let latest = &position.snapshots[0];
            writeln!(
                f,
                "      📍 #{} - {} snapshots, liquidity {}",
                position.position_id,
                position.snapshots.len(),
                latest.liquidity
            )?;
            write_snapshot_line(f, "         ", latest, symbols(pool))?;
        }
    }
    Ok(())
}
